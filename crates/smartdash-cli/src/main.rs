//! SmartDash CLI - Analytics for small numeric series
//!
//! Usage:
//!   smartdash extract --file report.pdf          Pull numbers out of a document
//!   smartdash predict --file sales.json          Forecast the next values
//!   smartdash insights --file metrics.csv        Trend narratives per category
//!   smartdash correlate --file metrics.csv       Cross-category impact estimates
//!   smartdash simulate --file sales.json -m 1.5  What-if projection
//!   smartdash serve --port 5001                  Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use commands::Output;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let engine = commands::load_engine(cli.config.as_deref())?;
    let output = if cli.json { Output::Json } else { Output::Text };

    match cli.command {
        Commands::Extract { file } => commands::cmd_extract(&engine, &file, output),
        Commands::Predict { file, category } => {
            commands::cmd_predict(&engine, &file, category.as_deref(), output)
        }
        Commands::Insights { file } => commands::cmd_insights(&engine, &file, output),
        Commands::Correlate { file } => commands::cmd_correlate(&engine, &file, output),
        Commands::Simulate {
            file,
            multiplier,
            category,
        } => commands::cmd_simulate(&engine, &file, multiplier, category.as_deref(), output),
        Commands::Serve { port, host } => commands::cmd_serve(engine, &host, port).await,
    }
}
