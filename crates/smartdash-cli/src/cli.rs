//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SmartDash - Trends, insights and what-if scenarios for your numbers
#[derive(Parser)]
#[command(name = "smartdash")]
#[command(about = "Analytics engine for small numeric series", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Engine config file (defaults to the data dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract a numeric series from a text or PDF document
    Extract {
        /// Document to read (.txt or .pdf)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Forecast the next values of a series
    Predict {
        /// Series file (.json, .csv, .txt or .pdf)
        #[arg(short, long)]
        file: PathBuf,

        /// Category to use when the file holds several
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Summarize trends for every category
    Insights {
        /// Category file (.json, .csv, .txt or .pdf)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Find correlations between categories
    Correlate {
        /// Category file (.json or .csv)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Project a what-if scenario by scaling the forecast
    Simulate {
        /// Series file (.json, .csv, .txt or .pdf)
        #[arg(short, long)]
        file: PathBuf,

        /// Multiplier applied to the baseline forecast
        #[arg(short, long, default_value = "1.0", allow_hyphen_values = true)]
        multiplier: f64,

        /// Category to use when the file holds several
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "5001")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}
