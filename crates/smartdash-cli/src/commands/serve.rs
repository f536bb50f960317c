//! Server command implementation

use anyhow::Result;

use smartdash_core::AnalyticsEngine;
use smartdash_server::{ServerConfig, CORS_ORIGINS_ENV};

pub async fn cmd_serve(engine: AnalyticsEngine, host: &str, port: u16) -> Result<()> {
    let config = ServerConfig::from_env();

    println!("🚀 Starting SmartDash web server...");
    println!("   Listening: http://{}:{}", host, port);
    println!(
        "   Forecast horizons: predict {}, simulate {}",
        engine.config().forecast.predict_horizon,
        engine.config().forecast.simulate_horizon
    );
    if config.allowed_origins.is_empty() {
        println!("   🔒 CORS: same-origin only (set {} to allow others)", CORS_ORIGINS_ENV);
    } else {
        println!("   🌐 CORS: {}", config.allowed_origins.join(", "));
    }
    println!();

    smartdash_server::serve(engine, host, port, config).await
}
