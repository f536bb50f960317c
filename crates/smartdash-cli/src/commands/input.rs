//! Shared command utilities: engine loading, input files, output mode

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use smartdash_core::{AnalyticsEngine, EngineConfig, InputFormat};

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

/// Resolve engine config and build the engine
pub fn load_engine(config_path: Option<&Path>) -> Result<AnalyticsEngine> {
    let config = EngineConfig::load(config_path).context("Failed to load engine config")?;
    Ok(AnalyticsEngine::new(config))
}

/// Read an input file and detect its format from the extension
pub fn read_input(path: &Path) -> Result<(Vec<u8>, InputFormat)> {
    let format = InputFormat::from_path(path).with_context(|| {
        format!(
            "Unsupported file type: {} (expected .json, .csv, .txt or .pdf)",
            path.display()
        )
    })?;
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    tracing::debug!(file = %path.display(), bytes = data.len(), "Read input file");
    Ok((data, format))
}

/// Pretty-print any report as JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
