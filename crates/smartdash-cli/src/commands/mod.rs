//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `input` - Shared utilities (engine loading, input files, output mode)
//! - `analyze` - Analysis commands (extract, predict, insights, correlate, simulate)
//! - `serve` - Web server command

pub mod analyze;
pub mod input;
pub mod serve;

// Re-export command functions for main.rs
pub use analyze::*;
pub use input::*;
pub use serve::*;
