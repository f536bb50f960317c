//! Insight Synthesizer - trend narratives per category
//!
//! Turns each category's series into a classified trend, a short-term
//! percentage change, descriptive stats and a deterministic message, then
//! condenses the batch into one global summary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use smartdash_core::insights::InsightEngine;
//!
//! let engine = InsightEngine::new();
//! let report = engine.summarize_all(&series);
//! println!("{}", report.global_summary);
//! ```

pub mod engine;
pub mod narrative;
pub mod types;

pub use engine::{change_pct, InsightEngine, SLOPE_THRESHOLD, SURGE_THRESHOLD_PCT};
pub use types::{Insight, InsightReport, InsightStats, TrendClass};
