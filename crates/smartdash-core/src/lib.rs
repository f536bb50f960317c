//! SmartDash Core Library
//!
//! Analytics over small numeric series:
//! - Series extraction from plain text and PDF documents
//! - Least-squares trend fits and forecasts
//! - Per-category insight narratives with a batch summary
//! - Pairwise correlation and impact estimates across categories
//! - Multiplier "what-if" scenarios
//! - Threshold alerts and weekly KPI comparison
//!
//! Every operation is pure and stateless; nothing is persisted between calls.

pub mod alerts;
pub mod config;
pub mod correlation;
pub mod engine;
pub mod error;
pub mod extract;
pub mod import;
pub mod insights;
pub mod kpi;
pub mod models;
pub mod scenario;
pub mod stats;
pub mod trend;

pub use alerts::{check_alerts, AlertCondition, AlertNotification, AlertRule};
pub use config::EngineConfig;
pub use correlation::{CorrelationEdge, CorrelationEngine, CorrelationReport, Direction, Strength};
pub use engine::{AnalyticsEngine, PredictionReport, ScenarioReport};
pub use error::{Error, Result};
pub use extract::{ContentKind, EXTRACTED_CATEGORY};
pub use import::InputFormat;
pub use insights::{Insight, InsightEngine, InsightReport, InsightStats, TrendClass};
pub use kpi::{compare_windows, KpiComparison};
pub use models::{CategoryPoints, DataPoint, Observation, Series};
pub use scenario::Scenario;
pub use trend::{FitSummary, Forecast, ForecastPoint, LinearFit};
