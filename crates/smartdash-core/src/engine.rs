//! Analytics engine facade
//!
//! Bundles the configured engines behind the operations exposed to the
//! transport layers, and owns the boundary rounding of everything they return.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::correlation::{CorrelationEngine, CorrelationReport};
use crate::error::Result;
use crate::extract::{self, ContentKind};
use crate::insights::{InsightEngine, InsightReport};
use crate::models::{CategoryPoints, Series};
use crate::scenario;
use crate::trend::{self, FitSummary, Forecast};

/// Decimal places for forecast values
const FORECAST_DECIMALS: u32 = 2;

/// Forecast and fit, rounded for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub predictions: Forecast,
    pub model: FitSummary,
}

/// Baseline and scaled projection, rounded for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub baseline: Forecast,
    pub projected: Forecast,
    pub multiplier: f64,
    pub model: FitSummary,
}

/// Stateless analytics over request-scoped data.
///
/// Cheap to share: every operation takes `&self` and allocates its own
/// working data, so one engine can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    config: EngineConfig,
    insights: InsightEngine,
    correlations: CorrelationEngine,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl AnalyticsEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            insights: InsightEngine::from_config(&config),
            correlations: CorrelationEngine::from_config(&config),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Pull a series out of a raw document
    pub fn extract(&self, raw: &[u8], kind: ContentKind) -> Result<Series> {
        extract::extract(raw, kind)
    }

    /// Fit a series and forecast the configured prediction horizon
    pub fn predict(&self, series: &Series) -> Result<PredictionReport> {
        let prediction = trend::predict(series, self.config.forecast.predict_horizon)?;
        Ok(PredictionReport {
            predictions: prediction.forecast.rounded(FORECAST_DECIMALS),
            model: FitSummary::from(&prediction.fit),
        })
    }

    /// Insights for every category, in input order. Short categories degrade
    /// to neutral; only malformed points fail the batch.
    pub fn summarize_all(&self, categories: &CategoryPoints) -> Result<InsightReport> {
        let series = categories.to_series()?;
        Ok(self.insights.summarize_all(&series))
    }

    /// Ranked correlation edges across categories
    pub fn correlate(&self, categories: &CategoryPoints) -> Result<CorrelationReport> {
        let series = categories.to_series()?;
        Ok(self.correlations.correlate(&series))
    }

    /// What-if projection over the configured simulation horizon
    pub fn simulate(&self, series: &Series, multiplier: f64) -> Result<ScenarioReport> {
        let scenario =
            scenario::simulate(series, multiplier, self.config.forecast.simulate_horizon)?;
        Ok(ScenarioReport {
            baseline: scenario.baseline.rounded(FORECAST_DECIMALS),
            projected: scenario.projected.rounded(FORECAST_DECIMALS),
            multiplier: scenario.multiplier,
            model: FitSummary::from(&scenario.fit),
        })
    }
}
