//! Scenario Engine - multiplier-scaled "what-if" projections

use crate::error::Result;
use crate::models::Series;
use crate::trend::{self, Forecast, LinearFit};

/// Baseline forecast next to the same forecast scaled by `multiplier`
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub baseline: Forecast,
    pub projected: Forecast,
    pub multiplier: f64,
    pub fit: LinearFit,
}

/// Fit the series once and project `horizon` positions past its end.
///
/// `projected` keeps the baseline's labels and positions; only values are
/// scaled. Any finite multiplier is accepted, including zero and negatives.
pub fn simulate(series: &Series, multiplier: f64, horizon: usize) -> Result<Scenario> {
    let prediction = trend::predict(series, horizon)?;
    let projected = prediction.forecast.scaled(multiplier);

    tracing::debug!(
        category = %series.category,
        multiplier,
        horizon,
        "Simulated scenario"
    );

    Ok(Scenario {
        baseline: prediction.forecast,
        projected,
        multiplier,
        fit: prediction.fit,
    })
}
