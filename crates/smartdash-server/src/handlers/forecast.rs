//! Forecast handlers: single-series prediction and what-if scenarios

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use smartdash_core::{DataPoint, PredictionReport, ScenarioReport, Series};

use super::number_field;
use crate::{AppError, AppState};

/// Category name used in validation messages for single-series bodies
const REQUEST_SERIES: &str = "data";

/// Request body for prediction
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub data: Vec<DataPoint>,
}

/// Request body for simulation
#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    #[serde(default)]
    pub data: Vec<DataPoint>,
    /// Number or numeric string; defaults to 1.0
    #[serde(default)]
    pub multiplier: Option<Value>,
}

/// POST /api/predict - Forecast the next values of a series
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PredictRequest>,
) -> Result<Json<PredictionReport>, AppError> {
    let series = Series::from_points(REQUEST_SERIES, &body.data)?;
    let report = state.engine.predict(&series)?;

    debug!(points = series.len(), "Prediction served");
    Ok(Json(report))
}

/// POST /api/simulate - Baseline forecast next to a scaled projection
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SimulateRequest>,
) -> Result<Json<ScenarioReport>, AppError> {
    let multiplier = number_field(body.multiplier.as_ref(), "multiplier", 1.0)?;
    let series = Series::from_points(REQUEST_SERIES, &body.data)?;
    let report = state.engine.simulate(&series, multiplier)?;

    debug!(points = series.len(), multiplier, "Simulation served");
    Ok(Json(report))
}
