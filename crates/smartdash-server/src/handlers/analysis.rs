//! Multi-category handlers: insights and correlations

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use smartdash_core::{CategoryPoints, CorrelationReport, InsightReport};

use crate::{AppError, AppState};

/// Request body carrying points grouped by category
#[derive(Debug, Deserialize)]
pub struct CategoriesRequest {
    #[serde(default)]
    pub categories: CategoryPoints,
}

/// POST /api/insights - Per-category narratives plus a global summary
pub async fn insights(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CategoriesRequest>,
) -> Result<Json<InsightReport>, AppError> {
    let report = state.engine.summarize_all(&body.categories)?;
    Ok(Json(report))
}

/// POST /api/correlations - Ranked cross-category impact estimates
pub async fn correlations(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CategoriesRequest>,
) -> Result<Json<CorrelationReport>, AppError> {
    let report = state.engine.correlate(&body.categories)?;
    Ok(Json(report))
}
