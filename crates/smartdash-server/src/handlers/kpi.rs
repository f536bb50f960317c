//! KPI comparison handlers

use axum::Json;
use serde::Deserialize;

use smartdash_core::kpi::{compare_windows, parse_date, KpiComparison};
use smartdash_core::DataPoint;

use crate::AppError;

/// Request body for KPI comparison
#[derive(Debug, Deserialize)]
pub struct KpiRequest {
    /// Dated points; each needs `value` and `date`
    #[serde(default)]
    pub data: Vec<DataPoint>,
    /// Reference time for the windows (defaults to now)
    pub now: Option<String>,
}

/// POST /api/kpi-comparison - Last 7 days vs the previous 7 days
pub async fn kpi_comparison(Json(body): Json<KpiRequest>) -> Result<Json<KpiComparison>, AppError> {
    let now = match body.now.as_deref() {
        Some(text) => parse_date(text)?,
        None => chrono::Utc::now(),
    };
    let comparison = compare_windows(&body.data, now)?;
    Ok(Json(comparison))
}
