//! Alert handlers

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use smartdash_core::{AlertNotification, AlertRule};

use super::number_field;
use crate::AppError;

/// Request body for checking a new value against alert rules
#[derive(Debug, Deserialize)]
pub struct AlertCheckRequest {
    #[serde(default)]
    pub rules: Vec<AlertRule>,
    pub category: String,
    pub value: Option<Value>,
}

/// Triggered alerts, in rule order
#[derive(Debug, Serialize)]
pub struct AlertCheckResponse {
    pub triggered: usize,
    pub alerts: Vec<AlertNotification>,
}

/// POST /api/alerts/check - Evaluate threshold rules against one value
pub async fn check_alerts(
    Json(body): Json<AlertCheckRequest>,
) -> Result<Json<AlertCheckResponse>, AppError> {
    let value = match body.value {
        None | Some(Value::Null) => return Err(AppError::bad_request("value is required")),
        Some(ref v) => number_field(Some(v), "value", 0.0)?,
    };
    let alerts = smartdash_core::check_alerts(&body.rules, &body.category, value);

    Ok(Json(AlertCheckResponse {
        triggered: alerts.len(),
        alerts,
    }))
}
