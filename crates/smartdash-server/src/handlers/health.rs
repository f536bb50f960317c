//! Liveness handlers

use axum::Json;
use serde::Serialize;

/// Liveness response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// GET / - Readiness banner
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        message: Some("SmartDash AI Engine is Ready 🚀"),
        service: None,
        timestamp: None,
    })
}

/// GET /health - Health check
pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        message: None,
        service: Some("SmartDash AI Engine"),
        timestamp: Some(chrono::Utc::now().to_rfc3339()),
    })
}
