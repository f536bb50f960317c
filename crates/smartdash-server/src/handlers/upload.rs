//! Document upload handlers

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{debug, info};

use smartdash_core::{ContentKind, Observation, PredictionReport};

use crate::{AppError, AppState};

/// Observations echoed back alongside a file prediction
const ORIGINAL_DATA_TAIL: usize = 10;

/// Prediction for an uploaded document
#[derive(Debug, Serialize)]
pub struct FilePredictionResponse {
    #[serde(flatten)]
    pub report: PredictionReport,
    /// The last extracted observations, for context
    pub original_data: Vec<Observation>,
}

/// POST /api/predict-from-file - Extract a series from a .txt/.pdf upload and forecast it
pub async fn predict_from_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<FilePredictionResponse>, AppError> {
    let max_size = state.config.max_upload_size;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(&format!("Failed to read form field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| AppError::bad_request("Failed to read file data"))?;

        // Check file size limit
        if bytes.len() > max_size {
            return Err(AppError::bad_request(&format!(
                "File too large. Maximum size is {} MB",
                max_size / 1024 / 1024
            )));
        }

        upload = Some((file_name, bytes.to_vec()));
    }

    let (file_name, data) = upload.ok_or_else(|| AppError::bad_request("No file part"))?;
    if file_name.is_empty() {
        return Err(AppError::bad_request("No selected file"));
    }
    let kind = ContentKind::from_filename(&file_name)
        .ok_or_else(|| AppError::bad_request("Only .txt and .pdf files are supported"))?;

    debug!(file = %file_name, kind = kind.as_str(), bytes = data.len(), "Received upload");

    let series = state.engine.extract(&data, kind)?;
    if series.len() < 2 {
        return Err(AppError::bad_request(
            "Need at least 2 data points in file to make predictions",
        ));
    }

    let report = state.engine.predict(&series)?;
    info!(file = %file_name, points = series.len(), "Predicted from uploaded file");

    Ok(Json(FilePredictionResponse {
        report,
        original_data: series.tail(ORIGINAL_DATA_TAIL).to_vec(),
    }))
}
