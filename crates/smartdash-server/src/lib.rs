//! SmartDash Web Server
//!
//! Axum-based REST API over the SmartDash analytics engine.
//!
//! Security features:
//! - Restrictive CORS policy
//! - Input validation (file type and size limits, numeric field checks)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use smartdash_core::AnalyticsEngine;

mod handlers;

/// Maximum file upload size (10 MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Room for multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Environment variable holding comma-separated allowed CORS origins
pub const CORS_ORIGINS_ENV: &str = "SMARTDASH_CORS_ORIGINS";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Largest accepted document upload in bytes
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            max_upload_size: MAX_UPLOAD_SIZE,
        }
    }
}

impl ServerConfig {
    /// Read allowed origins from `SMARTDASH_CORS_ORIGINS`
    pub fn from_env() -> Self {
        let allowed_origins = std::env::var(CORS_ORIGINS_ENV)
            .map(|v| parse_origins(&v))
            .unwrap_or_default();
        Self {
            allowed_origins,
            ..Default::default()
        }
    }
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub engine: AnalyticsEngine,
    pub config: ServerConfig,
}

/// Create the application router
pub fn create_router(engine: AnalyticsEngine, config: ServerConfig) -> Router {
    let body_limit = config.max_upload_size + MULTIPART_OVERHEAD;
    let cors = cors_layer(&config.allowed_origins);

    let state = Arc::new(AppState { engine, config });

    let api_routes = Router::new()
        // Forecasting
        .route("/predict", post(handlers::predict))
        .route("/predict-from-file", post(handlers::predict_from_file))
        .route("/simulate", post(handlers::simulate))
        // Multi-category analysis
        .route("/insights", post(handlers::insights))
        .route("/correlations", post(handlers::correlations))
        // Monitoring
        .route("/alerts/check", post(handlers::check_alerts))
        .route("/kpi-comparison", post(handlers::kpi_comparison));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        return base;
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(origins)
}

/// Start the server
pub async fn serve(
    engine: AnalyticsEngine,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if config.allowed_origins.is_empty() {
        info!("CORS: same-origin only (set {} to allow others)", CORS_ORIGINS_ENV);
    } else {
        info!("CORS: allowing {}", config.allowed_origins.join(", "));
    }

    let app = create_router(engine, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        // Problems with the caller's data are reported verbatim
        if let Some(core_err) = err.downcast_ref::<smartdash_core::Error>() {
            if core_err.is_user_facing() {
                return Self::bad_request(&core_err.to_string());
            }
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
