//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area. Handlers only
//! translate between JSON and the analytics engine.

pub mod alerts;
pub mod analysis;
pub mod forecast;
pub mod health;
pub mod kpi;
pub mod upload;

// Re-export all handlers for use in router
pub use alerts::*;
pub use analysis::*;
pub use forecast::*;
pub use health::*;
pub use kpi::*;
pub use upload::*;

use serde_json::Value;

use crate::AppError;

/// Read an optional numeric field that may arrive as a number or a numeric string
pub(crate) fn number_field(value: Option<&Value>, name: &str, default: f64) -> Result<f64, AppError> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(default),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::bad_request(&format!("{} must be a number", name)))
}
