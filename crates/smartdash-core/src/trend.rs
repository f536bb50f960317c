//! Trend Engine - single-feature least-squares fits and extrapolation
//!
//! Fits `value = slope * position + intercept` over a series using the closed
//! form OLS solution and evaluates the line beyond the observed range.
//! Nothing is rounded here; rounding to display precision happens where
//! results leave the engine (see [`FitSummary`] and [`Forecast::rounded`]).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Series;
use crate::stats::{is_constant, mean, round_to};

/// Minimum number of observations for a fit
pub const MIN_FIT_POINTS: usize = 2;

/// Future positions extrapolated by `predict`
pub const PREDICT_HORIZON: usize = 3;

/// Future positions extrapolated by `simulate`
pub const SIMULATE_HORIZON: usize = 6;

/// A fitted line and its coefficient of determination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// R² over the fitted points
    pub fit_quality: f64,
}

impl LinearFit {
    /// Evaluate the line at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit a series with its positions as the predictor
pub fn fit(series: &Series) -> Result<LinearFit> {
    if series.len() < MIN_FIT_POINTS {
        return Err(Error::InsufficientData {
            required: MIN_FIT_POINTS,
            actual: series.len(),
        });
    }

    let xs: Vec<f64> = series
        .observations
        .iter()
        .map(|o| o.position as f64)
        .collect();
    let ys = series.values();

    let result = fit_xy(&xs, &ys)?;
    tracing::debug!(
        category = %series.category,
        points = series.len(),
        slope = result.slope,
        intercept = result.intercept,
        r2 = result.fit_quality,
        "Fitted trend line"
    );
    Ok(result)
}

/// Ordinary least squares of `ys` on `xs`.
///
/// Requires at least two points and a predictor that is not constant.
/// A constant `ys` is fitted by the flat line through its value, which
/// reproduces every point, so R² is exactly 1.0.
pub fn fit_xy(xs: &[f64], ys: &[f64]) -> Result<LinearFit> {
    if xs.len() != ys.len() {
        return Err(Error::InvalidInput(format!(
            "predictor has {} values but response has {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < MIN_FIT_POINTS {
        return Err(Error::InsufficientData {
            required: MIN_FIT_POINTS,
            actual: xs.len(),
        });
    }
    if is_constant(xs) {
        return Err(Error::InvalidInput(
            "predictor has zero variance".to_string(),
        ));
    }

    if let Some(&level) = ys.first().filter(|_| is_constant(ys)) {
        return Ok(LinearFit {
            slope: 0.0,
            intercept: level,
            fit_quality: 1.0,
        });
    }

    let x_mean = mean(xs);
    let y_mean = mean(ys);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        cov += (x - x_mean) * (y - y_mean);
        var_x += (x - x_mean) * (x - x_mean);
    }

    let slope = cov / var_x;
    let intercept = y_mean - slope * x_mean;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let predicted = slope * x + intercept;
        ss_res += (y - predicted).powi(2);
        ss_tot += (y - y_mean).powi(2);
    }

    // Distinct values can still round to a zero total sum of squares
    let fit_quality = if ss_tot == 0.0 {
        0.0
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(LinearFit {
        slope,
        intercept,
        fit_quality,
    })
}

/// One extrapolated point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub label: String,
    pub value: f64,
    #[serde(rename = "index")]
    pub position: usize,
}

/// Extrapolated points immediately after a series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forecast(pub Vec<ForecastPoint>);

impl Forecast {
    pub fn points(&self) -> &[ForecastPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Multiply every value, keeping labels and positions
    pub fn scaled(&self, multiplier: f64) -> Forecast {
        Forecast(
            self.0
                .iter()
                .map(|p| ForecastPoint {
                    label: p.label.clone(),
                    value: p.value * multiplier,
                    position: p.position,
                })
                .collect(),
        )
    }

    /// Copy with values rounded for display
    pub fn rounded(&self, decimals: u32) -> Forecast {
        Forecast(
            self.0
                .iter()
                .map(|p| ForecastPoint {
                    label: p.label.clone(),
                    value: round_to(p.value, decimals),
                    position: p.position,
                })
                .collect(),
        )
    }
}

/// Evaluate a fit at `horizon` positions starting at `from_position`
pub fn forecast(fit: &LinearFit, from_position: usize, horizon: usize) -> Forecast {
    Forecast(
        (0..horizon)
            .map(|i| {
                let position = from_position + i;
                ForecastPoint {
                    label: format!("Prediction {}", i + 1),
                    value: fit.predict(position as f64),
                    position,
                }
            })
            .collect(),
    )
}

/// Display form of a fit: accuracy is R² as a percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    #[serde(rename = "type")]
    pub model_type: String,
    pub accuracy: f64,
    pub slope: f64,
    pub intercept: f64,
}

impl From<&LinearFit> for FitSummary {
    fn from(fit: &LinearFit) -> Self {
        Self {
            model_type: "Linear Regression".to_string(),
            accuracy: round_to(fit.fit_quality * 100.0, 2),
            slope: round_to(fit.slope, 2),
            intercept: round_to(fit.intercept, 2),
        }
    }
}

/// Result of `predict`: forecast plus the fit that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub fit: LinearFit,
    pub forecast: Forecast,
}

/// Fit a series and extrapolate `horizon` positions past its end
pub fn predict(series: &Series, horizon: usize) -> Result<Prediction> {
    let fit = fit(series)?;
    let forecast = forecast(&fit, series.len(), horizon);
    Ok(Prediction { fit, forecast })
}
