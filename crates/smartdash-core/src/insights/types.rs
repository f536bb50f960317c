//! Core types for the Insight Synthesizer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse trend bucket derived from a series' fitted slope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendClass {
    /// Fitted slope above the threshold
    Up,
    /// Fitted slope below the negative threshold
    Down,
    /// Analyzable, but the slope magnitude is within the threshold
    Stable,
    /// Too few entries to analyze
    Neutral,
}

impl TrendClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendClass::Up => "up",
            TrendClass::Down => "down",
            TrendClass::Stable => "stable",
            TrendClass::Neutral => "neutral",
        }
    }

    /// Classify a fitted slope. Both comparisons are strict, so a slope of
    /// exactly `threshold` is stable.
    pub fn from_slope(slope: f64, threshold: f64) -> Self {
        if slope > threshold {
            TrendClass::Up
        } else if slope < -threshold {
            TrendClass::Down
        } else {
            TrendClass::Stable
        }
    }
}

impl fmt::Display for TrendClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TrendClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(TrendClass::Up),
            "down" => Ok(TrendClass::Down),
            "stable" => Ok(TrendClass::Stable),
            "neutral" => Ok(TrendClass::Neutral),
            _ => Err(format!("Unknown trend class: {}", s)),
        }
    }
}

/// Descriptive statistics over a series' raw values (1 dp)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightStats {
    pub avg: f64,
    pub max: f64,
    pub min: f64,
    /// Number of entries
    #[serde(rename = "entries")]
    pub count: usize,
}

/// Narrative and numbers for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub category: String,
    #[serde(rename = "trend")]
    pub trend_class: TrendClass,
    /// Last step's change as a percentage of the guarded previous value (1 dp)
    pub change_pct: f64,
    pub message: String,
    /// Next extrapolated value (2 dp); absent for neutral insights
    #[serde(rename = "prediction")]
    pub next_prediction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<InsightStats>,
}

/// All per-category insights plus one batch-level summary sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    pub insights: Vec<Insight>,
    pub global_summary: String,
}
