//! KPI window comparison: the last 7 days against the 7 days before them
//!
//! This is the only place dates are interpreted. Regressions never read them.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::DataPoint;
use crate::stats::round_to;

/// Width of each comparison window in days
pub const WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowStats {
    pub entries: usize,
    /// Sum of values (2 dp)
    pub total_value: f64,
    /// Mean value (2 dp), zero for an empty window
    pub average: f64,
}

/// Percentage change per metric, recent relative to previous (1 dp)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowChanges {
    pub entries: f64,
    pub total_value: f64,
    pub average: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiComparison {
    pub recent: WindowStats,
    pub previous: WindowStats,
    pub changes: WindowChanges,
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC)
pub fn parse_date(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| Error::InvalidInput(format!("unrecognized date '{}'", text)))
}

/// Change from `previous` to `current`; a zero baseline reports 100 when
/// anything appeared and 0 otherwise.
pub fn pct_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    round_to((current - previous) / previous.abs() * 100.0, 1)
}

/// Bucket dated points into the recent window `[now-7d, now]` and the
/// previous window `[now-14d, now-7d)`. Points outside both are ignored.
pub fn compare_windows(points: &[DataPoint], now: DateTime<Utc>) -> Result<KpiComparison> {
    let recent_start = now - Duration::days(WINDOW_DAYS);
    let previous_start = now - Duration::days(2 * WINDOW_DAYS);

    let mut recent = Vec::new();
    let mut previous = Vec::new();

    for (i, point) in points.iter().enumerate() {
        let value = point.numeric_value().ok_or_else(|| {
            Error::InvalidInput(format!("entry {} is missing a numeric value", i + 1))
        })?;
        let date = point
            .date
            .as_deref()
            .ok_or_else(|| Error::InvalidInput(format!("entry {} is missing a date", i + 1)))?;
        let date = parse_date(date)?;

        if date >= recent_start && date <= now {
            recent.push(value);
        } else if date >= previous_start && date < recent_start {
            previous.push(value);
        }
    }

    let recent_raw = raw_stats(&recent);
    let previous_raw = raw_stats(&previous);

    let changes = WindowChanges {
        entries: pct_change(recent.len() as f64, previous.len() as f64),
        total_value: pct_change(recent_raw.1, previous_raw.1),
        average: pct_change(recent_raw.2, previous_raw.2),
    };

    tracing::debug!(
        recent = recent.len(),
        previous = previous.len(),
        "Compared KPI windows"
    );

    Ok(KpiComparison {
        recent: display_stats(recent_raw),
        previous: display_stats(previous_raw),
        changes,
    })
}

/// (entries, total, average) before rounding
fn raw_stats(values: &[f64]) -> (usize, f64, f64) {
    let total: f64 = values.iter().sum();
    let average = if values.is_empty() {
        0.0
    } else {
        total / values.len() as f64
    };
    (values.len(), total, average)
}

fn display_stats((entries, total, average): (usize, f64, f64)) -> WindowStats {
    WindowStats {
        entries,
        total_value: round_to(total, 2),
        average: round_to(average, 2),
    }
}
