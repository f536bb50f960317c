//! Correlation Engine - pairwise cross-category impact estimates
//!
//! Series are paired by index only: both sides are truncated to the shorter
//! length and compared position by position, with no timestamp matching.
//! Pair-level problems (a constant side, a zero predictor mean) drop that
//! pair silently; the engine reports fewer edges instead of failing.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::models::Series;
use crate::stats::{format_number, is_constant, mean, pearson, round_to};
use crate::trend::{fit_xy, MIN_FIT_POINTS};

/// Pairs with |r| below this are dropped
pub const MIN_CORRELATION: f64 = 0.3;

/// Hypothetical percentage increase applied to the predictor's mean
pub const IMPACT_SHIFT_PCT: f64 = 10.0;

const STRONG_CORRELATION: f64 = 0.7;
const MODERATE_CORRELATION: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Weak,
    Moderate,
    Strong,
}

impl Strength {
    /// Bucket |r|: above 0.7 strong, above 0.4 moderate, otherwise weak
    pub fn from_correlation(r: f64) -> Self {
        let r = r.abs();
        if r > STRONG_CORRELATION {
            Strength::Strong
        } else if r > MODERATE_CORRELATION {
            Strength::Moderate
        } else {
            Strength::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strength::Weak => "weak",
            Strength::Moderate => "moderate",
            Strength::Strong => "strong",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    pub fn from_correlation(r: f64) -> Self {
        if r > 0.0 {
            Direction::Positive
        } else {
            Direction::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Positive => "positive",
            Direction::Negative => "negative",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One reported relationship between two categories.
///
/// `(from, to)` and `(to, from)` are the same edge; `from` is whichever
/// category arrived first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationEdge {
    pub from: String,
    pub to: String,
    /// Pearson r over the aligned values (3 dp)
    pub correlation: f64,
    pub strength: Strength,
    pub direction: Direction,
    /// Change in `to` for a shift in `from`'s mean, as % of `to`'s mean (1 dp)
    pub impact_pct: f64,
    pub message: String,
}

/// Ranked edges, with an explanation when nothing could be compared
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
    pub correlations: Vec<CorrelationEdge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Computes pairwise correlation edges across categories
#[derive(Debug, Clone)]
pub struct CorrelationEngine {
    min_correlation: f64,
    impact_shift_pct: f64,
}

impl Default for CorrelationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CorrelationEngine {
    pub fn new() -> Self {
        Self {
            min_correlation: MIN_CORRELATION,
            impact_shift_pct: IMPACT_SHIFT_PCT,
        }
    }

    pub fn with_thresholds(min_correlation: f64, impact_shift_pct: f64) -> Self {
        Self {
            min_correlation,
            impact_shift_pct,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_thresholds(
            config.correlation.min_correlation,
            config.correlation.impact_shift_pct,
        )
    }

    /// Correlate every unordered pair of usable categories and rank the
    /// significant ones by |r|, strongest first. Ties keep discovery order.
    pub fn correlate(&self, series: &[Series]) -> CorrelationReport {
        let usable: Vec<&Series> = series
            .iter()
            .filter(|s| s.len() >= MIN_FIT_POINTS)
            .collect();

        if usable.len() < 2 {
            return CorrelationReport {
                correlations: Vec::new(),
                message: Some("Need at least 2 categories to find correlations".to_string()),
            };
        }

        let mut visited: HashSet<(&str, &str)> = HashSet::new();
        let mut edges = Vec::new();

        for a in &usable {
            for b in &usable {
                if a.category == b.category {
                    continue;
                }
                if !visited.insert(pair_key(&a.category, &b.category)) {
                    continue;
                }
                if let Some(edge) = self.correlate_pair(a, b) {
                    edges.push(edge);
                }
            }
        }

        // Stable sort keeps discovery order among equal |r|
        edges.sort_by(|x, y| {
            y.correlation
                .abs()
                .partial_cmp(&x.correlation.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!(
            categories = usable.len(),
            edges = edges.len(),
            "Correlation analysis complete"
        );

        CorrelationReport {
            correlations: edges,
            message: None,
        }
    }

    /// Compute the edge for `a -> b`, or `None` when the pair is skipped
    pub fn correlate_pair(&self, a: &Series, b: &Series) -> Option<CorrelationEdge> {
        let len = a.len().min(b.len());
        if len < MIN_FIT_POINTS {
            return None;
        }
        let va: Vec<f64> = a.values().into_iter().take(len).collect();
        let vb: Vec<f64> = b.values().into_iter().take(len).collect();

        if is_constant(&va) || is_constant(&vb) {
            debug!(from = %a.category, to = %b.category, "Skipping pair: zero variance");
            return None;
        }

        let r = pearson(&va, &vb)?;
        let slope = match fit_xy(&va, &vb) {
            Ok(fit) => fit.slope,
            Err(e) => {
                debug!(from = %a.category, to = %b.category, error = %e, "Skipping pair");
                return None;
            }
        };

        let mean_a = mean(&va);
        let mean_b = mean(&vb);
        if mean_a == 0.0 {
            debug!(from = %a.category, to = %b.category, "Skipping pair: zero mean");
            return None;
        }

        let shift_a = mean_a * (self.impact_shift_pct / 100.0);
        let shift_b = shift_a * slope;
        let impact_pct = round_to(shift_b / mean_b.abs().max(1.0) * 100.0, 1);

        if r.abs() < self.min_correlation {
            debug!(from = %a.category, to = %b.category, r, "Skipping pair: weak correlation");
            return None;
        }

        let message = impact_message(&a.category, &b.category, r, impact_pct, self.impact_shift_pct);

        Some(CorrelationEdge {
            from: a.category.clone(),
            to: b.category.clone(),
            correlation: round_to(r, 3),
            strength: Strength::from_correlation(r),
            direction: Direction::from_correlation(r),
            impact_pct,
            message,
        })
    }
}

/// Order-independent identity of a category pair
fn pair_key<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// "When A ↑10%, B tends to ↑X%" (or ↓ for a falling response)
fn impact_message(from: &str, to: &str, r: f64, impact_pct: f64, shift_pct: f64) -> String {
    let arrow = if r > 0.0 && impact_pct >= 0.0 {
        "↑"
    } else {
        "↓"
    };
    format!(
        "When {} ↑{}%, {} tends to {}{}%",
        from,
        format_number(shift_pct).trim_end_matches(".0"),
        to,
        arrow,
        format_number(impact_pct.abs())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(category: &str, values: &[f64]) -> Series {
        Series::from_values(category, values)
    }

    #[test]
    fn test_perfectly_colinear_pair() {
        let engine = CorrelationEngine::new();
        let report = engine.correlate(&[
            series("A", &[1.0, 2.0, 3.0, 4.0]),
            series("B", &[2.0, 4.0, 6.0, 8.0]),
        ]);

        assert_eq!(report.correlations.len(), 1);
        let edge = &report.correlations[0];
        assert_eq!(edge.from, "A");
        assert_eq!(edge.to, "B");
        assert!((edge.correlation - 1.0).abs() < 1e-9);
        assert_eq!(edge.direction, Direction::Positive);
        assert_eq!(edge.strength, Strength::Strong);
        // mean A 2.5, shift 0.25, slope 2 -> 0.5 on mean B 5.0 = 10%
        assert_eq!(edge.impact_pct, 10.0);
        assert_eq!(edge.message, "When A ↑10%, B tends to ↑10.0%");
    }

    #[test]
    fn test_three_categories_give_three_edges() {
        let engine = CorrelationEngine::new();
        let report = engine.correlate(&[
            series("A", &[1.0, 2.0, 3.0, 4.0]),
            series("B", &[2.0, 4.0, 7.0, 8.0]),
            series("C", &[9.0, 7.0, 4.0, 1.0]),
        ]);

        assert_eq!(report.correlations.len(), 3);
        let mut pairs: Vec<(String, String)> = report
            .correlations
            .iter()
            .map(|e| (e.from.clone(), e.to.clone()))
            .collect();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("A".to_string(), "B".to_string()),
                ("A".to_string(), "C".to_string()),
                ("B".to_string(), "C".to_string()),
            ]
        );
    }

    #[test]
    fn test_negative_correlation_message() {
        let engine = CorrelationEngine::new();
        let report = engine.correlate(&[
            series("Price", &[10.0, 20.0, 30.0]),
            series("Demand", &[300.0, 200.0, 100.0]),
        ]);

        let edge = &report.correlations[0];
        assert_eq!(edge.direction, Direction::Negative);
        assert!(edge.impact_pct < 0.0);
        assert!(edge.message.contains("Demand tends to ↓"));
    }

    #[test]
    fn test_positional_alignment_truncates() {
        let engine = CorrelationEngine::new();
        let a = series("A", &[1.0, 2.0, 3.0, 100.0, -50.0]);
        let b = series("B", &[3.0, 6.0, 9.0]);

        let edge = engine.correlate_pair(&a, &b).unwrap();
        assert!((edge.correlation - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_variance_and_zero_mean_pairs_skipped() {
        let engine = CorrelationEngine::new();

        let flat = series("Flat", &[5.0, 5.0, 5.0]);
        let rising = series("Rising", &[1.0, 2.0, 3.0]);
        assert!(engine.correlate_pair(&flat, &rising).is_none());
        assert!(engine.correlate_pair(&rising, &flat).is_none());

        let centered = series("Centered", &[-1.0, 0.0, 1.0]);
        assert!(engine.correlate_pair(&centered, &rising).is_none());
        // Only the predictor's mean matters
        assert!(engine.correlate_pair(&rising, &centered).is_some());
    }

    #[test]
    fn test_weak_pairs_are_dropped() {
        let engine = CorrelationEngine::new();
        let report = engine.correlate(&[
            series("A", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            series("B", &[5.0, 1.0, 6.0, 2.0, 5.0, 3.0]),
        ]);
        assert!(report.correlations.is_empty());
        assert!(report.message.is_none());
    }

    #[test]
    fn test_short_categories_discarded() {
        let engine = CorrelationEngine::new();
        let report = engine.correlate(&[
            series("A", &[1.0, 2.0, 3.0]),
            series("B", &[4.0]),
        ]);
        assert!(report.correlations.is_empty());
        assert!(report.message.is_some());
    }

    #[test]
    fn test_sorted_by_strength() {
        let engine = CorrelationEngine::new();
        let report = engine.correlate(&[
            series("A", &[1.0, 2.0, 3.0, 4.0, 5.0]),
            series("Noisy", &[1.0, 3.0, 2.0, 5.0, 4.0]),
            series("Exact", &[10.0, 20.0, 30.0, 40.0, 50.0]),
        ]);

        let rs: Vec<f64> = report
            .correlations
            .iter()
            .map(|e| e.correlation.abs())
            .collect();
        assert!(rs.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(report.correlations[0].to, "Exact");
    }

    #[test]
    fn test_equal_strength_keeps_discovery_order() {
        let engine = CorrelationEngine::new();
        let report = engine.correlate(&[
            series("A", &[1.0, 3.0, 2.0, 5.0, 4.0]),
            series("B", &[1.0, 2.0, 3.0, 4.0, 5.0]),
            series("C", &[2.0, 4.0, 6.0, 8.0, 10.0]),
            series("D", &[5.0, 4.0, 3.0, 2.0, 1.0]),
        ]);

        let pairs: Vec<(&str, &str, f64)> = report
            .correlations
            .iter()
            .map(|e| (e.from.as_str(), e.to.as_str(), e.correlation))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("B", "C", 1.0),
                ("B", "D", -1.0),
                ("C", "D", -1.0),
                ("A", "B", 0.8),
                ("A", "C", 0.8),
                ("A", "D", -0.8),
            ]
        );
    }

    #[test]
    fn test_strength_buckets() {
        assert_eq!(Strength::from_correlation(0.71), Strength::Strong);
        assert_eq!(Strength::from_correlation(-0.7), Strength::Moderate);
        assert_eq!(Strength::from_correlation(0.41), Strength::Moderate);
        assert_eq!(Strength::from_correlation(0.4), Strength::Weak);
        assert_eq!(Direction::from_correlation(0.0), Direction::Negative);
    }
}
