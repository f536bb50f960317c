//! Insight Engine - per-category trend narratives and the batch summary

use crate::config::EngineConfig;
use crate::models::Series;
use crate::stats::{mean, round_to};
use crate::trend;

use super::narrative;
use super::types::{Insight, InsightReport, InsightStats, TrendClass};

/// |slope| above this is a trend; at or below it the series is stable
pub const SLOPE_THRESHOLD: f64 = 0.5;

/// |change_pct| beyond this selects the surging / warning narratives
pub const SURGE_THRESHOLD_PCT: f64 = 10.0;

/// Last-step percentage change with the denominator floored at 1.
///
/// Baselines with magnitude below 1 are treated as 1, so `[0.5, 1.0]` gives
/// 50.0 rather than 100.0.
pub fn change_pct(previous: f64, last: f64) -> f64 {
    round_to((last - previous) / previous.abs().max(1.0) * 100.0, 1)
}

/// Produces insights for one or many series
#[derive(Debug, Clone)]
pub struct InsightEngine {
    /// Slope magnitude separating up/down from stable (default 0.5)
    slope_threshold: f64,
    /// Change percentage selecting the strong narratives (default 10%)
    surge_threshold_pct: f64,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    pub fn new() -> Self {
        Self {
            slope_threshold: SLOPE_THRESHOLD,
            surge_threshold_pct: SURGE_THRESHOLD_PCT,
        }
    }

    pub fn with_thresholds(slope_threshold: f64, surge_threshold_pct: f64) -> Self {
        Self {
            slope_threshold,
            surge_threshold_pct,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_thresholds(
            config.trend.slope_threshold,
            config.insights.surge_threshold_pct,
        )
    }

    /// Summarize one series. Never fails: series too short to fit degrade
    /// to a neutral insight.
    pub fn summarize(&self, series: &Series) -> Insight {
        if series.len() < trend::MIN_FIT_POINTS {
            return neutral(series);
        }

        let fit = match trend::fit(series) {
            Ok(fit) => fit,
            Err(e) => {
                tracing::warn!(
                    category = %series.category,
                    error = %e,
                    "Trend fit failed, reporting as neutral"
                );
                return neutral(series);
            }
        };

        let values = series.values();
        let n = values.len();
        let change = change_pct(values[n - 2], values[n - 1]);

        let trend_class = TrendClass::from_slope(fit.slope, self.slope_threshold);
        let next_value = round_to(fit.predict(n as f64), 2);

        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let stats = InsightStats {
            avg: round_to(mean(&values), 1),
            max: round_to(max, 1),
            min: round_to(min, 1),
            count: n,
        };

        let message = narrative::category_message(
            &series.category,
            trend_class,
            change,
            next_value,
            &stats,
            self.surge_threshold_pct,
        );

        tracing::debug!(
            category = %series.category,
            trend = trend_class.as_str(),
            change_pct = change,
            slope = fit.slope,
            "Summarized category"
        );

        Insight {
            category: series.category.clone(),
            trend_class,
            change_pct: change,
            message,
            next_prediction: Some(next_value),
            stats: Some(stats),
        }
    }

    /// Summarize every series in order and add the global summary
    pub fn summarize_all(&self, series: &[Series]) -> InsightReport {
        let insights: Vec<Insight> = series.iter().map(|s| self.summarize(s)).collect();
        let global_summary = narrative::global_summary(&insights);

        tracing::debug!(count = insights.len(), "Insight analysis complete");

        InsightReport {
            insights,
            global_summary,
        }
    }
}

fn neutral(series: &Series) -> Insight {
    Insight {
        category: series.category.clone(),
        trend_class: TrendClass::Neutral,
        change_pct: 0.0,
        message: narrative::too_few_entries(&series.category),
        next_prediction: None,
        stats: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(category: &str, values: &[f64]) -> Series {
        Series::from_values(category, values)
    }

    #[test]
    fn test_change_pct_guarded_denominator() {
        assert_eq!(change_pct(0.5, 1.0), 50.0);
        assert_eq!(change_pct(100.0, 110.0), 10.0);
        assert_eq!(change_pct(-200.0, -100.0), 50.0);
        assert_eq!(change_pct(0.0, 0.25), 25.0);
        assert_eq!(change_pct(3.0, 2.0), -33.3);
    }

    #[test]
    fn test_single_entry_is_neutral() {
        let engine = InsightEngine::new();
        let insight = engine.summarize(&series("Visitors", &[42.0]));

        assert_eq!(insight.trend_class, TrendClass::Neutral);
        assert_eq!(insight.change_pct, 0.0);
        assert_eq!(insight.next_prediction, None);
        assert_eq!(
            insight.message,
            "Visitors has too few entries for analysis."
        );

        let empty = engine.summarize(&series("Empty", &[]));
        assert_eq!(empty.trend_class, TrendClass::Neutral);
    }

    #[test]
    fn test_constant_steps_classification() {
        let engine = InsightEngine::new();

        let up = engine.summarize(&series("Up", &[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(up.trend_class, TrendClass::Up);

        let down = engine.summarize(&series("Down", &[10.0, 9.0, 8.0, 7.0]));
        assert_eq!(down.trend_class, TrendClass::Down);

        let flat = engine.summarize(&series("Flat", &[5.0, 5.0, 5.0]));
        assert_eq!(flat.trend_class, TrendClass::Stable);
        assert_eq!(flat.change_pct, 0.0);
    }

    #[test]
    fn test_slope_exactly_half_is_stable() {
        let engine = InsightEngine::new();
        let insight = engine.summarize(&series("Edge", &[0.0, 0.5, 1.0, 1.5]));
        assert_eq!(insight.trend_class, TrendClass::Stable);
    }

    #[test]
    fn test_stats_and_prediction() {
        let engine = InsightEngine::new();
        let insight = engine.summarize(&series("Revenue", &[100.0, 110.0, 121.0]));

        let stats = insight.stats.clone().unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.avg, 110.3);
        assert_eq!(stats.max, 121.0);
        assert_eq!(stats.min, 100.0);
        assert_eq!(insight.change_pct, 10.0);
        // slope 10.5, intercept 99.83 -> next at position 3
        assert_eq!(insight.next_prediction, Some(131.33));
        // 10.0% is not above the surge threshold
        assert!(insight.message.contains("growing steadily"));
    }

    #[test]
    fn test_surging_and_warning_messages() {
        let engine = InsightEngine::new();

        let surge = engine.summarize(&series("Users", &[10.0, 20.0, 40.0]));
        assert_eq!(surge.trend_class, TrendClass::Up);
        assert!(surge.message.contains("surging"));

        let drop = engine.summarize(&series("Orders", &[100.0, 80.0, 50.0]));
        assert_eq!(drop.trend_class, TrendClass::Down);
        assert!(drop.message.contains("Warning: Orders dropped 37.5%"));
    }

    #[test]
    fn test_summarize_all_is_idempotent() {
        let engine = InsightEngine::new();
        let batch = vec![
            series("A", &[1.0, 2.0, 4.0]),
            series("B", &[9.0, 7.0, 3.0]),
            series("C", &[1.0]),
        ];

        let first = serde_json::to_string(&engine.summarize_all(&batch)).unwrap();
        let second = serde_json::to_string(&engine.summarize_all(&batch)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_summarize_all_keeps_order_and_summary() {
        let engine = InsightEngine::new();
        let report = engine.summarize_all(&[
            series("Sales", &[10.0, 12.0, 15.0]),
            series("Costs", &[3.0]),
        ]);

        let names: Vec<&str> = report.insights.iter().map(|i| i.category.as_str()).collect();
        assert_eq!(names, vec!["Sales", "Costs"]);
        assert_eq!(
            report.global_summary,
            "Overall performance is positive. Sales is seeing the most significant growth (25.0%)."
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let engine = InsightEngine::with_thresholds(5.0, 10.0);
        let insight = engine.summarize(&series("Slow", &[1.0, 2.0, 3.0]));
        assert_eq!(insight.trend_class, TrendClass::Stable);
    }
}
