//! Deterministic narrative templates
//!
//! Every message is a pure function of the numbers passed in, so identical
//! input always renders byte-identical text.

use crate::stats::format_number;

use super::types::{Insight, InsightStats, TrendClass};

/// Message for a category with fewer than two entries
pub fn too_few_entries(category: &str) -> String {
    format!("{} has too few entries for analysis.", category)
}

/// Render the per-category message from the decision table:
///
/// | trend  | condition                  | framing            |
/// |--------|----------------------------|--------------------|
/// | up     | change > surge threshold   | surging            |
/// | up     | otherwise                  | growing steadily   |
/// | down   | change < -surge threshold  | warning / dropped  |
/// | down   | otherwise                  | slightly declining |
/// | stable | -                          | stable with range  |
pub fn category_message(
    category: &str,
    trend: TrendClass,
    change_pct: f64,
    next_value: f64,
    stats: &InsightStats,
    surge_threshold_pct: f64,
) -> String {
    let change = format_number(change_pct);
    let next = format_number(next_value);

    match trend {
        TrendClass::Up if change_pct > surge_threshold_pct => format!(
            "🚀 {} is surging! Up {}% recently. Predicted next value: {}.",
            category, change, next
        ),
        TrendClass::Up => format!(
            "📈 {} is growing steadily ({}{}%). Next predicted: {}.",
            category,
            if change_pct >= 0.0 { "+" } else { "" },
            change,
            next
        ),
        TrendClass::Down if change_pct < -surge_threshold_pct => format!(
            "⚠️ Warning: {} dropped {}% recently. Predicted next: {}. Consider taking action.",
            category,
            format_number(change_pct.abs()),
            next
        ),
        TrendClass::Down => format!(
            "📉 {} is slightly declining ({}%). Next predicted: {}.",
            category, change, next
        ),
        TrendClass::Stable => format!(
            "➡️ {} is stable (avg: {}). Range: {} – {}. Next predicted: {}.",
            category,
            format_number(stats.avg),
            format_number(stats.min),
            format_number(stats.max),
            next
        ),
        TrendClass::Neutral => too_few_entries(category),
    }
}

/// Summary sentence(s) over a whole batch of insights
pub fn global_summary(insights: &[Insight]) -> String {
    if insights.is_empty() {
        return "Not enough data for a global summary.".to_string();
    }

    let ups = insights
        .iter()
        .filter(|i| i.trend_class == TrendClass::Up)
        .count();
    let downs = insights
        .iter()
        .filter(|i| i.trend_class == TrendClass::Down)
        .count();

    let mut parts = Vec::new();
    parts.push(if ups > downs {
        "Overall performance is positive.".to_string()
    } else if downs > ups {
        "Performance is trending downwards.".to_string()
    } else {
        "Performance is mixed or stable.".to_string()
    });

    if let Some(mover) = top_mover(insights) {
        let direction = if mover.change_pct > 0.0 {
            "growth"
        } else {
            "decline"
        };
        parts.push(format!(
            "{} is seeing the most significant {} ({}%).",
            mover.category,
            direction,
            format_number(mover.change_pct)
        ));
    }

    parts.join(" ")
}

/// Insight with the largest |change_pct| among those that changed; the
/// earliest wins a tie.
pub fn top_mover(insights: &[Insight]) -> Option<&Insight> {
    let mut best: Option<&Insight> = None;
    for insight in insights.iter().filter(|i| i.change_pct != 0.0) {
        match best {
            Some(b) if insight.change_pct.abs() <= b.change_pct.abs() => {}
            _ => best = Some(insight),
        }
    }
    best
}
