//! Threshold alerts evaluated against a single incoming value

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCondition {
    /// Fires when the value is strictly above the threshold
    Gt,
    /// Fires when the value is strictly below the threshold
    Lt,
}

impl AlertCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCondition::Gt => "gt",
            AlertCondition::Lt => "lt",
        }
    }

    pub fn holds(&self, value: f64, threshold: f64) -> bool {
        match self {
            AlertCondition::Gt => value > threshold,
            AlertCondition::Lt => value < threshold,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            AlertCondition::Gt => "above",
            AlertCondition::Lt => "below",
        }
    }
}

impl fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    pub category: String,
    pub condition: AlertCondition,
    pub threshold: f64,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl AlertRule {
    pub fn new(category: impl Into<String>, condition: AlertCondition, threshold: f64) -> Self {
        Self {
            category: category.into(),
            condition,
            threshold,
            active: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertNotification {
    pub category: String,
    pub condition: AlertCondition,
    pub threshold: f64,
    pub value: f64,
    pub message: String,
}

/// Evaluate every active rule for `category` against `value`, in rule order
pub fn check_alerts(rules: &[AlertRule], category: &str, value: f64) -> Vec<AlertNotification> {
    let triggered: Vec<AlertNotification> = rules
        .iter()
        .filter(|r| r.active && r.category == category)
        .filter(|r| r.condition.holds(value, r.threshold))
        .map(|r| AlertNotification {
            category: category.to_string(),
            condition: r.condition,
            threshold: r.threshold,
            value,
            message: format!(
                "🚨 Alert: {} is {} {} (Value: {})",
                category,
                r.condition.describe(),
                r.threshold,
                value
            ),
        })
        .collect();

    if !triggered.is_empty() {
        tracing::debug!(category, value, count = triggered.len(), "Alerts triggered");
    }
    triggered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gt_and_lt_fire_strictly() {
        let rules = vec![
            AlertRule::new("Sales", AlertCondition::Gt, 100.0),
            AlertRule::new("Sales", AlertCondition::Lt, 20.0),
        ];

        let above = check_alerts(&rules, "Sales", 150.0);
        assert_eq!(above.len(), 1);
        assert_eq!(above[0].message, "🚨 Alert: Sales is above 100 (Value: 150)");

        let below = check_alerts(&rules, "Sales", 12.5);
        assert_eq!(below.len(), 1);
        assert_eq!(below[0].message, "🚨 Alert: Sales is below 20 (Value: 12.5)");

        assert!(check_alerts(&rules, "Sales", 100.0).is_empty());
        assert!(check_alerts(&rules, "Sales", 20.0).is_empty());
    }

    #[test]
    fn test_inactive_and_other_categories_ignored() {
        let mut inactive = AlertRule::new("Sales", AlertCondition::Gt, 0.0);
        inactive.active = false;
        let rules = vec![inactive, AlertRule::new("Costs", AlertCondition::Gt, 0.0)];

        assert!(check_alerts(&rules, "Sales", 10.0).is_empty());
        assert_eq!(check_alerts(&rules, "Costs", 10.0).len(), 1);
    }

    #[test]
    fn test_rule_deserializes_with_default_active() {
        let rule: AlertRule =
            serde_json::from_str(r#"{"category":"Sales","condition":"lt","threshold":5}"#)
                .unwrap();
        assert!(rule.active);
        assert_eq!(rule.condition, AlertCondition::Lt);
        assert!(serde_json::from_str::<AlertRule>(
            r#"{"category":"Sales","condition":"eq","threshold":5}"#
        )
        .is_err());
    }
}
