//! Data models for SmartDash
//!
//! Input points arrive as loosely-typed JSON records. They are validated once,
//! here, into [`Series`] values whose observations carry a zero-based
//! `position` assigned by arrival order. Every regression uses that position as
//! its only time axis.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};

/// A raw input point as received from a client or file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Numeric value (a JSON number, or a string holding one)
    #[serde(default)]
    pub value: Option<Value>,
    /// Optional display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Optional date text (only read by KPI window comparison)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl DataPoint {
    /// Create a point from a plain value
    pub fn new(value: f64) -> Self {
        Self {
            value: Some(Value::from(value)),
            label: None,
            date: None,
        }
    }

    /// Attach a label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach a date
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Resolve the numeric value, if present and finite
    pub fn numeric_value(&self) -> Option<f64> {
        let v = match self.value.as_ref()? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        v.is_finite().then_some(v)
    }
}

/// One observation in a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub label: String,
    pub value: f64,
    /// Zero-based arrival index within the series
    pub position: usize,
}

/// A named, ordered sequence of observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub category: String,
    pub observations: Vec<Observation>,
}

impl Series {
    /// Create an empty series
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            observations: Vec::new(),
        }
    }

    /// Build a series from raw values, labelling each "Entry n"
    pub fn from_values(category: impl Into<String>, values: &[f64]) -> Self {
        let mut series = Self::new(category);
        for value in values {
            let label = format!("Entry {}", series.len() + 1);
            series.push(label, *value);
        }
        series
    }

    /// Validate raw input points into a series.
    ///
    /// Fails with `InvalidInput` naming the category and index of the first
    /// point without a usable numeric value.
    pub fn from_points(category: impl Into<String>, points: &[DataPoint]) -> Result<Self> {
        let mut series = Self::new(category);
        for (i, point) in points.iter().enumerate() {
            let value = point.numeric_value().ok_or_else(|| {
                Error::InvalidInput(format!(
                    "{} entry {} is missing a numeric value",
                    series.category,
                    i + 1
                ))
            })?;
            let label = point
                .label
                .clone()
                .unwrap_or_else(|| format!("Entry {}", i + 1));
            series.push(label, value);
        }
        Ok(series)
    }

    /// Append an observation at the next position
    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        let position = self.observations.len();
        self.observations.push(Observation {
            label: label.into(),
            value,
            position,
        });
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Raw values in position order
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    /// The last `n` observations (or all of them if shorter)
    pub fn tail(&self, n: usize) -> &[Observation] {
        let start = self.observations.len().saturating_sub(n);
        &self.observations[start..]
    }
}

/// Raw points grouped by category, in the order the categories arrived.
///
/// Deserializes from a JSON object and keeps key order so that every
/// downstream ranking has a stable discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPoints(pub Vec<(String, Vec<DataPoint>)>);

impl CategoryPoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append points to a category, creating it on first use
    pub fn push(&mut self, category: &str, point: DataPoint) {
        match self.0.iter_mut().find(|(name, _)| name == category) {
            Some((_, points)) => points.push(point),
            None => self.0.push((category.to_string(), vec![point])),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validate every category into a series, preserving order
    pub fn to_series(&self) -> Result<Vec<Series>> {
        self.0
            .iter()
            .map(|(name, points)| Series::from_points(name.clone(), points))
            .collect()
    }
}

impl Serialize for CategoryPoints {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, points) in &self.0 {
            map.serialize_entry(name, points)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryPoints {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = CategoryPoints;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category name to a list of points")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, Vec<DataPoint>)> = Vec::new();
                while let Some((name, points)) = access.next_entry::<String, Vec<DataPoint>>()? {
                    // Later duplicates replace earlier ones, like a JSON object
                    match entries.iter_mut().find(|(n, _)| *n == name) {
                        Some(entry) => entry.1 = points,
                        None => entries.push((name, points)),
                    }
                }
                Ok(CategoryPoints(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_value_accepts_numbers_and_numeric_strings() {
        assert_eq!(DataPoint::new(4.5).numeric_value(), Some(4.5));

        let p: DataPoint = serde_json::from_str(r#"{"value": " 12.5 "}"#).unwrap();
        assert_eq!(p.numeric_value(), Some(12.5));

        let p: DataPoint = serde_json::from_str(r#"{"value": "abc"}"#).unwrap();
        assert_eq!(p.numeric_value(), None);

        let p: DataPoint = serde_json::from_str(r#"{"value": true}"#).unwrap();
        assert_eq!(p.numeric_value(), None);

        let p: DataPoint = serde_json::from_str(r#"{"label": "Jan"}"#).unwrap();
        assert_eq!(p.numeric_value(), None);
    }

    #[test]
    fn test_from_points_assigns_positions_by_arrival() {
        let points = vec![
            DataPoint::new(10.0).with_label("Jan"),
            DataPoint::new(12.0),
            DataPoint::new(9.0).with_label("Mar"),
        ];
        let series = Series::from_points("Revenue", &points).unwrap();

        assert_eq!(series.len(), 3);
        let positions: Vec<usize> = series.observations.iter().map(|o| o.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(series.observations[0].label, "Jan");
        assert_eq!(series.observations[1].label, "Entry 2");
        assert_eq!(series.values(), vec![10.0, 12.0, 9.0]);
    }

    #[test]
    fn test_from_points_rejects_missing_value() {
        let points = vec![DataPoint::new(1.0), DataPoint::default()];
        let err = Series::from_points("Sales", &points).unwrap_err();
        match err {
            Error::InvalidInput(msg) => assert!(msg.contains("Sales entry 2")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tail_returns_last_observations() {
        let series = Series::from_values("X", &[1.0, 2.0, 3.0, 4.0]);
        let tail = series.tail(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].value, 3.0);
        assert_eq!(series.tail(10).len(), 4);
    }

    #[test]
    fn test_category_points_preserve_input_order() {
        let json = r#"{"Zeta": [{"value": 1}], "Alpha": [{"value": 2}], "Mid": []}"#;
        let categories: CategoryPoints = serde_json::from_str(json).unwrap();

        let names: Vec<&str> = categories.0.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);

        let round_trip = serde_json::to_string(&categories).unwrap();
        assert!(round_trip.find("Zeta").unwrap() < round_trip.find("Alpha").unwrap());
    }

    #[test]
    fn test_category_points_push_groups_by_name() {
        let mut categories = CategoryPoints::new();
        categories.push("A", DataPoint::new(1.0));
        categories.push("B", DataPoint::new(2.0));
        categories.push("A", DataPoint::new(3.0));

        let series = categories.to_series().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].values(), vec![1.0, 3.0]);
        assert_eq!(series[1].values(), vec![2.0]);
    }
}
