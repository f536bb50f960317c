//! Input parsers for series files
//!
//! Supported layouts:
//! - JSON: `{"data": [...]}` or a bare array for one series,
//!   `{"categories": {...}}` or a bare map for many
//! - CSV: `category,label,value[,date]` with a header row
//! - Plain text / PDF: routed through the series extractor

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::extract::{self, ContentKind, EXTRACTED_CATEGORY};
use crate::models::{CategoryPoints, DataPoint};

/// Series file formats, detected from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
    Document(ContentKind),
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if let Some(kind) = ContentKind::from_filename(name) {
            return Some(InputFormat::Document(kind));
        }
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(InputFormat::Json),
            "csv" => Some(InputFormat::Csv),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PointsDocument {
    Wrapped { data: Vec<DataPoint> },
    Bare(Vec<DataPoint>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategoriesDocument {
    Wrapped { categories: CategoryPoints },
    Bare(CategoryPoints),
}

/// Parse one series from JSON
pub fn parse_json_points(text: &str) -> Result<Vec<DataPoint>> {
    let value: Value = serde_json::from_str(text)?;
    let doc: PointsDocument = serde_json::from_value(value).map_err(|_| {
        Error::InvalidInput("expected {\"data\": [...]} or an array of points".into())
    })?;
    Ok(match doc {
        PointsDocument::Wrapped { data } => data,
        PointsDocument::Bare(points) => points,
    })
}

/// Parse a category map from JSON, keeping category order
pub fn parse_json_categories(text: &str) -> Result<CategoryPoints> {
    // Deserialize straight from text; going through `Value` would sort keys
    let doc: CategoriesDocument = serde_json::from_str(text).map_err(|e| {
        if e.is_syntax() || e.is_eof() {
            Error::Json(e)
        } else {
            Error::InvalidInput(
                "expected {\"categories\": {...}} or a map of category to points".into(),
            )
        }
    })?;
    Ok(match doc {
        CategoriesDocument::Wrapped { categories } => categories,
        CategoriesDocument::Bare(categories) => categories,
    })
}

/// Column positions resolved from a CSV header row
struct CsvColumns {
    category: usize,
    label: Option<usize>,
    value: usize,
    date: Option<usize>,
}

impl CsvColumns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        Ok(Self {
            category: find("category")
                .ok_or_else(|| Error::InvalidInput("CSV is missing a 'category' column".into()))?,
            label: find("label"),
            value: find("value")
                .ok_or_else(|| Error::InvalidInput("CSV is missing a 'value' column".into()))?,
            date: find("date"),
        })
    }
}

/// Parse `category,label,value[,date]` rows. Row order within a category
/// becomes arrival order.
pub fn parse_csv<R: Read>(reader: R) -> Result<CategoryPoints> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = CsvColumns::from_headers(rdr.headers()?)?;
    let mut categories = CategoryPoints::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let category = record
            .get(columns.category)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::InvalidInput(format!("row {} has no category", row + 1)))?;

        // Values stay as text so validation matches JSON numeric strings
        let value = record
            .get(columns.value)
            .filter(|v| !v.is_empty())
            .map(|v| Value::String(v.to_string()));
        let label = columns
            .label
            .and_then(|i| record.get(i))
            .filter(|l| !l.is_empty())
            .map(str::to_string);
        let date = columns
            .date
            .and_then(|i| record.get(i))
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        categories.push(category, DataPoint { value, label, date });
    }

    debug!(categories = categories.len(), "Parsed CSV series file");
    Ok(categories)
}

/// Extract a document into the single "Uploaded Data" category
pub fn parse_document(raw: &[u8], kind: ContentKind) -> Result<CategoryPoints> {
    let series = extract::extract(raw, kind)?;
    let mut categories = CategoryPoints::new();
    for obs in &series.observations {
        categories.push(
            EXTRACTED_CATEGORY,
            DataPoint::new(obs.value).with_label(obs.label.clone()),
        );
    }
    Ok(categories)
}

/// Parse any supported format into categories
pub fn parse_categories(raw: &[u8], format: InputFormat) -> Result<CategoryPoints> {
    match format {
        InputFormat::Json => {
            let text = std::str::from_utf8(raw)
                .map_err(|e| Error::ParseFailure(format!("JSON is not valid UTF-8: {}", e)))?;
            parse_json_categories(text)
        }
        InputFormat::Csv => parse_csv(raw),
        InputFormat::Document(kind) => parse_document(raw, kind),
    }
}

/// Parse any supported format into a single series' points.
///
/// Multi-category formats must name the category unless they hold exactly one.
pub fn parse_points(
    raw: &[u8],
    format: InputFormat,
    category: Option<&str>,
) -> Result<(String, Vec<DataPoint>)> {
    if format == InputFormat::Json && category.is_none() {
        let text = std::str::from_utf8(raw)
            .map_err(|e| Error::ParseFailure(format!("JSON is not valid UTF-8: {}", e)))?;
        if let Ok(points) = parse_json_points(text) {
            return Ok(("Series".to_string(), points));
        }
    }

    let categories = parse_categories(raw, format)?;
    match category {
        Some(name) => categories
            .0
            .into_iter()
            .find(|(n, _)| n == name)
            .ok_or_else(|| Error::InvalidInput(format!("category '{}' not found", name))),
        None => {
            let count = categories.len();
            let mut iter = categories.0.into_iter();
            match (iter.next(), count) {
                (Some(only), 1) => Ok(only),
                (None, _) => Err(Error::InvalidInput("input holds no categories".into())),
                _ => Err(Error::InvalidInput(format!(
                    "input holds {} categories; choose one",
                    count
                ))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_format_from_path() {
        assert_eq!(
            InputFormat::from_path(Path::new("a/series.JSON")),
            Some(InputFormat::Json)
        );
        assert_eq!(
            InputFormat::from_path(Path::new("rows.csv")),
            Some(InputFormat::Csv)
        );
        assert_eq!(
            InputFormat::from_path(Path::new("report.pdf")),
            Some(InputFormat::Document(ContentKind::PagedDocument))
        );
        assert_eq!(InputFormat::from_path(Path::new("sheet.xlsx")), None);
    }

    #[test]
    fn test_json_points_wrapped_and_bare() {
        let wrapped = parse_json_points(r#"{"data": [{"value": 1}, {"value": "2.5"}]}"#).unwrap();
        assert_eq!(wrapped.len(), 2);
        assert_eq!(wrapped[1].numeric_value(), Some(2.5));

        let bare = parse_json_points(r#"[{"value": 3, "label": "Jan"}]"#).unwrap();
        assert_eq!(bare[0].label.as_deref(), Some("Jan"));

        assert!(matches!(
            parse_json_points(r#"{"rows": []}"#),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_json_categories_keep_order() {
        let text = r#"{"categories": {"Zeta": [{"value": 1}], "Alpha": [{"value": 2}]}}"#;
        let cats = parse_json_categories(text).unwrap();
        let names: Vec<&str> = cats.0.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);

        let bare = parse_json_categories(r#"{"Sales": [{"value": 1}]}"#).unwrap();
        assert_eq!(bare.len(), 1);
    }

    #[test]
    fn test_csv_groups_by_category() {
        let csv = "category,label,value\nSales,Jan,100\nCosts,Jan,40\nSales,Feb,120\nSales,,130\n";
        let cats = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(cats.len(), 2);
        let series = cats.to_series().unwrap();
        assert_eq!(series[0].category, "Sales");
        assert_eq!(series[0].values(), vec![100.0, 120.0, 130.0]);
        assert_eq!(series[0].observations[2].label, "Entry 3");
        assert_eq!(series[1].values(), vec![40.0]);
    }

    #[test]
    fn test_csv_requires_columns_and_numeric_values() {
        assert!(matches!(
            parse_csv("name,amount\nx,1\n".as_bytes()),
            Err(Error::InvalidInput(_))
        ));

        let cats = parse_csv("category,value\nSales,abc\n".as_bytes()).unwrap();
        assert!(matches!(cats.to_series(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_document_becomes_uploaded_data() {
        let cats = parse_document(b"Q1: 10\nQ2: 20\n", ContentKind::PlainText).unwrap();
        assert_eq!(cats.0[0].0, EXTRACTED_CATEGORY);
        assert_eq!(cats.0[0].1.len(), 2);
        assert_eq!(cats.0[0].1[1].label.as_deref(), Some("Q2"));
    }

    #[test]
    fn test_parse_points_selects_category() {
        let csv = b"category,value\nA,1\nB,2\nA,3\n";
        let (name, points) = parse_points(csv, InputFormat::Csv, Some("A")).unwrap();
        assert_eq!(name, "A");
        assert_eq!(points.len(), 2);

        assert!(parse_points(csv, InputFormat::Csv, None).is_err());
        assert!(parse_points(csv, InputFormat::Csv, Some("C")).is_err());

        let (name, points) =
            parse_points(br#"{"data": [{"value": 1}]}"#, InputFormat::Json, None).unwrap();
        assert_eq!(name, "Series");
        assert_eq!(points.len(), 1);
    }
}
