//! Series Extractor - numeric observations from unstructured documents
//!
//! Each non-blank line contributes at most one observation: the last numeric
//! token on the line is the value (the usual "label: value" layout), and the
//! words before it become the label when they are short enough.
//!
//! Page-structured documents (PDF) are flattened to text first, one page per
//! newline-terminated block, then handled exactly like plain text. Within a
//! page, text-positioning operators that move to a new line start a new line
//! of output.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use lopdf::content::Content;
use lopdf::{Document, Encoding, Object, ObjectId};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Series;

/// Category given to series pulled out of a document
pub const EXTRACTED_CATEGORY: &str = "Uploaded Data";

/// Label candidates must be shorter than this many characters
pub const MAX_LABEL_CHARS: usize = 30;

/// Optional sign, then either a decimal with a fractional part or an integer.
/// ASCII digits only, so every match parses as `f64`.
const NUMBER_PATTERN: &str = r"[-+]?(?:[0-9]*\.[0-9]+|[0-9]+)";

/// TJ offsets below this (thousandths of an em) read as a word gap
const TJ_WORD_GAP: f32 = -100.0;

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(NUMBER_PATTERN).expect("valid regex"))
}

/// How raw document bytes are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// UTF-8 text
    PlainText,
    /// PDF whose pages are concatenated before extraction
    PagedDocument,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::PlainText => "plain_text",
            ContentKind::PagedDocument => "paged_document",
        }
    }

    /// Pick the kind from a file name; only `.txt` and `.pdf` are supported
    pub fn from_filename(name: &str) -> Option<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())?;
        match ext.as_str() {
            "txt" => Some(ContentKind::PlainText),
            "pdf" => Some(ContentKind::PagedDocument),
            _ => None,
        }
    }
}

/// Concatenate page texts, terminating each page with a newline
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(page.as_ref());
        text.push('\n');
    }
    text
}

/// Turn raw bytes into text. Unreadable input is a `ParseFailure`.
pub fn decode(raw: &[u8], kind: ContentKind) -> Result<String> {
    match kind {
        ContentKind::PlainText => String::from_utf8(raw.to_vec())
            .map_err(|e| Error::ParseFailure(format!("text is not valid UTF-8: {}", e))),
        ContentKind::PagedDocument => {
            let doc = Document::load_mem(raw)
                .map_err(|e| Error::ParseFailure(format!("unreadable PDF: {}", e)))?;
            let mut pages = Vec::new();
            for (page_number, page_id) in doc.get_pages() {
                let text = page_text(&doc, page_id).map_err(|e| {
                    Error::ParseFailure(format!("page {}: {}", page_number, e))
                })?;
                pages.push(text);
            }
            debug!(pages = pages.len(), "Decoded paged document");
            Ok(join_pages(&pages))
        }
    }
}

/// Text of one PDF page, one output line per rendered text line
fn page_text(doc: &Document, page_id: ObjectId) -> lopdf::Result<String> {
    let mut encodings = BTreeMap::new();
    for (name, font) in doc.get_page_fonts(page_id)? {
        match font.get_font_encoding(doc) {
            Ok(encoding) => {
                encodings.insert(name, encoding);
            }
            Err(e) => debug!(
                font = %String::from_utf8_lossy(&name),
                error = %e,
                "Unresolved font encoding"
            ),
        }
    }

    let content = Content::decode(&doc.get_page_content(page_id)?)?;

    let mut text = String::new();
    let mut encoding = None;
    let mut line_y: Option<f32> = None;

    for op in &content.operations {
        match op.operator.as_str() {
            "Tf" => {
                encoding = op
                    .operands
                    .first()
                    .and_then(|o| o.as_name().ok())
                    .and_then(|name| encodings.get(name));
            }
            "Td" | "TD" => {
                let dy = op.operands.get(1).and_then(|o| o.as_float().ok());
                if dy.is_some_and(|dy| dy != 0.0) {
                    break_line(&mut text);
                } else {
                    break_word(&mut text);
                }
            }
            "Tm" => {
                let y = op.operands.get(5).and_then(|o| o.as_float().ok());
                if line_y.is_some() && y != line_y {
                    break_line(&mut text);
                } else {
                    break_word(&mut text);
                }
                line_y = y;
            }
            "T*" => break_line(&mut text),
            "ET" => {
                break_line(&mut text);
                line_y = None;
            }
            "Tj" | "TJ" => show_text(&mut text, encoding, &op.operands)?,
            // Both move to the next line, then show their last operand
            "'" | "\"" => {
                break_line(&mut text);
                if let Some(last) = op.operands.last() {
                    show_text(&mut text, encoding, std::slice::from_ref(last))?;
                }
            }
            _ => {}
        }
    }

    Ok(text)
}

/// Append the strings of a Tj/TJ operand list. Without a resolved font
/// encoding, bytes are read as Latin-1.
fn show_text(
    text: &mut String,
    encoding: Option<&Encoding>,
    operands: &[Object],
) -> lopdf::Result<()> {
    for operand in operands {
        match operand {
            Object::String(bytes, _) => match encoding {
                Some(encoding) => text.push_str(&Document::decode_text(encoding, bytes)?),
                None => text.extend(bytes.iter().map(|&b| char::from(b))),
            },
            Object::Array(items) => show_text(text, encoding, items)?,
            Object::Integer(_) | Object::Real(_) => {
                if operand.as_float().is_ok_and(|gap| gap < TJ_WORD_GAP) {
                    break_word(text);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn break_line(text: &mut String) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
}

fn break_word(text: &mut String) {
    if !text.is_empty() && !text.ends_with(char::is_whitespace) {
        text.push(' ');
    }
}

/// Decode and extract in one step
pub fn extract(raw: &[u8], kind: ContentKind) -> Result<Series> {
    let text = decode(raw, kind)?;
    extract_text(&text)
}

/// Extract a series from already-decoded text.
///
/// Fails with `NoDataExtracted` when no line carries a number.
pub fn extract_text(text: &str) -> Result<Series> {
    let mut series = Series::new(EXTRACTED_CATEGORY);

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(token) = number_regex().find_iter(line).last() else {
            continue;
        };
        let Ok(value) = token.as_str().parse::<f64>() else {
            continue;
        };

        let entry_number = series.len() + 1;
        let label = line_label(line).unwrap_or_else(|| format!("Entry {}", entry_number));
        series.push(label, value);
    }

    if series.is_empty() {
        return Err(Error::NoDataExtracted);
    }

    debug!(observations = series.len(), "Extracted series from text");
    Ok(series)
}

/// Everything but the last whitespace token, without trailing ':' or ','.
/// `None` for single-token lines and for candidates that are empty or too long.
fn line_label(line: &str) -> Option<String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 2 {
        return None;
    }
    let joined = parts[..parts.len() - 1].join(" ");
    let candidate = joined.trim_end_matches(|c| c == ':' || c == ',');
    if candidate.is_empty() || candidate.chars().count() >= MAX_LABEL_CHARS {
        return None;
    }
    Some(candidate.to_string())
}
