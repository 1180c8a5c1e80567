//! Source-format decoding: fetched sheet text to header and data rows.

use serde_json::Value;
use thiserror::Error;

/// Wire format of the published sheet endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFormat {
    /// The `output=csv` publish endpoint.
    #[default]
    Csv,
    /// The gviz `tq` endpoint, a JSON table wrapped in a
    /// `google.visualization.Query.setResponse(...)` JSONP call.
    GvizJson,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("payload is not a google.visualization setResponse wrapper")]
    BadWrapper,
    #[error("tabular payload has no table object")]
    MissingTable,
    #[error("invalid JSON in tabular payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse sheet text into rows, header row first.
pub fn parse_source(text: &str, format: SourceFormat) -> Result<Vec<Vec<String>>, SourceError> {
    match format {
        SourceFormat::Csv => Ok(sheetpage_core::parse_rows(text)),
        SourceFormat::GvizJson => parse_gviz(text),
    }
}

/// The gviz table keeps headers out of band in `cols[].label`, so the
/// synthesized header row comes from the labels (falling back to column
/// ids when a sheet is published without a frozen header row).
fn parse_gviz(text: &str) -> Result<Vec<Vec<String>>, SourceError> {
    let json = strip_jsonp(text).ok_or(SourceError::BadWrapper)?;
    let value: Value = serde_json::from_str(json)?;
    let table = value.get("table").ok_or(SourceError::MissingTable)?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    if let Some(cols) = table.get("cols").and_then(Value::as_array) {
        let headers = cols
            .iter()
            .map(|col| {
                col.get("label")
                    .and_then(Value::as_str)
                    .filter(|label| !label.trim().is_empty())
                    .or_else(|| col.get("id").and_then(Value::as_str))
                    .unwrap_or("")
                    .to_string()
            })
            .collect();
        rows.push(headers);
    }

    if let Some(data) = table.get("rows").and_then(Value::as_array) {
        for row in data {
            let cells = row
                .get("c")
                .and_then(Value::as_array)
                .map(|cells| cells.iter().map(cell_text).collect())
                .unwrap_or_default();
            rows.push(cells);
        }
    }

    Ok(rows)
}

/// A gviz cell carries the raw value in `v` and, for dates and formatted
/// numbers, the display string in `f`. The display string is what the
/// sheet shows, so it wins.
fn cell_text(cell: &Value) -> String {
    if cell.is_null() {
        return String::new();
    }
    if let Some(formatted) = cell.get("f").and_then(Value::as_str) {
        return formatted.to_string();
    }
    match cell.get("v") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

fn strip_jsonp(text: &str) -> Option<&str> {
    let start = text.find("setResponse(")? + "setResponse(".len();
    let end = text.rfind(')')?;
    (end > start).then(|| &text[start..end])
}
