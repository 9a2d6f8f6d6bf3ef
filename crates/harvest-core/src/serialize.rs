//! Serialization of a finalized Table to CSV or JSON
//!
//! These two renderings are the system's only bit-exact output contracts.
//! CSV: UTF-8 BOM, every field quoted, CRLF between rows, spreadsheet-
//! friendly. JSON: array of objects keyed in header order, pretty-printed.
//! Either may carry a leading metadata block describing the capture.

use crate::error::Result;
use crate::range::RowRange;
use crate::table::Table;
use serde_json::Value;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    /// Conventional file extension for this format
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Label opening a CSV metadata block
const METADATA_HEADER: &str = "--- SEARCH PARAMETERS ---";

/// Label closing a CSV metadata block
const METADATA_FOOTER: &str = "---";

/// Render a table in the requested format
///
/// `range` must already be validated against the table (see
/// [`RowRange::validate`]); the serializer slices blindly and an
/// out-of-range value simply yields fewer rows.
pub fn serialize(
    table: &Table,
    format: OutputFormat,
    range: Option<RowRange>,
    metadata: Option<&[(String, String)]>,
) -> Result<String> {
    match format {
        OutputFormat::Csv => to_csv(table, range, metadata),
        OutputFormat::Json => to_json(table, range, metadata),
    }
}

/// Render CSV: BOM, optional metadata block, header row, data rows
pub fn to_csv(
    table: &Table,
    range: Option<RowRange>,
    metadata: Option<&[(String, String)]>,
) -> Result<String> {
    let mut out = String::from("\u{feff}");

    if let Some(entries) = metadata {
        out.push_str(METADATA_HEADER);
        out.push_str("\r\n");
        for (key, value) in entries {
            out.push_str(key);
            out.push(',');
            out.push_str(value);
            out.push_str("\r\n");
        }
        out.push_str(METADATA_FOOTER);
        out.push_str("\r\n\r\n");
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(&table.headers)?;
    for row in selected_rows(table, range) {
        writer.write_record(row)?;
    }

    let buf = writer.into_inner().map_err(|e| e.into_error())?;
    let body = match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    };
    // Rows are joined by CRLF; drop the writer's trailing terminator
    out.push_str(body.trim_end_matches("\r\n"));

    Ok(out)
}

/// Render JSON: one object per row, keys in header order, optionally
/// wrapped as `{ _searchParameters, data }`
pub fn to_json(
    table: &Table,
    range: Option<RowRange>,
    metadata: Option<&[(String, String)]>,
) -> Result<String> {
    let records: Vec<Value> = selected_rows(table, range)
        .iter()
        .map(|row| {
            let mut obj = serde_json::Map::new();
            for (i, header) in table.headers.iter().enumerate() {
                let cell = row.get(i).cloned().unwrap_or_default();
                obj.insert(header.clone(), Value::String(cell));
            }
            Value::Object(obj)
        })
        .collect();

    let document = match metadata {
        Some(entries) => {
            let mut params = serde_json::Map::new();
            for (key, value) in entries {
                params.insert(key.clone(), Value::String(value.clone()));
            }
            let mut root = serde_json::Map::new();
            root.insert("_searchParameters".to_string(), Value::Object(params));
            root.insert("data".to_string(), Value::Array(records));
            Value::Object(root)
        }
        None => Value::Array(records),
    };

    Ok(serde_json::to_string_pretty(&document)?)
}

fn selected_rows(table: &Table, range: Option<RowRange>) -> &[Vec<String>] {
    match range {
        Some(r) => r.slice(&table.rows),
        None => &table.rows,
    }
}
