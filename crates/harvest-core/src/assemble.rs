//! Assembly of a Table from captured API payloads
//!
//! Runs the shape detector over every buffered payload, derives headers for
//! each candidate array, and keeps whichever candidate yields the most rows.

use crate::detect;
use crate::error::{Error, Result};
use crate::flatten::flatten;
use crate::table::Table;
use crate::capture::CaptureRecord;
use serde_json::Value;

/// Bookkeeping keys that never become table columns
const STRUCTURAL_KEYS: &[&str] = &[
    "__typename",
    "_id",
    "createdAt",
    "updatedAt",
    "created_at",
    "updated_at",
    "__v",
    "cursor",
    "node",
];

/// How many leading elements contribute keys to the header union
const HEADER_SAMPLE: usize = 10;

/// How many captured URLs are included in a failure diagnostic
const SAMPLE_URLS: usize = 3;

/// Assemble the best table found across a batch of captured payloads
///
/// Candidates are compared by row count; ties keep the first one found,
/// scanning payloads in arrival order. Fails with
/// [`Error::NoCandidateTable`] when no candidate yields at least one header
/// and one row.
pub fn assemble(payloads: &[CaptureRecord]) -> Result<Table> {
    let mut best: Option<(Vec<String>, &[Value])> = None;

    for record in payloads {
        for candidate in detect::find_candidates(&record.body) {
            if candidate.length == 0 {
                continue;
            }
            let headers = derive_headers(candidate.rows);
            if headers.is_empty() {
                continue;
            }
            let best_len = best.as_ref().map_or(0, |(_, rows)| rows.len());
            if candidate.length > best_len {
                best = Some((headers, candidate.rows));
            }
        }
    }

    let (headers, elements) = best.ok_or_else(|| no_candidate(payloads))?;

    let mut table = Table::new(headers);
    for element in elements {
        let cells = table
            .headers
            .iter()
            .map(|header| match element.get(header) {
                Some(value) => flatten(value),
                None => String::new(),
            })
            .collect();
        table.push_row(cells);
    }

    Ok(table)
}

/// Union of record keys over the first [`HEADER_SAMPLE`] elements
///
/// Insertion order: the first element's keys in their own order, then keys
/// newly seen in subsequent elements. Structural keys are excluded.
fn derive_headers(elements: &[Value]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();

    for element in elements.iter().take(HEADER_SAMPLE) {
        let Some(obj) = element.as_object() else {
            continue;
        };
        for key in obj.keys() {
            if STRUCTURAL_KEYS.contains(&key.as_str()) {
                continue;
            }
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
    }

    headers
}

fn no_candidate(payloads: &[CaptureRecord]) -> Error {
    Error::NoCandidateTable {
        payloads_examined: payloads.len(),
        tabular_flagged: payloads.iter().filter(|r| r.looks_tabular).count(),
        sample_urls: payloads
            .iter()
            .take(SAMPLE_URLS)
            .map(|r| r.url.clone())
            .collect(),
    }
}
