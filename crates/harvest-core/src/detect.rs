//! Table-shape detection inside arbitrary JSON payloads
//!
//! Captured API responses nest their interesting arrays at unpredictable
//! depths. The detector walks a document and collects every array that
//! plausibly holds table rows; ranking the candidates is the assembler's
//! job, not the detector's.

use serde_json::Value;

/// Maximum recursion depth when scanning a document
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// How many leading elements are sampled when checking key overlap
const OVERLAP_SAMPLE: usize = 5;

/// An array found in a payload that plausibly represents table rows
#[derive(Debug, Clone, Copy)]
pub struct TableCandidate<'a> {
    /// The candidate's elements, borrowed from the scanned document
    pub rows: &'a [Value],
    /// Number of elements in the array
    pub length: usize,
    /// Smallest share of the first element's keys seen in the sampled
    /// elements; 1.0 means every sampled element carried all of them
    pub key_overlap: f64,
}

/// Scan a document for embedded arrays-of-records, up to `DEFAULT_MAX_DEPTH`
pub fn find_candidates(doc: &Value) -> Vec<TableCandidate<'_>> {
    find_candidates_with_depth(doc, DEFAULT_MAX_DEPTH)
}

/// Scan a document for embedded arrays-of-records with an explicit depth cap
pub fn find_candidates_with_depth(doc: &Value, max_depth: usize) -> Vec<TableCandidate<'_>> {
    let mut found = Vec::new();
    walk(doc, 0, max_depth, &mut found);
    found
}

fn walk<'a>(node: &'a Value, depth: usize, max_depth: usize, found: &mut Vec<TableCandidate<'a>>) {
    if depth > max_depth {
        return;
    }

    match node {
        Value::Array(items) => {
            if let Some(candidate) = qualify(items) {
                found.push(candidate);
            }
            for item in items {
                if item.is_object() || item.is_array() {
                    walk(item, depth + 1, max_depth, found);
                }
            }
        }
        Value::Object(map) => {
            for value in map.values() {
                walk(value, depth + 1, max_depth, found);
            }
        }
        _ => {}
    }
}

/// Check whether an array qualifies as a table candidate
///
/// Requirements: non-empty, first element is an object with at least two
/// keys, and each of the first `OVERLAP_SAMPLE` elements shares at least
/// half of the first element's keys.
fn qualify(items: &[Value]) -> Option<TableCandidate<'_>> {
    let first = items.first()?.as_object()?;
    if first.len() < 2 {
        return None;
    }

    let mut min_overlap = 1.0f64;
    for item in items.iter().take(OVERLAP_SAMPLE) {
        let shared = match item.as_object() {
            Some(obj) => first.keys().filter(|k| obj.contains_key(*k)).count(),
            None => 0,
        };
        if shared * 2 < first.len() {
            return None;
        }
        min_overlap = min_overlap.min(shared as f64 / first.len() as f64);
    }

    Some(TableCandidate {
        rows: items,
        length: items.len(),
        key_overlap: min_overlap,
    })
}
