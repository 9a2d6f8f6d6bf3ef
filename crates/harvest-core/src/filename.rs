//! Suggested filenames for output sinks
//!
//! Sinks receive bytes plus a suggested name; the name is derived from a
//! capture label (page title, search description) by a lookup-table-driven
//! text transform, stamped with the capture date.

use crate::serialize::OutputFormat;
use chrono::NaiveDate;

/// Long tokens shortened in filenames
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("association", "assoc"),
    ("corporation", "corp"),
    ("department", "dept"),
    ("foundation", "fdn"),
    ("institute", "inst"),
    ("international", "intl"),
    ("laboratory", "lab"),
    ("university", "univ"),
];

/// Longest slug kept before the date stamp
const MAX_SLUG_LEN: usize = 48;

/// Fallback slug when the label yields nothing usable
const DEFAULT_SLUG: &str = "export";

/// Derive a filename like `acme_univ_results_2026-08-08.csv` from a label
pub fn suggest_filename(label: &str, format: OutputFormat, date: NaiveDate) -> String {
    let slug = slugify(label);
    let slug = if slug.is_empty() { DEFAULT_SLUG } else { &slug };
    format!(
        "{}_{}.{}",
        slug,
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Lowercase, tokenize on non-alphanumerics, abbreviate, rejoin with `_`
fn slugify(label: &str) -> String {
    let lowered = label.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(abbreviate)
        .collect();

    let mut slug = tokens.join("_");
    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        let trimmed = slug.trim_end_matches('_').len();
        slug.truncate(trimmed);
    }
    slug
}

fn abbreviate(token: &str) -> &str {
    ABBREVIATIONS
        .iter()
        .find(|(long, _)| *long == token)
        .map_or(token, |(_, short)| short)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 8).unwrap()
    }

    #[test]
    fn test_basic_label() {
        assert_eq!(
            suggest_filename("Search Results", OutputFormat::Csv, date()),
            "search_results_2026-08-08.csv"
        );
    }

    #[test]
    fn test_abbreviation_table_applies_per_token() {
        assert_eq!(
            suggest_filename("Acme University Laboratory", OutputFormat::Json, date()),
            "acme_univ_lab_2026-08-08.json"
        );
    }

    #[test]
    fn test_punctuation_collapses() {
        assert_eq!(
            suggest_filename("  grants -- (2024/2025)  ", OutputFormat::Csv, date()),
            "grants_2024_2025_2026-08-08.csv"
        );
    }

    #[test]
    fn test_empty_label_falls_back() {
        assert_eq!(
            suggest_filename("???", OutputFormat::Csv, date()),
            "export_2026-08-08.csv"
        );
    }

    #[test]
    fn test_long_labels_truncate() {
        let label = "x".repeat(100);
        let name = suggest_filename(&label, OutputFormat::Csv, date());
        assert_eq!(name, format!("{}_2026-08-08.csv", "x".repeat(48)));
    }
}
