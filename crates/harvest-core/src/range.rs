//! Row-range selection for exports
//!
//! Users give ranges as `"3-17"` (1-indexed, inclusive), a single row
//! number, or an empty string for everything. Parsing and bounds
//! validation both live here; the serializer only ever sees a validated
//! range.

use crate::error::{Error, Result};

/// An inclusive 1-indexed row range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    /// Parse the user grammar: `N-M`, a bare `N` (meaning `N-N`), or an
    /// empty string (meaning all rows, returned as `None`)
    pub fn parse(input: &str) -> Result<Option<Self>> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        let (start, end) = match input.split_once('-') {
            Some((a, b)) => (parse_index(a, input)?, parse_index(b, input)?),
            None => {
                let n = parse_index(input, input)?;
                (n, n)
            }
        };
        Ok(Some(Self { start, end }))
    }

    /// Check `1 <= start <= end <= row_count`
    pub fn validate(&self, row_count: usize) -> Result<()> {
        if self.start < 1 {
            return Err(Error::InvalidRange(
                "start must be at least 1".to_string(),
            ));
        }
        if self.start > self.end {
            return Err(Error::InvalidRange(format!(
                "start {} exceeds end {}",
                self.start, self.end
            )));
        }
        if self.end > row_count {
            return Err(Error::InvalidRange(format!(
                "end {} exceeds row count {}",
                self.end, row_count
            )));
        }
        Ok(())
    }

    /// Slice rows by this range without validating
    ///
    /// Out-of-range bounds degrade to the natural (possibly empty) slice;
    /// callers wanting an error run [`RowRange::validate`] first.
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let lo = self.start.saturating_sub(1).min(rows.len());
        let hi = self.end.min(rows.len()).max(lo);
        &rows[lo..hi]
    }
}

fn parse_index(digits: &str, whole: &str) -> Result<usize> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidRange(format!(
            "'{whole}' is not a row number or N-M range"
        )));
    }
    digits.parse().map_err(|_| {
        Error::InvalidRange(format!("'{whole}' is out of the representable range"))
    })
}
