//! Error types for harvest-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in harvest-core
#[derive(Debug, Error)]
pub enum Error {
    /// Required grid structure (header row, scroll container) is missing
    #[error("grid structure not found: {0}")]
    StructureNotFound(String),

    /// No table-shaped data could be assembled from captured payloads
    #[error(
        "no candidate table found ({payloads_examined} payloads examined, \
         {tabular_flagged} flagged tabular)"
    )]
    NoCandidateTable {
        payloads_examined: usize,
        tabular_flagged: usize,
        /// Up to a few captured URLs, for pointing the user at what was seen
        sample_urls: Vec<String>,
    },

    /// Row range fails the grammar or violates the table's bounds
    #[error("invalid row range: {0}")]
    InvalidRange(String),

    /// An output sink (file write etc.) failed to deliver the content
    #[error("failed to write output '{path}': {source}")]
    SinkFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read a payload dump file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV writing error from the csv crate
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
