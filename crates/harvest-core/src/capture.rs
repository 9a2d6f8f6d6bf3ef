//! Bounded buffering of captured network payloads
//!
//! An always-on interception adapter appends payloads while the rest of the
//! pipeline reads them on demand, so the store is mutex-guarded and readers
//! work from snapshots. The buffer is size-capped: when full, non-tabular
//! entries are evicted before tabular ones, oldest first within each tier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Default number of payloads retained
pub const DEFAULT_CAPACITY: usize = 100;

/// One captured network payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureRecord {
    /// Request URL the payload was observed on
    pub url: String,
    /// HTTP method of the originating request
    pub method: String,
    /// The response body, parsed
    pub body: Value,
    /// Whether the interception adapter flagged the payload as table-like
    pub looks_tabular: bool,
    /// When the payload arrived
    pub received_at: DateTime<Utc>,
}

impl CaptureRecord {
    /// Create a record stamped with the current time
    pub fn new(
        url: impl Into<String>,
        method: impl Into<String>,
        body: Value,
        looks_tabular: bool,
    ) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            body,
            looks_tabular,
            received_at: Utc::now(),
        }
    }
}

/// A bounded, arrival-ordered buffer of captured payloads
#[derive(Debug)]
pub struct CaptureBatch {
    entries: VecDeque<CaptureRecord>,
    capacity: usize,
}

impl CaptureBatch {
    /// Create an empty batch with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty batch with an explicit capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Number of buffered payloads
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the batch holds no payloads
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a payload, evicting if the batch is at capacity
    pub fn push(&mut self, record: CaptureRecord) {
        if self.entries.len() >= self.capacity {
            self.evict_one();
        }
        self.entries.push_back(record);
    }

    /// Drop the oldest non-tabular entry, or the oldest entry outright when
    /// every buffered payload is tabular
    fn evict_one(&mut self) {
        let victim = self
            .entries
            .iter()
            .position(|r| !r.looks_tabular)
            .unwrap_or(0);
        self.entries.remove(victim);
    }

    /// Copy out the buffered payloads in arrival order
    pub fn to_vec(&self) -> Vec<CaptureRecord> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for CaptureBatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe wrapper around a [`CaptureBatch`]
///
/// Appends and eviction happen under one lock acquisition, and readers get
/// a snapshot so iteration never races a concurrent append.
#[derive(Debug)]
pub struct CaptureStore {
    inner: Mutex<CaptureBatch>,
}

impl CaptureStore {
    /// Create a store with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a store with an explicit capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(CaptureBatch::with_capacity(capacity)),
        }
    }

    /// Append a captured payload
    pub fn append(&self, record: CaptureRecord) {
        self.lock().push(record);
    }

    /// Number of buffered payloads
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no payloads
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot the buffered payloads in arrival order
    pub fn snapshot(&self) -> Vec<CaptureRecord> {
        self.lock().to_vec()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CaptureBatch> {
        // A panicked appender leaves the batch structurally intact; keep going
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CaptureStore {
    fn default() -> Self {
        Self::new()
    }
}
