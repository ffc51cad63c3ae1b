//! Core types for harvest runs.
//!
//! Error taxonomy, termination reasons, and the per-page bookkeeping that the
//! pagination controller produces.

use serde::Serialize;
use std::fmt;

/// Errors raised while harvesting
///
/// Only `SessionInit` and `EmptyCollection` end a run as a failure. Page-level
/// variants abandon one page and record-level variants skip one record.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    /// Browser resource could not be acquired
    #[error("Failed to start browser session: {0}")]
    SessionInit(String),

    /// Page could not be loaded
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// No record marker rendered within the wait window
    #[error("Timed out after {timeout_secs}s waiting for records on {url}")]
    PageLoadTimeout { url: String, timeout_secs: u64 },

    /// The rendered document contains no record markers at all
    #[error("No records found on page")]
    NoRecordsOnPage,

    /// A single record block could not be normalized
    #[error("Failed to parse record: {0}")]
    RecordParse(String),

    /// The listing produced nothing on its first page
    #[error("Listing is empty or blocked: no records after the first page")]
    EmptyCollection,

    /// Browser communication failure outside navigation
    #[error("Browser error: {0}")]
    Browser(String),

    /// A hardcoded or configured CSS selector failed to parse
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Export serialization failure
    #[error("Export failed: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for HarvestError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<serde_json::Error> for HarvestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Convenience alias for Result with `HarvestError`
pub type HarvestResult<T> = Result<T, HarvestError>;

/// Why a run stopped requesting pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Cumulative record count was still zero after a page
    EmptyCollection,
    /// The next-page affordance was absent or disabled
    EndOfPages,
    /// The configured page ceiling was reached
    PageLimitReached,
    /// The run was cancelled by a shutdown signal
    Interrupted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCollection => write!(f, "empty collection"),
            Self::EndOfPages => write!(f, "end of pages"),
            Self::PageLimitReached => write!(f, "page limit reached"),
            Self::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// Transient state of one page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub url: String,
    /// 1-based page index
    pub index: u32,
    pub last_extent: u64,
    pub record_count: usize,
}

impl PageState {
    #[must_use]
    pub fn new(url: String, index: u32) -> Self {
        Self {
            url,
            index,
            last_extent: 0,
            record_count: 0,
        }
    }
}

/// How a single page ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageStatus {
    /// Records were extracted (some may have been skipped)
    Extracted { records: usize, skipped: usize },
    /// Page was abandoned; the message carries the page-level error
    Abandoned { reason: String },
}

/// Per-page summary kept for the run report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageReport {
    pub index: u32,
    pub url: String,
    #[serde(flatten)]
    pub status: PageStatus,
}

impl PageReport {
    /// Records this page contributed to the accumulator
    #[must_use]
    pub fn records(&self) -> usize {
        match self.status {
            PageStatus::Extracted { records, .. } => records,
            PageStatus::Abandoned { .. } => 0,
        }
    }
}

/// Result of a controller run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarvestOutcome {
    pub reason: StopReason,
    pub pages: Vec<PageReport>,
}

impl HarvestOutcome {
    /// Indices of the pages that were requested, in order
    #[must_use]
    pub fn page_indices(&self) -> Vec<u32> {
        self.pages.iter().map(|p| p.index).collect()
    }

    /// Total records contributed across all pages
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.pages.iter().map(PageReport::records).sum()
    }
}
