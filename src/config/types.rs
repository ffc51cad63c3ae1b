//! Core configuration types for harvest runs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::{
    CHROME_USER_AGENT, DEFAULT_BASE_URL, DEFAULT_MARKER_WAIT_TIMEOUT_SECS, DEFAULT_MAX_PAGES,
    DEFAULT_MAX_REVEAL_ITERATIONS, DEFAULT_MIN_RECORDS_PER_PAGE, DEFAULT_OUTPUT_FILE,
    DEFAULT_PAGE_DELAY_SECS, DEFAULT_PAGE_LOAD_TIMEOUT_SECS, DEFAULT_REVEAL_DELAY_SECS,
    NEXT_PAGE_SELECTOR, RECORD_MARKER_SELECTOR,
};

/// Main configuration for a harvest run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Listing URL without page index.
    ///
    /// **INVARIANT:** a parsed http(s) URL (normalized in the builder).
    pub(crate) base_url: String,
    pub(crate) output_path: PathBuf,
    pub(crate) options: HarvestOptions,
}

/// Optional settings, shared by the builder and the built config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct HarvestOptions {
    /// Highest page index that will be requested
    pub(crate) max_pages: u32,
    /// Client identity presented to the listing for the whole run
    pub(crate) user_agent: String,
    pub(crate) headless: bool,
    pub(crate) record_selector: String,
    pub(crate) next_page_selector: String,

    /// Timeout in seconds for `page.goto()` and its load event
    ///
    /// Default: 30 seconds
    pub(crate) page_load_timeout_secs: u64,

    /// How long to wait for the first record marker before abandoning a page
    ///
    /// Default: 15 seconds
    pub(crate) marker_wait_timeout_secs: u64,

    /// Upper bound on scroll attempts per page
    ///
    /// Default: 15
    pub(crate) max_reveal_iterations: u32,

    /// Marker count at which a page with stable height counts as revealed
    ///
    /// Default: 20
    pub(crate) min_records_per_page: usize,

    /// Pause range between scroll attempts, in seconds
    pub(crate) reveal_delay_secs: (f64, f64),

    /// Pause range between page requests, in seconds
    pub(crate) page_delay_secs: (f64, f64),

    /// Chrome profile directory; a per-process temp directory when unset
    pub(crate) chrome_data_dir: Option<PathBuf>,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            user_agent: CHROME_USER_AGENT.to_string(),
            headless: true,
            record_selector: RECORD_MARKER_SELECTOR.to_string(),
            next_page_selector: NEXT_PAGE_SELECTOR.to_string(),
            page_load_timeout_secs: DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
            marker_wait_timeout_secs: DEFAULT_MARKER_WAIT_TIMEOUT_SECS,
            max_reveal_iterations: DEFAULT_MAX_REVEAL_ITERATIONS,
            min_records_per_page: DEFAULT_MIN_RECORDS_PER_PAGE,
            reveal_delay_secs: DEFAULT_REVEAL_DELAY_SECS,
            page_delay_secs: DEFAULT_PAGE_DELAY_SECS,
            chrome_data_dir: None,
        }
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            options: HarvestOptions::default(),
        }
    }
}
