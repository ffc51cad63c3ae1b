//! Shared configuration constants for the review harvester
//!
//! Default values and selectors used throughout the codebase to keep
//! magic numbers and markup class names in one place.

/// Default listing: British Airways reviews on Trustpilot
pub const DEFAULT_BASE_URL: &str = "https://www.trustpilot.com/review/www.britishairways.com";

/// Query parameter carrying the 1-based page index
pub const PAGE_QUERY_PARAM: &str = "page";

/// Default ceiling on the number of listing pages requested in one run
pub const DEFAULT_MAX_PAGES: u32 = 555;

/// Default export file name
pub const DEFAULT_OUTPUT_FILE: &str = "raw_reviews.csv";

/// Chrome user agent presented as the client identity
///
/// Kept fixed for the whole run so the listing sees one stable client.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.6099.216 Safari/537.36";

/// Timeout for `page.goto()` in seconds
pub const DEFAULT_PAGE_LOAD_TIMEOUT_SECS: u64 = 30;

/// How long to wait for the first record marker to render, in seconds
pub const DEFAULT_MARKER_WAIT_TIMEOUT_SECS: u64 = 15;

/// Poll interval while waiting for the first record marker
pub const MARKER_POLL_INTERVAL_MS: u64 = 200;

/// Upper bound on reveal ("scroll to bottom") attempts per page
pub const DEFAULT_MAX_REVEAL_ITERATIONS: u32 = 15;

/// Marker count at which a stabilized page is considered fully revealed
///
/// The listing renders roughly 20 reviews per page.
pub const DEFAULT_MIN_RECORDS_PER_PAGE: usize = 20;

/// Pause between reveal attempts, in seconds (uniformly sampled)
pub const DEFAULT_REVEAL_DELAY_SECS: (f64, f64) = (3.0, 6.0);

/// Pause between page requests, in seconds (uniformly sampled)
pub const DEFAULT_PAGE_DELAY_SECS: (f64, f64) = (5.0, 10.0);

/// CSS selector for one review card
pub const RECORD_MARKER_SELECTOR: &str = "div.styles_reviewCardInner__UZk1x";

/// CSS selector for the "next page" link
pub const NEXT_PAGE_SELECTOR: &str = ".pagination-link_next__NdSsd";

/// Placeholder for any textual field that could not be extracted
pub const NOT_SPECIFIED: &str = "not specified";

/// Placeholder author
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Placeholder review body
pub const NO_CONTENT: &str = "no content";
