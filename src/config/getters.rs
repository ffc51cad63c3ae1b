//! Getter methods for `HarvestConfig`

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::types::HarvestConfig;

impl HarvestConfig {
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    #[must_use]
    pub fn max_pages(&self) -> u32 {
        self.options.max_pages
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.options.user_agent
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.options.headless
    }

    #[must_use]
    pub fn record_selector(&self) -> &str {
        &self.options.record_selector
    }

    #[must_use]
    pub fn next_page_selector(&self) -> &str {
        &self.options.next_page_selector
    }

    #[must_use]
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.options.page_load_timeout_secs)
    }

    #[must_use]
    pub fn marker_wait_timeout(&self) -> Duration {
        Duration::from_secs(self.options.marker_wait_timeout_secs)
    }

    #[must_use]
    pub fn max_reveal_iterations(&self) -> u32 {
        self.options.max_reveal_iterations
    }

    #[must_use]
    pub fn min_records_per_page(&self) -> usize {
        self.options.min_records_per_page
    }

    /// Pause range between scroll attempts, in seconds
    #[must_use]
    pub fn reveal_delay_secs(&self) -> (f64, f64) {
        self.options.reveal_delay_secs
    }

    /// Pause range between page requests, in seconds
    #[must_use]
    pub fn page_delay_secs(&self) -> (f64, f64) {
        self.options.page_delay_secs
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&PathBuf> {
        self.options.chrome_data_dir.as_ref()
    }
}
