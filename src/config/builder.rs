//! Type-safe builder for `HarvestConfig` using the typestate pattern
//!
//! `build()` only exists once both the listing URL and the export path are
//! set; everything else has a default.

use std::marker::PhantomData;
use std::path::PathBuf;

use super::types::{HarvestConfig, HarvestOptions};
use crate::extractor::strategy::parse_selector;
use crate::harvest_engine::{HarvestError, HarvestResult};
use crate::utils::normalize_base_url;

// Type states for the builder
pub struct WithBaseUrl;
pub struct Complete;

pub struct HarvestConfigBuilder<State = ()> {
    base_url: Option<String>,
    output_path: Option<PathBuf>,
    options: HarvestOptions,
    _phantom: PhantomData<State>,
}

impl Default for HarvestConfigBuilder<()> {
    fn default() -> Self {
        Self {
            base_url: None,
            output_path: None,
            options: HarvestOptions::default(),
            _phantom: PhantomData,
        }
    }
}

impl HarvestConfig {
    /// Create a builder for configuring a `HarvestConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> HarvestConfigBuilder<()> {
        HarvestConfigBuilder::default()
    }
}

impl HarvestConfigBuilder<()> {
    pub fn base_url(self, url: impl Into<String>) -> HarvestConfigBuilder<WithBaseUrl> {
        HarvestConfigBuilder {
            base_url: Some(url.into()),
            output_path: self.output_path,
            options: self.options,
            _phantom: PhantomData,
        }
    }
}

impl HarvestConfigBuilder<WithBaseUrl> {
    pub fn output_path(self, path: impl Into<PathBuf>) -> HarvestConfigBuilder<Complete> {
        HarvestConfigBuilder {
            base_url: self.base_url,
            output_path: Some(path.into()),
            options: self.options,
            _phantom: PhantomData,
        }
    }
}

// Build method only available when all required fields are set
impl HarvestConfigBuilder<Complete> {
    pub fn build(self) -> HarvestResult<HarvestConfig> {
        let raw_url = self
            .base_url
            .ok_or_else(|| HarvestError::Config("base_url is required".to_string()))?;
        let output_path = self
            .output_path
            .ok_or_else(|| HarvestError::Config("output_path is required".to_string()))?;

        let base_url = normalize_base_url(&raw_url)?;
        validate_options(&self.options)?;

        Ok(HarvestConfig {
            base_url,
            output_path,
            options: self.options,
        })
    }
}

fn validate_options(options: &HarvestOptions) -> HarvestResult<()> {
    if options.max_pages == 0 {
        return Err(HarvestError::Config(
            "max_pages must be at least 1".to_string(),
        ));
    }
    if options.max_reveal_iterations == 0 {
        return Err(HarvestError::Config(
            "max_reveal_iterations must be at least 1".to_string(),
        ));
    }
    if options.user_agent.trim().is_empty() {
        return Err(HarvestError::Config("user_agent cannot be empty".to_string()));
    }
    validate_range("reveal_delay_secs", options.reveal_delay_secs)?;
    validate_range("page_delay_secs", options.page_delay_secs)?;
    parse_selector(&options.record_selector)?;
    parse_selector(&options.next_page_selector)?;
    Ok(())
}

fn validate_range(name: &str, (min, max): (f64, f64)) -> HarvestResult<()> {
    if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
        return Err(HarvestError::Config(format!(
            "{name} must be a non-negative range with min <= max, got {min}..{max}"
        )));
    }
    Ok(())
}

// Builder methods available at any state
impl<State> HarvestConfigBuilder<State> {
    /// Set the highest page index to request (default: 555)
    #[must_use]
    pub fn max_pages(mut self, pages: u32) -> Self {
        self.options.max_pages = pages;
        self
    }

    /// Set the user agent presented for the whole run
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.options.user_agent = user_agent.into();
        self
    }

    /// Run the browser headless (default) or with a visible window
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.options.headless = headless;
        self
    }

    #[must_use]
    pub fn record_selector(mut self, selector: impl Into<String>) -> Self {
        self.options.record_selector = selector.into();
        self
    }

    #[must_use]
    pub fn next_page_selector(mut self, selector: impl Into<String>) -> Self {
        self.options.next_page_selector = selector.into();
        self
    }

    #[must_use]
    pub fn page_load_timeout_secs(mut self, secs: u64) -> Self {
        self.options.page_load_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn marker_wait_timeout_secs(mut self, secs: u64) -> Self {
        self.options.marker_wait_timeout_secs = secs;
        self
    }

    /// Cap the scroll attempts per page (default: 15)
    #[must_use]
    pub fn max_reveal_iterations(mut self, iterations: u32) -> Self {
        self.options.max_reveal_iterations = iterations;
        self
    }

    #[must_use]
    pub fn min_records_per_page(mut self, records: usize) -> Self {
        self.options.min_records_per_page = records;
        self
    }

    /// Pause range between scroll attempts, in seconds (default: 3..6)
    #[must_use]
    pub fn reveal_delay_secs(mut self, min: f64, max: f64) -> Self {
        self.options.reveal_delay_secs = (min, max);
        self
    }

    /// Pause range between page requests, in seconds (default: 5..10)
    #[must_use]
    pub fn page_delay_secs(mut self, min: f64, max: f64) -> Self {
        self.options.page_delay_secs = (min, max);
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.chrome_data_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_page_ceiling_is_rejected() {
        let result = HarvestConfig::builder()
            .base_url("https://example.com/reviews")
            .output_path("out.csv")
            .max_pages(0)
            .build();
        assert!(matches!(result, Err(HarvestError::Config(_))));
    }

    #[test]
    fn inverted_delay_range_is_rejected() {
        let result = HarvestConfig::builder()
            .base_url("https://example.com/reviews")
            .output_path("out.csv")
            .page_delay_secs(10.0, 5.0)
            .build();
        assert!(matches!(result, Err(HarvestError::Config(_))));
    }

    #[test]
    fn broken_selector_is_rejected() {
        let result = HarvestConfig::builder()
            .base_url("https://example.com/reviews")
            .output_path("out.csv")
            .record_selector("div[")
            .build();
        assert!(matches!(result, Err(HarvestError::Selector { .. })));
    }
}
