//! Pagination controller
//!
//! Drives one page at a time: navigate, reveal, extract, then decide whether
//! to request the next page. Page-level failures abandon only that page.
//! The continue/stop rule lives in [`decide`] so it can be checked without a
//! browser.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::accumulator::HarvestSession;
use super::delay::{DelayPolicy, JitterDelay, pause};
use super::harvest_types::{
    HarvestOutcome, HarvestResult, PageReport, PageState, PageStatus, StopReason,
};
use crate::config::HarvestConfig;
use crate::extractor::{PageExtraction, RecordExtractor};
use crate::reveal::{RevealSettings, reveal};
use crate::session::{NextAffordance, PageDriver};
use crate::utils::page_url;

/// What the controller does after finishing a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Continue { next_page: u32 },
    Stop(StopReason),
}

/// Continue/stop rule applied after every page
///
/// Checked in order: nothing collected yet, no usable next affordance, page
/// ceiling reached.
#[must_use]
pub fn decide(cumulative: usize, next: NextAffordance, page: u32, max_pages: u32) -> Transition {
    if cumulative == 0 {
        return Transition::Stop(StopReason::EmptyCollection);
    }
    if !next.is_enabled() {
        return Transition::Stop(StopReason::EndOfPages);
    }
    if page >= max_pages {
        return Transition::Stop(StopReason::PageLimitReached);
    }
    Transition::Continue {
        next_page: page + 1,
    }
}

/// Runs the page loop against a `PageDriver`
#[derive(Debug, Clone)]
pub struct Harvester {
    base_url: String,
    max_pages: u32,
    next_page_selector: String,
    reveal_settings: RevealSettings,
    extractor: Arc<RecordExtractor>,
    reveal_delay: Arc<dyn DelayPolicy>,
    page_delay: Arc<dyn DelayPolicy>,
}

impl Harvester {
    /// Build a harvester with the delays and selectors of `config`
    ///
    /// # Errors
    /// `Selector` when the configured record marker doesn't parse.
    pub fn new(config: &HarvestConfig) -> HarvestResult<Self> {
        let (reveal_min, reveal_max) = config.reveal_delay_secs();
        let (page_min, page_max) = config.page_delay_secs();

        Ok(Self {
            base_url: config.base_url().to_string(),
            max_pages: config.max_pages(),
            next_page_selector: config.next_page_selector().to_string(),
            reveal_settings: RevealSettings::from_config(config),
            extractor: Arc::new(RecordExtractor::with_marker(config.record_selector())?),
            reveal_delay: Arc::new(JitterDelay::from_secs_f64(reveal_min, reveal_max)),
            page_delay: Arc::new(JitterDelay::from_secs_f64(page_min, page_max)),
        })
    }

    /// Replace the pause between reveal attempts
    #[must_use]
    pub fn with_reveal_delay(mut self, policy: impl DelayPolicy + 'static) -> Self {
        self.reveal_delay = Arc::new(policy);
        self
    }

    /// Replace the pause between page requests
    #[must_use]
    pub fn with_page_delay(mut self, policy: impl DelayPolicy + 'static) -> Self {
        self.page_delay = Arc::new(policy);
        self
    }

    #[must_use]
    pub fn reveal_settings(&self) -> &RevealSettings {
        &self.reveal_settings
    }

    /// Harvest pages into `session` until a stop condition holds
    ///
    /// Records and page reports are written to `session` as each page
    /// finishes, so dropping this future mid-run loses at most the page in
    /// flight.
    ///
    /// # Errors
    /// Only when a page URL can't be built from the base URL; page failures
    /// are recorded in the outcome instead.
    pub async fn run<D: PageDriver + ?Sized>(
        &self,
        driver: &mut D,
        session: &mut HarvestSession,
    ) -> HarvestResult<HarvestOutcome> {
        let mut page = session.advance();

        loop {
            let url = page_url(&self.base_url, page)?;
            info!("Harvesting page {} of at most {}: {}", page, self.max_pages, url);

            let mut state = PageState::new(url.clone(), page);
            let status = match self.process_page(driver, &mut state).await {
                Ok(extraction) => {
                    let skipped = extraction.skipped.len();
                    let records = session.append_page(extraction.records);
                    info!(
                        "Page {}: {} records ({} skipped), {} total",
                        page,
                        records,
                        skipped,
                        session.len()
                    );
                    PageStatus::Extracted { records, skipped }
                }
                Err(e) => {
                    warn!("Abandoning page {}: {}", page, e);
                    PageStatus::Abandoned {
                        reason: e.to_string(),
                    }
                }
            };
            session.record_page(PageReport {
                index: page,
                url,
                status,
            });

            let next = if session.is_empty() {
                NextAffordance::Absent
            } else {
                self.probe_next(driver, page).await
            };

            match decide(session.len(), next, page, self.max_pages) {
                Transition::Continue { next_page } => {
                    pause(self.page_delay.as_ref(), page).await;
                    page = session.advance();
                    debug_assert_eq!(page, next_page);
                }
                Transition::Stop(reason) => {
                    info!(
                        "Stopping after page {} ({}): {} records collected",
                        page,
                        reason,
                        session.len()
                    );
                    return Ok(session.outcome(reason));
                }
            }
        }
    }

    async fn process_page<D: PageDriver + ?Sized>(
        &self,
        driver: &mut D,
        state: &mut PageState,
    ) -> HarvestResult<PageExtraction> {
        driver.navigate(&state.url).await?;

        let revealed = reveal(
            driver,
            &self.reveal_settings,
            self.reveal_delay.as_ref(),
            state,
        )
        .await?;
        debug!(
            "Page {} revealed in {} attempts, {} markers",
            state.index, revealed.iterations, revealed.marker_count
        );

        let extraction = self.extractor.extract(&revealed.document)?;
        state.record_count = extraction.records.len();
        Ok(extraction)
    }

    async fn probe_next<D: PageDriver + ?Sized>(&self, driver: &mut D, page: u32) -> NextAffordance {
        match driver.next_affordance(&self.next_page_selector).await {
            Ok(next) => {
                debug!("Next-page affordance after page {}: {:?}", page, next);
                next
            }
            Err(e) => {
                warn!("Next-page probe failed after page {}, treating as absent: {}", page, e);
                NextAffordance::Absent
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collection_wins_over_everything() {
        assert_eq!(
            decide(0, NextAffordance::Enabled, 1, 555),
            Transition::Stop(StopReason::EmptyCollection)
        );
        assert_eq!(
            decide(0, NextAffordance::Absent, 555, 555),
            Transition::Stop(StopReason::EmptyCollection)
        );
    }

    #[test]
    fn missing_or_disabled_next_ends_pages() {
        for next in [NextAffordance::Absent, NextAffordance::Disabled] {
            assert_eq!(
                decide(20, next, 3, 555),
                Transition::Stop(StopReason::EndOfPages)
            );
        }
    }

    #[test]
    fn ceiling_stops_even_with_enabled_next() {
        assert_eq!(
            decide(40, NextAffordance::Enabled, 2, 2),
            Transition::Stop(StopReason::PageLimitReached)
        );
        assert_eq!(
            decide(40, NextAffordance::Enabled, 1, 2),
            Transition::Continue { next_page: 2 }
        );
    }
}
