//! Content revealer
//!
//! Listing pages render their first records late and the rest only after the
//! user scrolls. The revealer waits for the first record marker, then
//! scrolls in a bounded loop until the document height stops changing and
//! enough records are visible.
//!
//! The loop makes at most `max_iterations` reveal attempts, whatever the
//! page does, so the time spent on one page is bounded.

use std::time::Duration;
use tracing::{debug, info, trace, warn};

use crate::config::HarvestConfig;
use crate::harvest_engine::delay::{DelayPolicy, pause};
use crate::harvest_engine::{HarvestError, HarvestResult, PageState};
use crate::session::PageDriver;
use crate::utils::MARKER_POLL_INTERVAL_MS;

/// Knobs of the reveal loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealSettings {
    pub marker_selector: String,
    pub marker_wait_timeout: Duration,
    pub poll_interval: Duration,
    pub max_iterations: u32,
    pub min_markers: usize,
}

impl RevealSettings {
    #[must_use]
    pub fn from_config(config: &HarvestConfig) -> Self {
        Self {
            marker_selector: config.record_selector().to_string(),
            marker_wait_timeout: config.marker_wait_timeout(),
            poll_interval: Duration::from_millis(MARKER_POLL_INTERVAL_MS),
            max_iterations: config.max_reveal_iterations(),
            min_markers: config.min_records_per_page(),
        }
    }
}

/// What the revealer ended with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealOutcome {
    pub document: String,
    /// Reveal attempts made, never more than `max_iterations`
    pub iterations: u32,
    pub marker_count: usize,
    /// Height stopped changing with enough markers visible
    pub stabilized: bool,
}

/// Wait for the first record marker to render
///
/// Probe failures count as "not rendered yet".
///
/// # Errors
/// `PageLoadTimeout` when nothing matched within the wait window.
pub async fn wait_for_markers<D: PageDriver + ?Sized>(
    driver: &mut D,
    settings: &RevealSettings,
    url: &str,
) -> HarvestResult<usize> {
    let poll = async {
        loop {
            match driver.count_markers(&settings.marker_selector).await {
                Ok(count) if count > 0 => return count,
                Ok(_) => {}
                Err(e) => trace!("Marker probe failed, retrying: {}", e),
            }
            tokio::time::sleep(settings.poll_interval).await;
        }
    };

    match tokio::time::timeout(settings.marker_wait_timeout, poll).await {
        Ok(count) => {
            debug!("{} record markers rendered on {}", count, url);
            Ok(count)
        }
        Err(_) => Err(HarvestError::PageLoadTimeout {
            url: url.to_string(),
            timeout_secs: settings.marker_wait_timeout.as_secs(),
        }),
    }
}

/// Reveal the lazily loaded records of the current page
///
/// Returns the final rendered document even when the density threshold
/// wasn't reached; extraction works with whatever rendered.
pub async fn reveal<D: PageDriver + ?Sized>(
    driver: &mut D,
    settings: &RevealSettings,
    delay: &dyn DelayPolicy,
    state: &mut PageState,
) -> HarvestResult<RevealOutcome> {
    let mut markers = wait_for_markers(driver, settings, &state.url).await?;
    state.record_count = markers;

    let mut last_extent = match driver.document_extent().await {
        Ok(extent) => extent,
        Err(e) => {
            warn!("Could not measure page {} before revealing: {}", state.index, e);
            0
        }
    };
    state.last_extent = last_extent;

    let mut iterations = 0;
    let mut stabilized = false;

    while iterations < settings.max_iterations {
        iterations += 1;

        if let Err(e) = driver.reveal_more().await {
            warn!("Reveal attempt {} failed on page {}: {}", iterations, state.index, e);
            break;
        }

        pause(delay, iterations).await;

        let measured = async {
            let extent = driver.document_extent().await?;
            let count = driver.count_markers(&settings.marker_selector).await?;
            Ok::<_, HarvestError>((extent, count))
        }
        .await;

        let (extent, count) = match measured {
            Ok(m) => m,
            Err(e) => {
                warn!("Measuring page {} failed after reveal {}: {}", state.index, iterations, e);
                break;
            }
        };
        markers = count;
        state.record_count = count;
        debug!(
            "Reveal {}/{} on page {}: extent {} -> {}, {} markers",
            iterations, settings.max_iterations, state.index, last_extent, extent, count
        );

        if extent == last_extent {
            if count >= settings.min_markers {
                stabilized = true;
                break;
            }
            debug!(
                "Extent unchanged but only {} of {} markers, continuing",
                count, settings.min_markers
            );
        }

        last_extent = extent;
        state.last_extent = extent;
    }

    if !stabilized {
        info!(
            "Page {} not fully revealed after {} attempts ({} markers), extracting what rendered",
            state.index, iterations, markers
        );
    }

    let document = driver.rendered_document().await?;

    Ok(RevealOutcome {
        document,
        iterations,
        marker_count: markers,
        stabilized,
    })
}
