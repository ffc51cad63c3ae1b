//! The browser surface the harvest pipeline depends on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::harvest_engine::HarvestResult;

/// State of the "next page" affordance on the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAffordance {
    Absent,
    Disabled,
    Enabled,
}

impl NextAffordance {
    #[must_use]
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// One exclusively owned, navigable page
///
/// Every operation takes `&mut self`, so at most one navigation or DOM probe
/// is in flight at a time.
#[async_trait]
pub trait PageDriver: Send {
    /// Load `url`; `HarvestError::Navigation` on transport failure or timeout
    async fn navigate(&mut self, url: &str) -> HarvestResult<()>;

    /// Number of elements currently matching `selector`
    async fn count_markers(&mut self, selector: &str) -> HarvestResult<usize>;

    /// Trigger lazily rendered content (scroll to the bottom)
    async fn reveal_more(&mut self) -> HarvestResult<()>;

    /// Current total document height
    async fn document_extent(&mut self) -> HarvestResult<u64>;

    /// Serialized DOM as currently rendered
    async fn rendered_document(&mut self) -> HarvestResult<String>;

    /// Probe the next-page affordance matching `selector`
    async fn next_affordance(&mut self, selector: &str) -> HarvestResult<NextAffordance>;

    /// Release the underlying browser; calling it twice is a no-op
    async fn close(&mut self) -> HarvestResult<()>;
}
