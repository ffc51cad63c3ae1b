//! Timeout utilities for page operations
//!
//! Wraps browser calls so a stalled navigation or CDP round-trip can't hang
//! the single-threaded harvest flow.

use std::future::Future;
use std::time::Duration;

use super::harvest_types::{HarvestError, HarvestResult};

/// Run a page operation with an explicit timeout
///
/// # Returns
/// * `Ok(T)` - Operation completed successfully
/// * `Err` - The operation failed, or `on_timeout()` when the timeout elapsed
pub async fn with_page_timeout<F, T, E>(
    operation: F,
    timeout: Duration,
    on_timeout: E,
) -> HarvestResult<T>
where
    F: Future<Output = HarvestResult<T>>,
    E: FnOnce() -> HarvestError,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout()),
    }
}
