//! Helpers for chromiumoxide `Page` calls
//!
//! Script evaluation with typed results, and diagnostics that must never fail.

use chromiumoxide::page::Page;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::harvest_engine::{HarvestError, HarvestResult};

/// Evaluate `script` and deserialize its value
pub async fn evaluate_value<T: DeserializeOwned>(page: &Page, script: &str) -> HarvestResult<T> {
    page.evaluate(script)
        .await
        .map_err(|e| HarvestError::Browser(format!("Script evaluation failed: {e}")))?
        .into_value::<T>()
        .map_err(|e| HarvestError::Browser(format!("Unexpected script result: {e}")))
}

/// Quote a CSS selector as a JavaScript string literal
pub fn js_string(value: &str) -> HarvestResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Get page URL with diagnostic fallback
///
/// Returns `"about:blank"` when the URL is unknown or the browser didn't answer.
pub async fn get_page_url_with_fallback(page: &Page) -> String {
    match page.url().await {
        Ok(Some(url)) => url,
        Ok(None) => {
            trace!("Page URL is None (page not yet navigated)");
            "about:blank".to_string()
        }
        Err(e) => {
            trace!("Failed to get page URL (browser communication error): {}", e);
            "about:blank".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_are_quoted_for_scripts() {
        assert_eq!(
            js_string("a[aria-label=\"Next\"]").unwrap(),
            r#""a[aria-label=\"Next\"]""#
        );
    }
}
