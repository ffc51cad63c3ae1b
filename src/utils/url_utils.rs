//! URL utilities for listing pagination.

use url::Url;

use super::constants::PAGE_QUERY_PARAM;
use crate::harvest_engine::{HarvestError, HarvestResult};

/// Normalize and validate a listing base URL
///
/// Adds `https://` when no scheme is present and rejects anything that
/// doesn't parse as an http(s) URL.
pub fn normalize_base_url(raw: &str) -> HarvestResult<String> {
    let trimmed = raw.trim();
    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&candidate)
        .map_err(|e| HarvestError::Config(format!("Invalid base URL '{raw}': {e}")))?;

    if url.host_str().is_none() {
        return Err(HarvestError::Config(format!(
            "Invalid base URL '{raw}': no host"
        )));
    }

    Ok(url.to_string())
}

/// Build the URL of a listing page
///
/// Any `page` parameter already present on the base URL is replaced, other
/// query pairs are kept in order.
pub fn page_url(base_url: &str, page: u32) -> HarvestResult<String> {
    let mut url = Url::parse(base_url)
        .map_err(|e| HarvestError::Config(format!("Invalid base URL '{base_url}': {e}")))?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != PAGE_QUERY_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
        pairs.append_pair(PAGE_QUERY_PARAM, &page.to_string());
    }

    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_page_parameter() {
        let url = page_url("https://www.trustpilot.com/review/www.britishairways.com", 3).unwrap();
        assert_eq!(
            url,
            "https://www.trustpilot.com/review/www.britishairways.com?page=3"
        );
    }

    #[test]
    fn replaces_existing_page_parameter() {
        let url = page_url("https://example.com/reviews?sort=recent&page=9", 2).unwrap();
        assert_eq!(url, "https://example.com/reviews?sort=recent&page=2");
    }

    #[test]
    fn normalizes_missing_scheme() {
        let url = normalize_base_url("example.com/reviews").unwrap();
        assert_eq!(url, "https://example.com/reviews");
    }

    #[test]
    fn rejects_garbage_base_url() {
        assert!(matches!(
            normalize_base_url("http://"),
            Err(HarvestError::Config(_))
        ));
    }
}
