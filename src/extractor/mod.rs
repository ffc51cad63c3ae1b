//! Record extraction from revealed listing pages
//!
//! Turns a rendered HTML document into `ReviewRecord`s. Each field is read
//! through its fallback chain (see [`strategy`]); a fault in one record
//! block skips that record only.

pub mod record;
pub mod strategy;

pub use record::{LONG_DATE_FORMAT, ReviewDate, ReviewRecord, StarRating};
pub use strategy::{CompiledChain, Source, Strategy, Transform};

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::harvest_engine::{HarvestError, HarvestResult};
use crate::utils::{NO_CONTENT, NOT_SPECIFIED, RECORD_MARKER_SELECTOR, UNKNOWN_AUTHOR};
use strategy::{
    AUTHOR_STRATEGIES, CONTENT_STRATEGIES, DATE_STRATEGIES, PLACE_STRATEGIES, RATING_STRATEGIES,
    VERIFIED_STRATEGIES, parse_selector,
};

/// Records pulled from one page plus what had to be skipped
#[derive(Debug, Default)]
pub struct PageExtraction {
    pub records: Vec<ReviewRecord>,
    /// Block position and the fault of every skipped record
    pub skipped: Vec<(usize, HarvestError)>,
}

/// Parses rendered listing pages into review records
#[derive(Debug)]
pub struct RecordExtractor {
    marker: Selector,
    date: CompiledChain,
    author: CompiledChain,
    place: CompiledChain,
    content: CompiledChain,
    rating: CompiledChain,
    verified: CompiledChain,
}

impl RecordExtractor {
    /// Extractor using the default record marker
    pub fn new() -> HarvestResult<Self> {
        Self::with_marker(RECORD_MARKER_SELECTOR)
    }

    /// Extractor using a custom record marker selector
    pub fn with_marker(marker: &str) -> HarvestResult<Self> {
        Ok(Self {
            marker: parse_selector(marker)?,
            date: CompiledChain::compile("date", DATE_STRATEGIES)?,
            author: CompiledChain::compile("author", AUTHOR_STRATEGIES)?,
            place: CompiledChain::compile("place", PLACE_STRATEGIES)?,
            content: CompiledChain::compile("content", CONTENT_STRATEGIES)?,
            rating: CompiledChain::compile("rating", RATING_STRATEGIES)?,
            verified: CompiledChain::compile("verified", VERIFIED_STRATEGIES)?,
        })
    }

    /// Extract every record block of `html` in document order
    ///
    /// # Errors
    /// `NoRecordsOnPage` when the document has no record marker at all.
    /// Faults inside individual blocks are returned in `skipped`, never as `Err`.
    pub fn extract(&self, html: &str) -> HarvestResult<PageExtraction> {
        let document = Html::parse_document(html);
        let blocks: Vec<ElementRef<'_>> = document.select(&self.marker).collect();

        if blocks.is_empty() {
            return Err(HarvestError::NoRecordsOnPage);
        }

        debug!("Found {} record blocks", blocks.len());

        let mut page = PageExtraction::default();
        for (position, block) in blocks.into_iter().enumerate() {
            match self.extract_record(block) {
                Ok(record) => page.records.push(record),
                Err(e) => {
                    warn!("Skipping record {} on page: {}", position + 1, e);
                    page.skipped.push((position, e));
                }
            }
        }

        Ok(page)
    }

    /// Extract a single record block
    pub fn extract_record(&self, block: ElementRef<'_>) -> HarvestResult<ReviewRecord> {
        let date = self
            .date
            .first_value(block)
            .map_or(ReviewDate::NotSpecified, |raw| ReviewDate::from_label(&raw));

        let author = self
            .author
            .first_value(block)
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

        let place = self
            .place
            .first_value(block)
            .unwrap_or_else(|| NOT_SPECIFIED.to_string());

        let content = self
            .content
            .first_value(block)
            .unwrap_or_else(|| NO_CONTENT.to_string());

        let rating = match self.rating.first_value(block) {
            Some(raw) => decode_rating(&raw)?,
            None => StarRating::default(),
        };

        let verified = self.verified.first_value(block).is_some();

        Ok(ReviewRecord::new(date, author, place, content, rating, verified))
    }
}

/// Decode the star count embedded in a rating asset
///
/// Text that isn't an integer decodes to 0; an integer outside `0..=5` is a
/// malformed asset and rejects the record, however many digits it has.
pub fn decode_rating(raw: &str) -> HarvestResult<StarRating> {
    let raw = raw.trim();
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(StarRating::default());
    }
    let value = raw
        .parse::<i64>()
        .map_err(|_| HarvestError::RecordParse(format!("star rating {raw} out of range")))?;
    u32::try_from(value)
        .map_err(|_| HarvestError::RecordParse(format!("negative star rating {value}")))
        .and_then(StarRating::try_from)
}
