//! Harvest accumulator
//!
//! Owns every record collected in a run plus the page cursor. It lives
//! outside the controller so a cancelled run still has its records to flush.

use super::harvest_types::{HarvestOutcome, PageReport, StopReason};
use crate::extractor::ReviewRecord;

/// Records and page bookkeeping for one run
#[derive(Debug, Default)]
pub struct HarvestSession {
    records: Vec<ReviewRecord>,
    /// Last page index handed out, 0 before the first page
    cursor: u32,
    pages: Vec<PageReport>,
}

impl HarvestSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next page index
    ///
    /// Indices start at 1 and only ever grow by one, so a page can never be
    /// requested twice in a run.
    pub fn advance(&mut self) -> u32 {
        self.cursor = self.cursor.saturating_add(1);
        self.cursor
    }

    /// Last page index handed out
    #[must_use]
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Append a page's records in extraction order, returning how many were added
    pub fn append_page(&mut self, records: Vec<ReviewRecord>) -> usize {
        let added = records.len();
        self.records.extend(records);
        added
    }

    pub fn record_page(&mut self, report: PageReport) {
        self.pages.push(report);
    }

    #[must_use]
    pub fn records(&self) -> &[ReviewRecord] {
        &self.records
    }

    #[must_use]
    pub fn pages(&self) -> &[PageReport] {
        &self.pages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Summarize the run so far under the given stop reason
    #[must_use]
    pub fn outcome(&self, reason: StopReason) -> HarvestOutcome {
        HarvestOutcome {
            reason,
            pages: self.pages.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{ReviewDate, StarRating};

    fn record(author: &str) -> ReviewRecord {
        ReviewRecord::new(
            ReviewDate::NotSpecified,
            author.to_string(),
            "GB".to_string(),
            "fine".to_string(),
            StarRating::default(),
            false,
        )
    }

    #[test]
    fn cursor_starts_at_one_and_increments() {
        let mut session = HarvestSession::new();
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.advance(), 1);
        assert_eq!(session.advance(), 2);
        assert_eq!(session.cursor(), 2);
    }

    #[test]
    fn appends_preserve_order_and_duplicates() {
        let mut session = HarvestSession::new();
        assert_eq!(session.append_page(vec![record("a"), record("b")]), 2);
        assert_eq!(session.append_page(vec![record("a")]), 1);
        assert_eq!(session.append_page(Vec::new()), 0);

        let authors: Vec<_> = session.records().iter().map(ReviewRecord::author).collect();
        assert_eq!(authors, ["a", "b", "a"]);
        assert_eq!(session.len(), 3);
    }
}
