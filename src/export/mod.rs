//! Persisting harvested records
//!
//! The output format follows the export path's extension: `.json` writes a
//! JSON array, anything else a CSV table with a header row.

mod csv_sink;
mod json_sink;

pub use csv_sink::{CSV_COLUMNS, CsvSink};
pub use json_sink::JsonSink;

use std::fs;
use std::path::Path;

use crate::extractor::ReviewRecord;
use crate::harvest_engine::HarvestResult;

/// Destination for the records of a run
///
/// `persist` is called once, after the browser is released, with every
/// record in collection order. It must write a valid (possibly empty)
/// export even when there are no records.
pub trait RecordSink: Send {
    /// Write all records, returning how many were written
    fn persist(&mut self, records: &[ReviewRecord]) -> HarvestResult<usize>;
}

/// In-memory sink, handy for embedding and tests
impl RecordSink for Vec<ReviewRecord> {
    fn persist(&mut self, records: &[ReviewRecord]) -> HarvestResult<usize> {
        self.extend_from_slice(records);
        Ok(records.len())
    }
}

/// Pick the sink matching the extension of `path`
#[must_use]
pub fn sink_for_path(path: &Path) -> Box<dyn RecordSink> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Box::new(JsonSink::new(path))
    } else {
        Box::new(CsvSink::new(path))
    }
}

impl<S: RecordSink + ?Sized> RecordSink for Box<S> {
    fn persist(&mut self, records: &[ReviewRecord]) -> HarvestResult<usize> {
        (**self).persist(records)
    }
}

/// Create the parent directory of `path` if it has one
pub(crate) fn ensure_parent_dir(path: &Path) -> HarvestResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
