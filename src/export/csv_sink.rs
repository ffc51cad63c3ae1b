use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{RecordSink, ensure_parent_dir};
use crate::extractor::ReviewRecord;
use crate::harvest_engine::HarvestResult;

/// Header row of the CSV export, in column order
pub const CSV_COLUMNS: [&str; 6] = [
    "date",
    "author",
    "place",
    "content",
    "overall_rating",
    "verified",
];

/// Writes records as a CSV table, truncating any previous file
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for CsvSink {
    fn persist(&mut self, records: &[ReviewRecord]) -> HarvestResult<usize> {
        ensure_parent_dir(&self.path)?;

        // Header written by hand so an empty harvest still yields a valid table
        let file = BufWriter::new(File::create(&self.path)?);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        writer.write_record(CSV_COLUMNS)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        info!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(records.len())
    }
}
