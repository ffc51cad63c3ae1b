use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use super::{RecordSink, ensure_parent_dir};
use crate::extractor::ReviewRecord;
use crate::harvest_engine::HarvestResult;

/// Writes records as a pretty-printed JSON array
#[derive(Debug, Clone)]
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for JsonSink {
    fn persist(&mut self, records: &[ReviewRecord]) -> HarvestResult<usize> {
        ensure_parent_dir(&self.path)?;

        let mut out = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut out, records)?;
        out.write_all(b"\n")?;
        out.flush()?;

        info!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(records.len())
    }
}
