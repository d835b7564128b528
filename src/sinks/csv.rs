//! CSV flat-file sink.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::error::{SinkError, SinkResult};
use crate::traits::sink::RecordSink;
use crate::types::{config::CrawlConfig, record::VenueRecord};

/// Writes the accumulated records to a CSV file, headers from the record
/// struct, overwriting any prior file at the path.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Create a sink writing to the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a sink from a crawl config.
    pub fn from_config(config: &CrawlConfig) -> Self {
        Self::new(&config.output_path)
    }

    /// The output path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSink for CsvSink {
    async fn reset(&self) -> SinkResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                info!(path = %self.path.display(), "removed previous output file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SinkError::Io(e)),
        }
    }

    async fn write(&self, records: &[VenueRecord]) -> SinkResult<()> {
        let mut writer = csv::Writer::from_path(&self.path)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush().map_err(SinkError::Io)?;

        info!(
            path = %self.path.display(),
            count = records.len(),
            "wrote records"
        );
        Ok(())
    }
}
