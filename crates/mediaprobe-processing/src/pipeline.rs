//! Extraction pipeline: persist → inspect → normalize.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use mediaprobe_core::models::NormalizedMetadata;
use mediaprobe_core::AppError;
use tracing::{debug, info};

use crate::error::InspectionError;
use crate::normalize::normalize;
use crate::traits::MetadataSource;
use crate::upload::{display_filename, TempUpload};

/// Runs one metadata source over uploaded bytes.
#[derive(Clone)]
pub struct MetadataExtractor {
    source: Arc<dyn MetadataSource>,
    timeout: Duration,
    temp_dir: Option<PathBuf>,
}

impl MetadataExtractor {
    pub fn new(source: Arc<dyn MetadataSource>, timeout: Duration) -> Self {
        Self {
            source,
            timeout,
            temp_dir: None,
        }
    }

    /// Persist uploads under `dir` instead of the system temp dir.
    pub fn with_temp_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.temp_dir = dir;
        self
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Extract normalized metadata from an uploaded file.
    ///
    /// The temp file is removed before this returns, whatever the outcome.
    #[tracing::instrument(skip(self, data), fields(source = self.source.name(), size = data.len()))]
    pub async fn extract(
        &self,
        filename: &str,
        data: &[u8],
    ) -> Result<NormalizedMetadata, AppError> {
        let start = Instant::now();

        let upload = TempUpload::persist(data, filename, self.temp_dir.as_deref()).await?;
        debug!(path = %upload.path().display(), bytes = upload.len(), "Upload persisted");

        let raw = tokio::time::timeout(self.timeout, self.source.inspect(upload.path()))
            .await
            .map_err(|_| InspectionError::Timeout(self.timeout.as_secs()))??;

        let metadata = normalize(&raw, &display_filename(filename), upload.len())?;

        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            has_video = metadata.video.is_some(),
            has_audio = metadata.audio.is_some(),
            "Metadata extracted"
        );

        Ok(metadata)
    }
}
