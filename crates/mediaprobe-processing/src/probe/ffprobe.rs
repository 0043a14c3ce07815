//! `ffprobe` subprocess source

use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error};

use crate::error::InspectionError;
use crate::raw::{ProbeDocument, RawTrackInfo};
use crate::traits::MetadataSource;

/// Runs `ffprobe` and reports the stream model.
///
/// The child is killed if the inspection future is dropped.
pub struct FfprobeSource {
    ffprobe_path: String,
}

impl FfprobeSource {
    pub fn new(ffprobe_path: String) -> Self {
        Self { ffprobe_path }
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.ffprobe_path
    }
}

#[async_trait]
impl MetadataSource for FfprobeSource {
    #[tracing::instrument(skip(self, path), fields(source = "ffprobe", path = %path.display()))]
    async fn inspect(&self, path: &Path) -> Result<RawTrackInfo, InspectionError> {
        let start = Instant::now();

        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| InspectionError::Spawn {
                program: self.ffprobe_path.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!(status = %output.status, stderr = %stderr, "ffprobe failed");
            return Err(InspectionError::Failed {
                program: self.ffprobe_path.clone(),
                status: output.status.to_string(),
                stderr,
            });
        }

        let document: ProbeDocument = serde_json::from_slice(&output.stdout)
            .map_err(|e| InspectionError::InvalidOutput(format!("Failed to parse ffprobe output: {}", e)))?;

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            streams = document.streams.as_ref().map_or(0, Vec::len),
            "ffprobe finished"
        );

        Ok(RawTrackInfo::Streams(document))
    }

    fn name(&self) -> &'static str {
        "ffprobe"
    }
}
