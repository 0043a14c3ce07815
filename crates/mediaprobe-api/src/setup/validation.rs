//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use std::path::Path;

use anyhow::Result;
use mediaprobe_core::{Config, MetadataSourceKind};
use mediaprobe_processing::LIBAV_AVAILABLE;

/// Validate critical configuration values
///
/// Fails fast on anything that would make every request fail or weaken
/// security in production.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    // Validate CORS configuration in production
    if config.is_production() && config.cors_origins().contains(&"*".to_string()) {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production - this is a security risk. \
            Please set specific allowed origins via CORS_ORIGINS environment variable."
        ));
    }

    match config.metadata_source() {
        MetadataSourceKind::Libav if !LIBAV_AVAILABLE => {
            return Err(anyhow::anyhow!(
                "METADATA_SOURCE=libav requires a build with the `libav` feature"
            ));
        }
        MetadataSourceKind::Ffprobe => {
            let ffprobe = Path::new(config.ffprobe_path());
            // Bare names are resolved through PATH at spawn time.
            if ffprobe.components().count() > 1 && !ffprobe.is_file() {
                tracing::warn!(
                    ffprobe_path = %config.ffprobe_path(),
                    "FFPROBE_PATH does not point to a file - every inspection will fail"
                );
            }
        }
        _ => {}
    }

    if config.api_key().len() < 16 {
        tracing::warn!("API_KEY is shorter than 16 characters");
    }

    Ok(())
}
