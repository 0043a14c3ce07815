//! Metadata source implementations

mod ffprobe;
#[cfg(feature = "libav")]
mod libav;

use std::sync::Arc;

use mediaprobe_core::{Config, MetadataSourceKind};

pub use ffprobe::FfprobeSource;
#[cfg(feature = "libav")]
pub use libav::LibavSource;

use crate::error::InspectionError;
use crate::traits::MetadataSource;

/// Whether the in-process libav source was compiled in.
pub const LIBAV_AVAILABLE: bool = cfg!(feature = "libav");

/// Build the metadata source selected by the configuration.
pub fn source_from_config(config: &Config) -> Result<Arc<dyn MetadataSource>, InspectionError> {
    match config.metadata_source() {
        MetadataSourceKind::Ffprobe => Ok(Arc::new(FfprobeSource::new(
            config.ffprobe_path().to_string(),
        ))),
        #[cfg(feature = "libav")]
        MetadataSourceKind::Libav => Ok(Arc::new(LibavSource::new())),
        #[cfg(not(feature = "libav"))]
        MetadataSourceKind::Libav => Err(InspectionError::Unavailable(
            MetadataSourceKind::Libav.to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediaprobe_core::ServiceConfig;

    fn config(source: &str) -> Config {
        let service = ServiceConfig::from_lookup(|key| match key {
            "API_KEY" => Some("secret".to_string()),
            "METADATA_SOURCE" => Some(source.to_string()),
            "FFPROBE_PATH" => Some("/opt/ffmpeg/bin/ffprobe".to_string()),
            _ => None,
        })
        .unwrap();
        Config(Box::new(service))
    }

    #[test]
    fn test_ffprobe_source_selected() {
        let source = source_from_config(&config("ffprobe")).unwrap();
        assert_eq!(source.name(), "ffprobe");
    }

    #[test]
    fn test_libav_source_follows_feature() {
        let result = source_from_config(&config("libav"));
        if LIBAV_AVAILABLE {
            assert_eq!(result.map(|s| s.name()).ok(), Some("libav"));
        } else {
            assert!(matches!(result, Err(InspectionError::Unavailable(_))));
        }
    }
}
