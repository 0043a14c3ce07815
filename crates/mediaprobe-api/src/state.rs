//! Application state shared by all handlers.

use mediaprobe_core::Config;
use mediaprobe_processing::MetadataExtractor;

pub struct AppState {
    pub config: Config,
    pub extractor: MetadataExtractor,
}

impl AppState {
    pub fn new(config: Config, extractor: MetadataExtractor) -> Self {
        Self { config, extractor }
    }
}
