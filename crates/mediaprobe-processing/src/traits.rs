//! Core traits for metadata extraction
//!
//! A metadata source inspects a file on disk and reports raw metadata in one
//! of the shapes understood by [`crate::normalize`].

use std::path::Path;

use async_trait::async_trait;

use crate::error::InspectionError;
use crate::raw::RawTrackInfo;

/// Media inspector - reads container and stream attributes from a file
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Inspect the file at `path`
    async fn inspect(&self, path: &Path) -> Result<RawTrackInfo, InspectionError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}
