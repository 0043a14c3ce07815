//! Mediaprobe Processing Library
//!
//! Inspectors, raw metadata shapes, the normalizer and the extraction
//! pipeline that ties them to a temporary upload.

pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod probe;
pub mod raw;
pub mod traits;
pub mod upload;

pub use error::{InspectionError, NormalizationError};
pub use normalize::{format_file_size, normalize, parse_rational};
pub use pipeline::MetadataExtractor;
pub use probe::{source_from_config, FfprobeSource, LIBAV_AVAILABLE};
#[cfg(feature = "libav")]
pub use probe::LibavSource;
pub use raw::{ProbeDocument, RawTrackInfo, TrackRecord};
pub use traits::MetadataSource;
pub use upload::TempUpload;
