//! Inspection and normalization errors

use mediaprobe_core::AppError;

/// Failure while running a metadata source against a file.
#[derive(Debug, thiserror::Error)]
pub enum InspectionError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("inspector produced invalid output: {0}")]
    InvalidOutput(String),

    #[error("inspection timed out after {0} seconds")]
    Timeout(u64),

    #[error("{0}")]
    Library(String),

    #[error("metadata source '{0}' is not available in this build")]
    Unavailable(String),
}

/// Failure while reshaping raw inspector output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizationError {
    #[error("unrecognized inspector output: expected tracks, or streams/format")]
    UnrecognizedShape,

    #[error("frame rate '{0}' has a zero denominator")]
    ZeroDenominator(String),

    #[error("frame rate '{0}' is not a valid rational")]
    InvalidRational(String),

    #[error("{field} value '{value}' is not numeric")]
    InvalidNumber { field: &'static str, value: String },
}

impl From<InspectionError> for AppError {
    fn from(err: InspectionError) -> Self {
        AppError::MetadataExtraction(err.to_string())
    }
}

impl From<NormalizationError> for AppError {
    fn from(err: NormalizationError) -> Self {
        AppError::MetadataExtraction(err.to_string())
    }
}
