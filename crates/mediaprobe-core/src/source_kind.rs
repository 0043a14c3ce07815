use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Metadata source types
///
/// Selects which inspector adapter a deployment uses. Exactly one is active
/// per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataSourceKind {
    /// `ffprobe` subprocess producing the stream-model JSON
    Ffprobe,
    /// In-process libav bindings producing track records
    Libav,
}

impl FromStr for MetadataSourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ffprobe" => Ok(MetadataSourceKind::Ffprobe),
            "libav" | "ffmpeg" => Ok(MetadataSourceKind::Libav),
            _ => Err(anyhow::anyhow!("Invalid metadata source: {}", s)),
        }
    }
}

impl Display for MetadataSourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MetadataSourceKind::Ffprobe => write!(f, "ffprobe"),
            MetadataSourceKind::Libav => write!(f, "libav"),
        }
    }
}
