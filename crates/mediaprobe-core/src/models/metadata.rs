use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

use super::value::MetaValue;

/// Normalized metadata returned by the parse endpoint.
///
/// All four sections are always present as keys. A section with nothing to
/// report serializes as an empty object.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct NormalizedMetadata {
    #[serde(rename = "File")]
    pub file: FileSection,
    #[serde(rename = "Video", serialize_with = "section_or_empty")]
    #[schema(value_type = Object)]
    pub video: Option<VideoSection>,
    #[serde(rename = "Audio", serialize_with = "section_or_empty")]
    #[schema(value_type = Object)]
    pub audio: Option<AudioSection>,
    #[serde(rename = "Composite", serialize_with = "section_or_empty")]
    #[schema(value_type = Object)]
    pub composite: Option<CompositeSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FileSection {
    #[serde(rename = "Filename")]
    pub filename: String,
    /// Size of the persisted upload, e.g. `"1.43 MiB"`
    #[serde(rename = "File Size")]
    pub file_size: String,
    #[serde(rename = "File Type")]
    pub file_type: MetaValue,
    #[serde(rename = "MIME Type")]
    pub mime_type: MetaValue,
    #[serde(rename = "Duration")]
    pub duration: MetaValue,
    #[serde(rename = "Avg Bitrate")]
    pub avg_bitrate: MetaValue,
    /// Only reported by track-model inspectors
    #[serde(rename = "Major Brand", skip_serializing_if = "Option::is_none", default)]
    pub major_brand: Option<MetaValue>,
    #[serde(
        rename = "Compatible Brands",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub compatible_brands: Option<Vec<String>>,
    #[serde(rename = "Create Date")]
    pub create_date: MetaValue,
    #[serde(rename = "Modify Date")]
    pub modify_date: MetaValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VideoSection {
    #[serde(rename = "Codec")]
    pub codec: MetaValue,
    #[serde(rename = "Width")]
    pub width: MetaValue,
    #[serde(rename = "Height")]
    pub height: MetaValue,
    #[serde(rename = "Frame Rate")]
    pub frame_rate: MetaValue,
    #[serde(rename = "Bit Depth")]
    pub bit_depth: MetaValue,
    #[serde(rename = "Compressor ID")]
    pub compressor_id: MetaValue,
    /// Degrees, 0 when the inspector reports none
    #[serde(rename = "Rotation")]
    pub rotation: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AudioSection {
    #[serde(rename = "Audio Format")]
    pub audio_format: MetaValue,
    #[serde(rename = "Channels")]
    pub channels: MetaValue,
    #[serde(
        rename = "Bits Per Sample",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub bits_per_sample: Option<MetaValue>,
    #[serde(rename = "Sample Rate")]
    pub sample_rate: MetaValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CompositeSection {
    #[serde(rename = "Image Size")]
    pub image_size: String,
    #[serde(rename = "Megapixels")]
    pub megapixels: String,
}

fn section_or_empty<T, S>(section: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    use serde::ser::SerializeMap;

    match section {
        Some(value) => value.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

/// Response body of the parse endpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MetadataResponse {
    pub metadata: NormalizedMetadata,
}

/// Response body of the health endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}
