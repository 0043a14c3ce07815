//! Raw inspector output
//!
//! Inspectors report metadata in one of two shapes. Track-model inspectors
//! (MediaInfo style, and the in-process libav source) emit a flat list of
//! typed track records. Stream-model inspectors (`ffprobe`) emit a `format`
//! section plus a list of streams.
//!
//! Every field is optional. Scalars are kept as [`MetaValue`] so a number
//! reported as a string (or vice versa) still deserializes.

use std::collections::BTreeMap;

use mediaprobe_core::models::MetaValue;
use serde::Deserialize;

use crate::error::NormalizationError;

/// Raw output of a metadata source, in one of the two supported shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTrackInfo {
    /// Track model: one record per General/Video/Audio track
    Tracks(Vec<TrackRecord>),
    /// Stream model: container `format` plus `streams`
    Streams(ProbeDocument),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    General,
    Video,
    Audio,
    Other,
}

/// One track record of the track model.
///
/// Field names follow MediaInfo's JSON export.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackRecord {
    pub track_type: String,
    pub format: Option<MetaValue>,
    pub other_format: Option<MetaValue>,
    pub file_extension: Option<MetaValue>,
    pub internet_media_type: Option<MetaValue>,
    /// Milliseconds
    pub duration: Option<MetaValue>,
    /// Bits per second
    pub overall_bit_rate: Option<MetaValue>,
    pub encoded_date: Option<MetaValue>,
    pub tagged_date: Option<MetaValue>,
    pub width: Option<MetaValue>,
    pub height: Option<MetaValue>,
    pub frame_rate: Option<MetaValue>,
    pub bit_depth: Option<MetaValue>,
    pub codec_id: Option<MetaValue>,
    pub rotation: Option<MetaValue>,
    pub channel_s: Option<MetaValue>,
    pub sampling_rate: Option<MetaValue>,
}

impl TrackRecord {
    pub fn kind(&self) -> TrackKind {
        match self.track_type.as_str() {
            "General" => TrackKind::General,
            "Video" => TrackKind::Video,
            "Audio" => TrackKind::Audio,
            _ => TrackKind::Other,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TrackDocument {
    tracks: Vec<TrackRecord>,
}

/// `ffprobe -show_format -show_streams` output.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProbeDocument {
    #[serde(default)]
    pub format: Option<ProbeFormat>,
    #[serde(default)]
    pub streams: Option<Vec<ProbeStream>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProbeFormat {
    pub format_name: Option<String>,
    pub mime_type: Option<String>,
    /// Decimal seconds, e.g. `"10.000000"`
    pub duration: Option<String>,
    /// Bits per second as a string
    pub bit_rate: Option<String>,
    pub tags: BTreeMap<String, MetaValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProbeStream {
    pub codec_type: Option<String>,
    pub codec_name: Option<String>,
    pub codec_tag_string: Option<String>,
    pub width: Option<MetaValue>,
    pub height: Option<MetaValue>,
    /// Rational string, e.g. `"30000/1001"`
    pub r_frame_rate: Option<String>,
    pub bits_per_raw_sample: Option<MetaValue>,
    pub channels: Option<MetaValue>,
    pub sample_rate: Option<MetaValue>,
    pub bits_per_sample: Option<MetaValue>,
    pub tags: BTreeMap<String, MetaValue>,
    pub side_data_list: Vec<ProbeSideData>,
}

/// Stream side data. Only the display matrix rotation is read.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProbeSideData {
    pub side_data_type: Option<String>,
    pub rotation: Option<MetaValue>,
}

impl ProbeFormat {
    pub fn tag(&self, key: &str) -> Option<&MetaValue> {
        self.tags.get(key)
    }
}

impl ProbeStream {
    pub fn is(&self, codec_type: &str) -> bool {
        self.codec_type.as_deref() == Some(codec_type)
    }

    /// Rotation from the `rotate` tag, else from display matrix side data.
    pub fn rotation(&self) -> Option<&MetaValue> {
        self.tags
            .get("rotate")
            .or_else(|| self.side_data_list.iter().find_map(|sd| sd.rotation.as_ref()))
    }
}

impl RawTrackInfo {
    /// Classify an arbitrary JSON document as one of the two shapes.
    pub fn from_json(value: serde_json::Value) -> Result<Self, NormalizationError> {
        let (has_tracks, has_streams) = match value.as_object() {
            Some(object) => (
                object.contains_key("tracks"),
                object.contains_key("streams") || object.contains_key("format"),
            ),
            None => return Err(NormalizationError::UnrecognizedShape),
        };

        if has_tracks {
            let document: TrackDocument = serde_json::from_value(value)
                .map_err(|_| NormalizationError::UnrecognizedShape)?;
            return Ok(RawTrackInfo::Tracks(document.tracks));
        }

        if has_streams {
            let document: ProbeDocument = serde_json::from_value(value)
                .map_err(|_| NormalizationError::UnrecognizedShape)?;
            return Ok(RawTrackInfo::Streams(document));
        }

        Err(NormalizationError::UnrecognizedShape)
    }
}
