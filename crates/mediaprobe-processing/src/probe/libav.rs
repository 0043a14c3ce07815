//! In-process libav source
//!
//! Opens the file with the FFmpeg libraries through `ffmpeg-next` and reports
//! the track model. Demuxing is blocking, so it runs on the blocking pool.

use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use ffmpeg_next::{codec::context::Context as CodecContext, media::Type};
use mediaprobe_core::models::MetaValue;
use tracing::debug;

use crate::error::InspectionError;
use crate::raw::{RawTrackInfo, TrackRecord};
use crate::traits::MetadataSource;

#[derive(Debug, Default)]
pub struct LibavSource;

impl LibavSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MetadataSource for LibavSource {
    #[tracing::instrument(skip(self, path), fields(source = "libav", path = %path.display()))]
    async fn inspect(&self, path: &Path) -> Result<RawTrackInfo, InspectionError> {
        let start = Instant::now();
        let path = path.to_path_buf();

        let tracks = tokio::task::spawn_blocking(move || read_tracks(&path))
            .await
            .map_err(|e| InspectionError::Library(format!("inspection task failed: {}", e)))??;

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            tracks = tracks.len(),
            "libav finished"
        );

        Ok(RawTrackInfo::Tracks(tracks))
    }

    fn name(&self) -> &'static str {
        "libav"
    }
}

fn library_error(context: &str, error: ffmpeg_next::Error) -> InspectionError {
    InspectionError::Library(format!("{}: {}", context, error))
}

fn text(value: impl Into<String>) -> Option<MetaValue> {
    let value = value.into();
    if value.trim().is_empty() {
        None
    } else {
        Some(MetaValue::Text(value))
    }
}

fn positive(value: i64) -> Option<MetaValue> {
    (value > 0).then_some(MetaValue::Integer(value))
}

/// Render a codec tag as its four character code, e.g. `avc1`.
fn fourcc(tag: u32) -> Option<MetaValue> {
    let bytes = tag.to_le_bytes();
    if tag == 0 || !bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        return None;
    }
    text(String::from_utf8_lossy(&bytes).trim_end().to_string())
}

/// Split an ISO BMFF `compatible_brands` tag into its four character brands.
fn brands(value: &str) -> Vec<String> {
    value
        .as_bytes()
        .chunks(4)
        .map(|chunk| String::from_utf8_lossy(chunk).trim().to_string())
        .filter(|brand| !brand.is_empty())
        .collect()
}

/// Container tags that carry a modification date, most specific first.
const MODIFY_DATE_TAGS: [&str; 2] = ["modification_time", "tagged_date"];

/// The General track for a container.
///
/// `format` is the ISO BMFF major brand when the container has one, else
/// the demuxer name. `duration_us` is in `AV_TIME_BASE` units.
fn general_track<'a>(
    path: &Path,
    demuxer: &str,
    mime_types: &[&str],
    tag: impl Fn(&str) -> Option<&'a str>,
    duration_us: i64,
    bit_rate: i64,
) -> TrackRecord {
    TrackRecord {
        track_type: "General".to_string(),
        format: tag("major_brand").and_then(text).or_else(|| text(demuxer)),
        other_format: tag("compatible_brands").map(|value| MetaValue::List(brands(value))),
        file_extension: path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(text),
        internet_media_type: mime_types.first().copied().and_then(text),
        duration: positive(duration_us / 1000),
        overall_bit_rate: positive(bit_rate),
        encoded_date: tag("creation_time").and_then(text),
        tagged_date: MODIFY_DATE_TAGS.iter().find_map(|&key| tag(key)).and_then(text),
        ..Default::default()
    }
}

fn read_tracks(path: &Path) -> Result<Vec<TrackRecord>, InspectionError> {
    ffmpeg_next::init().map_err(|e| library_error("FFmpeg initialisation failed", e))?;

    let input = ffmpeg_next::format::input(path)
        .map_err(|e| library_error("Failed to open media file", e))?;

    let container_tags = input.metadata();
    let format = input.format();
    let mut tracks = vec![general_track(
        path,
        format.name(),
        &format.mime_types(),
        |key| container_tags.get(key),
        input.duration(),
        input.bit_rate(),
    )];

    for stream in input.streams() {
        let parameters = stream.parameters();
        let medium = parameters.medium();
        if medium != Type::Video && medium != Type::Audio {
            continue;
        }

        let index = stream.index();
        // bits_per_raw_sample and codec_tag have no safe accessors.
        let raw_parameters = unsafe { *parameters.as_ptr() };
        let bit_depth = positive(raw_parameters.bits_per_raw_sample as i64);
        let codec_id = fourcc(raw_parameters.codec_tag);

        let decoder = CodecContext::from_parameters(parameters)
            .map_err(|e| library_error(&format!("Failed to read codec parameters for stream {}", index), e))?
            .decoder();

        if medium == Type::Video {
            let video = decoder
                .video()
                .map_err(|e| library_error(&format!("Failed to create video decoder for stream {}", index), e))?;

            let rate = stream.avg_frame_rate();
            let frame_rate = (rate.denominator() != 0)
                .then(|| MetaValue::Number(rate.numerator() as f64 / rate.denominator() as f64));

            tracks.push(TrackRecord {
                track_type: "Video".to_string(),
                format: video.codec().map(|codec| codec.name().to_string()).and_then(text),
                width: Some(MetaValue::Integer(video.width() as i64)),
                height: Some(MetaValue::Integer(video.height() as i64)),
                frame_rate,
                bit_depth,
                codec_id,
                rotation: stream.metadata().get("rotate").and_then(text),
                ..Default::default()
            });
        } else {
            let audio = decoder
                .audio()
                .map_err(|e| library_error(&format!("Failed to create audio decoder for stream {}", index), e))?;

            tracks.push(TrackRecord {
                track_type: "Audio".to_string(),
                format: audio.codec().map(|codec| codec.name().to_string()).and_then(text),
                channel_s: Some(MetaValue::Integer(audio.channels() as i64)),
                sampling_rate: positive(audio.rate() as i64),
                bit_depth,
                codec_id,
                ..Default::default()
            });
        }
    }

    Ok(tracks)
}
