//! Metadata normalization
//!
//! Reshapes raw inspector output into the four-section [`NormalizedMetadata`]
//! document. Pure and synchronous; never touches the filesystem.
//!
//! The two raw shapes are not unit-compatible and are mapped separately:
//!
//! | Field       | Track model                 | Stream model               |
//! |-------------|-----------------------------|----------------------------|
//! | Duration    | ms, integer-divided to `"<n> s"` | decimal seconds, raw  |
//! | Avg Bitrate | bits/s to `"<x.x> kbps"`    | raw bits/s string          |
//! | Frame Rate  | numeric rate as reported    | evaluated `"<num>/<den>"`  |
//!
//! Missing scalars become `"N/A"`. In the track model zero durations and bit
//! rates count as missing; the stream model passes whatever string ffprobe
//! reported. Rotation is always an integer number of degrees, default 0.

use mediaprobe_core::models::{
    AudioSection, CompositeSection, FileSection, MetaValue, NormalizedMetadata, VideoSection,
    NOT_AVAILABLE,
};

use crate::error::NormalizationError;
use crate::raw::{ProbeDocument, ProbeFormat, ProbeStream, RawTrackInfo, TrackKind, TrackRecord};

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Normalize raw inspector output for an upload of `file_size_bytes` bytes.
///
/// `file_size_bytes` must be the length of the persisted upload; any size the
/// inspector reports is ignored.
pub fn normalize(
    raw: &RawTrackInfo,
    filename: &str,
    file_size_bytes: u64,
) -> Result<NormalizedMetadata, NormalizationError> {
    let file_size = format_file_size(file_size_bytes);

    let (file, video, audio) = match raw {
        RawTrackInfo::Tracks(tracks) => normalize_tracks(tracks, filename, file_size)?,
        RawTrackInfo::Streams(document) => normalize_streams(document, filename, file_size)?,
    };

    let composite = video.as_ref().map(composite_for);

    Ok(NormalizedMetadata {
        file,
        video,
        audio,
        composite,
    })
}

/// Format a byte count as mebibytes with two decimals.
pub fn format_file_size(bytes: u64) -> String {
    format!("{:.2} MiB", bytes as f64 / BYTES_PER_MIB)
}

/// Evaluate a `"<num>/<den>"` rational.
///
/// Both halves must be plain integers. A zero denominator is an error, not
/// a NaN or infinity.
pub fn parse_rational(value: &str) -> Result<f64, NormalizationError> {
    let invalid = || NormalizationError::InvalidRational(value.to_string());

    let (numerator, denominator) = value.split_once('/').ok_or_else(invalid)?;
    let numerator: i64 = numerator.trim().parse().map_err(|_| invalid())?;
    let denominator: i64 = denominator.trim().parse().map_err(|_| invalid())?;

    if denominator == 0 {
        return Err(NormalizationError::ZeroDenominator(value.to_string()));
    }

    Ok(numerator as f64 / denominator as f64)
}

type Sections = (FileSection, Option<VideoSection>, Option<AudioSection>);

fn normalize_tracks(
    tracks: &[TrackRecord],
    filename: &str,
    file_size: String,
) -> Result<Sections, NormalizationError> {
    if tracks.is_empty() {
        return Err(NormalizationError::UnrecognizedShape);
    }

    let first_of = |kind: TrackKind| tracks.iter().find(|track| track.kind() == kind);

    let file = match first_of(TrackKind::General) {
        Some(general) => FileSection {
            filename: filename.to_string(),
            file_size,
            file_type: match text(general.file_extension.as_ref()) {
                MetaValue::Text(ext) if ext != NOT_AVAILABLE => MetaValue::Text(ext.to_uppercase()),
                other => other,
            },
            mime_type: text(general.internet_media_type.as_ref()),
            duration: match positive_number("Duration", general.duration.as_ref())? {
                Some(ms) => MetaValue::Text(format!("{} s", (ms / 1000.0).trunc() as i64)),
                None => MetaValue::na(),
            },
            avg_bitrate: match positive_number("Avg Bitrate", general.overall_bit_rate.as_ref())? {
                Some(bps) => MetaValue::Text(format!("{:.1} kbps", bps / 1000.0)),
                None => MetaValue::na(),
            },
            major_brand: Some(text(general.format.as_ref())),
            compatible_brands: Some(brand_list(general.other_format.as_ref())),
            create_date: text(general.encoded_date.as_ref()),
            modify_date: text(general.tagged_date.as_ref()),
        },
        None => empty_file_section(filename, file_size),
    };

    let video = first_of(TrackKind::Video)
        .map(|track| -> Result<VideoSection, NormalizationError> {
            Ok(VideoSection {
                codec: text(track.format.as_ref()),
                width: integer_or_text(track.width.as_ref()),
                height: integer_or_text(track.height.as_ref()),
                frame_rate: match track.frame_rate.as_ref() {
                    Some(rate) if !is_blank(rate) => numeric("Frame Rate", rate)?,
                    _ => MetaValue::na(),
                },
                bit_depth: text(track.bit_depth.as_ref()),
                compressor_id: text(track.codec_id.as_ref()),
                rotation: rotation_degrees(track.rotation.as_ref())?,
            })
        })
        .transpose()?;

    let audio = first_of(TrackKind::Audio).map(|track| AudioSection {
        audio_format: text(track.format.as_ref()),
        channels: integer_or_text(track.channel_s.as_ref()),
        bits_per_sample: Some(text(track.bit_depth.as_ref())),
        sample_rate: integer_or_text(track.sampling_rate.as_ref()),
    });

    Ok((file, video, audio))
}

fn normalize_streams(
    document: &ProbeDocument,
    filename: &str,
    file_size: String,
) -> Result<Sections, NormalizationError> {
    if document.format.is_none() && document.streams.is_none() {
        return Err(NormalizationError::UnrecognizedShape);
    }

    let no_format = ProbeFormat::default();
    let format = document.format.as_ref().unwrap_or(&no_format);
    let streams = document.streams.as_deref().unwrap_or_default();

    let file = FileSection {
        filename: filename.to_string(),
        file_size,
        file_type: MetaValue::text_or_na(format.format_name.as_deref()),
        mime_type: MetaValue::text_or_na(format.mime_type.as_deref()),
        duration: MetaValue::text_or_na(format.duration.as_deref()),
        avg_bitrate: MetaValue::text_or_na(format.bit_rate.as_deref()),
        major_brand: None,
        compatible_brands: None,
        create_date: text(format.tag("creation_time")),
        modify_date: text(format.tag("modification_time")),
    };

    let video = streams
        .iter()
        .find(|stream| stream.is("video"))
        .map(video_from_stream)
        .transpose()?;

    let audio = streams
        .iter()
        .find(|stream| stream.is("audio"))
        .map(|stream| AudioSection {
            audio_format: MetaValue::text_or_na(stream.codec_name.as_deref()),
            channels: integer_or_text(stream.channels.as_ref()),
            bits_per_sample: [&stream.bits_per_sample, &stream.bits_per_raw_sample]
                .into_iter()
                .flatten()
                .find(|bits| bits.as_f64().is_some_and(|n| n > 0.0))
                .map(|bits| integer_or_text(Some(bits))),
            sample_rate: integer_or_text(stream.sample_rate.as_ref()),
        });

    Ok((file, video, audio))
}

fn video_from_stream(stream: &ProbeStream) -> Result<VideoSection, NormalizationError> {
    let frame_rate = match stream.r_frame_rate.as_deref() {
        Some(rate) if rate.contains('/') => MetaValue::Number(parse_rational(rate)?),
        _ => MetaValue::na(),
    };

    Ok(VideoSection {
        codec: MetaValue::text_or_na(stream.codec_name.as_deref()),
        width: integer_or_text(stream.width.as_ref()),
        height: integer_or_text(stream.height.as_ref()),
        frame_rate,
        bit_depth: match stream.bits_per_raw_sample.as_ref() {
            Some(bits) => integer_or_text(Some(bits)),
            None => MetaValue::na(),
        },
        compressor_id: MetaValue::text_or_na(stream.codec_tag_string.as_deref()),
        rotation: rotation_degrees(stream.rotation())?,
    })
}

fn composite_for(video: &VideoSection) -> CompositeSection {
    let megapixels = match (positive(&video.width), positive(&video.height)) {
        (Some(width), Some(height)) => format!("{:.3}", width * height / 1e6),
        _ => NOT_AVAILABLE.to_string(),
    };

    CompositeSection {
        image_size: format!("{}x{}", video.width, video.height),
        megapixels,
    }
}

fn empty_file_section(filename: &str, file_size: String) -> FileSection {
    FileSection {
        filename: filename.to_string(),
        file_size,
        file_type: MetaValue::na(),
        mime_type: MetaValue::na(),
        duration: MetaValue::na(),
        avg_bitrate: MetaValue::na(),
        major_brand: None,
        compatible_brands: None,
        create_date: MetaValue::na(),
        modify_date: MetaValue::na(),
    }
}

fn is_blank(value: &MetaValue) -> bool {
    matches!(value, MetaValue::Text(s) if s.trim().is_empty())
}

fn positive(value: &MetaValue) -> Option<f64> {
    value.as_f64().filter(|n| *n > 0.0)
}

/// Pass a value through, or `"N/A"` when absent or blank.
fn text(value: Option<&MetaValue>) -> MetaValue {
    match value {
        Some(MetaValue::Text(s)) => MetaValue::text_or_na(Some(s)),
        Some(other) => other.clone(),
        None => MetaValue::na(),
    }
}

/// Integers stay integers and numeric strings become integers. Anything
/// else is passed through untouched.
fn integer_or_text(value: Option<&MetaValue>) -> MetaValue {
    let Some(value) = value else {
        return MetaValue::na();
    };

    match value {
        MetaValue::Integer(_) => value.clone(),
        MetaValue::Number(n) if n.fract() == 0.0 => MetaValue::Integer(*n as i64),
        MetaValue::Text(s) => match s.trim().parse::<i64>() {
            Ok(n) => MetaValue::Integer(n),
            Err(_) => text(Some(value)),
        },
        _ => value.clone(),
    }
}

fn numeric(field: &'static str, value: &MetaValue) -> Result<MetaValue, NormalizationError> {
    match value {
        MetaValue::Integer(_) | MetaValue::Number(_) => Ok(value.clone()),
        _ => value
            .as_f64()
            .map(MetaValue::Number)
            .ok_or_else(|| invalid_number(field, value)),
    }
}

/// Numeric value of an optional field. Absent, blank and zero are `None`.
fn positive_number(
    field: &'static str,
    value: Option<&MetaValue>,
) -> Result<Option<f64>, NormalizationError> {
    match value {
        None => Ok(None),
        Some(v) if is_blank(v) => Ok(None),
        Some(v) => v
            .as_f64()
            .map(|n| (n > 0.0).then_some(n))
            .ok_or_else(|| invalid_number(field, v)),
    }
}

fn rotation_degrees(value: Option<&MetaValue>) -> Result<i64, NormalizationError> {
    match value {
        None => Ok(0),
        Some(v) if is_blank(v) => Ok(0),
        Some(v) => v
            .as_f64()
            .map(|degrees| degrees.round() as i64)
            .ok_or_else(|| invalid_number("Rotation", v)),
    }
}

fn brand_list(value: Option<&MetaValue>) -> Vec<String> {
    match value {
        None => Vec::new(),
        Some(MetaValue::List(items)) => items.clone(),
        Some(v) if is_blank(v) => Vec::new(),
        Some(v) => vec![v.to_string()],
    }
}

fn invalid_number(field: &'static str, value: &MetaValue) -> NormalizationError {
    NormalizationError::InvalidNumber {
        field,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawTrackInfo {
        RawTrackInfo::from_json(value).unwrap()
    }

    fn stream_doc(video: serde_json::Value) -> RawTrackInfo {
        raw(json!({
            "format": {"format_name": "mov,mp4,m4a,3gp,3g2,mj2", "duration": "10.000000", "bit_rate": "1500000"},
            "streams": [video]
        }))
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(1_048_576), "1.00 MiB");
        assert_eq!(format_file_size(1_500_000), "1.43 MiB");
        assert_eq!(format_file_size(0), "0.00 MiB");
    }

    #[test]
    fn test_parse_rational() {
        let rate = parse_rational("30000/1001").unwrap();
        assert!((rate - 29.97).abs() < 0.001);
        assert_eq!(parse_rational("25/1").unwrap(), 25.0);
        assert_eq!(
            parse_rational("0/0"),
            Err(NormalizationError::ZeroDenominator("0/0".to_string()))
        );
        assert!(matches!(
            parse_rational("abc/1"),
            Err(NormalizationError::InvalidRational(_))
        ));
        assert!(matches!(
            parse_rational("1e3/1"),
            Err(NormalizationError::InvalidRational(_))
        ));
    }

    #[test]
    fn test_track_model_full_mapping() {
        let metadata = normalize(
            &raw(json!({"tracks": [
                {
                    "track_type": "General",
                    "file_extension": "mp4",
                    "internet_media_type": "video/mp4",
                    "duration": 12_345,
                    "overall_bit_rate": 1_234_567,
                    "format": "MPEG-4",
                    "other_format": ["isom", "iso2", "avc1", "mp41"],
                    "encoded_date": "UTC 2024-01-02 03:04:05",
                    "tagged_date": "UTC 2024-01-02 03:04:06"
                },
                {
                    "track_type": "Video",
                    "format": "AVC",
                    "width": 1920,
                    "height": 1080,
                    "frame_rate": "29.970",
                    "bit_depth": 8,
                    "codec_id": "avc1",
                    "rotation": "90.000"
                },
                {
                    "track_type": "Audio",
                    "format": "AAC",
                    "channel_s": 2,
                    "bit_depth": 16,
                    "sampling_rate": 48000
                }
            ]})),
            "clip.mp4",
            1_048_576,
        )
        .unwrap();

        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(
            json["File"],
            json!({
                "Filename": "clip.mp4",
                "File Size": "1.00 MiB",
                "File Type": "MP4",
                "MIME Type": "video/mp4",
                "Duration": "12 s",
                "Avg Bitrate": "1234.6 kbps",
                "Major Brand": "MPEG-4",
                "Compatible Brands": ["isom", "iso2", "avc1", "mp41"],
                "Create Date": "UTC 2024-01-02 03:04:05",
                "Modify Date": "UTC 2024-01-02 03:04:06"
            })
        );
        assert_eq!(json["Video"]["Codec"], "AVC");
        assert_eq!(json["Video"]["Frame Rate"], 29.97);
        assert_eq!(json["Video"]["Rotation"], 90);
        assert_eq!(json["Audio"]["Channels"], 2);
        assert_eq!(json["Audio"]["Bits Per Sample"], 16);
        assert_eq!(json["Audio"]["Sample Rate"], 48000);
        assert_eq!(json["Composite"]["Image Size"], "1920x1080");
        assert_eq!(json["Composite"]["Megapixels"], "2.074");
    }

    #[test]
    fn test_no_video_leaves_video_and_composite_empty() {
        let metadata = normalize(
            &raw(json!({"tracks": [
                {"track_type": "General", "file_extension": "mp3"},
                {"track_type": "Audio", "format": "MPEG Audio", "channel_s": 2, "sampling_rate": 44100}
            ]})),
            "song.mp3",
            3_000_000,
        )
        .unwrap();

        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["Video"], json!({}));
        assert_eq!(json["Composite"], json!({}));
        assert_eq!(json["Audio"]["Audio Format"], "MPEG Audio");
        assert_eq!(json["File"]["Duration"], "N/A");
        assert_eq!(json["File"]["Avg Bitrate"], "N/A");
        assert_eq!(json["File"]["Compatible Brands"], json!([]));
    }

    #[test]
    fn test_zero_or_non_numeric_dimensions_give_na_megapixels() {
        for (width, height) in [(json!(0), json!(1080)), (json!("wide"), json!(1080))] {
            let metadata = normalize(
                &raw(json!({"tracks": [
                    {"track_type": "Video", "width": width, "height": height}
                ]})),
                "clip.mkv",
                10,
            )
            .unwrap();

            let composite = metadata.composite.expect("composite present with video");
            assert_eq!(composite.megapixels, "N/A");
        }
    }

    #[test]
    fn test_missing_dimensions_still_build_composite() {
        let metadata = normalize(
            &raw(json!({"tracks": [{"track_type": "Video", "format": "VP9"}]})),
            "clip.webm",
            10,
        )
        .unwrap();

        let composite = metadata.composite.unwrap();
        assert_eq!(composite.image_size, "N/AxN/A");
        assert_eq!(composite.megapixels, "N/A");
        assert_eq!(metadata.video.unwrap().rotation, 0);
    }

    #[test]
    fn test_stream_model_passes_duration_and_bitrate_through() {
        let metadata = normalize(
            &stream_doc(json!({
                "codec_type": "video",
                "codec_name": "h264",
                "codec_tag_string": "avc1",
                "width": 1280,
                "height": 720,
                "r_frame_rate": "30000/1001",
                "bits_per_raw_sample": "8",
                "tags": {"rotate": "270"}
            })),
            "clip.mp4",
            1_500_000,
        )
        .unwrap();

        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["File"]["Duration"], "10.000000");
        assert_eq!(json["File"]["Avg Bitrate"], "1500000");
        assert_eq!(json["File"]["File Size"], "1.43 MiB");
        assert_eq!(json["File"]["File Type"], "mov,mp4,m4a,3gp,3g2,mj2");
        assert!(json["File"].get("Major Brand").is_none());
        assert_eq!(json["Video"]["Bit Depth"], 8);
        assert_eq!(json["Video"]["Compressor ID"], "avc1");
        assert_eq!(json["Video"]["Rotation"], 270);
        let rate = json["Video"]["Frame Rate"].as_f64().unwrap();
        assert!((rate - 29.97).abs() < 0.001);
        assert_eq!(json["Composite"]["Megapixels"], "0.922");
    }

    #[test]
    fn test_stream_model_frame_rate_without_slash_is_na() {
        let metadata = normalize(
            &stream_doc(json!({"codec_type": "video", "r_frame_rate": "25"})),
            "clip.mp4",
            1,
        )
        .unwrap();
        assert!(metadata.video.unwrap().frame_rate.is_na());
    }

    #[test]
    fn test_stream_model_zero_denominator_is_error() {
        let result = normalize(
            &stream_doc(json!({"codec_type": "video", "r_frame_rate": "0/0"})),
            "clip.mp4",
            1,
        );
        assert_eq!(
            result,
            Err(NormalizationError::ZeroDenominator("0/0".to_string()))
        );
    }

    #[test]
    fn test_stream_model_duration_and_bitrate_pass_through() {
        let metadata = normalize(
            &raw(json!({"format": {"duration": "0.000000", "bit_rate": "0"}})),
            "still.png",
            1,
        )
        .unwrap();
        assert_eq!(metadata.file.duration, MetaValue::from("0.000000"));
        assert_eq!(metadata.file.avg_bitrate, MetaValue::from("0"));
        assert!(metadata.video.is_none());
        assert!(metadata.audio.is_none());

        let metadata = normalize(
            &raw(json!({"format": {"duration": "N/A", "bit_rate": " 1500000 "}})),
            "live.ts",
            1,
        )
        .unwrap();
        assert_eq!(metadata.file.duration, MetaValue::from("N/A"));
        assert_eq!(metadata.file.avg_bitrate, MetaValue::from("1500000"));
    }

    #[test]
    fn test_stream_model_blank_duration_is_na() {
        let metadata = normalize(
            &raw(json!({"format": {"duration": "  "}})),
            "clip.mp4",
            1,
        )
        .unwrap();
        assert!(metadata.file.duration.is_na());
        assert!(metadata.file.avg_bitrate.is_na());
    }

    #[test]
    fn test_stream_model_display_matrix_rotation() {
        let metadata = normalize(
            &stream_doc(json!({
                "codec_type": "video",
                "side_data_list": [{"side_data_type": "Display Matrix", "rotation": -90.0}]
            })),
            "phone.mov",
            1,
        )
        .unwrap();
        assert_eq!(metadata.video.unwrap().rotation, -90);
    }

    #[test]
    fn test_stream_model_audio_bits_per_sample_is_optional() {
        let metadata = normalize(
            &raw(json!({"streams": [
                {"codec_type": "audio", "codec_name": "aac", "channels": 2, "sample_rate": "44100", "bits_per_sample": 0}
            ]})),
            "clip.m4a",
            1,
        )
        .unwrap();

        let audio = metadata.audio.unwrap();
        assert_eq!(audio.audio_format, MetaValue::from("aac"));
        assert_eq!(audio.channels, MetaValue::Integer(2));
        assert_eq!(audio.sample_rate, MetaValue::Integer(44100));
        assert!(audio.bits_per_sample.is_none());
    }

    #[test]
    fn test_non_numeric_rotation_is_error() {
        let result = normalize(
            &raw(json!({"tracks": [{"track_type": "Video", "rotation": "sideways"}]})),
            "clip.mp4",
            1,
        );
        assert!(matches!(
            result,
            Err(NormalizationError::InvalidNumber { field: "Rotation", .. })
        ));
    }

    #[test]
    fn test_empty_inputs_are_unrecognized() {
        assert_eq!(
            normalize(&RawTrackInfo::Tracks(Vec::new()), "a", 0),
            Err(NormalizationError::UnrecognizedShape)
        );
        assert_eq!(
            normalize(&RawTrackInfo::Streams(ProbeDocument::default()), "a", 0),
            Err(NormalizationError::UnrecognizedShape)
        );
    }

    #[test]
    fn test_first_track_of_each_kind_wins() {
        let metadata = normalize(
            &raw(json!({"tracks": [
                {"track_type": "Video", "format": "AVC"},
                {"track_type": "Video", "format": "HEVC"}
            ]})),
            "clip.mp4",
            1,
        )
        .unwrap();
        assert_eq!(metadata.video.unwrap().codec, MetaValue::from("AVC"));
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let input = stream_doc(json!({
            "codec_type": "video", "codec_name": "h264", "width": 640, "height": 480, "r_frame_rate": "24/1"
        }));
        let first = serde_json::to_string(&normalize(&input, "a.mp4", 42).unwrap()).unwrap();
        let second = serde_json::to_string(&normalize(&input, "a.mp4", 42).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
