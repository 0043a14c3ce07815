use axum_test::multipart::{MultipartForm, Part};
use serde_json::{json, Value};

/// ffprobe output for a 1280x720 H.264 clip with stereo 44.1 kHz AAC.
pub fn h264_aac_probe() -> Value {
    json!({
        "streams": [
            {
                "index": 0,
                "codec_name": "h264",
                "codec_type": "video",
                "codec_tag_string": "avc1",
                "width": 1280,
                "height": 720,
                "r_frame_rate": "30/1",
                "avg_frame_rate": "30/1",
                "bits_per_raw_sample": "8"
            },
            {
                "index": 1,
                "codec_name": "aac",
                "codec_type": "audio",
                "codec_tag_string": "mp4a",
                "sample_rate": "44100",
                "channels": 2,
                "bits_per_sample": 0
            }
        ],
        "format": {
            "filename": "/tmp/upload_abc.mp4",
            "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
            "duration": "5.000000",
            "size": "1048576",
            "bit_rate": "1677721",
            "tags": {
                "major_brand": "isom",
                "creation_time": "2024-05-01T12:00:00.000000Z"
            }
        }
    })
}

/// A form with a single `file` field.
pub fn file_form(filename: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(data).file_name(filename).mime_type("video/mp4"),
    )
}
