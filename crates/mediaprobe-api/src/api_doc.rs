//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use mediaprobe_core::models;

/// Returns the OpenAPI spec served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mediaprobe API",
        version = "0.1.0",
        description = "Upload a media file and get back normalized technical metadata (container, video and audio streams)."
    ),
    paths(
        handlers::metadata::parse_video_metadata,
        handlers::health::health_check,
    ),
    components(schemas(
        models::MetadataResponse,
        models::NormalizedMetadata,
        models::FileSection,
        models::VideoSection,
        models::AudioSection,
        models::CompositeSection,
        models::MetaValue,
        models::HealthResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "metadata", description = "Media metadata extraction"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;
