use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use mediaprobe_core::models::MetadataResponse;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{extract_multipart_file, validate_file_size};

#[utoipa::path(
    post,
    path = "/parse-video-metadata/",
    tag = "metadata",
    params(
        ("api_key" = Option<String>, Query, description = "API key (alternatively sent as the X-API-Key header)")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Single field named `file`"),
    responses(
        (status = 200, description = "Normalized metadata", body = MetadataResponse),
        (status = 400, description = "Missing file, or the file could not be inspected", body = ErrorResponse),
        (status = 403, description = "Invalid API key", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "parse_video_metadata"))]
pub async fn parse_video_metadata(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<MetadataResponse>, HttpAppError> {
    let upload = extract_multipart_file(multipart).await?;
    validate_file_size(upload.data.len(), state.config.max_file_size_bytes())?;

    tracing::info!(
        filename = %upload.filename,
        content_type = %upload.content_type,
        size = upload.data.len(),
        source = state.extractor.source_name(),
        "Parsing uploaded file"
    );

    let metadata = state
        .extractor
        .extract(&upload.filename, &upload.data)
        .await?;

    Ok(Json(MetadataResponse { metadata }))
}
