use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use mediaprobe_core::AppError;
use serde::Deserialize;
use subtle::ConstantTimeEq;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Header alternative to the `api_key` query parameter.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Deserialize)]
struct ApiKeyQuery {
    api_key: Option<String>,
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// The caller's key. The query parameter wins over the header.
fn provided_api_key(request: &Request) -> Option<String> {
    let from_query = Query::<ApiKeyQuery>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(query)| query.api_key);

    from_query.or_else(|| {
        request
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string())
    })
}

pub async fn api_key_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    match provided_api_key(&request) {
        Some(key) if secure_compare(&key, state.config.api_key()) => next.run(request).await,
        provided => {
            tracing::warn!(
                key_present = provided.is_some(),
                path = %request.uri().path(),
                "Rejected request with invalid API key"
            );
            HttpAppError(AppError::Forbidden("Invalid API Key".to_string())).into_response()
        }
    }
}
