mod helpers;

use helpers::fixtures::h264_aac_probe;
use helpers::{setup_test_app, StubBehavior};
use mediaprobe_api::HEALTH_STATUS;
use serde_json::{json, Value};

#[tokio::test]
async fn test_health_check() {
    let app = setup_test_app(StubBehavior::Respond(h264_aac_probe()));

    let response = app.client().get("/health/").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.json::<Value>(),
        json!({"status": "API is up and running"})
    );
    assert_eq!(HEALTH_STATUS, "API is up and running");
}

#[tokio::test]
async fn test_health_check_without_trailing_slash() {
    let app = setup_test_app(StubBehavior::Respond(h264_aac_probe()));

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["status"], HEALTH_STATUS);
}

#[tokio::test]
async fn test_health_check_ignores_api_key() {
    let app = setup_test_app(StubBehavior::Respond(h264_aac_probe()));

    let response = app
        .client()
        .get("/health/")
        .add_query_param("api_key", "anything")
        .await;

    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_openapi_spec_is_served() {
    let app = setup_test_app(StubBehavior::Respond(h264_aac_probe()));

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let spec: Value = response.json();
    assert!(spec["paths"]["/parse-video-metadata/"]["post"].is_object());
    assert!(spec["paths"]["/health/"]["get"].is_object());
}
