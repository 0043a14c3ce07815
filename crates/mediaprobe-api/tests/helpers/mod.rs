#![allow(dead_code)]

pub mod fixtures;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;
use mediaprobe_api::setup::routes::setup_routes;
use mediaprobe_api::AppState;
use mediaprobe_core::{Config, ServiceConfig};
use mediaprobe_processing::{InspectionError, MetadataExtractor, MetadataSource, RawTrackInfo};
use tempfile::TempDir;

pub const TEST_API_KEY: &str = "test-api-key-0123456789";

/// What the stub inspector does when called.
#[derive(Clone)]
pub enum StubBehavior {
    /// Return this JSON, classified as one of the raw shapes
    Respond(serde_json::Value),
    /// Fail like a crashing ffprobe with this stderr
    Fail(String),
    /// Never finish
    Hang,
}

/// Metadata source standing in for ffprobe/libav.
pub struct StubSource {
    behavior: StubBehavior,
    seen_paths: Mutex<Vec<PathBuf>>,
}

impl StubSource {
    pub fn calls(&self) -> usize {
        self.seen_paths.lock().unwrap().len()
    }

    pub fn seen_paths(&self) -> Vec<PathBuf> {
        self.seen_paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataSource for StubSource {
    async fn inspect(&self, path: &Path) -> Result<RawTrackInfo, InspectionError> {
        self.seen_paths.lock().unwrap().push(path.to_path_buf());

        match &self.behavior {
            StubBehavior::Respond(value) => RawTrackInfo::from_json(value.clone())
                .map_err(|e| InspectionError::InvalidOutput(e.to_string())),
            StubBehavior::Fail(stderr) => Err(InspectionError::Failed {
                program: "ffprobe".to_string(),
                status: "exit status: 1".to_string(),
                stderr: stderr.clone(),
            }),
            StubBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(InspectionError::Library("unreachable".to_string()))
            }
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Test application state
pub struct TestApp {
    pub server: TestServer,
    pub source: Arc<StubSource>,
    pub upload_dir: TempDir,
}

impl TestApp {
    /// Get the HTTP test client
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// True when no upload is left behind in the temp dir.
    pub fn upload_dir_is_empty(&self) -> bool {
        std::fs::read_dir(self.upload_dir.path())
            .expect("read upload dir")
            .next()
            .is_none()
    }
}

/// Setup a test application around a stub inspector.
///
/// Uploads go to a private temp dir, the size limit is 2 MB and the
/// inspection timeout is one second.
pub fn setup_test_app(behavior: StubBehavior) -> TestApp {
    setup_test_app_with_env(behavior, &[])
}

/// Like [`setup_test_app`], with extra configuration variables.
pub fn setup_test_app_with_env(behavior: StubBehavior, env: &[(&str, &str)]) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
    let upload_dir_str = upload_dir.path().to_string_lossy().into_owned();

    let service = ServiceConfig::from_lookup(|key| {
        if let Some((_, value)) = env.iter().find(|(k, _)| *k == key) {
            return Some(value.to_string());
        }
        match key {
            "API_KEY" => Some(TEST_API_KEY.to_string()),
            "UPLOAD_TEMP_DIR" => Some(upload_dir_str.clone()),
            "MAX_FILE_SIZE_MB" => Some("2".to_string()),
            "INSPECT_TIMEOUT_SECS" => Some("1".to_string()),
            _ => None,
        }
    })
    .expect("Failed to build test config");
    let config = Config(Box::new(service));
    config.validate().expect("Test config must be valid");

    let source = Arc::new(StubSource {
        behavior,
        seen_paths: Mutex::new(Vec::new()),
    });

    let extractor = MetadataExtractor::new(
        source.clone(),
        Duration::from_secs(config.inspect_timeout_secs()),
    )
    .with_temp_dir(config.upload_temp_dir().map(Path::to_path_buf));

    let state = Arc::new(AppState::new(config.clone(), extractor));
    let router = setup_routes(&config, state).expect("Failed to build routes");

    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        source,
        upload_dir,
    }
}
