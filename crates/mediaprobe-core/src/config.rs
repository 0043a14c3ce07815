//! Configuration module
//!
//! This module provides the service configuration: the API key, HTTP server
//! settings, and which metadata source to run with which limits.

use std::env;
use std::path::{Path, PathBuf};

use crate::source_kind::MetadataSourceKind;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_FFPROBE_PATH: &str = "ffprobe";
const INSPECT_TIMEOUT_SECS: u64 = 60;
const MAX_FILE_SIZE_MB: usize = 500;
const HTTP_CONCURRENCY_LIMIT: usize = 64;

/// Service configuration loaded from the environment
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub api_key: String,
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub http_concurrency_limit: usize,
    // Inspector configuration
    pub metadata_source: MetadataSourceKind,
    pub ffprobe_path: String,
    pub inspect_timeout_secs: u64,
    // Upload handling
    pub max_file_size_bytes: usize,
    /// Directory for persisted uploads. `None` means the system temp dir.
    pub upload_temp_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn inner(&self) -> &ServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.inner().environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn api_key(&self) -> &str {
        &self.inner().api_key
    }

    pub fn server_port(&self) -> u16 {
        self.inner().server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().cors_origins
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().http_concurrency_limit
    }

    pub fn metadata_source(&self) -> MetadataSourceKind {
        self.inner().metadata_source
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.inner().ffprobe_path
    }

    pub fn inspect_timeout_secs(&self) -> u64 {
        self.inner().inspect_timeout_secs
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.inner().max_file_size_bytes
    }

    pub fn upload_temp_dir(&self) -> Option<&Path> {
        self.inner().upload_temp_dir.as_deref()
    }
}

fn is_production_name(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// `from_env` passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let api_key = lookup("API_KEY")
            .ok_or_else(|| anyhow::anyhow!("API_KEY must be set for authentication"))?;

        let server_port = lookup("PORT")
            .unwrap_or_else(|| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let metadata_source = lookup("METADATA_SOURCE")
            .unwrap_or_else(|| MetadataSourceKind::Ffprobe.to_string())
            .parse()?;

        let inspect_timeout_secs = lookup("INSPECT_TIMEOUT_SECS")
            .unwrap_or_else(|| INSPECT_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("INSPECT_TIMEOUT_SECS must be a valid number"))?;

        let max_file_size_mb = lookup("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let http_concurrency_limit = lookup("HTTP_CONCURRENCY_LIMIT")
            .unwrap_or_else(|| HTTP_CONCURRENCY_LIMIT.to_string())
            .parse()
            .unwrap_or(HTTP_CONCURRENCY_LIMIT);

        Ok(Self {
            api_key,
            server_port,
            environment,
            cors_origins,
            http_concurrency_limit,
            metadata_source,
            ffprobe_path: lookup("FFPROBE_PATH")
                .unwrap_or_else(|| DEFAULT_FFPROBE_PATH.to_string()),
            inspect_timeout_secs,
            max_file_size_bytes: max_file_size_mb.saturating_mul(1024 * 1024),
            upload_temp_dir: lookup("UPLOAD_TEMP_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.api_key.trim().is_empty() {
            return Err(anyhow::anyhow!("API_KEY must not be empty"));
        }

        if self.server_port == 0 {
            return Err(anyhow::anyhow!("PORT must be greater than 0"));
        }

        if self.inspect_timeout_secs == 0 {
            return Err(anyhow::anyhow!("INSPECT_TIMEOUT_SECS must be at least 1"));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be at least 1"));
        }

        if self.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT must be at least 1"));
        }

        if self.cors_origins.is_empty() {
            return Err(anyhow::anyhow!("CORS_ORIGINS must list at least one origin"));
        }

        if let Some(dir) = &self.upload_temp_dir {
            if !dir.is_dir() {
                return Err(anyhow::anyhow!(
                    "UPLOAD_TEMP_DIR does not exist or is not a directory: {}",
                    dir.display()
                ));
            }
        }

        Ok(())
    }
}
