//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use mediaprobe_core::Config;
use mediaprobe_processing::{source_from_config, MetadataExtractor};

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let source = source_from_config(&config).context("Failed to set up metadata source")?;
    tracing::info!(source = source.name(), "Metadata source ready");

    let extractor = MetadataExtractor::new(
        source,
        Duration::from_secs(config.inspect_timeout_secs()),
    )
    .with_temp_dir(config.upload_temp_dir().map(|dir| dir.to_path_buf()));

    let state = Arc::new(AppState::new(config.clone(), extractor));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
