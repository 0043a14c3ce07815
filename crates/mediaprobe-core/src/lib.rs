//! Mediaprobe Core Library
//!
//! This crate provides the domain models, error types and configuration
//! shared by the processing and API crates.

pub mod config;
pub mod error;
pub mod models;
pub mod source_kind;

// Re-export commonly used types
pub use config::{Config, ServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use source_kind::MetadataSourceKind;
