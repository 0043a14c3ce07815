//! Shared-secret API key authentication

pub mod middleware;

pub use middleware::{api_key_middleware, API_KEY_HEADER};
