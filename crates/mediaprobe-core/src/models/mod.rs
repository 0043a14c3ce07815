//! Data models for the application
//!
//! The normalized metadata document and the values that fill it.

mod metadata;
mod value;

pub use metadata::*;
pub use value::*;
