use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Placeholder emitted for any scalar the inspector did not report.
pub const NOT_AVAILABLE: &str = "N/A";

/// A single metadata value as it appears in the response.
///
/// Inspectors report a mix of integers, decimals and free text; the response
/// keeps the JSON type of what was reported instead of stringifying it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum MetaValue {
    Integer(i64),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl MetaValue {
    /// The literal `"N/A"`.
    pub fn na() -> Self {
        MetaValue::Text(NOT_AVAILABLE.to_string())
    }

    pub fn is_na(&self) -> bool {
        matches!(self, MetaValue::Text(s) if s == NOT_AVAILABLE)
    }

    /// Wrap an optional string, falling back to `"N/A"` when absent or blank.
    pub fn text_or_na(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(s) if !s.is_empty() => MetaValue::Text(s.to_string()),
            _ => MetaValue::na(),
        }
    }

    /// Numeric view of the value. Text is parsed when it holds a plain number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetaValue::Integer(n) => Some(*n as f64),
            MetaValue::Number(n) => Some(*n),
            MetaValue::Text(s) => s.trim().parse().ok(),
            MetaValue::List(_) => None,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Integer(n) => write!(f, "{}", n),
            MetaValue::Number(n) => write!(f, "{}", n),
            MetaValue::Text(s) => f.write_str(s),
            MetaValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        MetaValue::Integer(value)
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        MetaValue::Number(value)
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Text(value)
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Text(value.to_string())
    }
}

impl From<Vec<String>> for MetaValue {
    fn from(value: Vec<String>) -> Self {
        MetaValue::List(value)
    }
}
