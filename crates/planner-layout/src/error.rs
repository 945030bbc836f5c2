//! Error types for layout operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    /// Malformed time window or non-positive slot granularity.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid grid geometry: {0}")]
    InvalidGeometry(String),

    /// The layout configuration could not be parsed.
    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
