//! Error types shared across Wavecast crates
//!
//! Defines the common error type using thiserror for clear error propagation.

use thiserror::Error;

/// Common error type for wavecast-common
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Playlist shape or content errors
    #[error("Playlist error: {0}")]
    Playlist(String),

    /// Malformed time-of-day strings (quiet hours)
    #[error("Invalid time of day: {0}")]
    InvalidTimeOfDay(String),

    /// Locale table loading errors
    #[error("Locale error: {0}")]
    Locale(String),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using the common Error
pub type Result<T> = std::result::Result<T, Error>;
