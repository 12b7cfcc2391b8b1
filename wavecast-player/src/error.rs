//! Error types for wavecast-player
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation.

use thiserror::Error;

/// Main error type for the player daemon
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database connection or query errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP server or client errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Playlist fetch/parse errors (startup-fatal, retryable)
    #[error("Playlist load error: {0}")]
    PlaylistLoad(String),

    /// Audio output refusal (autoplay policy, decode error, device refusal)
    #[error("Audio output error: {0}")]
    AudioOutput(String),

    /// Playback engine errors
    #[error("Playback error: {0}")]
    Playback(String),

    /// Invalid state for operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Unknown track id
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// Submission rejected by a local rate limit
    #[error("{0}")]
    Cooldown(String),

    /// Submission rejected by local validation
    #[error("{0}")]
    Validation(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors bubbled up from the common library
    #[error(transparent)]
    Common(#[from] wavecast_common::Error),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using the player Error
pub type Result<T> = std::result::Result<T, Error>;
