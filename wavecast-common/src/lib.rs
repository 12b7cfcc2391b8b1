//! # Wavecast Common Library
//!
//! Shared code for the Wavecast radio daemon:
//! - Playlist and track models
//! - Event types (RadioEvent enum)
//! - Quiet-hours window handling
//! - Locale string tables
//! - Configuration file resolution

pub mod config;
pub mod error;
pub mod events;
pub mod locale;
pub mod model;
pub mod quiet_hours;

pub use error::{Error, Result};
pub use model::{Playlist, PlaylistConfig, Track, TrackKind};
pub use quiet_hours::QuietHours;
