//! # Wavecast Player Library
//!
//! Core of the Wavecast radio daemon: weighted track selection, the
//! dual-slot playback engine with timed crossfades and manual override
//! arbitration, SQLite persistence, social services and the HTTP/SSE
//! control interface.

pub mod api;
pub mod audio;
pub mod db;
pub mod error;
pub mod net;
pub mod playback;
pub mod social;
pub mod state;

pub use error::{Error, Result};
pub use playback::PlaybackEngine;
pub use state::SharedState;
