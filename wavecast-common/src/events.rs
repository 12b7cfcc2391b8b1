//! Event types for the Wavecast event system
//!
//! Events are broadcast by the playback engine and social services and can
//! be serialized for SSE transmission to connected UIs.

use serde::{Deserialize, Serialize};

/// Playback state enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Playing,
    Paused,
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
        }
    }
}

/// Wavecast event types
///
/// Broadcast via the shared state's event channel and streamed to UIs over
/// SSE. All events use this central enum for exhaustive matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RadioEvent {
    /// Playback state changed (Playing <-> Paused)
    PlaybackStateChanged {
        state: PlaybackState,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A track became the current track and began playing
    TrackStarted {
        track_id: String,
        title: String,
        artist: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The platform refused to start a track (recoverable; engine advances)
    TrackFailed {
        track_id: String,
        reason: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A timed crossfade began; the incoming track is already reported as
    /// current from this moment on
    CrossfadeStarted {
        from_track_id: Option<String>,
        to_track_id: String,
        duration_ms: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A manual selection redirected an in-progress crossfade's landing track
    CrossfadeRetargeted {
        to_track_id: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The in-progress crossfade committed; outgoing slot is paused
    CrossfadeCompleted {
        track_id: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Periodic position report for the current track
    PlaybackProgress {
        track_id: String,
        position_ms: u64,
        duration_ms: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Master volume changed
    VolumeChanged {
        volume: f32,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playlist (re)loaded successfully
    PlaylistLoaded {
        track_count: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A chat message was accepted
    MessagePosted {
        author: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A song dedication was accepted
    DedicationPosted {
        name: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl RadioEvent {
    /// Event type string used as the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            RadioEvent::PlaybackStateChanged { .. } => "PlaybackStateChanged",
            RadioEvent::TrackStarted { .. } => "TrackStarted",
            RadioEvent::TrackFailed { .. } => "TrackFailed",
            RadioEvent::CrossfadeStarted { .. } => "CrossfadeStarted",
            RadioEvent::CrossfadeRetargeted { .. } => "CrossfadeRetargeted",
            RadioEvent::CrossfadeCompleted { .. } => "CrossfadeCompleted",
            RadioEvent::PlaybackProgress { .. } => "PlaybackProgress",
            RadioEvent::VolumeChanged { .. } => "VolumeChanged",
            RadioEvent::PlaylistLoaded { .. } => "PlaylistLoaded",
            RadioEvent::MessagePosted { .. } => "MessagePosted",
            RadioEvent::DedicationPosted { .. } => "DedicationPosted",
        }
    }
}
