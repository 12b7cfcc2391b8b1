//! Shared playback state
//!
//! Single-writer state owned by the playback engine and crossfade scheduler;
//! every other component reads it through the getters or the snapshot, or
//! calls the engine's public entry points.

use crate::audio::{SlotId, SlotStatus};
use crate::playback::boosts::TempBoosts;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use wavecast_common::events::{PlaybackState, RadioEvent};
use wavecast_common::{Playlist, Track};

/// Maximum number of track ids kept in the recently-played history
pub const HISTORY_LIMIT: usize = 15;

/// Shared state accessible by all components
///
/// Uses RwLock per field for concurrent read access with rare writes.
pub struct SharedState {
    /// Playlist loaded at startup (None until the first successful load)
    pub playlist: RwLock<Option<Arc<Playlist>>>,

    /// The track audibly playing from the active slot
    pub current_track: RwLock<Option<Track>>,

    /// The track loaded into the standby slot, pending commit
    pub next_track: RwLock<Option<Track>>,

    /// Which of the two audio handles is currently audible
    pub active_slot: RwLock<SlotId>,

    /// Playing/Paused, derived from the active handle's status
    pub playback_state: RwLock<PlaybackState>,

    /// True strictly during an in-progress volume transition
    pub is_crossfading: RwLock<bool>,

    /// Recently played track ids, most-recent-first, bounded
    pub history: RwLock<Vec<String>>,

    /// Songs played since the last jingle
    pub songs_since_jingle: RwLock<u32>,

    /// Transient selection-weight bonuses keyed by track id
    pub temp_boosts: RwLock<TempBoosts>,

    /// User base volume (0.0-1.0); quiet hours attenuate on top of this
    pub volume: RwLock<f32>,

    /// Startup-fatal playlist error, surfaced until a successful reload
    pub startup_error: RwLock<Option<String>>,

    /// Event broadcaster for SSE listeners
    pub event_tx: broadcast::Sender<RadioEvent>,
}

impl SharedState {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            playlist: RwLock::new(None),
            current_track: RwLock::new(None),
            next_track: RwLock::new(None),
            active_slot: RwLock::new(SlotId::A),
            playback_state: RwLock::new(PlaybackState::Paused),
            is_crossfading: RwLock::new(false),
            history: RwLock::new(Vec::new()),
            songs_since_jingle: RwLock::new(0),
            temp_boosts: RwLock::new(TempBoosts::new()),
            volume: RwLock::new(0.5),
            startup_error: RwLock::new(None),
            event_tx,
        }
    }

    /// Broadcast an event to all SSE listeners (no receivers is OK)
    pub fn broadcast_event(&self, event: RadioEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Subscribe to the event stream
    pub fn subscribe_events(&self) -> broadcast::Receiver<RadioEvent> {
        self.event_tx.subscribe()
    }

    pub async fn playlist(&self) -> Option<Arc<Playlist>> {
        self.playlist.read().await.clone()
    }

    pub async fn set_playlist(&self, playlist: Arc<Playlist>) {
        *self.playlist.write().await = Some(playlist);
        *self.startup_error.write().await = None;
    }

    pub async fn current_track(&self) -> Option<Track> {
        self.current_track.read().await.clone()
    }

    pub async fn current_track_id(&self) -> Option<String> {
        self.current_track.read().await.as_ref().map(|t| t.id.clone())
    }

    pub async fn set_current_track(&self, track: Option<Track>) {
        *self.current_track.write().await = track;
    }

    pub async fn next_track(&self) -> Option<Track> {
        self.next_track.read().await.clone()
    }

    pub async fn set_next_track(&self, track: Option<Track>) {
        *self.next_track.write().await = track;
    }

    pub async fn take_next_track(&self) -> Option<Track> {
        self.next_track.write().await.take()
    }

    pub async fn active_slot(&self) -> SlotId {
        *self.active_slot.read().await
    }

    pub async fn set_active_slot(&self, id: SlotId) {
        *self.active_slot.write().await = id;
    }

    pub async fn playback_state(&self) -> PlaybackState {
        *self.playback_state.read().await
    }

    pub async fn set_playback_state(&self, state: PlaybackState) {
        *self.playback_state.write().await = state;
    }

    pub async fn is_crossfading(&self) -> bool {
        *self.is_crossfading.read().await
    }

    pub async fn set_is_crossfading(&self, crossfading: bool) {
        *self.is_crossfading.write().await = crossfading;
    }

    pub async fn history(&self) -> Vec<String> {
        self.history.read().await.clone()
    }

    pub async fn set_history(&self, history: Vec<String>) {
        *self.history.write().await = history;
    }

    /// Push a track id to the front of history, skipping a duplicate head
    /// and truncating to the bound. Returns the new history for persistence.
    pub async fn push_history(&self, track_id: &str) -> Vec<String> {
        let mut history = self.history.write().await;
        if history.first().map(String::as_str) != Some(track_id) {
            history.insert(0, track_id.to_string());
            history.truncate(HISTORY_LIMIT);
        }
        history.clone()
    }

    pub async fn volume(&self) -> f32 {
        *self.volume.read().await
    }

    pub async fn set_volume(&self, volume: f32) {
        *self.volume.write().await = volume.clamp(0.0, 1.0);
    }

    pub async fn startup_error(&self) -> Option<String> {
        self.startup_error.read().await.clone()
    }

    pub async fn set_startup_error(&self, message: Option<String>) {
        *self.startup_error.write().await = message;
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only projection of the playback state for UIs and test harnesses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub current_track: Option<Track>,
    pub next_track: Option<Track>,
    pub active_slot: SlotId,
    pub state: PlaybackState,
    pub is_crossfading: bool,
    pub position_secs: f64,
    pub duration_secs: f64,
    pub volume: f32,
    pub quiet_hours: bool,
    pub history: Vec<String>,
    pub songs_since_jingle: u32,
    pub startup_error: Option<String>,
    /// Slot inspection data, for diagnostics and tests only
    pub slots: Vec<SlotStatus>,
}
