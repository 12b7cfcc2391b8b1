//! Shared builders for engine integration tests

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use wavecast_common::{Playlist, PlaylistConfig, Track, TrackKind};
use wavecast_player::audio::SimulatedOutput;
use wavecast_player::db;
use wavecast_player::db::ratings::RatingsStore;
use wavecast_player::{PlaybackEngine, SharedState};

pub fn song(id: &str, duration_secs: f64) -> Track {
    Track {
        id: id.to_string(),
        title: id.to_uppercase(),
        artist: "Test Artist".to_string(),
        cover: String::new(),
        src: format!("{}.mp3", id),
        kind: TrackKind::Song,
        weight: 1.0,
        golden: false,
        duration_secs,
    }
}

pub struct TestRadio {
    pub engine: Arc<PlaybackEngine>,
    pub state: Arc<SharedState>,
    /// Failure-injection handles for slot A and slot B
    pub fail_a: Arc<AtomicBool>,
    pub fail_b: Arc<AtomicBool>,
}

/// Build a started engine over an in-memory database and two simulated
/// output slots
pub async fn build_radio(tracks: Vec<Track>, config: PlaylistConfig) -> TestRadio {
    let pool = db::connect_in_memory().await.unwrap();
    let state = Arc::new(SharedState::new());
    state
        .set_playlist(Arc::new(Playlist { tracks, config }))
        .await;

    let ratings = Arc::new(RatingsStore::load(pool.clone()).await.unwrap());

    let slot_a = SimulatedOutput::new();
    let slot_b = SimulatedOutput::new();
    let fail_a = slot_a.failure_handle();
    let fail_b = slot_b.failure_handle();

    let engine = Arc::new(
        PlaybackEngine::new(
            pool,
            Arc::clone(&state),
            ratings,
            Box::new(slot_a),
            Box::new(slot_b),
        )
        .await
        .unwrap(),
    );
    engine.start().await;

    TestRadio {
        engine,
        state,
        fail_a,
        fail_b,
    }
}

pub fn config_with_crossfade(seconds: f64) -> PlaylistConfig {
    PlaylistConfig {
        crossfade_seconds: seconds,
        ..Default::default()
    }
}

/// Poll until the current track matches, or time out
pub async fn wait_for_current(state: &SharedState, id: &str, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if state.current_track_id().await.as_deref() == Some(id) {
            return true;
        }
        if Instant::now() > deadline {
            return false;
        }
        sleep(Duration::from_millis(25)).await;
    }
}

/// Poll until no crossfade is in progress, or time out
pub async fn wait_for_fade_end(state: &SharedState, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if !state.is_crossfading().await {
            return true;
        }
        if Instant::now() > deadline {
            return false;
        }
        sleep(Duration::from_millis(25)).await;
    }
}
