//! Playback failure recovery
//!
//! An output refusal (the autoplay-policy analog) must surface as a
//! recoverable error and the engine must advance on its own after the
//! backoff, reselecting rather than hammering the same track.

mod helpers;

use helpers::*;
use std::sync::atomic::Ordering;
use std::time::Duration;
use wavecast_common::events::{PlaybackState, RadioEvent};

#[tokio::test]
async fn test_refused_playback_advances_after_backoff() {
    let radio = build_radio(
        vec![song("a", 120.0), song("b", 120.0), song("c", 120.0)],
        config_with_crossfade(0.5),
    )
    .await;
    let mut events = radio.state.subscribe_events();

    // Refuse the first play on the active slot
    radio.fail_a.store(true, Ordering::SeqCst);
    radio.engine.play_next().await.unwrap();

    // The failure is surfaced, nothing is playing, state stays consistent
    assert!(radio.state.current_track().await.is_none());
    assert_eq!(radio.state.playback_state().await, PlaybackState::Paused);
    assert!(!radio.state.is_crossfading().await);

    let mut failed_seen = false;
    while let Ok(event) = events.try_recv() {
        if matches!(event, RadioEvent::TrackFailed { .. }) {
            failed_seen = true;
        }
    }
    assert!(failed_seen, "TrackFailed event expected");

    // After the fixed backoff the engine reselects and starts playing
    tokio::time::sleep(Duration::from_millis(2600)).await;
    assert!(radio.state.current_track().await.is_some());
    assert_eq!(radio.state.playback_state().await, PlaybackState::Playing);
}

#[tokio::test]
async fn test_session_survives_playback_failures() {
    let radio = build_radio(
        vec![song("a", 120.0), song("b", 120.0)],
        config_with_crossfade(0.5),
    )
    .await;

    radio.fail_a.store(true, Ordering::SeqCst);
    radio.engine.play_next().await.unwrap();

    // The control surface keeps answering while playback is down
    let status = radio.engine.status().await;
    assert!(status.current_track.is_none());
    radio.engine.pause().await;
    radio.engine.seek(0.0).await;
}

#[tokio::test]
async fn test_standby_refusal_keeps_active_playing() {
    let radio = build_radio(
        vec![song("a", 120.0), song("b", 120.0), song("c", 120.0)],
        config_with_crossfade(0.5),
    )
    .await;

    radio.engine.select_track("a").await.unwrap();
    radio.engine.seek(5.0).await;

    // The standby slot (B) refuses to start when the crossfade begins
    radio.fail_b.store(true, Ordering::SeqCst);
    radio.engine.select_track("b").await.unwrap();

    // No fade started; the current track keeps playing uninterrupted
    assert!(!radio.state.is_crossfading().await);
    assert_eq!(radio.state.current_track_id().await.unwrap(), "a");
    assert_eq!(radio.state.playback_state().await, PlaybackState::Playing);

    // The backoff advance reselects and moves on
    tokio::time::sleep(Duration::from_millis(2600)).await;
    assert_ne!(radio.state.current_track_id().await.unwrap(), "a");
}

#[tokio::test]
async fn test_teardown_stops_all_audio() {
    let radio = build_radio(
        vec![song("a", 120.0), song("b", 120.0)],
        config_with_crossfade(0.5),
    )
    .await;

    radio.engine.select_track("a").await.unwrap();
    radio.engine.seek(5.0).await;
    radio.engine.select_track("b").await.unwrap();
    assert!(radio.state.is_crossfading().await);

    // Teardown mid-crossfade: both slots pause, the fade is abandoned
    radio.engine.stop().await;
    let status = radio.engine.status().await;
    assert!(status.slots.iter().all(|s| s.paused));
    assert!(!status.is_crossfading);

    // The abandoned fade's ticker must not resurrect playback
    tokio::time::sleep(Duration::from_millis(200)).await;
    let status = radio.engine.status().await;
    assert!(status.slots.iter().all(|s| s.paused));
}
