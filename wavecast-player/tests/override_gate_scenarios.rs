//! Manual override arbitration scenarios
//!
//! The user's choice must always win, no matter how it races against
//! automatic preloads and in-flight crossfades.

mod helpers;

use helpers::*;
use std::time::Duration;

#[tokio::test]
async fn test_manual_override_during_crossfade_wins() {
    let radio = build_radio(
        vec![song("a", 120.0), song("b", 120.0), song("c", 120.0)],
        config_with_crossfade(0.5),
    )
    .await;

    radio.engine.select_track("a").await.unwrap();
    radio.engine.seek(5.0).await;

    radio.engine.select_track("b").await.unwrap();
    assert!(radio.state.is_crossfading().await);

    // Mid-fade, the user picks C instead; preloads hammering the engine in
    // between must not displace the choice
    tokio::time::sleep(Duration::from_millis(100)).await;
    radio.engine.preload_next().await.unwrap();
    radio.engine.select_track("c").await.unwrap();
    radio.engine.preload_next().await.unwrap();
    radio.engine.preload_next().await.unwrap();

    // The in-flight fade is retargeted, not restarted
    assert_eq!(radio.state.current_track_id().await.unwrap(), "c");
    assert!(radio.state.is_crossfading().await);

    assert!(wait_for_fade_end(&radio.state, Duration::from_secs(3)).await);
    let status = radio.engine.status().await;
    assert_eq!(status.current_track.as_ref().unwrap().id, "c");
    let active = status
        .slots
        .iter()
        .find(|s| s.id == status.active_slot)
        .unwrap();
    assert_eq!(active.src.as_deref(), Some("c.mp3"));
}

#[tokio::test]
async fn test_manual_choice_overwrites_pending_preload() {
    let radio = build_radio(
        vec![song("a", 120.0), song("b", 120.0), song("c", 120.0)],
        config_with_crossfade(0.4),
    )
    .await;

    radio.engine.select_track("a").await.unwrap();
    radio.engine.seek(5.0).await;

    // The hard switch preloaded some automatic pick into standby; the
    // manual selection replaces it unconditionally
    assert!(radio.state.next_track().await.is_some());
    radio.engine.select_track("c").await.unwrap();
    assert_eq!(radio.state.current_track_id().await.unwrap(), "c");

    assert!(wait_for_fade_end(&radio.state, Duration::from_secs(3)).await);
    assert_eq!(radio.state.current_track_id().await.unwrap(), "c");
}

#[tokio::test]
async fn test_selecting_current_track_is_noop() {
    let radio = build_radio(
        vec![song("a", 120.0), song("b", 120.0)],
        config_with_crossfade(0.4),
    )
    .await;

    radio.engine.select_track("a").await.unwrap();
    radio.engine.seek(5.0).await;
    let slot_before = radio.state.active_slot().await;

    radio.engine.select_track("a").await.unwrap();
    assert!(!radio.state.is_crossfading().await);
    assert_eq!(radio.state.active_slot().await, slot_before);
}

#[tokio::test]
async fn test_repeated_overrides_land_on_last_choice() {
    let radio = build_radio(
        vec![
            song("a", 120.0),
            song("b", 120.0),
            song("c", 120.0),
            song("d", 120.0),
        ],
        config_with_crossfade(0.6),
    )
    .await;

    radio.engine.select_track("a").await.unwrap();
    radio.engine.seek(5.0).await;

    radio.engine.select_track("b").await.unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;
    radio.engine.select_track("c").await.unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;
    radio.engine.select_track("d").await.unwrap();

    assert!(wait_for_fade_end(&radio.state, Duration::from_secs(3)).await);
    assert_eq!(radio.state.current_track_id().await.unwrap(), "d");
}
