//! Playback engine orchestration
//!
//! Coordinates the two audio slots, weighted selection, crossfade
//! scheduling and the manual override gate. All `PlaybackState` mutation
//! funnels through this engine and the fade ticker it spawns.

use crate::audio::{AudioSlot, SlotId, SlotPair};
use crate::db;
use crate::db::ratings::RatingsStore;
use crate::error::{Error, Result};
use crate::playback::crossfade::{Crossfade, FadePlan, TICK_INTERVAL};
use crate::playback::gate::{ManualAction, OverrideGate};
use crate::playback::selector;
use crate::state::{PlaybackSnapshot, SharedState, HISTORY_LIMIT};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::interval;
use tracing::{debug, error, info, warn};
use wavecast_common::events::{PlaybackState, RadioEvent};
use wavecast_common::Track;

/// Playback-position polling interval
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Delay before automatically advancing past a failed track
const RETRY_BACKOFF: Duration = Duration::from_secs(2);

/// Progress events are emitted every this many poll ticks
const PROGRESS_EVERY: u32 = 5;

/// Mutable engine internals: the slot pair, the in-progress crossfade and
/// the override gate, guarded by one mutex so every transition observes a
/// consistent picture.
struct EngineCore {
    slots: SlotPair,
    crossfade: Option<Crossfade>,
    gate: OverrideGate,
}

/// Playback engine - owns the two audio slots and drives all transitions
pub struct PlaybackEngine {
    db: SqlitePool,
    state: Arc<SharedState>,
    ratings: Arc<RatingsStore>,
    core: Arc<Mutex<EngineCore>>,
    running: Arc<RwLock<bool>>,
}

impl PlaybackEngine {
    /// Create a new playback engine, restoring history and volume from the
    /// database
    pub async fn new(
        db: SqlitePool,
        state: Arc<SharedState>,
        ratings: Arc<RatingsStore>,
        slot_a: Box<dyn AudioSlot>,
        slot_b: Box<dyn AudioSlot>,
    ) -> Result<Self> {
        let history = db::history::load(&db, HISTORY_LIMIT).await?;
        if !history.is_empty() {
            info!("Restored {} history entries", history.len());
            state.set_history(history).await;
        }
        if let Some(volume) = db::settings::get_volume(&db).await? {
            state.set_volume(volume).await;
        }

        Ok(Self {
            db,
            state,
            ratings,
            core: Arc::new(Mutex::new(EngineCore {
                slots: SlotPair::new(slot_a, slot_b),
                crossfade: None,
                gate: OverrideGate::new(),
            })),
            running: Arc::new(RwLock::new(false)),
        })
    }

    /// Start the background position-polling loop
    pub async fn start(&self) {
        *self.running.write().await = true;
        let engine = self.clone_handles();
        tokio::spawn(async move {
            engine.poll_loop().await;
        });
        info!("Playback engine started");
    }

    /// Stop the engine: cancel timers, pause both slots, restore a quiet
    /// consistent state. No audio may leak past teardown.
    pub async fn stop(&self) {
        *self.running.write().await = false;
        let mut core = self.core.lock().await;
        core.crossfade = None;
        core.gate.on_crossfade_complete();
        core.slots.pause_all();
        drop(core);
        self.state.set_is_crossfading(false).await;
        self.state.set_playback_state(PlaybackState::Paused).await;
        info!("Playback engine stopped");
    }

    /// Public entry point for both automatic advancement and manual user
    /// selection.
    ///
    /// The manually chosen track always wins: it overwrites any pending
    /// automatic preload, and if a crossfade is already in progress it
    /// retargets the in-flight fade rather than starting a second timer.
    pub async fn play_track_now(&self, track: Track) -> Result<()> {
        // Selecting the already-current track is a no-op
        if self.state.current_track_id().await.as_deref() == Some(track.id.as_str()) {
            debug!("Track '{}' is already current, ignoring", track.id);
            return Ok(());
        }

        let mut core = self.core.lock().await;
        let fade_incoming = core.crossfade.as_ref().map(|f| f.incoming());

        match core.gate.on_manual_request(fade_incoming.is_some()) {
            ManualAction::RetargetCrossfade => {
                let incoming = fade_incoming
                    .ok_or_else(|| Error::InvalidState("crossfade vanished mid-request".into()))?;

                // Swap the landing track of the in-flight fade: reload the
                // incoming slot at its current faded volume and let the
                // existing step schedule finish.
                let play_result = {
                    let volume_now = core.slots.slot(incoming).volume();
                    let slot = core.slots.slot_mut(incoming);
                    slot.load(&track.src, track_duration(&track));
                    slot.set_volume(volume_now);
                    slot.play()
                };

                if let Err(e) = play_result {
                    // The manual track refused to start mid-fade; settle into
                    // a consistent paused state and recover via the backoff
                    // advance.
                    core.crossfade = None;
                    core.gate.on_crossfade_complete();
                    core.slots.pause_all();
                    drop(core);
                    self.state.set_is_crossfading(false).await;
                    self.state.set_playback_state(PlaybackState::Paused).await;
                    self.handle_audio_error(&track, &e).await;
                    return Ok(());
                }

                drop(core);
                self.state.set_current_track(Some(track.clone())).await;
                self.record_play(&track).await;
                self.state.broadcast_event(RadioEvent::CrossfadeRetargeted {
                    to_track_id: track.id.clone(),
                    timestamp: chrono::Utc::now(),
                });
                info!("Manual override: in-flight crossfade retargeted to '{}'", track.id);
                Ok(())
            }

            ManualAction::ReplaceStandby => {
                let playing = !core.slots.active().is_paused();
                let mid_track = playing && core.slots.active().position() > Duration::ZERO;

                if mid_track {
                    // A track is genuinely in progress: load the manual pick
                    // into the standby slot and fade over to it
                    core.slots
                        .standby_mut()
                        .load(&track.src, track_duration(&track));
                    drop(core);
                    self.state.set_next_track(Some(track)).await;
                    self.start_crossfade().await
                } else {
                    drop(core);
                    self.state.set_next_track(Some(track)).await;
                    self.play_next().await
                }
            }
        }
    }

    /// Hard switch: commit a track to the active slot and begin playback.
    ///
    /// Consumes the pending standby track if one exists, otherwise invokes
    /// the selector in committed (non-preload) mode.
    pub fn play_next(
        &self,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
        let mut core = self.core.lock().await;
        if core.crossfade.is_some() {
            // A transition is already advancing the playlist
            return Ok(());
        }

        let track = match self.state.take_next_track().await {
            Some(track) => track,
            None => match self.select_next(false).await {
                Some(track) => track,
                None => {
                    // Fatal for playback, recoverable for the session
                    error!("No playable track available");
                    return Ok(());
                }
            },
        };

        let target = self.effective_volume().await;
        let play_result = {
            let active = core.slots.active_mut();
            active.load(&track.src, track_duration(&track));
            active.set_volume(target);
            active.play()
        };
        drop(core);

        match play_result {
            Ok(()) => {
                self.state.set_current_track(Some(track.clone())).await;
                self.state.set_playback_state(PlaybackState::Playing).await;
                self.record_play(&track).await;
                self.state.broadcast_event(RadioEvent::TrackStarted {
                    track_id: track.id.clone(),
                    title: track.title.clone(),
                    artist: track.artist.clone(),
                    timestamp: chrono::Utc::now(),
                });
                info!("Now playing '{} - {}'", track.artist, track.title);
                self.preload_next().await
            }
            Err(e) => {
                self.state.set_playback_state(PlaybackState::Paused).await;
                self.handle_audio_error(&track, &e).await;
                Ok(())
            }
        }
        })
    }

    /// Fill the standby slot with a fresh selector pick.
    ///
    /// A no-op while a crossfade is in progress or the override gate is
    /// locked: a manual choice must never be silently overwritten.
    pub async fn preload_next(&self) -> Result<()> {
        {
            let core = self.core.lock().await;
            if !core.gate.allows_preload(core.crossfade.is_some()) {
                debug!("Preload skipped: standby slot is reserved");
                return Ok(());
            }
        }

        let Some(pick) = self.select_next(true).await else {
            return Ok(());
        };

        let mut core = self.core.lock().await;
        // Re-check at commit time: a crossfade or manual lock may have
        // arrived while the selector ran
        if !core.gate.allows_preload(core.crossfade.is_some()) {
            return Ok(());
        }
        core.slots
            .standby_mut()
            .load(&pick.src, track_duration(&pick));
        drop(core);
        self.state.set_next_track(Some(pick.clone())).await;
        debug!("Preloaded '{}' into standby slot", pick.id);
        Ok(())
    }

    /// Begin the timed transition from the active slot to the standby slot.
    ///
    /// Only one crossfade runs at a time; without a standby track this
    /// degrades to a hard switch.
    pub async fn start_crossfade(&self) -> Result<()> {
        let mut core = self.core.lock().await;
        if core.crossfade.is_some() {
            return Ok(());
        }

        let Some(next) = self.state.take_next_track().await else {
            drop(core);
            return self.play_next().await;
        };

        let previous = self.state.current_track_id().await;
        let crossfade_secs = self.crossfade_duration().await;
        let target = self.effective_volume().await;

        let outgoing_id = core.slots.active_id();
        let incoming_id = outgoing_id.other();
        let start_out = core.slots.slot(outgoing_id).volume();

        let play_result = {
            let slot = core.slots.slot_mut(incoming_id);
            if slot.src() != Some(next.src.as_str()) {
                slot.load(&next.src, track_duration(&next));
            }
            slot.set_volume(0.0);
            slot.play()
        };
        if let Err(e) = play_result {
            drop(core);
            // The active slot keeps playing; the backoff advance reselects
            self.handle_audio_error(&next, &e).await;
            return Ok(());
        }

        let plan = FadePlan::new(Duration::from_secs_f64(crossfade_secs), start_out, target);
        core.crossfade = Some(Crossfade::new(plan, outgoing_id));
        // The active index swaps as soon as the fade begins, so current
        // track queries reflect the incoming track before the fade ends
        core.slots.set_active(incoming_id);
        drop(core);

        self.state.set_active_slot(incoming_id).await;
        self.state.set_is_crossfading(true).await;
        self.state.set_current_track(Some(next.clone())).await;
        self.state.set_playback_state(PlaybackState::Playing).await;
        self.record_play(&next).await;
        self.state.broadcast_event(RadioEvent::CrossfadeStarted {
            from_track_id: previous,
            to_track_id: next.id.clone(),
            duration_ms: (crossfade_secs * 1000.0) as u64,
            timestamp: chrono::Utc::now(),
        });
        info!("Crossfade started -> '{}' over {:.1}s", next.id, crossfade_secs);

        self.spawn_fade_ticker();
        Ok(())
    }

    /// Resume playback; starts the radio if nothing was ever loaded
    pub async fn play(&self) -> Result<()> {
        let mut core = self.core.lock().await;
        if core.slots.active().src().is_none() {
            drop(core);
            return self.play_next().await;
        }
        let result = core.slots.active_mut().play();
        drop(core);

        match result {
            Ok(()) => {
                self.state.set_playback_state(PlaybackState::Playing).await;
                self.state.broadcast_event(RadioEvent::PlaybackStateChanged {
                    state: PlaybackState::Playing,
                    timestamp: chrono::Utc::now(),
                });
                Ok(())
            }
            Err(e) => {
                self.state.set_playback_state(PlaybackState::Paused).await;
                if let Some(track) = self.state.current_track().await {
                    self.handle_audio_error(&track, &e).await;
                }
                Ok(())
            }
        }
    }

    /// Pause playback
    pub async fn pause(&self) {
        let mut core = self.core.lock().await;
        core.slots.active_mut().pause();
        drop(core);
        self.state.set_playback_state(PlaybackState::Paused).await;
        self.state.broadcast_event(RadioEvent::PlaybackStateChanged {
            state: PlaybackState::Paused,
            timestamp: chrono::Utc::now(),
        });
    }

    /// Toggle play/pause based on the active slot's actual status
    pub async fn toggle(&self) -> Result<()> {
        let paused = {
            let core = self.core.lock().await;
            core.slots.active().is_paused()
        };
        if paused {
            self.play().await
        } else {
            self.pause().await;
            Ok(())
        }
    }

    /// Seek within the current track
    pub async fn seek(&self, position_secs: f64) {
        let mut core = self.core.lock().await;
        core.slots
            .active_mut()
            .seek(Duration::from_secs_f64(position_secs.max(0.0)));
    }

    /// Set the user base volume and apply it to the active slot.
    ///
    /// During a crossfade the ramp owns the slot volumes; the new base takes
    /// effect when the fade commits.
    pub async fn set_volume(&self, volume: f32) -> Result<()> {
        self.state.set_volume(volume).await;
        let effective = self.effective_volume().await;

        let mut core = self.core.lock().await;
        if core.crossfade.is_none() {
            core.slots.active_mut().set_volume(effective);
        }
        drop(core);

        db::settings::set_volume(&self.db, self.state.volume().await).await?;
        self.state.broadcast_event(RadioEvent::VolumeChanged {
            volume: self.state.volume().await,
            timestamp: chrono::Utc::now(),
        });
        Ok(())
    }

    /// Look a track up by id and play it now
    pub async fn select_track(&self, track_id: &str) -> Result<()> {
        let playlist = self
            .state
            .playlist()
            .await
            .ok_or_else(|| Error::InvalidState("no playlist loaded".into()))?;
        let track = playlist
            .track(track_id)
            .cloned()
            .ok_or_else(|| Error::TrackNotFound(track_id.to_string()))?;
        self.play_track_now(track).await
    }

    /// Read-only snapshot of the playback state for UIs and tests
    pub async fn status(&self) -> PlaybackSnapshot {
        let (active_slot, position_secs, duration_secs, slots) = {
            let core = self.core.lock().await;
            (
                core.slots.active_id(),
                core.slots.active().position().as_secs_f64(),
                core.slots.active().duration().as_secs_f64(),
                vec![core.slots.status(SlotId::A), core.slots.status(SlotId::B)],
            )
        };

        PlaybackSnapshot {
            current_track: self.state.current_track().await,
            next_track: self.state.next_track().await,
            active_slot,
            state: self.state.playback_state().await,
            is_crossfading: self.state.is_crossfading().await,
            position_secs,
            duration_secs,
            volume: self.state.volume().await,
            quiet_hours: self.quiet_hours_active().await,
            history: self.state.history().await,
            songs_since_jingle: *self.state.songs_since_jingle.read().await,
            startup_error: self.state.startup_error().await,
            slots,
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Position-polling loop: proactive crossfade trigger, end-of-track
    /// fallback and periodic progress events
    async fn poll_loop(&self) {
        let mut tick = interval(POLL_INTERVAL);
        let mut progress_counter = 0u32;

        loop {
            tick.tick().await;
            if !*self.running.read().await {
                debug!("Poll loop stopping");
                break;
            }

            let (playing, position, duration, crossfading) = {
                let core = self.core.lock().await;
                let active = core.slots.active();
                (
                    !active.is_paused(),
                    active.position(),
                    active.duration(),
                    core.crossfade.is_some(),
                )
            };

            // `is_playing` is derived from the active handle's actual status
            let derived = if playing {
                PlaybackState::Playing
            } else {
                PlaybackState::Paused
            };
            if self.state.playback_state().await != derived {
                self.state.set_playback_state(derived).await;
            }

            if !playing {
                progress_counter = 0;
                continue;
            }

            if !crossfading && !duration.is_zero() {
                let remaining = duration.saturating_sub(position);
                // Proactive trigger: start the fade early enough that it
                // always completes before the track physically ends. This
                // also covers the natural end-of-track case (remaining == 0),
                // so `ended` needs no separate handler; once a crossfade is
                // in progress the end of the outgoing track is a no-op.
                if remaining < Duration::from_secs_f64(self.crossfade_duration().await) {
                    let advanced = if self.state.next_track().await.is_some() {
                        self.start_crossfade().await
                    } else {
                        self.play_next().await
                    };
                    if let Err(e) = advanced {
                        warn!("Automatic advance failed: {}", e);
                    }
                    continue;
                }
            }

            progress_counter += 1;
            if progress_counter >= PROGRESS_EVERY {
                progress_counter = 0;
                if let Some(track) = self.state.current_track().await {
                    self.state.broadcast_event(RadioEvent::PlaybackProgress {
                        track_id: track.id,
                        position_ms: position.as_millis() as u64,
                        duration_ms: duration.as_millis() as u64,
                        timestamp: chrono::Utc::now(),
                    });
                }
            }
        }
    }

    /// Per-crossfade tick task: steps the fade every 50 ms until commit
    fn spawn_fade_ticker(&self) {
        let engine = self.clone_handles();
        tokio::spawn(async move {
            let mut tick = interval(TICK_INTERVAL);
            tick.tick().await; // first tick completes immediately

            loop {
                tick.tick().await;
                if !*engine.running.read().await {
                    break;
                }

                let mut core = engine.core.lock().await;
                let (step, outgoing_id, incoming_id, target) = match core.crossfade.as_mut() {
                    Some(fade) => (fade.advance(), fade.outgoing(), fade.incoming(), fade.target()),
                    None => break,
                };

                core.slots.slot_mut(outgoing_id).set_volume(step.outgoing);
                core.slots.slot_mut(incoming_id).set_volume(step.incoming);

                if step.complete {
                    core.slots.slot_mut(outgoing_id).pause();
                    // Restore the outgoing slot's volume so its next use
                    // doesn't start silent
                    core.slots.slot_mut(outgoing_id).set_volume(target);
                    core.slots.slot_mut(incoming_id).set_volume(target);
                    core.crossfade = None;
                    core.gate.on_crossfade_complete();
                    drop(core);

                    engine.state.set_is_crossfading(false).await;

                    // Re-read the committed track from shared state: a manual
                    // override may have retargeted the fade after this task
                    // was spawned
                    if let Some(track) = engine.state.current_track().await {
                        engine.state.broadcast_event(RadioEvent::CrossfadeCompleted {
                            track_id: track.id.clone(),
                            timestamp: chrono::Utc::now(),
                        });
                        info!("Crossfade committed to '{}'", track.id);
                    }

                    if let Err(e) = engine.preload_next().await {
                        warn!("Preload after crossfade failed: {}", e);
                    }
                    break;
                }
            }
        });
    }

    /// Run the weighted selector over the current shared state
    async fn select_next(&self, is_preload: bool) -> Option<Track> {
        let playlist = self.state.playlist().await?;
        let average_ratings = self.ratings.average_ratings().await;
        let current = self.state.current_track().await;

        let (picked, history_before, history_after) = {
            let mut history = self.state.history.write().await;
            let mut counter = self.state.songs_since_jingle.write().await;
            let mut boosts = self.state.temp_boosts.write().await;
            let history_before = history.clone();
            let mut rng = rand::thread_rng();
            let picked = selector::select_next(
                &playlist,
                &mut history,
                current.as_ref(),
                &mut counter,
                &mut boosts,
                &average_ratings,
                is_preload,
                &mut rng,
            );
            let history_after = history.clone();
            (picked, history_before, history_after)
        };

        // The repeat-avoidance reset mutated history; persist it
        if history_after != history_before {
            if let Err(e) = db::history::save(&self.db, &history_after).await {
                warn!("Failed to persist history: {}", e);
            }
        }

        picked
    }

    /// Push to history and write it through to the database
    async fn record_play(&self, track: &Track) {
        let history = self.state.push_history(&track.id).await;
        if let Err(e) = db::history::save(&self.db, &history).await {
            warn!("Failed to persist history: {}", e);
        }
    }

    /// Surface a recoverable playback failure and schedule the advance.
    ///
    /// Each retry goes through `play_next`, which reselects — the engine
    /// never spins on one bad track.
    async fn handle_audio_error(&self, track: &Track, err: &Error) {
        warn!("Playback of '{}' failed: {}", track.id, err);
        self.state.broadcast_event(RadioEvent::TrackFailed {
            track_id: track.id.clone(),
            reason: err.to_string(),
            timestamp: chrono::Utc::now(),
        });

        let engine = self.clone_handles();
        tokio::spawn(async move {
            tokio::time::sleep(RETRY_BACKOFF).await;
            if *engine.running.read().await {
                if let Err(e) = engine.play_next().await {
                    error!("Advance after failed track also failed: {}", e);
                }
            }
        });
    }

    async fn crossfade_duration(&self) -> f64 {
        self.state
            .playlist()
            .await
            .map(|p| p.config.crossfade_seconds)
            .unwrap_or(2.0)
            .max(0.05)
    }

    async fn quiet_hours_active(&self) -> bool {
        match self.state.playlist().await {
            Some(playlist) => playlist
                .config
                .quiet_hours()
                .map(|w| w.active_now())
                .unwrap_or(false),
            None => false,
        }
    }

    /// Base volume with quiet-hours attenuation applied
    async fn effective_volume(&self) -> f32 {
        let base = self.state.volume().await;
        let Some(playlist) = self.state.playlist().await else {
            return base;
        };
        if playlist
            .config
            .quiet_hours()
            .map(|w| w.active_now())
            .unwrap_or(false)
        {
            base * playlist.config.quiet_attenuation as f32
        } else {
            base
        }
    }

    /// Clone handles for spawned tasks
    fn clone_handles(&self) -> Self {
        Self {
            db: self.db.clone(),
            state: Arc::clone(&self.state),
            ratings: Arc::clone(&self.ratings),
            core: Arc::clone(&self.core),
            running: Arc::clone(&self.running),
        }
    }
}

fn track_duration(track: &Track) -> Duration {
    Duration::from_secs_f64(track.duration_secs.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SimulatedOutput;
    use crate::db;
    use wavecast_common::{Playlist, TrackKind};

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: id.to_uppercase(),
            artist: "Test".to_string(),
            cover: String::new(),
            src: format!("{}.mp3", id),
            kind: TrackKind::Song,
            weight: 1.0,
            golden: false,
            duration_secs: 120.0,
        }
    }

    async fn test_engine() -> (PlaybackEngine, Arc<SharedState>) {
        let pool = db::connect_in_memory().await.unwrap();
        let state = Arc::new(SharedState::new());
        let playlist = Playlist {
            tracks: vec![track("a"), track("b"), track("c")],
            config: Default::default(),
        };
        state.set_playlist(Arc::new(playlist)).await;
        let ratings = Arc::new(RatingsStore::load(pool.clone()).await.unwrap());
        let engine = PlaybackEngine::new(
            pool,
            Arc::clone(&state),
            ratings,
            Box::new(SimulatedOutput::new()),
            Box::new(SimulatedOutput::new()),
        )
        .await
        .unwrap();
        (engine, state)
    }

    #[tokio::test]
    async fn test_engine_creation() {
        let (engine, state) = test_engine().await;
        assert!(state.current_track().await.is_none());
        let status = engine.status().await;
        assert_eq!(status.active_slot, SlotId::A);
        assert!(!status.is_crossfading);
    }

    #[tokio::test]
    async fn test_hard_switch_starts_playback_and_preloads() {
        let (engine, state) = test_engine().await;
        engine.play_next().await.unwrap();

        assert!(state.current_track().await.is_some());
        assert_eq!(state.playback_state().await, PlaybackState::Playing);
        // Standby slot was refilled right after the commit
        assert!(state.next_track().await.is_some());
        assert!(!state.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_play_track_now_idempotent() {
        let (engine, state) = test_engine().await;
        engine.play_track_now(track("a")).await.unwrap();
        let slot_before = state.active_slot().await;

        engine.play_track_now(track("a")).await.unwrap();
        assert_eq!(state.active_slot().await, slot_before);
        assert!(!state.is_crossfading().await);
        assert_eq!(state.current_track_id().await.unwrap(), "a");
    }

    #[tokio::test]
    async fn test_pause_play_roundtrip() {
        let (engine, state) = test_engine().await;
        engine.play_next().await.unwrap();
        engine.pause().await;
        assert_eq!(state.playback_state().await, PlaybackState::Paused);
        engine.play().await.unwrap();
        assert_eq!(state.playback_state().await, PlaybackState::Playing);
    }

    #[tokio::test]
    async fn test_stop_pauses_both_slots() {
        let (engine, state) = test_engine().await;
        engine.start().await;
        engine.play_next().await.unwrap();
        engine.stop().await;

        let status = engine.status().await;
        assert!(status.slots.iter().all(|s| s.paused));
        assert!(!state.is_crossfading().await);
    }

    #[tokio::test]
    async fn test_empty_playlist_is_recoverable() {
        let pool = db::connect_in_memory().await.unwrap();
        let state = Arc::new(SharedState::new());
        let ratings = Arc::new(RatingsStore::load(pool.clone()).await.unwrap());
        let engine = PlaybackEngine::new(
            pool,
            Arc::clone(&state),
            ratings,
            Box::new(SimulatedOutput::new()),
            Box::new(SimulatedOutput::new()),
        )
        .await
        .unwrap();

        // No playlist loaded at all: advancing must not panic or error
        engine.play_next().await.unwrap();
        assert!(state.current_track().await.is_none());
    }
}
