//! Clock-driven simulated audio output
//!
//! The reference implementation of [`AudioSlot`]: playback position advances
//! with the wall clock while "playing" and freezes while paused. Used as the
//! daemon's output when no hardware sink is wired in, and by the test suites,
//! which can inject output refusals through [`SimulatedOutput::failure_handle`].

use crate::audio::slot::AudioSlot;
use crate::error::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct SimulatedOutput {
    src: Option<String>,
    duration: Duration,
    volume: f32,
    /// Position accumulated up to the last pause/seek
    base: Duration,
    /// Set while playing; position = base + elapsed since this instant
    started_at: Option<Instant>,
    /// When set, the next `play` call refuses and clears the flag
    fail_next_play: Arc<AtomicBool>,
}

impl SimulatedOutput {
    pub fn new() -> Self {
        Self {
            src: None,
            duration: Duration::ZERO,
            volume: 1.0,
            base: Duration::ZERO,
            started_at: None,
            fail_next_play: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle for injecting an output refusal on the next `play` call
    pub fn failure_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.fail_next_play)
    }

    fn clamp_to_duration(&self, position: Duration) -> Duration {
        if self.duration.is_zero() {
            position
        } else {
            position.min(self.duration)
        }
    }
}

impl Default for SimulatedOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSlot for SimulatedOutput {
    fn load(&mut self, src: &str, duration: Duration) {
        self.src = Some(src.to_string());
        self.duration = duration;
        self.base = Duration::ZERO;
        self.started_at = None;
    }

    fn play(&mut self) -> Result<()> {
        if self.fail_next_play.swap(false, Ordering::SeqCst) {
            return Err(Error::AudioOutput(
                "output refused to start playback".to_string(),
            ));
        }
        if self.src.is_none() {
            return Err(Error::AudioOutput("no source loaded".to_string()));
        }
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.base = self.position();
        self.started_at = None;
    }

    fn is_paused(&self) -> bool {
        self.started_at.is_none()
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn position(&self) -> Duration {
        let position = match self.started_at {
            Some(started) => self.base + started.elapsed(),
            None => self.base,
        };
        self.clamp_to_duration(position)
    }

    fn seek(&mut self, position: Duration) {
        self.base = self.clamp_to_duration(position);
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    fn duration(&self) -> Duration {
        self.duration
    }

    fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }
}
