//! Audio slot handles
//!
//! The playback engine owns exactly two interchangeable output handles,
//! slot A and slot B. Which one is audible is tracked by an explicit
//! active-slot selector, never by array position. The standby slot holds
//! the preloaded (or manually chosen) next track.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identifier for one of the two audio slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotId {
    A,
    B,
}

impl SlotId {
    /// The other slot
    pub fn other(self) -> SlotId {
        match self {
            SlotId::A => SlotId::B,
            SlotId::B => SlotId::A,
        }
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotId::A => write!(f, "A"),
            SlotId::B => write!(f, "B"),
        }
    }
}

/// One audio output handle — the playback primitive the engine drives.
///
/// Decoding and device output live behind this trait; the engine only
/// loads sources, starts/stops playback and adjusts volume. `play` may
/// refuse (autoplay policy, decode error); a refusal is always returned
/// as an error, never silently swallowed.
pub trait AudioSlot: Send {
    /// Load a source into the slot. Stops any playback in progress and
    /// resets the position to zero. Volume is preserved.
    fn load(&mut self, src: &str, duration: Duration);

    /// Begin or resume playback of the loaded source
    fn play(&mut self) -> Result<()>;

    /// Pause playback, keeping the current position
    fn pause(&mut self);

    /// Whether the slot is currently paused (true when nothing is loaded)
    fn is_paused(&self) -> bool;

    /// Set slot volume (0.0-1.0)
    fn set_volume(&mut self, volume: f32);

    /// Current slot volume
    fn volume(&self) -> f32;

    /// Current playback position
    fn position(&self) -> Duration;

    /// Seek to a position within the loaded source
    fn seek(&mut self, position: Duration);

    /// Duration of the loaded source (zero = unknown)
    fn duration(&self) -> Duration;

    /// Source currently loaded, if any
    fn src(&self) -> Option<&str>;

    /// Whether the loaded source has played to its end
    fn ended(&self) -> bool {
        let duration = self.duration();
        !duration.is_zero() && self.position() >= duration
    }
}

/// Inspection data for one slot, exposed read-only through the API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotStatus {
    pub id: SlotId,
    pub src: Option<String>,
    pub volume: f32,
    pub paused: bool,
    pub position_secs: f64,
    pub duration_secs: f64,
}

/// The two named, symmetric slot handles plus the active-slot selector.
///
/// Invariant: at most one slot is active at any time; the standby slot's
/// contents are either empty or the provisionally selected next track.
pub struct SlotPair {
    a: Box<dyn AudioSlot>,
    b: Box<dyn AudioSlot>,
    active: SlotId,
}

impl SlotPair {
    pub fn new(a: Box<dyn AudioSlot>, b: Box<dyn AudioSlot>) -> Self {
        Self {
            a,
            b,
            active: SlotId::A,
        }
    }

    /// Which slot is currently active (audible)
    pub fn active_id(&self) -> SlotId {
        self.active
    }

    /// Make the given slot the active one
    pub fn set_active(&mut self, id: SlotId) {
        self.active = id;
    }

    pub fn slot(&self, id: SlotId) -> &dyn AudioSlot {
        match id {
            SlotId::A => self.a.as_ref(),
            SlotId::B => self.b.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, id: SlotId) -> &mut dyn AudioSlot {
        match id {
            SlotId::A => self.a.as_mut(),
            SlotId::B => self.b.as_mut(),
        }
    }

    /// The active (audible) slot
    pub fn active(&self) -> &dyn AudioSlot {
        self.slot(self.active)
    }

    pub fn active_mut(&mut self) -> &mut dyn AudioSlot {
        self.slot_mut(self.active)
    }

    /// The standby (inactive) slot
    pub fn standby(&self) -> &dyn AudioSlot {
        self.slot(self.active.other())
    }

    pub fn standby_mut(&mut self) -> &mut dyn AudioSlot {
        self.slot_mut(self.active.other())
    }

    /// Pause both slots (session teardown)
    pub fn pause_all(&mut self) {
        self.a.pause();
        self.b.pause();
    }

    /// Inspection snapshot of one slot
    pub fn status(&self, id: SlotId) -> SlotStatus {
        let slot = self.slot(id);
        SlotStatus {
            id,
            src: slot.src().map(str::to_string),
            volume: slot.volume(),
            paused: slot.is_paused(),
            position_secs: slot.position().as_secs_f64(),
            duration_secs: slot.duration().as_secs_f64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SimulatedOutput;

    fn pair() -> SlotPair {
        SlotPair::new(
            Box::new(SimulatedOutput::new()),
            Box::new(SimulatedOutput::new()),
        )
    }

    #[test]
    fn test_slot_id_other() {
        assert_eq!(SlotId::A.other(), SlotId::B);
        assert_eq!(SlotId::B.other(), SlotId::A);
    }

    #[test]
    fn test_active_standby_are_disjoint() {
        let mut pair = pair();
        assert_eq!(pair.active_id(), SlotId::A);
        pair.active_mut().load("a.mp3", Duration::from_secs(10));
        pair.standby_mut().load("b.mp3", Duration::from_secs(10));
        assert_eq!(pair.active().src(), Some("a.mp3"));
        assert_eq!(pair.standby().src(), Some("b.mp3"));

        pair.set_active(SlotId::B);
        assert_eq!(pair.active().src(), Some("b.mp3"));
        assert_eq!(pair.standby().src(), Some("a.mp3"));
    }

    #[test]
    fn test_pause_all() {
        let mut pair = pair();
        pair.active_mut().load("a.mp3", Duration::from_secs(10));
        pair.active_mut().play().unwrap();
        assert!(!pair.active().is_paused());
        pair.pause_all();
        assert!(pair.active().is_paused());
        assert!(pair.standby().is_paused());
    }
}
