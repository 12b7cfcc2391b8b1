//! Manual override gate
//!
//! Arbitrates between automatic next-track selection and user-initiated
//! track changes. A user's choice always wins: it either overwrites the
//! standby slot's pending track outright, or — when a crossfade is already
//! in progress — locks the in-flight transition onto the manual track so
//! that no automatic preload can displace it before the fade commits.

/// Override lock state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverrideLock {
    /// Automatic preloading may fill the standby slot
    #[default]
    Unlocked,
    /// A manual choice owns the in-progress crossfade's landing track
    Locked,
}

/// What the engine should do with a manual track request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualAction {
    /// No crossfade in flight: overwrite the standby pending track and
    /// proceed (crossfade or hard switch per playback position)
    ReplaceStandby,
    /// A crossfade is in flight: retarget its landing track and lock
    RetargetCrossfade,
}

#[derive(Debug, Default)]
pub struct OverrideGate {
    lock: OverrideLock,
}

impl OverrideGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.lock == OverrideLock::Locked
    }

    /// Arbitrate a manual `play_track_now` request
    pub fn on_manual_request(&mut self, crossfading: bool) -> ManualAction {
        if crossfading {
            self.lock = OverrideLock::Locked;
            ManualAction::RetargetCrossfade
        } else {
            ManualAction::ReplaceStandby
        }
    }

    /// Whether an automatic preload may touch the standby slot.
    ///
    /// Preloads are a no-op both while a crossfade is in progress and while
    /// the lock is held — a manual choice must never be silently overwritten.
    pub fn allows_preload(&self, crossfading: bool) -> bool {
        !crossfading && !self.is_locked()
    }

    /// Crossfade completion releases the lock; automatic preloading resumes
    pub fn on_crossfade_complete(&mut self) {
        self.lock = OverrideLock::Unlocked;
    }
}
