//! Crossfade scheduling
//!
//! A timed transition between the active and standby slots: the outgoing
//! slot fades from its current volume to 0 while the incoming slot fades
//! from 0 to the quiet-hours-adjusted target, in equal opposite steps over
//! a fixed tick interval. Step volumes are computed from the step index, so
//! both endpoints are exact after the final tick regardless of float
//! accumulation.

use crate::audio::SlotId;
use std::time::Duration;

/// Fixed fade tick interval
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Per-tick volume schedule for one crossfade
#[derive(Debug, Clone, Copy)]
pub struct FadePlan {
    steps: u32,
    /// Outgoing slot volume at step 0
    start_out: f32,
    /// Incoming slot volume at the final step
    target_in: f32,
}

impl FadePlan {
    /// Build a plan so both slots reach their bounds after exactly
    /// `duration / TICK_INTERVAL` steps (at least one).
    pub fn new(duration: Duration, start_out: f32, target_in: f32) -> Self {
        let ticks = duration.as_secs_f64() / TICK_INTERVAL.as_secs_f64();
        let steps = (ticks.round() as u32).max(1);
        Self {
            steps,
            start_out,
            target_in,
        }
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn target(&self) -> f32 {
        self.target_in
    }

    /// Volumes after `step` ticks: `(outgoing, incoming)`
    pub fn volumes_at(&self, step: u32) -> (f32, f32) {
        let progress = (step.min(self.steps) as f32) / (self.steps as f32);
        let outgoing = self.start_out * (1.0 - progress);
        let incoming = self.target_in * progress;
        (outgoing, incoming)
    }
}

/// Volumes to apply for one tick, plus whether the fade just finished
#[derive(Debug, Clone, Copy)]
pub struct FadeTick {
    pub outgoing: f32,
    pub incoming: f32,
    pub complete: bool,
}

/// An in-progress crossfade between the two slots.
///
/// The slot roles are fixed for the fade's lifetime; a manual override may
/// retarget which *track* the fade lands on (by reloading the incoming
/// slot's source), but never restarts the step schedule or swaps roles.
#[derive(Debug)]
pub struct Crossfade {
    plan: FadePlan,
    step: u32,
    outgoing: SlotId,
}

impl Crossfade {
    pub fn new(plan: FadePlan, outgoing: SlotId) -> Self {
        Self {
            plan,
            step: 0,
            outgoing,
        }
    }

    /// The slot fading out
    pub fn outgoing(&self) -> SlotId {
        self.outgoing
    }

    /// The slot fading in (the one the fade lands on)
    pub fn incoming(&self) -> SlotId {
        self.outgoing.other()
    }

    pub fn target(&self) -> f32 {
        self.plan.target()
    }

    /// Advance one tick and return the volumes to apply
    pub fn advance(&mut self) -> FadeTick {
        self.step = (self.step + 1).min(self.plan.steps());
        let (outgoing, incoming) = self.plan.volumes_at(self.step);
        FadeTick {
            outgoing,
            incoming,
            complete: self.step >= self.plan.steps(),
        }
    }
}
