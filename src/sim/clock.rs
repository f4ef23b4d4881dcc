//! Session clock
//!
//! The host reports elapsed time per tick in frames at a nominal 60 fps. The
//! clock accumulates frames (not seconds) so long sessions don't drift from
//! repeated float rounding, and clamps at the game duration.

use serde::{Deserialize, Serialize};

use super::state::GamePhase;
use crate::consts::FRAMES_PER_SECOND;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clock {
    /// Frames elapsed since session start
    frames: f64,
    /// Session length (seconds)
    duration: f32,
}

impl Clock {
    pub fn new(duration: f32) -> Self {
        Self {
            frames: 0.0,
            duration,
        }
    }

    /// Add `delta_frames` of game time. Saturates at the game duration.
    pub fn advance(&mut self, delta_frames: f32) {
        let limit = self.duration as f64 * FRAMES_PER_SECOND as f64;
        self.frames = (self.frames + delta_frames.max(0.0) as f64).min(limit);
    }

    /// Seconds elapsed
    pub fn elapsed(&self) -> f32 {
        (self.frames / FRAMES_PER_SECOND as f64) as f32
    }

    /// Seconds left, never negative
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed()).max(0.0)
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed() >= self.duration
    }

    /// Phase implied by elapsed time and the crazy-mode latch
    pub fn phase(&self, easy_phase: f32, crazy_mode_activated: bool) -> GamePhase {
        if crazy_mode_activated {
            GamePhase::Crazy
        } else if self.elapsed() < easy_phase {
            GamePhase::Easy
        } else {
            GamePhase::Ramp
        }
    }
}
