//! Difficulty scheduler
//!
//! Two regimes: a continuous ramp from the end of the easy phase to the end
//! of the game, and a discrete crazy-mode override that latches once late in
//! the session and stays until the session is replaced.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::*;

/// Speed and spawn cadence in effect for a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyState {
    /// Scales every object's fall speed
    pub speed_multiplier: f32,
    /// Frames between spawn batches (always >= MIN_SPAWN_INTERVAL)
    pub spawn_interval: f32,
}

/// Linear ramp fraction in [0, 1]; 0 throughout the easy phase
pub fn ramp_fraction(elapsed: f32, config: &GameConfig) -> f32 {
    if elapsed < config.easy_phase {
        return 0.0;
    }
    let total_ramp = (config.game_duration - config.easy_phase).max(1.0);
    ((elapsed - config.easy_phase) / total_ramp).clamp(0.0, 1.0)
}

/// Difficulty from the continuous curve alone (no crazy override)
pub fn ramp_difficulty(elapsed: f32, config: &GameConfig) -> DifficultyState {
    let base = config.spawn_interval;
    if elapsed < config.easy_phase {
        return DifficultyState {
            speed_multiplier: EASY_SPEED_MULTIPLIER,
            spawn_interval: (base * EASY_SPAWN_FACTOR).max(MIN_SPAWN_INTERVAL),
        };
    }

    let k = ramp_fraction(elapsed, config);
    let min_interval = (base * MIN_SPAWN_FACTOR).max(MIN_SPAWN_INTERVAL);
    DifficultyState {
        speed_multiplier: EASY_SPEED_MULTIPLIER
            + k * (RAMP_TOP_SPEED_MULTIPLIER - EASY_SPEED_MULTIPLIER),
        spawn_interval: (base - (base - min_interval) * k).max(MIN_SPAWN_INTERVAL),
    }
}

/// Forced crazy-mode values
pub fn crazy_difficulty(config: &GameConfig) -> DifficultyState {
    DifficultyState {
        speed_multiplier: CRAZY_SPEED_MULTIPLIER,
        spawn_interval: (config.spawn_interval / 2.0).max(CRAZY_MIN_SPAWN_INTERVAL),
    }
}

/// Result of one scheduler step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerUpdate {
    pub difficulty: DifficultyState,
    /// True only on the tick crazy mode latched
    pub crazy_entered: bool,
}

/// Owns the one-shot crazy-mode latch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    crazy_mode_activated: bool,
}

impl Scheduler {
    pub fn crazy_mode_activated(&self) -> bool {
        self.crazy_mode_activated
    }

    /// Difficulty at `elapsed` given the current latch, without mutating it
    pub fn peek(&self, elapsed: f32, config: &GameConfig) -> DifficultyState {
        if self.crazy_mode_activated {
            crazy_difficulty(config)
        } else {
            ramp_difficulty(elapsed, config)
        }
    }

    /// Recompute difficulty, latching crazy mode once its start time passes
    pub fn update(&mut self, elapsed: f32, config: &GameConfig) -> SchedulerUpdate {
        let crazy_entered =
            !self.crazy_mode_activated && elapsed >= config.crazy_mode_start();
        if crazy_entered {
            self.crazy_mode_activated = true;
        }
        SchedulerUpdate {
            difficulty: self.peek(elapsed, config),
            crazy_entered,
        }
    }
}
