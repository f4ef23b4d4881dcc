//! Egg Catcher - A falling-object basket arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (clock, difficulty, spawning, collisions)
//! - `game`: Session controller driven by the host's frame callback
//! - `events`: Collaborator boundary for rendering/audio/HUD
//! - `audio`: Sound catalogue and playback policy
//! - `hud`: Label formatting and game-over tally

pub mod audio;
pub mod autopilot;
pub mod config;
pub mod error;
pub mod events;
pub mod game;
pub mod hud;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::GameConfig;
pub use error::{ConfigError, PresentError};
pub use events::{Dispatcher, Presenter};
pub use game::Game;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame rate the per-tick delta is expressed in
    pub const FRAMES_PER_SECOND: f32 = 60.0;
    /// Largest delta accepted per tick (0.1s), prevents tunnelling after a stall
    pub const MAX_DELTA_FRAMES: f32 = 6.0;

    /// Difficulty curve
    pub const EASY_SPEED_MULTIPLIER: f32 = 0.85;
    pub const RAMP_TOP_SPEED_MULTIPLIER: f32 = 3.0;
    /// Easy phase spawns 20% slower than the base interval
    pub const EASY_SPAWN_FACTOR: f32 = 1.2;
    /// Ramp ends at 40% of the base interval
    pub const MIN_SPAWN_FACTOR: f32 = 0.4;
    pub const MIN_SPAWN_INTERVAL: f32 = 10.0;
    pub const CRAZY_SPEED_MULTIPLIER: f32 = 2.0;
    pub const CRAZY_MIN_SPAWN_INTERVAL: f32 = 15.0;

    /// Spawn batch sizes
    pub const EASY_BATCH: usize = 2;
    pub const RAMP_BATCH: usize = 4;
    pub const CRAZY_BATCH: usize = 6;

    /// Spawn placement
    pub const SPAWN_MARGIN: f32 = 30.0;
    pub const SPAWN_Y: f32 = -50.0;
    /// Max rotation speed magnitude (radians/frame), cosmetic only
    pub const SPAWN_ROTATION_RANGE: f32 = 0.1;
    /// Extra random speed on top of the base egg speed
    pub const EGG_SPEED_JITTER: f32 = 2.0;
    pub const GOLD_SPEED_JITTER: f32 = 1.5;

    /// Crazy mode drift (per frame, symmetric)
    pub const CRAZY_JITTER_X: f32 = 28.0;
    pub const CRAZY_JITTER_Y: f32 = 10.0;
    pub const CRAZY_JITTER_ROTATION: f32 = 0.6;
    pub const CRAZY_EDGE_MARGIN: f32 = 20.0;

    /// Catch band relative to basket y: [basket_y - 60, basket_y + 5]
    pub const CATCH_BAND_ABOVE: f32 = 60.0;
    pub const CATCH_BAND_BELOW: f32 = 5.0;
    /// Horizontal slack added to half the basket width
    pub const CATCH_SLACK: f32 = 10.0;
    /// Objects below screen height + this are dropped
    pub const FLOOR_EXIT_MARGIN: f32 = 20.0;

    /// Basket sits this far above the bottom edge
    pub const BASKET_BOTTOM_OFFSET: f32 = 80.0;
    /// Basket tilt while moving (radians)
    pub const BASKET_TILT: f32 = 0.2;
    /// Fraction of the remaining tilt closed each tick
    pub const BASKET_TILT_EASING: f32 = 0.1;

    /// Bomb-fall sound cooldowns (ms)
    pub const BOMB_SOUND_COOLDOWN_MS: f64 = 100.0;
    pub const BOMB_SOUND_COOLDOWN_CRAZY_MS: f64 = 500.0;
    /// Delay before the death sting plays (ms)
    pub const DEATH_SOUND_DELAY_MS: f64 = 1000.0;
    /// Max simultaneous sound voices
    pub const MAX_CONCURRENT_VOICES: usize = 8;

    /// Crazy mode ambience
    pub const CRAZY_BACKGROUND: u32 = 0xFF8C69;
    pub const NORMAL_BACKGROUND: u32 = 0x87D68A;
    pub const CRAZY_SHAKE_AMPLITUDE: f32 = 3.0;

    /// Bomb catch screen shake (intensity px, duration frames)
    pub const BOMB_SHAKE_INTENSITY: f32 = 24.0;
    pub const BOMB_SHAKE_FRAMES: f32 = 24.0;
}

/// Horizontal distance between two points
#[inline]
pub fn horizontal_distance(a: Vec2, b: Vec2) -> f32 {
    (a.x - b.x).abs()
}
