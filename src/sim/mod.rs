//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Variable tick delta, expressed in nominal 60 fps frames
//! - Seeded RNG only
//! - Stable iteration order
//! - No rendering, audio or platform dependencies

pub mod clock;
pub mod collision;
pub mod difficulty;
pub mod gate;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::Clock;
pub use collision::{Outcome, has_exited, is_caught};
pub use difficulty::{DifficultyState, Scheduler, crazy_difficulty, ramp_difficulty};
pub use spawner::{Spawner, batch_size, select_kind};
pub use state::{
    Basket, FallingObject, GameEvent, GamePhase, GameSession, MoveDirection, ObjectKind,
    TerminalReason,
};
pub use tick::{TickInput, tick};
