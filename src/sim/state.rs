//! Game state and core simulation types
//!
//! Everything a running session owns lives in `GameSession`. It is created on
//! start, mutated once per tick, and thrown away on restart.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::difficulty::{DifficultyState, Scheduler};
use super::spawner::Spawner;
use crate::config::GameConfig;
use crate::consts::*;

/// Difficulty phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Opening window with slower objects and smaller batches
    Easy,
    /// Difficulty scales linearly with elapsed time
    Ramp,
    /// Late-game override: fast, dense, jittery
    Crazy,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalReason {
    /// Score collapsed to the death threshold
    Death,
    /// Game duration elapsed
    Time,
}

impl TerminalReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminalReason::Death => "death",
            TerminalReason::Time => "time",
        }
    }
}

/// Falling object types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectKind {
    Egg,
    BadEgg,
    Bomb,
    Gold,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 4] = [
        ObjectKind::Egg,
        ObjectKind::BadEgg,
        ObjectKind::Bomb,
        ObjectKind::Gold,
    ];

    /// Score change when caught
    pub fn score_delta(&self) -> i64 {
        match self {
            ObjectKind::Egg => 10,
            ObjectKind::BadEgg => -10,
            ObjectKind::Bomb => -50,
            ObjectKind::Gold => 100,
        }
    }

    /// Objects the player should avoid
    pub fn is_hazard(&self) -> bool {
        self.score_delta() < 0
    }
}

/// A falling object entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: u32,
    pub kind: ObjectKind,
    pub pos: Vec2,
    /// Fall speed (px/frame before the global multiplier)
    pub vertical_speed: f32,
    /// Cosmetic spin (radians/frame)
    pub rotation_speed: f32,
    pub rotation: f32,
}

impl FallingObject {
    /// Fall and spin by one tick's worth of movement
    pub fn advance(&mut self, delta_frames: f32, speed_multiplier: f32) {
        self.pos.y += self.vertical_speed * delta_frames * speed_multiplier;
        self.rotation += self.rotation_speed * delta_frames;
    }

    /// Crazy mode drift. `rx`, `ry`, `rr` are uniform draws in [0, 1).
    pub fn drift(&mut self, rx: f32, ry: f32, rr: f32, delta_frames: f32, screen_width: f32) {
        self.pos.x += (rx - 0.5) * CRAZY_JITTER_X * delta_frames;
        self.pos.y += (ry - 0.5) * CRAZY_JITTER_Y * delta_frames;
        self.rotation += (rr - 0.5) * CRAZY_JITTER_ROTATION * delta_frames;
        self.pos.x = self
            .pos
            .x
            .clamp(CRAZY_EDGE_MARGIN, screen_width - CRAZY_EDGE_MARGIN);
    }
}

/// Held horizontal input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveDirection {
    #[default]
    None,
    Left,
    Right,
}

/// The player's basket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Basket {
    /// Horizontal center
    pub x: f32,
    /// Visual tilt (radians)
    pub rotation: f32,
}

impl Basket {
    pub fn centered(config: &GameConfig) -> Self {
        Self {
            x: config.screen_width / 2.0,
            rotation: 0.0,
        }
    }

    /// Move toward the held direction, ease the tilt, stay on screen
    pub fn steer(&mut self, direction: MoveDirection, delta_frames: f32, config: &GameConfig) {
        let step = config.basket_speed * delta_frames;
        let target_rotation = match direction {
            MoveDirection::Left => {
                self.x -= step;
                -BASKET_TILT
            }
            MoveDirection::Right => {
                self.x += step;
                BASKET_TILT
            }
            MoveDirection::None => 0.0,
        };

        self.rotation += (target_rotation - self.rotation) * BASKET_TILT_EASING;

        let half_width = config.basket_width / 2.0;
        self.x = self.x.max(half_width).min(config.screen_width - half_width);
    }

    /// Center of the catch hitbox
    pub fn position(&self, config: &GameConfig) -> Vec2 {
        Vec2::new(self.x, config.basket_y())
    }
}

/// Events produced by a tick, consumed by presentation collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    SessionStarted {
        seed: u64,
    },
    Spawned {
        id: u32,
        kind: ObjectKind,
        pos: Vec2,
        /// Per-frame velocity at the current speed multiplier
        velocity_hint: Vec2,
    },
    Caught {
        id: u32,
        kind: ObjectKind,
        pos: Vec2,
        score_delta: i64,
        score: i64,
    },
    /// Object fell past the floor
    Exited {
        id: u32,
    },
    CrazyModeEntered,
    Terminated {
        reason: TerminalReason,
        final_score: i64,
    },
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Score (may go negative)
    pub score: i64,
    /// Elapsed game time
    pub clock: Clock,
    /// Current phase
    pub phase: GamePhase,
    /// One-shot crazy-mode latch
    pub scheduler: Scheduler,
    /// Speed/spawn values in effect for this tick
    pub difficulty: DifficultyState,
    /// Spawn timer
    pub spawner: Spawner,
    /// False once terminated
    pub active: bool,
    /// Set exactly once, on termination
    pub terminal: Option<TerminalReason>,
    /// Player basket
    pub basket: Basket,
    /// Live falling objects (in spawn order)
    pub objects: Vec<FallingObject>,
    /// Session RNG
    pub rng: Pcg32,
    /// Events waiting to be drained
    events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameSession {
    /// Create a fresh, active session.
    ///
    /// `config` must have passed [`GameConfig::validate`] (as `Game::start`
    /// ensures), and every later `tick` must get the same config.
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let scheduler = Scheduler::default();
        let difficulty = scheduler.peek(0.0, config);
        let mut session = Self {
            seed,
            score: 0,
            clock: Clock::new(config.game_duration),
            phase: GamePhase::Easy,
            scheduler,
            difficulty,
            spawner: Spawner::default(),
            active: true,
            terminal: None,
            basket: Basket::centered(config),
            objects: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        };
        session.push_event(GameEvent::SessionStarted { seed });
        session
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn remaining_seconds(&self) -> f32 {
        self.clock.remaining()
    }

    pub fn crazy_mode_activated(&self) -> bool {
        self.scheduler.crazy_mode_activated()
    }

    /// ID the next spawned entity will get
    pub fn peek_next_id(&self) -> u32 {
        self.next_id
    }

    /// Mark `count` IDs starting at `peek_next_id()` as used
    pub fn reserve_ids(&mut self, count: u32) {
        self.next_id += count;
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
