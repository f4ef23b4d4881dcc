//! Session controller
//!
//! `Game` owns the configuration and at most one `GameSession`. The host
//! calls `start` on the start/restart button, `on_basket_move` from input,
//! and `on_tick` from its frame callback. While paused the host must not
//! drive ticks; any that still arrive are ignored so no time or spawns leak
//! through.

use serde::Serialize;

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::hud;
use crate::sim::{
    Basket, DifficultyState, FallingObject, GameEvent, GamePhase, GameSession, MoveDirection,
    TerminalReason, TickInput, tick,
};

/// Which way a key steers the basket, if at all
pub fn key_direction(key: &str) -> Option<MoveDirection> {
    match key {
        "a" | "A" | "ArrowLeft" => Some(MoveDirection::Left),
        "d" | "D" | "ArrowRight" => Some(MoveDirection::Right),
        _ => None,
    }
}

/// Held left/right keys; both or neither means no movement
#[derive(Debug, Clone, Copy, Default)]
pub struct HeldKeys {
    left: bool,
    right: bool,
}

impl HeldKeys {
    /// Update from a key event. Returns false for keys that don't steer.
    pub fn set(&mut self, key: &str, down: bool) -> bool {
        match key_direction(key) {
            Some(MoveDirection::Left) => self.left = down,
            Some(MoveDirection::Right) => self.right = down,
            _ => return false,
        }
        true
    }

    pub fn direction(&self) -> MoveDirection {
        match (self.left, self.right) {
            (true, false) => MoveDirection::Left,
            (false, true) => MoveDirection::Right,
            _ => MoveDirection::None,
        }
    }
}

/// Read-only view of a session for HUD/rendering hosts
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub score: i64,
    pub elapsed_seconds: f32,
    pub remaining_seconds: f32,
    pub phase: GamePhase,
    pub crazy_mode_activated: bool,
    pub active: bool,
    pub terminal: Option<TerminalReason>,
    pub difficulty: DifficultyState,
    pub basket: Basket,
    pub basket_y: f32,
    pub objects: Vec<FallingObject>,
    pub score_label: String,
    pub timer_label: String,
}

/// Core controller owning the single live session
#[derive(Debug)]
pub struct Game {
    /// Validated config the current session runs on
    config: GameConfig,
    /// Config the next `start` validates and adopts
    next_config: GameConfig,
    session: Option<GameSession>,
    input: TickInput,
    paused: bool,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self {
            next_config: config.clone(),
            config,
            session: None,
            input: TickInput::default(),
            paused: false,
        }
    }

    /// Config of the current session
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Replace the configuration. The running session keeps its own; the
    /// new one is validated and adopted by the next `start`.
    pub fn set_config(&mut self, config: GameConfig) {
        self.next_config = config;
    }

    /// Start (or restart) a session. The old session, if any, is dropped.
    /// On error the current session keeps running untouched.
    pub fn start(&mut self, seed: u64) -> Result<(), ConfigError> {
        self.next_config.validate()?;
        self.config = self.next_config.clone();
        log::info!(
            "Starting session (seed {}, {}s, crazy at {}s)",
            seed,
            self.config.game_duration,
            self.config.crazy_mode_start()
        );
        self.session = Some(GameSession::new(&self.config, seed));
        self.input = TickInput::default();
        self.paused = false;
        Ok(())
    }

    /// Set the held basket direction
    pub fn on_basket_move(&mut self, direction: MoveDirection) {
        self.input.direction = direction;
    }

    /// Advance one frame and return the events it produced
    pub fn on_tick(&mut self, delta_frames: f32) -> Vec<GameEvent> {
        if self.paused {
            return Vec::new();
        }
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        tick(session, &self.config, &self.input, delta_frames);
        session.drain_events()
    }

    /// Events queued outside a tick (e.g. the start event)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.session
            .as_mut()
            .map(GameSession::drain_events)
            .unwrap_or_default()
    }

    pub fn pause(&mut self) {
        if self.is_active() && !self.paused {
            log::info!("Paused");
            self.paused = true;
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            log::info!("Resumed");
            self.paused = false;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.active)
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn score(&self) -> i64 {
        self.session.as_ref().map_or(0, |s| s.score)
    }

    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        let s = self.session.as_ref()?;
        Some(SessionSnapshot {
            score: s.score,
            elapsed_seconds: s.elapsed_seconds(),
            remaining_seconds: s.remaining_seconds(),
            phase: s.phase,
            crazy_mode_activated: s.crazy_mode_activated(),
            active: s.active,
            terminal: s.terminal,
            difficulty: s.difficulty,
            basket: s.basket.clone(),
            basket_y: self.config.basket_y(),
            objects: s.objects.clone(),
            score_label: hud::score_label(s.score),
            timer_label: hud::timer_label(s.remaining_seconds()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_rejected_at_start() {
        let mut game = Game::new(GameConfig {
            game_duration: -10.0,
            ..Default::default()
        });
        assert!(game.start(1).is_err());
        assert!(game.session().is_none());
        assert!(game.on_tick(1.0).is_empty());
    }

    #[test]
    fn test_start_emits_event() {
        let mut game = Game::new(GameConfig::default());
        game.start(5).expect("valid config");
        assert!(game.is_active());
        assert_eq!(
            game.drain_events(),
            vec![GameEvent::SessionStarted { seed: 5 }]
        );
    }

    #[test]
    fn test_pause_freezes_time_and_spawns() {
        let mut game = Game::new(GameConfig::default());
        game.start(5).expect("valid config");
        game.on_tick(1.0);
        game.pause();
        assert!(game.is_paused());
        for _ in 0..500 {
            assert!(game.on_tick(1.0).is_empty());
        }
        let snap = game.snapshot().expect("session");
        assert!((snap.elapsed_seconds - 1.0 / 60.0).abs() < 1e-6);
        assert!(snap.objects.is_empty());

        game.resume();
        game.on_tick(1.0);
        let snap = game.snapshot().expect("session");
        assert!((snap.elapsed_seconds - 2.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut game = Game::new(GameConfig::default());
        game.start(5).expect("valid config");
        game.on_basket_move(MoveDirection::Left);
        for _ in 0..300 {
            game.on_tick(1.0);
        }
        assert!(game.snapshot().expect("session").elapsed_seconds > 4.0);

        game.start(6).expect("valid config");
        let snap = game.snapshot().expect("session");
        assert_eq!(snap.score, 0);
        assert_eq!(snap.elapsed_seconds, 0.0);
        assert!(snap.objects.is_empty());
        assert!(!snap.crazy_mode_activated);
        assert_eq!(snap.basket.x, 400.0);
        // Held input is cleared too
        game.on_tick(1.0);
        assert_eq!(game.snapshot().expect("session").basket.x, 400.0);
    }

    #[test]
    fn test_set_config_waits_for_start() {
        let mut game = Game::new(GameConfig::default());
        game.start(1).expect("valid config");
        game.set_config(GameConfig {
            basket_width: 2000.0,
            ..Default::default()
        });
        game.on_basket_move(MoveDirection::Right);
        for _ in 0..10 {
            game.on_tick(1.0);
        }
        assert_eq!(game.config().basket_width, 100.0);
        assert!(game.is_active());

        // Rejected at start; the running session is kept
        assert!(game.start(2).is_err());
        assert_eq!(game.session().expect("session").seed, 1);
    }

    #[test]
    fn test_set_config_applies_on_restart() {
        let mut game = Game::new(GameConfig::default());
        game.start(1).expect("valid config");
        game.set_config(GameConfig {
            easy_phase: 1.0,
            ..Default::default()
        });
        for _ in 0..120 {
            game.on_tick(1.0);
        }
        assert_eq!(game.snapshot().expect("session").phase, GamePhase::Easy);

        game.start(2).expect("valid config");
        for _ in 0..120 {
            game.on_tick(1.0);
        }
        assert_eq!(game.config().easy_phase, 1.0);
        assert_eq!(game.snapshot().expect("session").phase, GamePhase::Ramp);
    }

    #[test]
    fn test_held_keys() {
        let mut keys = HeldKeys::default();
        assert!(keys.set("ArrowLeft", true));
        assert_eq!(keys.direction(), MoveDirection::Left);
        assert!(keys.set("D", true));
        assert_eq!(keys.direction(), MoveDirection::None);
        assert!(keys.set("a", false));
        assert_eq!(keys.direction(), MoveDirection::Right);
        assert!(!keys.set("Space", true));
    }

    #[test]
    fn test_snapshot_labels() {
        let mut game = Game::new(GameConfig::default());
        assert!(game.snapshot().is_none());
        game.start(5).expect("valid config");
        let snap = game.snapshot().expect("session");
        assert_eq!(snap.timer_label, "⏰ 2:00");
        assert_eq!(snap.score_label, "🥚 0");
    }
}
