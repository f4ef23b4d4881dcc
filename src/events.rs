//! Collaborator boundary
//!
//! The simulation emits `GameEvent`s; the `Dispatcher` turns them into calls
//! on a `Presenter` (renderer, audio, overlays). Presenter calls are
//! fire-and-forget: an `Err` is logged and dropped, never retried, and never
//! reaches the simulation.

use glam::Vec2;

use crate::audio::{SoundEffect, SoundGate};
use crate::consts::*;
use crate::error::PresentError;
use crate::hud::{ScoreTally, catch_style};
use crate::sim::{GameEvent, ObjectKind, TerminalReason};

/// Screen-level effects a presenter may render
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScreenEffect {
    /// Damped shake
    Shake { intensity: f32, frames: f32 },
    /// Short fade to black and back
    Blackout,
}

/// Presentation collaborator driven by the core
pub trait Presenter {
    fn request_spawn_visual(
        &mut self,
        id: u32,
        kind: ObjectKind,
        pos: Vec2,
        velocity_hint: Vec2,
    ) -> Result<(), PresentError>;

    fn notify_catch(
        &mut self,
        id: u32,
        pos: Vec2,
        label: &str,
        color: u32,
        kind: ObjectKind,
    ) -> Result<(), PresentError>;

    fn notify_terminal(&mut self, reason: TerminalReason, final_score: i64)
    -> Result<(), PresentError>;

    /// Tint the background and start the ambient shake
    fn notify_crazy_mode_entered(&mut self) -> Result<(), PresentError>;

    fn request_sound(&mut self, effect: SoundEffect) -> Result<(), PresentError>;

    /// An object left the field without being caught
    fn notify_exit(&mut self, _id: u32) -> Result<(), PresentError> {
        Ok(())
    }

    fn request_screen_effect(&mut self, _effect: ScreenEffect) -> Result<(), PresentError> {
        Ok(())
    }

    /// A new session began; clear leftover sprites and overlays
    fn notify_session_started(&mut self) -> Result<(), PresentError> {
        Ok(())
    }

    /// One frame of the game-over score count-up
    fn update_score_tally(&mut self, _value: i64, _done: bool) -> Result<(), PresentError> {
        Ok(())
    }
}

/// Routes events to a presenter, applying the sound policy
#[derive(Debug, Default)]
pub struct Dispatcher {
    gate: SoundGate,
    crazy: bool,
    /// Sounds waiting for their due time (ms)
    delayed: Vec<(f64, SoundEffect)>,
    /// Game-over count-up, stepped once per dispatch until it lands
    tally: Option<ScoreTally>,
    failures: u64,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Presenter calls that returned an error so far
    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Sounds scheduled but not yet played
    pub fn pending_sounds(&self) -> usize {
        self.delayed.len()
    }

    /// Forward `events` to `presenter`. `now_ms` drives sound cooldowns and
    /// delayed sounds; call this every frame, even with no events, so the
    /// delayed sounds and the score tally keep moving.
    pub fn dispatch<P: Presenter>(&mut self, events: &[GameEvent], now_ms: f64, presenter: &mut P) {
        self.flush_delayed(now_ms, presenter);

        for event in events {
            match event {
                GameEvent::SessionStarted { .. } => {
                    self.crazy = false;
                    self.gate.reset();
                    self.delayed.clear();
                    self.tally = None;
                    self.record(presenter.notify_session_started());
                    self.sound(SoundEffect::Bgm, now_ms, presenter);
                }
                GameEvent::Spawned {
                    id,
                    kind,
                    pos,
                    velocity_hint,
                } => {
                    self.record(presenter.request_spawn_visual(*id, *kind, *pos, *velocity_hint));
                    if *kind == ObjectKind::Bomb {
                        self.sound(SoundEffect::BombFall, now_ms, presenter);
                    }
                }
                GameEvent::Caught { id, kind, pos, .. } => {
                    let style = catch_style(*kind);
                    self.record(presenter.notify_catch(*id, *pos, style.label, style.color, *kind));
                    self.sound(SoundEffect::for_catch(*kind), now_ms, presenter);
                    if *kind == ObjectKind::Bomb {
                        self.record(presenter.request_screen_effect(ScreenEffect::Shake {
                            intensity: BOMB_SHAKE_INTENSITY,
                            frames: BOMB_SHAKE_FRAMES,
                        }));
                        self.record(presenter.request_screen_effect(ScreenEffect::Blackout));
                    }
                }
                GameEvent::Exited { id } => {
                    self.record(presenter.notify_exit(*id));
                }
                GameEvent::CrazyModeEntered => {
                    self.crazy = true;
                    self.record(presenter.notify_crazy_mode_entered());
                }
                GameEvent::Terminated {
                    reason,
                    final_score,
                } => {
                    self.crazy = false;
                    self.record(presenter.notify_terminal(*reason, *final_score));
                    self.tally = Some(ScoreTally::new(*final_score));
                    match reason {
                        TerminalReason::Death => {
                            let due = now_ms + DEATH_SOUND_DELAY_MS;
                            self.delayed.push((due, SoundEffect::Death));
                        }
                        TerminalReason::Time => {
                            self.sound(SoundEffect::GameOver, now_ms, presenter);
                        }
                    }
                }
            }
        }

        self.step_tally(presenter);
    }

    /// Whether the game-over count-up is still running
    pub fn is_tallying(&self) -> bool {
        self.tally.is_some()
    }

    fn step_tally<P: Presenter>(&mut self, presenter: &mut P) {
        let Some(tally) = self.tally.as_mut() else {
            return;
        };
        let value = tally.step();
        let done = tally.is_done();
        if done {
            self.tally = None;
        }
        self.record(presenter.update_score_tally(value, done));
    }

    /// Play any delayed sounds that are due
    pub fn flush_delayed<P: Presenter>(&mut self, now_ms: f64, presenter: &mut P) {
        if self.delayed.is_empty() {
            return;
        }
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.delayed.drain(..).partition(|(at, _)| *at <= now_ms);
        self.delayed = waiting;
        for (_, effect) in due {
            self.sound(effect, now_ms, presenter);
        }
    }

    fn sound<P: Presenter>(&mut self, effect: SoundEffect, now_ms: f64, presenter: &mut P) {
        if !self.gate.allow(effect, now_ms, self.crazy) {
            log::trace!("Dropped {} (cooldown)", effect.name());
            return;
        }
        self.record(presenter.request_sound(effect));
    }

    fn record(&mut self, result: Result<(), PresentError>) {
        if let Err(e) = result {
            self.failures += 1;
            log::warn!("{e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every call; optionally fails all of them
    #[derive(Default)]
    struct Recorder {
        sounds: Vec<SoundEffect>,
        catches: Vec<(String, u32)>,
        spawns: usize,
        terminal: Option<(TerminalReason, i64)>,
        crazy: usize,
        effects: Vec<ScreenEffect>,
        started: usize,
        tally: Vec<(i64, bool)>,
        fail: bool,
    }

    impl Recorder {
        fn result(&self) -> Result<(), PresentError> {
            if self.fail {
                Err(PresentError::new("boom"))
            } else {
                Ok(())
            }
        }
    }

    impl Presenter for Recorder {
        fn request_spawn_visual(
            &mut self,
            _id: u32,
            _kind: ObjectKind,
            _pos: Vec2,
            _velocity_hint: Vec2,
        ) -> Result<(), PresentError> {
            self.spawns += 1;
            self.result()
        }

        fn notify_catch(
            &mut self,
            _id: u32,
            _pos: Vec2,
            label: &str,
            color: u32,
            _kind: ObjectKind,
        ) -> Result<(), PresentError> {
            self.catches.push((label.to_string(), color));
            self.result()
        }

        fn notify_terminal(
            &mut self,
            reason: TerminalReason,
            final_score: i64,
        ) -> Result<(), PresentError> {
            self.terminal = Some((reason, final_score));
            self.result()
        }

        fn notify_crazy_mode_entered(&mut self) -> Result<(), PresentError> {
            self.crazy += 1;
            self.result()
        }

        fn request_sound(&mut self, effect: SoundEffect) -> Result<(), PresentError> {
            self.sounds.push(effect);
            self.result()
        }

        fn request_screen_effect(&mut self, effect: ScreenEffect) -> Result<(), PresentError> {
            self.effects.push(effect);
            self.result()
        }

        fn notify_session_started(&mut self) -> Result<(), PresentError> {
            self.started += 1;
            self.result()
        }

        fn update_score_tally(&mut self, value: i64, done: bool) -> Result<(), PresentError> {
            self.tally.push((value, done));
            self.result()
        }
    }

    fn bomb_spawn(id: u32) -> GameEvent {
        GameEvent::Spawned {
            id,
            kind: ObjectKind::Bomb,
            pos: Vec2::new(100.0, -50.0),
            velocity_hint: Vec2::new(0.0, 4.25),
        }
    }

    #[test]
    fn test_bomb_fall_sound_rate_limited() {
        let mut dispatcher = Dispatcher::new();
        let mut presenter = Recorder::default();
        dispatcher.dispatch(&[bomb_spawn(1), bomb_spawn(2)], 0.0, &mut presenter);
        dispatcher.dispatch(&[bomb_spawn(3)], 50.0, &mut presenter);
        dispatcher.dispatch(&[bomb_spawn(4)], 150.0, &mut presenter);
        assert_eq!(presenter.spawns, 4);
        assert_eq!(presenter.sounds, vec![SoundEffect::BombFall; 2]);
    }

    #[test]
    fn test_crazy_mode_lengthens_cooldown() {
        let mut dispatcher = Dispatcher::new();
        let mut presenter = Recorder::default();
        dispatcher.dispatch(
            &[GameEvent::CrazyModeEntered, bomb_spawn(1)],
            0.0,
            &mut presenter,
        );
        dispatcher.dispatch(&[bomb_spawn(2)], 300.0, &mut presenter);
        dispatcher.dispatch(&[bomb_spawn(3)], 500.0, &mut presenter);
        assert_eq!(presenter.crazy, 1);
        assert_eq!(presenter.sounds.len(), 2);
    }

    #[test]
    fn test_bomb_catch_effects() {
        let mut dispatcher = Dispatcher::new();
        let mut presenter = Recorder::default();
        let caught = GameEvent::Caught {
            id: 1,
            kind: ObjectKind::Bomb,
            pos: Vec2::new(400.0, 500.0),
            score_delta: -50,
            score: -50,
        };
        dispatcher.dispatch(&[caught], 0.0, &mut presenter);
        assert_eq!(presenter.catches, vec![("-50 💥".to_string(), 0xFF0000)]);
        assert_eq!(presenter.sounds, vec![SoundEffect::BombBlow]);
        assert_eq!(presenter.effects.len(), 2);
        assert_eq!(presenter.effects[1], ScreenEffect::Blackout);
    }

    #[test]
    fn test_death_sound_is_delayed() {
        let mut dispatcher = Dispatcher::new();
        let mut presenter = Recorder::default();
        let terminated = GameEvent::Terminated {
            reason: TerminalReason::Death,
            final_score: -110,
        };
        dispatcher.dispatch(&[terminated], 1000.0, &mut presenter);
        assert_eq!(presenter.terminal, Some((TerminalReason::Death, -110)));
        assert!(presenter.sounds.is_empty());
        assert_eq!(dispatcher.pending_sounds(), 1);

        dispatcher.dispatch(&[], 1500.0, &mut presenter);
        assert!(presenter.sounds.is_empty());
        dispatcher.dispatch(&[], 2000.0, &mut presenter);
        assert_eq!(presenter.sounds, vec![SoundEffect::Death]);
        assert_eq!(dispatcher.pending_sounds(), 0);
    }

    #[test]
    fn test_time_up_sound_immediate() {
        let mut dispatcher = Dispatcher::new();
        let mut presenter = Recorder::default();
        let terminated = GameEvent::Terminated {
            reason: TerminalReason::Time,
            final_score: 250,
        };
        dispatcher.dispatch(&[terminated], 0.0, &mut presenter);
        assert_eq!(presenter.sounds, vec![SoundEffect::GameOver]);
    }

    #[test]
    fn test_presenter_failures_are_swallowed() {
        let mut dispatcher = Dispatcher::new();
        let mut presenter = Recorder {
            fail: true,
            ..Default::default()
        };
        dispatcher.dispatch(
            &[GameEvent::SessionStarted { seed: 1 }, bomb_spawn(1)],
            0.0,
            &mut presenter,
        );
        // started + bgm + spawn visual + bomb fall
        assert_eq!(dispatcher.failures(), 4);
        assert_eq!(presenter.started, 1);
        assert_eq!(presenter.spawns, 1);
    }

    #[test]
    fn test_score_tally_counts_up_after_game_over() {
        let mut dispatcher = Dispatcher::new();
        let mut presenter = Recorder::default();
        let terminated = GameEvent::Terminated {
            reason: TerminalReason::Time,
            final_score: 370,
        };
        dispatcher.dispatch(&[terminated], 0.0, &mut presenter);
        assert_eq!(presenter.tally, vec![(37, false)]);
        assert!(dispatcher.is_tallying());

        let mut frames = 0;
        while dispatcher.is_tallying() {
            dispatcher.dispatch(&[], 16.0 * frames as f64, &mut presenter);
            frames += 1;
            assert!(frames < 200);
        }
        assert_eq!(presenter.tally.last(), Some(&(370, true)));
        assert!(presenter.tally.windows(2).all(|w| w[0].0 < w[1].0));

        // Nothing more once it has landed
        let reported = presenter.tally.len();
        dispatcher.dispatch(&[], 10_000.0, &mut presenter);
        assert_eq!(presenter.tally.len(), reported);
    }

    #[test]
    fn test_restart_stops_score_tally() {
        let mut dispatcher = Dispatcher::new();
        let mut presenter = Recorder::default();
        dispatcher.dispatch(
            &[GameEvent::Terminated {
                reason: TerminalReason::Death,
                final_score: -120,
            }],
            0.0,
            &mut presenter,
        );
        dispatcher.dispatch(&[GameEvent::SessionStarted { seed: 3 }], 16.0, &mut presenter);
        assert!(!dispatcher.is_tallying());
        assert_eq!(presenter.tally, vec![(-12, false)]);
    }

    #[test]
    fn test_restart_clears_pending_death_sound() {
        let mut dispatcher = Dispatcher::new();
        let mut presenter = Recorder::default();
        dispatcher.dispatch(
            &[GameEvent::Terminated {
                reason: TerminalReason::Death,
                final_score: -100,
            }],
            0.0,
            &mut presenter,
        );
        dispatcher.dispatch(&[GameEvent::SessionStarted { seed: 2 }], 10.0, &mut presenter);
        dispatcher.dispatch(&[], 5000.0, &mut presenter);
        assert_eq!(presenter.sounds, vec![SoundEffect::Bgm]);
    }
}
