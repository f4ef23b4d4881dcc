//! Browser bindings
//!
//! `WebGame` is what the page's JavaScript drives: it forwards input and
//! frame callbacks to the core, plays sounds through Web Audio, and queues
//! render commands as JSON for the page to apply (sprites, floating labels,
//! background tint, overlays).

use glam::Vec2;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::GameConfig;
use crate::audio::{AudioManager, SoundEffect};
use crate::consts::*;
use crate::error::PresentError;
use crate::events::{Dispatcher, Presenter, ScreenEffect};
use crate::game::{Game, HeldKeys};
use crate::hud;
use crate::sim::{ObjectKind, TerminalReason};

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    // Already initialised when the module is instantiated twice
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Egg Catcher starting...");
}

/// Render-side work for the page, drained once per frame
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "cmd", rename_all = "camelCase")]
enum RenderCommand {
    Reset,
    Spawn {
        id: u32,
        kind: ObjectKind,
        pos: Vec2,
        velocity_hint: Vec2,
    },
    Remove {
        id: u32,
    },
    FloatingLabel {
        id: u32,
        pos: Vec2,
        label: String,
        color: u32,
    },
    Background {
        color: u32,
        shake: f32,
    },
    Shake {
        intensity: f32,
        frames: f32,
    },
    Blackout,
    GameOver {
        title: &'static str,
        reason: TerminalReason,
        final_score: i64,
    },
    /// Game-over panel score, counting up toward the final score
    Tally {
        value: i64,
        done: bool,
    },
}

/// Presenter that queues render commands and plays audio directly
struct JsPresenter {
    audio: AudioManager,
    commands: Vec<RenderCommand>,
}

impl JsPresenter {
    fn new() -> Self {
        Self {
            audio: AudioManager::new(),
            commands: Vec::new(),
        }
    }
}

impl Presenter for JsPresenter {
    fn request_spawn_visual(
        &mut self,
        id: u32,
        kind: ObjectKind,
        pos: Vec2,
        velocity_hint: Vec2,
    ) -> Result<(), PresentError> {
        self.commands.push(RenderCommand::Spawn {
            id,
            kind,
            pos,
            velocity_hint,
        });
        Ok(())
    }

    fn notify_catch(
        &mut self,
        id: u32,
        pos: Vec2,
        label: &str,
        color: u32,
        _kind: ObjectKind,
    ) -> Result<(), PresentError> {
        self.commands.push(RenderCommand::Remove { id });
        self.commands.push(RenderCommand::FloatingLabel {
            id,
            pos,
            label: label.to_string(),
            color,
        });
        Ok(())
    }

    fn notify_terminal(
        &mut self,
        reason: TerminalReason,
        final_score: i64,
    ) -> Result<(), PresentError> {
        self.audio.stop_bgm();
        self.audio.set_region_mode(false);
        self.commands.push(RenderCommand::Background {
            color: NORMAL_BACKGROUND,
            shake: 0.0,
        });
        self.commands.push(RenderCommand::GameOver {
            title: hud::terminal_title(reason),
            reason,
            final_score,
        });
        Ok(())
    }

    fn notify_crazy_mode_entered(&mut self) -> Result<(), PresentError> {
        self.audio.set_region_mode(true);
        self.commands.push(RenderCommand::Background {
            color: CRAZY_BACKGROUND,
            shake: CRAZY_SHAKE_AMPLITUDE,
        });
        Ok(())
    }

    fn request_sound(&mut self, effect: SoundEffect) -> Result<(), PresentError> {
        self.audio.play(effect);
        Ok(())
    }

    fn notify_exit(&mut self, id: u32) -> Result<(), PresentError> {
        self.commands.push(RenderCommand::Remove { id });
        Ok(())
    }

    fn request_screen_effect(&mut self, effect: ScreenEffect) -> Result<(), PresentError> {
        self.commands.push(match effect {
            ScreenEffect::Shake { intensity, frames } => RenderCommand::Shake { intensity, frames },
            ScreenEffect::Blackout => RenderCommand::Blackout,
        });
        Ok(())
    }

    fn notify_session_started(&mut self) -> Result<(), PresentError> {
        self.audio.set_region_mode(false);
        self.commands.clear();
        self.commands.push(RenderCommand::Reset);
        self.commands.push(RenderCommand::Background {
            color: NORMAL_BACKGROUND,
            shake: 0.0,
        });
        Ok(())
    }

    fn update_score_tally(&mut self, value: i64, done: bool) -> Result<(), PresentError> {
        self.commands.push(RenderCommand::Tally { value, done });
        Ok(())
    }
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or_else(js_sys::Date::now, |p| p.now())
}

/// Game handle exported to JavaScript
#[wasm_bindgen]
pub struct WebGame {
    game: Game,
    dispatcher: Dispatcher,
    presenter: JsPresenter,
    keys: HeldKeys,
}

#[wasm_bindgen]
impl WebGame {
    /// Create from a JSON config; empty string means defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WebGame, JsValue> {
        let config = if config_json.trim().is_empty() {
            GameConfig::default()
        } else {
            GameConfig::from_json(config_json).map_err(js_error)?
        };
        Ok(Self {
            game: Game::new(config),
            dispatcher: Dispatcher::new(),
            presenter: JsPresenter::new(),
            keys: HeldKeys::default(),
        })
    }

    /// Start or restart; a seed of 0 picks one from the clock
    pub fn start(&mut self, seed: f64) -> Result<(), JsValue> {
        let seed = if seed > 0.0 {
            seed as u64
        } else {
            js_sys::Date::now() as u64
        };
        self.game.start(seed).map_err(js_error)?;
        self.keys = HeldKeys::default();
        let events = self.game.drain_events();
        self.dispatcher.dispatch(&events, now_ms(), &mut self.presenter);
        Ok(())
    }

    /// Frame callback; `delta` is in 60 fps frames. Keep calling it after
    /// game over so delayed sounds and the score tally finish.
    pub fn tick(&mut self, delta: f32) {
        let events = self.game.on_tick(delta);
        self.dispatcher.dispatch(&events, now_ms(), &mut self.presenter);
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        self.set_key(key, true)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.set_key(key, false)
    }

    pub fn pause(&mut self) {
        self.game.pause();
        self.presenter.audio.stop_bgm();
    }

    pub fn resume(&mut self) {
        if self.game.is_paused() {
            self.game.resume();
            self.presenter.audio.play(SoundEffect::Bgm);
        }
    }

    pub fn is_active(&self) -> bool {
        self.game.is_active()
    }

    /// Current session state as JSON (`null` before the first start)
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.snapshot()).map_err(js_error)
    }

    /// Drain queued render commands as a JSON array
    pub fn take_commands(&mut self) -> Result<String, JsValue> {
        let commands = std::mem::take(&mut self.presenter.commands);
        serde_json::to_string(&commands).map_err(js_error)
    }

    pub fn set_master_gain(&mut self, gain: f32) {
        self.presenter.audio.mixer_mut().set_master_gain(gain);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.presenter.audio.mixer_mut().set_muted(muted);
    }

    /// UI click sound
    pub fn button_sound(&mut self) {
        self.presenter.audio.play(SoundEffect::Button);
    }
}

impl WebGame {
    fn set_key(&mut self, key: &str, down: bool) -> bool {
        if !self.keys.set(key, down) {
            return false;
        }
        self.game.on_basket_move(self.keys.direction());
        true
    }
}
