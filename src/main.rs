//! Egg Catcher entry point
//!
//! The browser build is driven from JavaScript through `egg_catcher::web`.
//! Natively this runs a headless session with the autopilot steering, which
//! is handy for tuning the difficulty curve.
//!
//! Usage: `egg-catcher [config.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use egg_catcher::audio::SoundEffect;
    use egg_catcher::hud;
    use egg_catcher::sim::{ObjectKind, TerminalReason};
    use egg_catcher::{Dispatcher, Game, GameConfig, PresentError, Presenter, autopilot};

    /// Presenter that only logs, and counts what it saw
    #[derive(Default)]
    struct LogPresenter {
        spawned: u32,
        caught: [u32; 4],
        terminal: Option<(TerminalReason, i64)>,
    }

    impl Presenter for LogPresenter {
        fn request_spawn_visual(
            &mut self,
            id: u32,
            kind: ObjectKind,
            pos: Vec2,
            _velocity_hint: Vec2,
        ) -> Result<(), PresentError> {
            self.spawned += 1;
            log::trace!("spawn #{id} {kind:?} at x={:.0}", pos.x);
            Ok(())
        }

        fn notify_catch(
            &mut self,
            id: u32,
            _pos: Vec2,
            label: &str,
            _color: u32,
            kind: ObjectKind,
        ) -> Result<(), PresentError> {
            self.caught[kind as usize] += 1;
            log::debug!("catch #{id} {label}");
            Ok(())
        }

        fn notify_terminal(
            &mut self,
            reason: TerminalReason,
            final_score: i64,
        ) -> Result<(), PresentError> {
            self.terminal = Some((reason, final_score));
            Ok(())
        }

        fn notify_crazy_mode_entered(&mut self) -> Result<(), PresentError> {
            log::info!("Crazy mode!");
            Ok(())
        }

        fn request_sound(&mut self, effect: SoundEffect) -> Result<(), PresentError> {
            log::trace!("sound {}", effect.name());
            Ok(())
        }
    }

    fn load_config(path: Option<&str>) -> Result<GameConfig, Box<dyn std::error::Error>> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                Ok(GameConfig::from_json(&json)?)
            }
            None => Ok(GameConfig::default()),
        }
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let config = load_config(args.first().map(String::as_str))?;
        let seed = match args.get(1) {
            Some(s) => s.parse::<u64>()?,
            None => 42,
        };

        let mut game = Game::new(config);
        game.start(seed)?;

        let mut dispatcher = Dispatcher::new();
        let mut presenter = LogPresenter::default();
        let mut now_ms = 0.0;
        let frame_ms = 1000.0 / 60.0;

        let events = game.drain_events();
        dispatcher.dispatch(&events, now_ms, &mut presenter);

        while game.is_active() {
            if let Some(session) = game.session() {
                let direction = autopilot::steer(session, game.config());
                game.on_basket_move(direction);
            }
            let events = game.on_tick(1.0);
            now_ms += frame_ms;
            dispatcher.dispatch(&events, now_ms, &mut presenter);
        }
        // Let the delayed death sting fire
        dispatcher.flush_delayed(now_ms + 2000.0, &mut presenter);

        let [eggs, bad, bombs, gold] = presenter.caught;
        log::info!(
            "Spawned {}, caught {} eggs, {} bad eggs, {} bombs, {} gold",
            presenter.spawned,
            eggs,
            bad,
            bombs,
            gold
        );
        if let Some((reason, score)) = presenter.terminal {
            println!("{} Final score: {}", hud::terminal_title(reason), score);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Egg Catcher (native, headless) starting...");

    if let Err(e) = headless::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is egg_catcher::web::wasm_main, this is just to satisfy the compiler
}
