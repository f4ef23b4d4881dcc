//! Per-frame simulation tick
//!
//! Order within a tick: basket, clock, scheduler, spawner, object sweep,
//! end-condition gate. Nothing runs once the session is inactive.

use glam::Vec2;
use rand::Rng;

use super::collision::{self, Outcome};
use super::gate;
use super::spawner::SpawnContext;
use super::state::{GameEvent, GameSession, MoveDirection, TerminalReason};
use crate::config::GameConfig;
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Held basket direction
    pub direction: MoveDirection,
}

/// Clamp a host-reported delta into [0, MAX_DELTA_FRAMES]
pub fn clamp_delta(delta_frames: f32) -> f32 {
    if delta_frames.is_finite() {
        delta_frames.clamp(0.0, MAX_DELTA_FRAMES)
    } else {
        0.0
    }
}

/// Advance the session by `delta_frames` nominal 60 fps frames.
///
/// `config` must be the validated config the session was created with.
pub fn tick(session: &mut GameSession, config: &GameConfig, input: &TickInput, delta_frames: f32) {
    if !session.active {
        return;
    }
    let delta = clamp_delta(delta_frames);

    session.basket.steer(input.direction, delta, config);

    session.clock.advance(delta);
    let elapsed = session.elapsed_seconds();

    let update = session.scheduler.update(elapsed, config);
    session.difficulty = update.difficulty;
    if update.crazy_entered {
        log::info!("Crazy mode! ({:.1}s elapsed, score {})", elapsed, session.score);
        session.push_event(GameEvent::CrazyModeEntered);
    }
    session.phase = session
        .clock
        .phase(config.easy_phase, session.crazy_mode_activated());

    spawn(session, config, delta, elapsed);
    sweep(session, config, delta);
    gate::enforce(session, config);
}

fn spawn(session: &mut GameSession, config: &GameConfig, delta: f32, elapsed: f32) {
    let ctx = SpawnContext {
        elapsed,
        spawn_interval: session.difficulty.spawn_interval,
        crazy: session.crazy_mode_activated(),
    };
    let first_id = session.peek_next_id();
    let batch = session
        .spawner
        .try_spawn(delta, ctx, config, &mut session.rng, first_id);
    if batch.is_empty() {
        return;
    }
    session.reserve_ids(batch.len() as u32);
    log::debug!(
        "Spawned batch of {} at {:.2}s (interval {:.1})",
        batch.len(),
        elapsed,
        ctx.spawn_interval
    );

    let speed = session.difficulty.speed_multiplier;
    for obj in batch {
        session.push_event(GameEvent::Spawned {
            id: obj.id,
            kind: obj.kind,
            pos: obj.pos,
            velocity_hint: Vec2::new(0.0, obj.vertical_speed * speed),
        });
        session.objects.push(obj);
    }
}

/// Move, perturb and resolve every live object.
///
/// Objects are visited newest first. A catch that drops the score to the
/// death threshold ends the session on the spot: objects not yet visited
/// this tick are left untouched and nothing else is scored.
fn sweep(session: &mut GameSession, config: &GameConfig, delta: f32) {
    let speed = session.difficulty.speed_multiplier;
    let crazy = session.crazy_mode_activated();
    let basket = session.basket.position(config);
    let mut removed = vec![false; session.objects.len()];

    for idx in (0..session.objects.len()).rev() {
        let obj = &mut session.objects[idx];
        obj.advance(delta, speed);
        if crazy {
            let rx = session.rng.random::<f32>();
            let ry = session.rng.random::<f32>();
            let rr = session.rng.random::<f32>();
            obj.drift(rx, ry, rr, delta, config.screen_width);
        }

        let (id, kind, pos) = (obj.id, obj.kind, obj.pos);
        match collision::resolve(pos, basket, config) {
            Outcome::Caught => {
                removed[idx] = true;
                let score_delta = kind.score_delta();
                session.score += score_delta;
                session.push_event(GameEvent::Caught {
                    id,
                    kind,
                    pos,
                    score_delta,
                    score: session.score,
                });
                if gate::is_dead(session.score, config) {
                    gate::terminate(session, TerminalReason::Death);
                    break;
                }
            }
            Outcome::Exited => {
                removed[idx] = true;
                session.push_event(GameEvent::Exited { id });
            }
            Outcome::Live => {}
        }
    }

    let mut idx = 0;
    session.objects.retain(|_| {
        let keep = !removed[idx];
        idx += 1;
        keep
    });
}
