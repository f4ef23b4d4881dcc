//! Score/end-condition gate
//!
//! Death is checked before time. Termination happens at most once per
//! session; later calls are no-ops.

use super::state::{GameEvent, GameSession, TerminalReason};
use crate::config::GameConfig;

/// Terminal condition for the current score and clock, if any
pub fn check(session: &GameSession, config: &GameConfig) -> Option<TerminalReason> {
    if is_dead(session.score, config) {
        Some(TerminalReason::Death)
    } else if session.clock.is_expired() {
        Some(TerminalReason::Time)
    } else {
        None
    }
}

/// Score at or below the death threshold
pub fn is_dead(score: i64, config: &GameConfig) -> bool {
    score <= config.death_score
}

/// End the session and emit the terminal event.
/// Returns false (and changes nothing) if it had already ended.
pub fn terminate(session: &mut GameSession, reason: TerminalReason) -> bool {
    if !session.active {
        return false;
    }
    session.active = false;
    session.terminal = Some(reason);
    log::info!(
        "Session over ({}) at {:.1}s, final score {}",
        reason.as_str(),
        session.elapsed_seconds(),
        session.score
    );
    session.push_event(GameEvent::Terminated {
        reason,
        final_score: session.score,
    });
    true
}

/// Run the end-of-tick check, terminating if a condition holds
pub fn enforce(session: &mut GameSession, config: &GameConfig) -> Option<TerminalReason> {
    if !session.active {
        return None;
    }
    let reason = check(session, config)?;
    terminate(session, reason);
    Some(reason)
}
