//! Idle/demo mode - AI moves the basket
//!
//! Chases the good object that will reach the basket soonest, and sidesteps
//! hazards that are about to land in it. Used by the native runner and for
//! attract-mode demos.

use crate::config::GameConfig;
use crate::consts::*;
use crate::sim::{GameSession, MoveDirection};

/// How far above the catch band a hazard starts to matter (px)
const HAZARD_LOOKAHEAD: f32 = 120.0;
/// Don't twitch when already this close to the target (px)
const DEADZONE: f32 = 6.0;

/// Pick a basket direction for the current session state
pub fn steer(session: &GameSession, config: &GameConfig) -> MoveDirection {
    let basket = session.basket.position(config);
    let reach = config.basket_width / 2.0 + CATCH_SLACK;
    let band_bottom = basket.y + CATCH_BAND_BELOW;
    let lookahead_top = basket.y - CATCH_BAND_ABOVE - HAZARD_LOOKAHEAD;

    // Hazard directly overhead and close: get out from under it
    let threat = session
        .objects
        .iter()
        .filter(|o| o.kind.is_hazard())
        .filter(|o| o.pos.y <= band_bottom && o.pos.y >= lookahead_top)
        .filter(|o| (o.pos.x - basket.x).abs() < reach)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    if let Some(hazard) = threat {
        let escape_left = hazard.pos.x >= basket.x;
        let half_width = config.basket_width / 2.0;
        let room_left = basket.x - half_width > config.basket_speed;
        let room_right = config.screen_width - half_width - basket.x > config.basket_speed;
        return match (escape_left, room_left, room_right) {
            (true, true, _) | (false, true, false) => MoveDirection::Left,
            _ => MoveDirection::Right,
        };
    }

    // Lowest good object still above the bottom of the band
    let target = session
        .objects
        .iter()
        .filter(|o| !o.kind.is_hazard() && o.pos.y <= band_bottom)
        .max_by(|a, b| {
            a.kind
                .score_delta()
                .cmp(&b.kind.score_delta())
                .then(a.pos.y.total_cmp(&b.pos.y))
        });

    let Some(target) = target else {
        return MoveDirection::None;
    };
    let dx = target.pos.x - basket.x;
    if dx.abs() <= DEADZONE {
        MoveDirection::None
    } else if dx < 0.0 {
        MoveDirection::Left
    } else {
        MoveDirection::Right
    }
}
