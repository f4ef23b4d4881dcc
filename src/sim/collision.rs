//! Catch and floor-exit detection
//!
//! Only the top of the basket catches: an object counts once its center is
//! inside a thin band ending just below the basket's center line, and close
//! enough horizontally. Catch is always tested before floor exit so an
//! object resolves to exactly one outcome per tick.

use glam::Vec2;

use crate::config::GameConfig;
use crate::consts::*;
use crate::horizontal_distance;

/// Outcome of resolving one object against the basket and floor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Still falling
    Live,
    /// Landed in the basket
    Caught,
    /// Fell past the bottom edge
    Exited,
}

/// True if an object at `pos` is inside the basket's catch band
pub fn is_caught(pos: Vec2, basket: Vec2, basket_width: f32) -> bool {
    let in_band = pos.y >= basket.y - CATCH_BAND_ABOVE && pos.y <= basket.y + CATCH_BAND_BELOW;
    in_band && horizontal_distance(pos, basket) < basket_width / 2.0 + CATCH_SLACK
}

/// True once an object is far enough below the screen to drop
pub fn has_exited(pos: Vec2, screen_height: f32) -> bool {
    pos.y > screen_height + FLOOR_EXIT_MARGIN
}

/// Resolve an object position: catch first, then floor exit
pub fn resolve(pos: Vec2, basket: Vec2, config: &GameConfig) -> Outcome {
    if is_caught(pos, basket, config.basket_width) {
        Outcome::Caught
    } else if has_exited(pos, config.screen_height) {
        Outcome::Exited
    } else {
        Outcome::Live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basket() -> Vec2 {
        Vec2::new(400.0, 520.0)
    }

    #[test]
    fn test_catch_band_edges() {
        assert!(is_caught(Vec2::new(400.0, 460.0), basket(), 100.0));
        assert!(is_caught(Vec2::new(400.0, 525.0), basket(), 100.0));
        assert!(!is_caught(Vec2::new(400.0, 459.9), basket(), 100.0));
        assert!(!is_caught(Vec2::new(400.0, 525.1), basket(), 100.0));
    }

    #[test]
    fn test_catch_horizontal_slack() {
        // half width 50 + slack 10, strict
        assert!(is_caught(Vec2::new(459.0, 500.0), basket(), 100.0));
        assert!(!is_caught(Vec2::new(460.0, 500.0), basket(), 100.0));
        assert!(is_caught(Vec2::new(341.0, 500.0), basket(), 100.0));
        assert!(!is_caught(Vec2::new(340.0, 500.0), basket(), 100.0));
    }

    #[test]
    fn test_floor_exit() {
        assert!(!has_exited(Vec2::new(0.0, 620.0), 600.0));
        assert!(has_exited(Vec2::new(0.0, 620.5), 600.0));
    }

    #[test]
    fn test_resolve_outcomes() {
        let config = GameConfig::default();
        let basket = Vec2::new(400.0, config.basket_y());
        assert_eq!(
            resolve(Vec2::new(400.0, basket.y), basket, &config),
            Outcome::Caught
        );
        assert_eq!(
            resolve(Vec2::new(10.0, 621.0), basket, &config),
            Outcome::Exited
        );
        assert_eq!(
            resolve(Vec2::new(400.0, -50.0), basket, &config),
            Outcome::Live
        );
        // Below the band but not yet off screen
        assert_eq!(
            resolve(Vec2::new(400.0, 560.0), basket, &config),
            Outcome::Live
        );
    }
}
