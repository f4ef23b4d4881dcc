//! Game configuration
//!
//! Tunable values for a session. Defaults match the shipped game; a host can
//! override them from JSON. Everything is validated before a session starts.

use serde::{Deserialize, Serialize};

use crate::consts::SPAWN_MARGIN;
use crate::error::ConfigError;

/// Session tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Base fall speed of eggs, bad eggs and gold (px/frame)
    pub egg_speed: f32,
    /// Fixed fall speed of bombs (px/frame)
    pub bomb_speed: f32,
    /// Base spawn interval (frames)
    pub spawn_interval: f32,
    /// Basket hitbox width (px)
    pub basket_width: f32,
    /// Basket sprite height (px)
    pub basket_height: f32,
    /// Basket movement speed (px/frame)
    pub basket_speed: f32,
    /// Total session length (seconds)
    pub game_duration: f32,
    /// Crazy mode starts this many seconds before the end
    pub crazy_mode_time: f32,
    /// Reduced-difficulty opening window (seconds)
    pub easy_phase: f32,
    /// Playfield width (px)
    pub screen_width: f32,
    /// Playfield height (px)
    pub screen_height: f32,
    /// Session ends once the score drops to this value or below
    pub death_score: i64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            egg_speed: 4.0,
            bomb_speed: 5.0,
            spawn_interval: 60.0,
            basket_width: 100.0,
            basket_height: 40.0,
            basket_speed: 8.0,
            game_duration: 120.0,
            crazy_mode_time: 30.0,
            easy_phase: 20.0,
            screen_width: 800.0,
            screen_height: 600.0,
            death_score: -100,
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Second at which crazy mode kicks in
    pub fn crazy_mode_start(&self) -> f32 {
        self.game_duration - self.crazy_mode_time
    }

    /// Basket's fixed vertical position
    pub fn basket_y(&self) -> f32 {
        self.screen_height - crate::consts::BASKET_BOTTOM_OFFSET
    }

    /// Reject values that would produce undefined difficulty curves
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("egg_speed", self.egg_speed),
            ("bomb_speed", self.bomb_speed),
            ("spawn_interval", self.spawn_interval),
            ("basket_width", self.basket_width),
            ("basket_height", self.basket_height),
            ("basket_speed", self.basket_speed),
            ("game_duration", self.game_duration),
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
        ];
        for (field, value) in positive {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        // Zero is allowed for these two (no easy phase / no crazy mode)
        for (field, value) in [
            ("easy_phase", self.easy_phase),
            ("crazy_mode_time", self.crazy_mode_time),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
            if value < 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        if self.easy_phase >= self.game_duration {
            return Err(ConfigError::EasyPhaseTooLong {
                easy_phase: self.easy_phase,
                game_duration: self.game_duration,
            });
        }
        if self.crazy_mode_time > self.game_duration {
            return Err(ConfigError::CrazyModeTooLong {
                crazy_mode_time: self.crazy_mode_time,
                game_duration: self.game_duration,
            });
        }

        let min_width = (SPAWN_MARGIN * 2.0).max(self.basket_width);
        if self.screen_width <= min_width {
            return Err(ConfigError::ScreenTooNarrow {
                width: self.screen_width,
                min: min_width,
            });
        }

        if self.death_score >= 0 {
            return Err(ConfigError::DeathScoreNotNegative {
                death_score: self.death_score,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_negative_duration_rejected() {
        let config = GameConfig {
            game_duration: -1.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "game_duration",
                value: -1.0
            })
        );
    }

    #[test]
    fn test_nan_rejected() {
        let config = GameConfig {
            spawn_interval: f32::NAN,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotFinite {
                field: "spawn_interval"
            })
        );
    }

    #[test]
    fn test_easy_phase_must_end_before_game() {
        let config = GameConfig {
            easy_phase: 120.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EasyPhaseTooLong { .. })
        ));
    }

    #[test]
    fn test_positive_death_score_rejected() {
        let config = GameConfig {
            death_score: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DeathScoreNotNegative { .. })
        ));
    }

    #[test]
    fn test_from_json_partial_override() {
        let config = GameConfig::from_json(r#"{ "game_duration": 60.0, "crazy_mode_time": 10.0 }"#)
            .expect("valid json");
        assert_eq!(config.game_duration, 60.0);
        assert_eq!(config.crazy_mode_start(), 50.0);
        assert_eq!(config.spawn_interval, 60.0);
    }

    #[test]
    fn test_from_json_garbage() {
        assert!(matches!(
            GameConfig::from_json("not json"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_basket_y() {
        let config = GameConfig::default();
        assert_eq!(config.basket_y(), 520.0);
    }
}
