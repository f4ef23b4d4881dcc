//! Error types
//!
//! The simulation itself never fails once a session is running. Errors only
//! arise from bad configuration (rejected at session start) and from
//! presentation collaborators, whose failures are logged and dropped.

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A value that must be a finite number was NaN or infinite
    NotFinite { field: &'static str },
    /// A value that must be strictly positive was zero or negative
    NotPositive { field: &'static str, value: f32 },
    /// Easy phase must end before the game does
    EasyPhaseTooLong { easy_phase: f32, game_duration: f32 },
    /// Crazy mode cannot start before the game starts
    CrazyModeTooLong {
        crazy_mode_time: f32,
        game_duration: f32,
    },
    /// Screen must be wider than the spawn margins and the basket
    ScreenTooNarrow { width: f32, min: f32 },
    /// Death threshold must be below the starting score
    DeathScoreNotNegative { death_score: i64 },
    /// Config JSON could not be parsed
    Parse { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFinite { field } => write!(f, "config value `{field}` is not finite"),
            Self::NotPositive { field, value } => {
                write!(f, "config value `{field}` must be positive, got {value}")
            }
            Self::EasyPhaseTooLong {
                easy_phase,
                game_duration,
            } => write!(
                f,
                "easy phase ({easy_phase}s) must be shorter than the game ({game_duration}s)"
            ),
            Self::CrazyModeTooLong {
                crazy_mode_time,
                game_duration,
            } => write!(
                f,
                "crazy mode time ({crazy_mode_time}s) exceeds the game duration ({game_duration}s)"
            ),
            Self::ScreenTooNarrow { width, min } => {
                write!(f, "screen width {width} is too narrow, need more than {min}")
            }
            Self::DeathScoreNotNegative { death_score } => {
                write!(f, "death score must be negative, got {death_score}")
            }
            Self::Parse { message } => write!(f, "invalid config json: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure reported by a presentation collaborator (renderer, audio, HUD)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresentError {
    pub message: String,
}

impl PresentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for PresentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "presenter failed: {}", self.message)
    }
}

impl std::error::Error for PresentError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::NotPositive {
            field: "game_duration",
            value: -5.0,
        };
        assert_eq!(
            err.to_string(),
            "config value `game_duration` must be positive, got -5"
        );

        let err = ConfigError::DeathScoreNotNegative { death_score: 10 };
        assert!(err.to_string().contains("10"));
    }
}
