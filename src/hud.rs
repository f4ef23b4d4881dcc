//! HUD text and catch-effect styling
//!
//! Pure formatting helpers for whatever draws the score panel, the timer
//! and the floating "+10" labels.

use serde::{Deserialize, Serialize};

use crate::sim::ObjectKind;

/// Score panel text
pub fn score_label(score: i64) -> String {
    format!("🥚 {score}")
}

/// Timer panel text, `m:ss` of the remaining time (rounded down)
pub fn timer_label(remaining_seconds: f32) -> String {
    let total = remaining_seconds.max(0.0).floor() as u32;
    format!("⏰ {}:{:02}", total / 60, total % 60)
}

/// Floating label shown where an object was caught
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatchStyle {
    pub label: &'static str,
    /// 0xRRGGBB
    pub color: u32,
}

pub fn catch_style(kind: ObjectKind) -> CatchStyle {
    match kind {
        ObjectKind::Egg => CatchStyle {
            label: "+10 🥚",
            color: 0x32CD32,
        },
        ObjectKind::BadEgg => CatchStyle {
            label: "-10 💩",
            color: 0xFF6B6B,
        },
        ObjectKind::Bomb => CatchStyle {
            label: "-50 💥",
            color: 0xFF0000,
        },
        ObjectKind::Gold => CatchStyle {
            label: "+100 🤘",
            color: 0xFFD700,
        },
    }
}

/// Game-over headline
pub fn terminal_title(reason: crate::sim::TerminalReason) -> &'static str {
    match reason {
        crate::sim::TerminalReason::Death => "You died!",
        crate::sim::TerminalReason::Time => "Time's up!",
    }
}

/// Count-up animation for the final score on the game-over panel
///
/// Each step closes 10% of the remaining gap (rounded up), and at least one
/// point, so it always lands exactly on the target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreTally {
    current: i64,
    target: i64,
}

impl ScoreTally {
    pub fn new(target: i64) -> Self {
        Self { current: 0, target }
    }

    pub fn current(&self) -> i64 {
        self.current
    }

    pub fn is_done(&self) -> bool {
        self.current == self.target
    }

    /// Advance one step and return the displayed value
    pub fn step(&mut self) -> i64 {
        let gap = self.target - self.current;
        if gap == 0 {
            return self.current;
        }
        let mut increment = (gap as f64 * 0.1).ceil() as i64;
        if increment == 0 {
            increment = gap.signum();
        }
        self.current += increment;
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_label() {
        assert_eq!(timer_label(120.0), "⏰ 2:00");
        assert_eq!(timer_label(89.7), "⏰ 1:29");
        assert_eq!(timer_label(5.0), "⏰ 0:05");
        assert_eq!(timer_label(-3.0), "⏰ 0:00");
    }

    #[test]
    fn test_score_label() {
        assert_eq!(score_label(-40), "🥚 -40");
    }

    #[test]
    fn test_catch_styles() {
        assert_eq!(catch_style(ObjectKind::Gold).color, 0xFFD700);
        assert!(catch_style(ObjectKind::Bomb).label.starts_with("-50"));
    }

    #[test]
    fn test_tally_reaches_positive_target() {
        let mut tally = ScoreTally::new(370);
        assert_eq!(tally.step(), 37);
        let mut steps = 1;
        while !tally.is_done() {
            let before = tally.current();
            let now = tally.step();
            assert!(now > before && now <= 370);
            steps += 1;
            assert!(steps < 200);
        }
        assert_eq!(tally.current(), 370);
    }

    #[test]
    fn test_tally_reaches_negative_target() {
        let mut tally = ScoreTally::new(-120);
        let mut steps = 0;
        while !tally.is_done() {
            let before = tally.current();
            let now = tally.step();
            assert!(now < before && now >= -120);
            steps += 1;
            assert!(steps < 200);
        }
    }

    #[test]
    fn test_tally_zero_is_immediately_done() {
        let mut tally = ScoreTally::new(0);
        assert!(tally.is_done());
        assert_eq!(tally.step(), 0);
    }
}
