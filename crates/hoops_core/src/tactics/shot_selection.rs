//! Shot Selector
//!
//! Pure decision of the shot type from the offensive tactic and the
//! shooter's position. The random roll is passed in so the function stays
//! side-effect free; [`draw_shot`] is the convenience wrapper that pulls it
//! from the session RNG.

use super::Tactic;
use crate::models::Position;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ShotType {
    Three,
    Two,
    /// A trip to the line (1-3 attempts).
    FreeThrows,
}

impl ShotType {
    /// Points for a made attempt.
    pub fn points(&self) -> u16 {
        match self {
            ShotType::Three => 3,
            ShotType::Two => 2,
            ShotType::FreeThrows => 1,
        }
    }

    pub fn is_field_goal(&self) -> bool {
        !matches!(self, ShotType::FreeThrows)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShotType::Three => "three-pointer",
            ShotType::Two => "two-pointer",
            ShotType::FreeThrows => "free throws",
        }
    }
}

/// Shot type for `roll` in `[0, 1)`.
///
/// | tactic              | rule                                  |
/// |---------------------|---------------------------------------|
/// | outside             | 40% three, else two                   |
/// | inside              | 20% free throws, else two             |
/// | fast-break          | 10% three, else two                   |
/// | balanced / defense  | guards 30% three, others 10% three    |
pub fn select_shot(tactic: Tactic, position: Position, roll: f64) -> ShotType {
    match tactic {
        Tactic::Outside => three_or_two(roll, 0.4),
        Tactic::Inside => {
            if roll < 0.2 {
                ShotType::FreeThrows
            } else {
                ShotType::Two
            }
        }
        Tactic::FastBreak => three_or_two(roll, 0.1),
        Tactic::Balanced | Tactic::Defense => {
            let three_rate = if position.is_guard() { 0.3 } else { 0.1 };
            three_or_two(roll, three_rate)
        }
    }
}

pub fn draw_shot<R: Rng + ?Sized>(tactic: Tactic, position: Position, rng: &mut R) -> ShotType {
    select_shot(tactic, position, rng.gen::<f64>())
}

fn three_or_two(roll: f64, three_rate: f64) -> ShotType {
    if roll < three_rate {
        ShotType::Three
    } else {
        ShotType::Two
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_outside_threshold() {
        assert_eq!(select_shot(Tactic::Outside, Position::C, 0.39), ShotType::Three);
        assert_eq!(select_shot(Tactic::Outside, Position::C, 0.40), ShotType::Two);
    }

    #[test]
    fn test_inside_is_the_only_free_throw_source() {
        assert_eq!(select_shot(Tactic::Inside, Position::PF, 0.19), ShotType::FreeThrows);
        assert_eq!(select_shot(Tactic::Inside, Position::PF, 0.2), ShotType::Two);
        for tactic in Tactic::iter().filter(|t| *t != Tactic::Inside) {
            for position in Position::iter() {
                for roll in [0.0, 0.05, 0.15, 0.5, 0.99] {
                    assert_ne!(select_shot(tactic, position, roll), ShotType::FreeThrows);
                }
            }
        }
    }

    #[test]
    fn test_inside_never_shoots_threes() {
        for position in Position::iter() {
            assert_ne!(select_shot(Tactic::Inside, position, 0.0), ShotType::Three);
        }
    }

    #[test]
    fn test_guards_shoot_more_threes_in_balanced_and_defense() {
        for tactic in [Tactic::Balanced, Tactic::Defense] {
            assert_eq!(select_shot(tactic, Position::PG, 0.25), ShotType::Three);
            assert_eq!(select_shot(tactic, Position::SG, 0.29), ShotType::Three);
            assert_eq!(select_shot(tactic, Position::SF, 0.25), ShotType::Two);
            assert_eq!(select_shot(tactic, Position::C, 0.09), ShotType::Three);
        }
    }

    #[test]
    fn test_fast_break_threshold() {
        assert_eq!(select_shot(Tactic::FastBreak, Position::PG, 0.09), ShotType::Three);
        assert_eq!(select_shot(Tactic::FastBreak, Position::PG, 0.1), ShotType::Two);
    }

    #[test]
    fn test_points() {
        assert_eq!(ShotType::Three.points(), 3);
        assert_eq!(ShotType::Two.points(), 2);
        assert!(!ShotType::FreeThrows.is_field_goal());
    }
}
