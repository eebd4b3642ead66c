//! Team tactics: the named strategic profiles a side can pick, the strength
//! calculation they modify, and the shot tendencies they imply.

pub mod shot_selection;
pub mod strength;

pub use shot_selection::{draw_shot, select_shot, ShotType};
pub use strength::{base_strength, success_rate, tactic_bonus, team_strength, StartingFive};

use crate::error::GameError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategic profile chosen per side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "kebab-case")]
pub enum Tactic {
    #[default]
    Balanced,
    Inside,
    Outside,
    FastBreak,
    Defense,
}

impl Tactic {
    pub const ALL: [Tactic; 5] =
        [Tactic::Balanced, Tactic::Inside, Tactic::Outside, Tactic::FastBreak, Tactic::Defense];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tactic::Balanced => "balanced",
            Tactic::Inside => "inside",
            Tactic::Outside => "outside",
            Tactic::FastBreak => "fast-break",
            Tactic::Defense => "defense",
        }
    }

    /// Uniform draw over all five tactics (the current one included).
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Tactic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tactic {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "balanced" => Ok(Tactic::Balanced),
            "inside" => Ok(Tactic::Inside),
            "outside" => Ok(Tactic::Outside),
            "fast-break" => Ok(Tactic::FastBreak),
            "defense" => Ok(Tactic::Defense),
            other => Err(GameError::UnknownTactic(other.to_string())),
        }
    }
}
