use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable roster identifier for a player.
///
/// Owned by the external roster store; the engine only ever reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Player data for the game simulation engine.
///
/// # Boundary Contract
/// - Built by the roster/generation collaborator, read-only for the engine
/// - `overall` feeds team strength, the attribute block feeds tactic bonuses
///   and free-throw resolution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    pub overall: u8,
    #[serde(default)]
    pub attributes: PlayerAttributes,
}

impl Player {
    pub fn new(id: u32, name: impl Into<String>, position: Position, overall: u8) -> Self {
        Self {
            id: PlayerId(id),
            name: name.into(),
            position,
            overall,
            attributes: PlayerAttributes::default(),
        }
    }

    pub fn with_attributes(mut self, attributes: PlayerAttributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Basketball skill ratings consumed by the engine (0-100).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAttributes {
    pub three_point: u8,
    pub free_throw: u8,
    pub rebounding: u8,
    pub speed: u8,
    pub defense: u8,
}

impl Default for PlayerAttributes {
    fn default() -> Self {
        Self { three_point: 50, free_throw: 50, rebounding: 50, speed: 50, defense: 50 }
    }
}

/// The five lineup positions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    PG,
    SG,
    SF,
    PF,
    C,
}

impl Position {
    /// Lineup order: point guard through center.
    pub const ALL: [Position; 5] =
        [Position::PG, Position::SG, Position::SF, Position::PF, Position::C];

    /// The two designated perimeter positions.
    pub fn is_guard(&self) -> bool {
        matches!(self, Position::PG | Position::SG)
    }

    pub fn slot(&self) -> usize {
        match self {
            Position::PG => 0,
            Position::SG => 1,
            Position::SF => 2,
            Position::PF => 3,
            Position::C => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::PG => "PG",
            Position::SG => "SG",
            Position::SF => "SF",
            Position::PF => "PF",
            Position::C => "C",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PG" => Ok(Position::PG),
            "SG" => Ok(Position::SG),
            "SF" => Ok(Position::SF),
            "PF" => Ok(Position::PF),
            "C" => Ok(Position::C),
            other => Err(format!("Unknown position: {}", other)),
        }
    }
}
