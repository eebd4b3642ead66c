use crate::models::{PlayerId, Position, Side};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("{side} roster is empty")]
    EmptyRoster { side: Side },

    #[error("{side} lineup has no player at {position}")]
    IncompleteLineup { side: Side, position: Position },

    #[error("{side} lineup references player {player} who is not on the roster")]
    UnknownLineupPlayer { side: Side, player: PlayerId },

    #[error("{side} lineup lists player {player} more than once")]
    DuplicateLineupPlayer { side: Side, player: PlayerId },

    #[error("Unknown tactic: {0}")]
    UnknownTactic(String),

    #[error("Invalid playback speed: {0} (expected 1, 2 or 4)")]
    InvalidSpeed(u8),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Game is not finished")]
    NotFinished,

    #[error("Game was already finalized")]
    AlreadyFinalized,

    #[error("Game was cancelled")]
    Cancelled,

    #[error("Season store error: {0}")]
    Season(#[from] SeasonError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GameError {
    /// Whether the caller can fix the input and try again on the same session.
    pub fn is_recoverable(&self) -> bool {
        match self {
            GameError::UnknownTactic(_) => true,
            GameError::InvalidSpeed(_) => true,
            GameError::InvalidRequest(_) => true,
            GameError::NotFinished => true,
            GameError::Season(_) => true,
            GameError::EmptyRoster { .. }
            | GameError::IncompleteLineup { .. }
            | GameError::UnknownLineupPlayer { .. }
            | GameError::DuplicateLineupPlayer { .. } => false,
            GameError::AlreadyFinalized | GameError::Cancelled => false,
            _ => false,
        }
    }
}

/// Failures reported by the external season-stat collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeasonError {
    #[error("Player {0} is not known to the season store")]
    UnknownPlayer(PlayerId),

    #[error("Season store rejected the update: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
