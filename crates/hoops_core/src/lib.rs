//! # hoops_core - Possession-Based Basketball Game Simulation Engine
//!
//! Given two rosters, a tactic per side and a variable-speed playback loop,
//! the engine plays four 12-minute quarters possession by possession and
//! produces a play-by-play event stream plus a full box score.
//!
//! ## Features
//! - Deterministic simulation (same seed = same events and box score)
//! - Fixed-step playback decoupled from host frame rate (1x/2x/4x)
//! - Cooperative cancellation with explicit frame-handle invalidation
//! - Transactional season fold through pluggable collaborators
//! - JSON API for hosts that only speak strings

// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod tactics;

#[cfg(test)]
pub(crate) mod test_fixtures;

// Re-export main API functions
pub use api::{game_request_schema, simulate_game, simulate_game_json, GameRequest, GameResponse};
pub use error::{GameError, Result, SeasonError};

// Re-export engine entry points
pub use engine::{
    run_fast_forward, run_realtime, CancellationToken, GameConfig, GameSession, GameSetup, GameStatus,
    InMemorySeasonStore, NoPostGameCheck, PlaybackController, PostGameCheck, QueuedScheduler,
    SeasonStatsStore, StepResult, TeamSetup,
};
pub use models::{BoxScore, GameEvent, Lineup, Player, PlayerId, Position, Roster, Side};
pub use tactics::Tactic;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::create_test_session;
    use sha2::{Digest, Sha256};

    /// A fixed seed must keep producing the same game across refactors of
    /// unrelated code paths.
    #[test]
    fn test_event_stream_hash_is_reproducible() {
        let hash = |seed| {
            let mut session = create_test_session(seed);
            run_fast_forward(&mut session);
            let bytes = serde_json::to_vec(session.events()).unwrap();
            format!("{:x}", Sha256::digest(&bytes))
        };
        assert_eq!(hash(2024), hash(2024));
        assert_ne!(hash(2024), hash(2025));
    }

    #[test]
    fn test_balanced_game_scores_like_basketball() {
        let mut totals = Vec::new();
        for seed in 0..20 {
            let mut session = create_test_session(seed);
            run_fast_forward(&mut session);
            let (home, away) = session.score();
            totals.push(u32::from(home) + u32::from(away));
        }
        let avg = totals.iter().sum::<u32>() as f64 / totals.len() as f64;
        // 240 possessions at roughly a coin flip each.
        assert!((150.0..=400.0).contains(&avg), "average combined score {}", avg);
    }

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
        assert_eq!(SCHEMA_VERSION, 1);
    }
}
