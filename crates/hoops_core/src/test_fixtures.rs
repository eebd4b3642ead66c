//! Test Fixtures Module
//!
//! Centralized roster/session builders for engine tests.

use crate::engine::config::GameConfig;
use crate::engine::session::{GameSession, GameSetup, TeamSetup};
use crate::models::{Lineup, Player, Position, Roster, Side};
use crate::tactics::Tactic;

/// Ten players, two per position. Starters are rated `overall`, the bench
/// five points lower. Ids run `first_id..first_id + 10`.
pub fn create_test_roster(name: &str, first_id: u32, overall: u8) -> Roster {
    let mut players = Vec::with_capacity(10);
    for (i, position) in Position::ALL.iter().chain(Position::ALL.iter()).enumerate() {
        let rating = if i < 5 { overall } else { overall.saturating_sub(5) };
        players.push(Player::new(
            first_id + i as u32,
            format!("{} {} {}", name, position, i / 5 + 1),
            *position,
            rating,
        ));
    }
    Roster::new(name, players)
}

/// `count` identically rated players cycling through the positions.
pub fn create_flat_roster(name: &str, first_id: u32, overall: u8, count: usize) -> Roster {
    let players = (0..count)
        .map(|i| {
            let position = Position::ALL[i % 5];
            Player::new(first_id + i as u32, format!("{} {}", name, i + 1), position, overall)
        })
        .collect();
    Roster::new(name, players)
}

pub fn create_team_setup(roster: Roster, tactic: Tactic) -> TeamSetup {
    let lineup = Lineup::auto_pick(&roster);
    TeamSetup { roster, lineup, tactic }
}

pub fn create_test_setup() -> GameSetup {
    GameSetup {
        home: create_team_setup(create_test_roster("Home", 1, 70), Tactic::Balanced),
        away: create_team_setup(create_test_roster("Away", 101, 70), Tactic::Balanced),
        controlled_side: Some(Side::Home),
    }
}

pub fn create_test_session(seed: u64) -> GameSession {
    GameSession::with_seed(create_test_setup(), GameConfig::default(), seed)
        .expect("fixture setup is valid")
}
