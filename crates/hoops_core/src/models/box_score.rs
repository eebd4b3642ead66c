//! Box Score Data Structures
//!
//! Output of one simulated game. Per-player counters are created zeroed for
//! every roster player at tip-off, mutated only by the possession resolver,
//! and folded into season aggregates by the finalize step.

use super::player::{PlayerId, Position};
use super::team::Side;
use serde::{Deserialize, Serialize};

/// Per-player counters for a single game.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerGameStat {
    pub points: u16,
    pub offensive_rebounds: u16,
    pub defensive_rebounds: u16,
    pub assists: u16,
    pub steals: u16,
    pub blocks: u16,
    pub fouls: u16,
    pub turnovers: u16,
    pub seconds_played: u32,
    pub field_goals_made: u16,
    pub field_goals_attempted: u16,
    pub three_points_made: u16,
    pub three_points_attempted: u16,
    pub free_throws_made: u16,
    pub free_throws_attempted: u16,
    pub plus_minus: i32,
}

impl PlayerGameStat {
    pub fn rebounds(&self) -> u16 {
        self.offensive_rebounds + self.defensive_rebounds
    }

    /// Whole minutes on court.
    pub fn minutes(&self) -> u32 {
        self.seconds_played / 60
    }

    pub fn field_goal_pct(&self) -> Option<f32> {
        pct(self.field_goals_made, self.field_goals_attempted)
    }

    pub fn three_point_pct(&self) -> Option<f32> {
        pct(self.three_points_made, self.three_points_attempted)
    }

    pub fn free_throw_pct(&self) -> Option<f32> {
        pct(self.free_throws_made, self.free_throws_attempted)
    }

    /// True when the player never registered anything but zeroes.
    pub fn is_empty(&self) -> bool {
        *self == PlayerGameStat::default()
    }
}

fn pct(made: u16, attempted: u16) -> Option<f32> {
    (attempted > 0).then(|| made as f32 / attempted as f32)
}

/// Team sums of the per-player counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamTotals {
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub fouls: u32,
    pub turnovers: u32,
    pub field_goals_made: u32,
    pub field_goals_attempted: u32,
    pub three_points_made: u32,
    pub three_points_attempted: u32,
    pub free_throws_made: u32,
    pub free_throws_attempted: u32,
}

impl TeamTotals {
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a PlayerLine>) -> Self {
        let mut totals = TeamTotals::default();
        for line in lines {
            let s = &line.stats;
            totals.points += u32::from(s.points);
            totals.rebounds += u32::from(s.rebounds());
            totals.assists += u32::from(s.assists);
            totals.steals += u32::from(s.steals);
            totals.blocks += u32::from(s.blocks);
            totals.fouls += u32::from(s.fouls);
            totals.turnovers += u32::from(s.turnovers);
            totals.field_goals_made += u32::from(s.field_goals_made);
            totals.field_goals_attempted += u32::from(s.field_goals_attempted);
            totals.three_points_made += u32::from(s.three_points_made);
            totals.three_points_attempted += u32::from(s.three_points_attempted);
            totals.free_throws_made += u32::from(s.free_throws_made);
            totals.free_throws_attempted += u32::from(s.free_throws_attempted);
        }
        totals
    }
}

/// One row of the box score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerLine {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Position,
    pub starter: bool,
    pub stats: PlayerGameStat,
}

/// Complete statistical record of one game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoxScore {
    pub home_team: String,
    pub away_team: String,
    pub home_score: u16,
    pub away_score: u16,
    /// Points per quarter, `[home, away]`, one entry per quarter played.
    pub quarter_scores: Vec<[u16; 2]>,
    pub home: Vec<PlayerLine>,
    pub away: Vec<PlayerLine>,
}

impl BoxScore {
    pub fn lines(&self, side: Side) -> &[PlayerLine] {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn score(&self, side: Side) -> u16 {
        match side {
            Side::Home => self.home_score,
            Side::Away => self.away_score,
        }
    }

    pub fn totals(&self, side: Side) -> TeamTotals {
        TeamTotals::from_lines(self.lines(side))
    }

    pub fn line(&self, id: PlayerId) -> Option<&PlayerLine> {
        self.home.iter().chain(self.away.iter()).find(|l| l.player_id == id)
    }

    pub fn winner(&self) -> Option<Side> {
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn matchup_result(&self) -> MatchupResult {
        MatchupResult { home_score: self.home_score, away_score: self.away_score, is_played: true }
    }
}

/// The only thing the schedule store keeps per matchup.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchupResult {
    pub home_score: u16,
    pub away_score: u16,
    pub is_played: bool,
}
