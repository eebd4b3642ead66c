//! Stat Accumulator
//!
//! Per-player and per-team counters for one game. Every roster player (not
//! only starters) gets a zeroed row at tip-off. Points only ever enter
//! through [`StatAccumulator::record_field_goal`] and
//! [`StatAccumulator::record_free_throws`], which bump the player, the team
//! score and the current quarter together, so the team score always equals
//! the sum of its players' points.

use crate::models::{BoxScore, PlayerGameStat, PlayerId, PlayerLine, Roster, Side};
use crate::tactics::ShotType;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct SideStats {
    team: String,
    lines: Vec<PlayerLine>,
    index: HashMap<PlayerId, usize>,
    score: u16,
}

impl SideStats {
    fn new(roster: &Roster, starters: &[PlayerId]) -> Self {
        let lines: Vec<PlayerLine> = roster
            .players
            .iter()
            .map(|p| PlayerLine {
                player_id: p.id,
                name: p.name.clone(),
                position: p.position,
                starter: starters.contains(&p.id),
                stats: PlayerGameStat::default(),
            })
            .collect();
        let index = lines.iter().enumerate().map(|(i, l)| (l.player_id, i)).collect();
        Self { team: roster.name.clone(), lines, index, score: 0 }
    }

    fn get_mut(&mut self, id: PlayerId) -> Option<&mut PlayerGameStat> {
        let idx = *self.index.get(&id)?;
        Some(&mut self.lines[idx].stats)
    }
}

#[derive(Debug, Clone)]
pub struct StatAccumulator {
    sides: [SideStats; 2],
    /// `[home, away]` points per quarter.
    quarter_scores: Vec<[u16; 2]>,
}

impl StatAccumulator {
    pub fn new(
        home: &Roster,
        home_starters: &[PlayerId],
        away: &Roster,
        away_starters: &[PlayerId],
    ) -> Self {
        Self {
            sides: [SideStats::new(home, home_starters), SideStats::new(away, away_starters)],
            quarter_scores: vec![[0, 0]],
        }
    }

    fn side(&self, side: Side) -> &SideStats {
        &self.sides[side.index()]
    }

    fn side_mut(&mut self, side: Side) -> &mut SideStats {
        &mut self.sides[side.index()]
    }

    /// Apply `f` to a player's counters. Unknown ids are logged and ignored.
    fn update(&mut self, side: Side, id: PlayerId, f: impl FnOnce(&mut PlayerGameStat)) -> bool {
        match self.side_mut(side).get_mut(id) {
            Some(stat) => {
                f(stat);
                true
            }
            None => {
                tracing::warn!(%side, player = %id, "stat update for unknown player ignored");
                false
            }
        }
    }

    fn add_points(&mut self, side: Side, points: u16) {
        self.side_mut(side).score += points;
        if let Some(current) = self.quarter_scores.last_mut() {
            current[side.index()] += points;
        }
    }

    /// One field-goal attempt. Returns the points scored.
    pub fn record_field_goal(&mut self, side: Side, id: PlayerId, shot: ShotType, made: bool) -> u16 {
        let three = shot == ShotType::Three;
        let points = if made { shot.points() } else { 0 };
        let known = self.update(side, id, |s| {
            s.field_goals_attempted += 1;
            if three {
                s.three_points_attempted += 1;
            }
            if made {
                s.field_goals_made += 1;
                if three {
                    s.three_points_made += 1;
                }
                s.points += points;
            }
        });
        if known && points > 0 {
            self.add_points(side, points);
            points
        } else {
            0
        }
    }

    /// A trip to the line. Returns the points scored.
    pub fn record_free_throws(&mut self, side: Side, id: PlayerId, attempts: u8, made: u8) -> u16 {
        let made = made.min(attempts);
        let points = u16::from(made);
        let known = self.update(side, id, |s| {
            s.free_throws_attempted += u16::from(attempts);
            s.free_throws_made += points;
            s.points += points;
        });
        if known && points > 0 {
            self.add_points(side, points);
            points
        } else {
            0
        }
    }

    pub fn record_assist(&mut self, side: Side, id: PlayerId) {
        self.update(side, id, |s| s.assists += 1);
    }

    pub fn record_rebound(&mut self, side: Side, id: PlayerId, offensive: bool) {
        self.update(side, id, |s| {
            if offensive {
                s.offensive_rebounds += 1;
            } else {
                s.defensive_rebounds += 1;
            }
        });
    }

    pub fn record_steal(&mut self, side: Side, id: PlayerId) {
        self.update(side, id, |s| s.steals += 1);
    }

    pub fn record_block(&mut self, side: Side, id: PlayerId) {
        self.update(side, id, |s| s.blocks += 1);
    }

    pub fn record_foul(&mut self, side: Side, id: PlayerId) {
        self.update(side, id, |s| s.fouls += 1);
    }

    pub fn record_turnover(&mut self, side: Side, id: PlayerId) {
        self.update(side, id, |s| s.turnovers += 1);
    }

    /// `+points` for every scoring player on court, `-points` for every
    /// defender on court.
    pub fn apply_plus_minus(
        &mut self,
        scoring_side: Side,
        points: u16,
        scoring_five: &[PlayerId],
        defending_five: &[PlayerId],
    ) {
        if points == 0 {
            return;
        }
        let delta = i32::from(points);
        for &id in scoring_five {
            self.update(scoring_side, id, |s| s.plus_minus += delta);
        }
        for &id in defending_five {
            self.update(scoring_side.opponent(), id, |s| s.plus_minus -= delta);
        }
    }

    pub fn add_seconds_played(&mut self, side: Side, on_court: &[PlayerId], secs: u32) {
        for &id in on_court {
            self.update(side, id, |s| s.seconds_played += secs);
        }
    }

    /// Open a new per-quarter bucket.
    pub fn start_quarter(&mut self) {
        self.quarter_scores.push([0, 0]);
    }

    pub fn score(&self, side: Side) -> u16 {
        self.side(side).score
    }

    pub fn player(&self, side: Side, id: PlayerId) -> Option<&PlayerGameStat> {
        let side = self.side(side);
        side.index.get(&id).map(|&i| &side.lines[i].stats)
    }

    pub fn lines(&self, side: Side) -> &[PlayerLine] {
        &self.side(side).lines
    }

    pub fn quarter_scores(&self) -> &[[u16; 2]] {
        &self.quarter_scores
    }

    /// Read-only copy for consumers.
    pub fn snapshot(&self) -> BoxScore {
        let [home, away] = &self.sides;
        BoxScore {
            home_team: home.team.clone(),
            away_team: away.team.clone(),
            home_score: home.score,
            away_score: away.score,
            quarter_scores: self.quarter_scores.clone(),
            home: home.lines.clone(),
            away: away.lines.clone(),
        }
    }

    /// Score = Σ player points = Σ quarter points, for both sides.
    pub fn check_invariants(&self) -> Result<(), String> {
        for side in Side::BOTH {
            let stats = self.side(side);
            let player_points: u32 = stats.lines.iter().map(|l| u32::from(l.stats.points)).sum();
            if player_points != u32::from(stats.score) {
                return Err(format!(
                    "{} score {} != sum of player points {}",
                    side, stats.score, player_points
                ));
            }
            let quarter_points: u32 =
                self.quarter_scores.iter().map(|q| u32::from(q[side.index()])).sum();
            if quarter_points != u32::from(stats.score) {
                return Err(format!(
                    "{} score {} != sum of quarter points {}",
                    side, stats.score, quarter_points
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::create_test_roster;

    fn accumulator() -> StatAccumulator {
        let home = create_test_roster("Home", 1, 70);
        let away = create_test_roster("Away", 101, 70);
        let home_five: Vec<PlayerId> = (1..=5).map(PlayerId).collect();
        let away_five: Vec<PlayerId> = (101..=105).map(PlayerId).collect();
        StatAccumulator::new(&home, &home_five, &away, &away_five)
    }

    #[test]
    fn test_every_roster_player_starts_at_zero() {
        let acc = accumulator();
        assert_eq!(acc.lines(Side::Home).len(), 10);
        assert!(acc.lines(Side::Away).iter().all(|l| l.stats.is_empty()));
        assert_eq!(acc.lines(Side::Home).iter().filter(|l| l.starter).count(), 5);
    }

    #[test]
    fn test_made_three_updates_all_counters() {
        let mut acc = accumulator();
        let points = acc.record_field_goal(Side::Home, PlayerId(2), ShotType::Three, true);
        assert_eq!(points, 3);
        let s = acc.player(Side::Home, PlayerId(2)).unwrap();
        assert_eq!(
            (s.field_goals_attempted, s.field_goals_made, s.three_points_attempted, s.three_points_made),
            (1, 1, 1, 1)
        );
        assert_eq!(s.points, 3);
        assert_eq!(acc.score(Side::Home), 3);
        assert_eq!(acc.score(Side::Away), 0);
        assert!(acc.check_invariants().is_ok());
    }

    #[test]
    fn test_missed_two_counts_attempt_only() {
        let mut acc = accumulator();
        assert_eq!(acc.record_field_goal(Side::Away, PlayerId(103), ShotType::Two, false), 0);
        let s = acc.player(Side::Away, PlayerId(103)).unwrap();
        assert_eq!((s.field_goals_attempted, s.field_goals_made, s.three_points_attempted), (1, 0, 0));
        assert_eq!(acc.score(Side::Away), 0);
    }

    #[test]
    fn test_free_throws_clamp_made_to_attempts() {
        let mut acc = accumulator();
        assert_eq!(acc.record_free_throws(Side::Home, PlayerId(5), 2, 3), 2);
        let s = acc.player(Side::Home, PlayerId(5)).unwrap();
        assert_eq!((s.free_throws_attempted, s.free_throws_made, s.points), (2, 2, 2));
    }

    #[test]
    fn test_unknown_player_is_ignored_and_scores_nothing() {
        let mut acc = accumulator();
        assert_eq!(acc.record_field_goal(Side::Home, PlayerId(101), ShotType::Two, true), 0);
        assert_eq!(acc.score(Side::Home), 0);
        assert!(acc.check_invariants().is_ok());
    }

    #[test]
    fn test_plus_minus_is_zero_sum() {
        let mut acc = accumulator();
        let home_five: Vec<PlayerId> = (1..=5).map(PlayerId).collect();
        let away_five: Vec<PlayerId> = (101..=105).map(PlayerId).collect();
        acc.apply_plus_minus(Side::Away, 3, &away_five, &home_five);
        let total: i32 = acc
            .lines(Side::Home)
            .iter()
            .chain(acc.lines(Side::Away))
            .map(|l| l.stats.plus_minus)
            .sum();
        assert_eq!(total, 0);
        assert_eq!(acc.player(Side::Home, PlayerId(1)).unwrap().plus_minus, -3);
        assert_eq!(acc.player(Side::Away, PlayerId(101)).unwrap().plus_minus, 3);
        assert_eq!(acc.player(Side::Away, PlayerId(106)).unwrap().plus_minus, 0);
    }

    #[test]
    fn test_quarter_buckets() {
        let mut acc = accumulator();
        acc.record_field_goal(Side::Home, PlayerId(1), ShotType::Two, true);
        acc.start_quarter();
        acc.record_field_goal(Side::Away, PlayerId(101), ShotType::Three, true);
        assert_eq!(acc.quarter_scores(), &[[2, 0], [0, 3]]);
        assert!(acc.check_invariants().is_ok());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut acc = accumulator();
        let before = acc.snapshot();
        acc.record_steal(Side::Home, PlayerId(1));
        assert_eq!(before.line(PlayerId(1)).unwrap().stats.steals, 0);
        assert_eq!(acc.snapshot().line(PlayerId(1)).unwrap().stats.steals, 1);
    }
}
