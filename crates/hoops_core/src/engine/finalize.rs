//! Post-game fold into season aggregates.
//!
//! The season store is an external collaborator. [`GameSession::finalize`]
//! builds the whole [`SeasonDelta`] and checks every player against the
//! store before the single `commit` call, so a failure never leaves a
//! half-written season. Per-player post-game hooks (fatigue, injury rolls)
//! run only after the commit went through.

use super::session::GameSession;
use crate::error::{GameError, SeasonError};
use crate::models::{BoxScore, MatchupResult, PlayerGameStat, PlayerId, Side};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One player's contribution to the season.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerDelta {
    pub side: Side,
    pub player_id: PlayerId,
    pub stats: PlayerGameStat,
}

/// Everything a finished game writes to the season store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonDelta {
    pub home_team: String,
    pub away_team: String,
    pub result: MatchupResult,
    pub players: Vec<PlayerDelta>,
}

impl SeasonDelta {
    pub fn from_box_score(box_score: &BoxScore) -> Self {
        let players = Side::BOTH
            .into_iter()
            .flat_map(|side| {
                box_score.lines(side).iter().map(move |line| PlayerDelta {
                    side,
                    player_id: line.player_id,
                    stats: line.stats,
                })
            })
            .collect();
        Self {
            home_team: box_score.home_team.clone(),
            away_team: box_score.away_team.clone(),
            result: box_score.matchup_result(),
            players,
        }
    }
}

pub trait SeasonStatsStore {
    fn has_player(&self, id: PlayerId) -> bool;

    /// Apply the whole delta or nothing.
    fn commit(&mut self, delta: &SeasonDelta) -> Result<(), SeasonError>;
}

pub trait PostGameCheck {
    fn after_game(&mut self, player: PlayerId, stats: &PlayerGameStat);
}

/// No fatigue or injury model.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPostGameCheck;

impl PostGameCheck for NoPostGameCheck {
    fn after_game(&mut self, _player: PlayerId, _stats: &PlayerGameStat) {}
}

/// Running season line of one player.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeasonTotals {
    pub games_played: u32,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub fouls: u32,
    pub turnovers: u32,
    pub seconds_played: u64,
    pub field_goals_made: u32,
    pub field_goals_attempted: u32,
    pub three_points_made: u32,
    pub three_points_attempted: u32,
    pub free_throws_made: u32,
    pub free_throws_attempted: u32,
    pub plus_minus: i64,
}

impl SeasonTotals {
    pub fn add(&mut self, s: &PlayerGameStat) {
        if s.seconds_played > 0 {
            self.games_played += 1;
        }
        self.points += u32::from(s.points);
        self.rebounds += u32::from(s.rebounds());
        self.assists += u32::from(s.assists);
        self.steals += u32::from(s.steals);
        self.blocks += u32::from(s.blocks);
        self.fouls += u32::from(s.fouls);
        self.turnovers += u32::from(s.turnovers);
        self.seconds_played += u64::from(s.seconds_played);
        self.field_goals_made += u32::from(s.field_goals_made);
        self.field_goals_attempted += u32::from(s.field_goals_attempted);
        self.three_points_made += u32::from(s.three_points_made);
        self.three_points_attempted += u32::from(s.three_points_attempted);
        self.free_throws_made += u32::from(s.free_throws_made);
        self.free_throws_attempted += u32::from(s.free_throws_attempted);
        self.plus_minus += i64::from(s.plus_minus);
    }

    pub fn points_per_game(&self) -> Option<f32> {
        (self.games_played > 0).then(|| self.points as f32 / self.games_played as f32)
    }
}

/// Season store kept in memory, for headless runs and tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemorySeasonStore {
    players: BTreeMap<PlayerId, SeasonTotals>,
    matchups: Vec<(String, String, MatchupResult)>,
}

impl InMemorySeasonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that knows every player of both rosters.
    pub fn with_players(ids: impl IntoIterator<Item = PlayerId>) -> Self {
        let mut store = Self::new();
        for id in ids {
            store.register(id);
        }
        store
    }

    pub fn register(&mut self, id: PlayerId) {
        self.players.entry(id).or_default();
    }

    pub fn totals(&self, id: PlayerId) -> Option<&SeasonTotals> {
        self.players.get(&id)
    }

    pub fn matchups(&self) -> &[(String, String, MatchupResult)] {
        &self.matchups
    }
}

impl SeasonStatsStore for InMemorySeasonStore {
    fn has_player(&self, id: PlayerId) -> bool {
        self.players.contains_key(&id)
    }

    fn commit(&mut self, delta: &SeasonDelta) -> Result<(), SeasonError> {
        // Validate before the first write.
        let mut seen = HashSet::with_capacity(delta.players.len());
        for p in &delta.players {
            if !self.players.contains_key(&p.player_id) {
                return Err(SeasonError::UnknownPlayer(p.player_id));
            }
            if !seen.insert(p.player_id) {
                return Err(SeasonError::Rejected(format!("player {} appears twice", p.player_id)));
            }
        }
        for p in &delta.players {
            if let Some(totals) = self.players.get_mut(&p.player_id) {
                totals.add(&p.stats);
            }
        }
        self.matchups.push((delta.home_team.clone(), delta.away_team.clone(), delta.result));
        Ok(())
    }
}

impl<R: Rng> GameSession<R> {
    /// Fold the final box score into the season store, then run the
    /// post-game checks. Exactly one `commit` per finished game.
    pub fn finalize<S, C>(&mut self, store: &mut S, checks: &mut C) -> Result<BoxScore, GameError>
    where
        S: SeasonStatsStore + ?Sized,
        C: PostGameCheck + ?Sized,
    {
        if self.is_cancelled() {
            return Err(GameError::Cancelled);
        }
        if self.finalized {
            return Err(GameError::AlreadyFinalized);
        }
        if !self.is_finished() {
            return Err(GameError::NotFinished);
        }

        let box_score = self.box_score();
        let delta = SeasonDelta::from_box_score(&box_score);

        if let Some(missing) = delta.players.iter().find(|p| !store.has_player(p.player_id)) {
            tracing::warn!(session = %self.id(), player = %missing.player_id, "finalize rolled back: unknown player");
            return Err(SeasonError::UnknownPlayer(missing.player_id).into());
        }
        if let Err(e) = store.commit(&delta) {
            tracing::warn!(session = %self.id(), error = %e, "finalize rolled back");
            return Err(e.into());
        }
        self.finalized = true;

        for p in &delta.players {
            checks.after_game(p.player_id, &p.stats);
        }
        tracing::info!(
            session = %self.id(),
            home = box_score.home_score,
            away = box_score.away_score,
            players = delta.players.len(),
            "season stats committed"
        );
        Ok(box_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::playback::run_fast_forward;
    use crate::test_fixtures::create_test_session;

    fn finished_session(seed: u64) -> GameSession {
        let mut session = create_test_session(seed);
        run_fast_forward(&mut session);
        session
    }

    fn store_for(session: &GameSession) -> InMemorySeasonStore {
        InMemorySeasonStore::with_players(
            Side::BOTH.into_iter().flat_map(|s| session.roster(s).players.iter().map(|p| p.id)),
        )
    }

    #[derive(Default)]
    struct CountingStore {
        inner: InMemorySeasonStore,
        commits: usize,
        reject: bool,
    }

    impl SeasonStatsStore for CountingStore {
        fn has_player(&self, id: PlayerId) -> bool {
            self.inner.has_player(id)
        }

        fn commit(&mut self, delta: &SeasonDelta) -> Result<(), SeasonError> {
            self.commits += 1;
            if self.reject {
                return Err(SeasonError::Rejected("disk full".to_string()));
            }
            self.inner.commit(delta)
        }
    }

    #[derive(Default)]
    struct RecordingCheck(Vec<PlayerId>);

    impl PostGameCheck for RecordingCheck {
        fn after_game(&mut self, player: PlayerId, _stats: &PlayerGameStat) {
            self.0.push(player);
        }
    }

    #[test]
    fn test_finalize_folds_every_player_once() {
        let mut session = finished_session(12);
        let mut store = CountingStore { inner: store_for(&session), ..Default::default() };
        let mut checks = RecordingCheck::default();

        let box_score = session.finalize(&mut store, &mut checks).unwrap();
        assert_eq!(store.commits, 1);
        assert_eq!(checks.0.len(), 20);
        assert_eq!(store.inner.matchups().len(), 1);
        assert!(store.inner.matchups()[0].2.is_played);

        let home_points: u32 = box_score
            .home
            .iter()
            .filter_map(|l| store.inner.totals(l.player_id))
            .map(|t| t.points)
            .sum();
        assert_eq!(home_points, u32::from(box_score.home_score));

        assert!(matches!(
            session.finalize(&mut store, &mut checks),
            Err(GameError::AlreadyFinalized)
        ));
        assert_eq!(store.commits, 1);
    }

    #[test]
    fn test_unknown_player_writes_nothing() {
        let mut session = finished_session(3);
        let mut store = CountingStore { inner: store_for(&session), ..Default::default() };
        store.inner.players.remove(&PlayerId(104));
        let mut checks = RecordingCheck::default();

        let err = session.finalize(&mut store, &mut checks).unwrap_err();
        assert!(matches!(err, GameError::Season(SeasonError::UnknownPlayer(PlayerId(104)))));
        assert_eq!(store.commits, 0);
        assert!(checks.0.is_empty());
        assert!(store.inner.matchups().is_empty());
    }

    #[test]
    fn test_rejected_commit_can_be_retried() {
        let mut session = finished_session(3);
        let mut store = CountingStore { inner: store_for(&session), reject: true, commits: 0 };
        let mut checks = NoPostGameCheck;
        assert!(session.finalize(&mut store, &mut checks).is_err());
        store.reject = false;
        assert!(session.finalize(&mut store, &mut checks).is_ok());
        assert_eq!(store.commits, 2);
        assert_eq!(store.inner.matchups().len(), 1);
    }

    #[test]
    fn test_unfinished_and_cancelled_sessions_refuse() {
        let mut session = create_test_session(1);
        let mut store = store_for(&session);
        assert!(matches!(
            session.finalize(&mut store, &mut NoPostGameCheck),
            Err(GameError::NotFinished)
        ));
        session.cancel();
        assert!(matches!(
            session.finalize(&mut store, &mut NoPostGameCheck),
            Err(GameError::Cancelled)
        ));
        assert!(store.matchups().is_empty());
    }

    #[test]
    fn test_season_totals_count_games_played() {
        let mut totals = SeasonTotals::default();
        totals.add(&PlayerGameStat { points: 10, seconds_played: 600, ..Default::default() });
        totals.add(&PlayerGameStat::default());
        assert_eq!(totals.games_played, 1);
        assert_eq!(totals.points_per_game(), Some(10.0));
    }
}
