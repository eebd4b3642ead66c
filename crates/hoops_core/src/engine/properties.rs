//! Property tests over whole sessions.

use super::config::GameConfig;
use super::session::{GameSession, GameStatus, StepResult};
use crate::models::{PlayerGameStat, Side};
use crate::tactics::Tactic;
use crate::test_fixtures::{create_team_setup, create_test_roster, create_test_setup};
use crate::engine::session::GameSetup;
use proptest::prelude::*;

fn tactic_strategy() -> impl Strategy<Value = Tactic> {
    prop::sample::select(Tactic::ALL.to_vec())
}

fn setup(home_overall: u8, away_overall: u8, home: Tactic, away: Tactic) -> GameSetup {
    GameSetup {
        home: create_team_setup(create_test_roster("Home", 1, home_overall), home),
        away: create_team_setup(create_test_roster("Away", 101, away_overall), away),
        controlled_side: None,
    }
}

fn all_stats(session: &GameSession) -> Vec<PlayerGameStat> {
    let box_score = session.box_score();
    box_score.home.iter().chain(box_score.away.iter()).map(|l| l.stats).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Scores never go down, only the offense scores, and the score always
    /// equals the players' points.
    #[test]
    fn prop_full_game_bookkeeping(
        seed in any::<u64>(),
        home_overall in 40u8..=99,
        away_overall in 40u8..=99,
        home in tactic_strategy(),
        away in tactic_strategy(),
    ) {
        let mut session =
            GameSession::with_seed(setup(home_overall, away_overall, home, away), GameConfig::default(), seed)
                .unwrap();
        session.start();
        let mut prev = session.score();
        loop {
            let result = session.tick();
            let now = session.score();
            prop_assert!(now.0 >= prev.0 && now.1 >= prev.1);
            if let StepResult::Tick(data) = &result {
                if let Some(outcome) = &data.possession {
                    match outcome.offense {
                        Side::Home => { prop_assert_eq!(now.1, prev.1); }
                        Side::Away => { prop_assert_eq!(now.0, prev.0); }
                    }
                } else {
                    prop_assert_eq!(now, prev);
                }
            }
            prev = now;
            match result {
                StepResult::QuarterEnd { .. } => { session.begin_next_quarter(); }
                StepResult::FullTime { .. } => break,
                _ => {}
            }
        }

        prop_assert!(session.stats().check_invariants().is_ok());
        let box_score = session.box_score();
        for side in Side::BOTH {
            let points: u32 = box_score.lines(side).iter().map(|l| u32::from(l.stats.points)).sum();
            prop_assert_eq!(points, u32::from(box_score.score(side)));
        }

        let plus_minus: i32 = all_stats(&session).iter().map(|s| s.plus_minus).sum();
        prop_assert_eq!(plus_minus, 0);

        for s in all_stats(&session) {
            prop_assert!(s.field_goals_made <= s.field_goals_attempted);
            prop_assert!(s.three_points_made <= s.three_points_attempted);
            prop_assert!(s.three_points_attempted <= s.field_goals_attempted);
            prop_assert!(s.free_throws_made <= s.free_throws_attempted);
        }
    }

    /// Any number of repeated pauses leaves the session exactly as one pause does.
    #[test]
    fn prop_pause_is_idempotent(seed in any::<u64>(), warmup in 0u16..700, repeats in 1usize..5) {
        let run = |pauses: usize| {
            let mut session = GameSession::with_seed(create_test_setup(), GameConfig::default(), seed).unwrap();
            session.start();
            for _ in 0..warmup {
                session.tick();
            }
            for _ in 0..pauses {
                session.pause();
            }
            for _ in 0..50 {
                session.tick();
            }
            session.resume();
            for _ in 0..10 {
                session.tick();
            }
            (session.clock_secs(), session.box_score(), session.events().clone())
        };
        prop_assert_eq!(run(1), run(repeats));
    }

    /// Nothing moves after cancel, however many ticks arrive.
    #[test]
    fn prop_cancel_freezes_state(seed in any::<u64>(), warmup in 0u16..2000, extra in 1usize..500) {
        let mut session = GameSession::with_seed(create_test_setup(), GameConfig::default(), seed).unwrap();
        session.start();
        for _ in 0..warmup {
            if let StepResult::QuarterEnd { .. } = session.tick() {
                session.begin_next_quarter();
            }
        }
        session.cancel();
        let frozen = (session.clock_secs(), session.quarter(), session.box_score(), session.events().len());
        for _ in 0..extra {
            prop_assert_eq!(session.tick(), StepResult::Inert(GameStatus::Finished));
        }
        prop_assert_eq!(
            (session.clock_secs(), session.quarter(), session.box_score(), session.events().len()),
            frozen
        );
    }
}
