//! Game Session: clock and quarter state machine.
//!
//! ```text
//! Ready ──start()──► Playing ⇄ Paused
//!                       │ clock hits 0 (Q1-Q3)
//!                       ▼
//!                  QuarterBreak ──begin_next_quarter()──► Playing
//!                       │ clock hits 0 in Q4, or cancel() from anywhere
//!                       ▼
//!                    Finished
//! ```
//!
//! One [`GameSession::tick`] is one simulated second. Every
//! `possession_interval_secs` of elapsed quarter time a possession is
//! resolved. The session is the only mutator of its stats and event log; the
//! playback controller owns it exclusively while a game is running.

use super::config::GameConfig;
use super::event_log::EventLog;
use super::possession::{apply_outcome, resolve_possession, PossessionContext, PossessionOutcome};
use super::stats::StatAccumulator;
use crate::error::GameError;
use crate::models::{BoxScore, EventCategory, GameEvent, Lineup, Player, PlayerId, Position, Roster, Side};
use crate::tactics::{team_strength, StartingFive, Tactic};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Seconds in a quarter.
pub const QUARTER_SECS: u16 = 720;
/// Regulation quarters. There is no overtime: a tie after Q4 stands.
pub const QUARTERS: u8 = 4;

/// One side's pre-game selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamSetup {
    pub roster: Roster,
    pub lineup: Lineup,
    #[serde(default)]
    pub tactic: Tactic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSetup {
    pub home: TeamSetup,
    pub away: TeamSetup,
    /// The user's side; the other side is AI-managed.
    #[serde(default)]
    pub controlled_side: Option<Side>,
}

impl GameSetup {
    pub fn validate(&self) -> Result<(), GameError> {
        self.home.lineup.validate(Side::Home, &self.home.roster)?;
        self.away.lineup.validate(Side::Away, &self.away.roster)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Ready,
    Playing,
    Paused,
    QuarterBreak,
    Finished,
}

/// Per-tick result for streaming hosts.
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    /// Not playing (ready, paused, at a break, finished or cancelled).
    Inert(GameStatus),
    /// One simulated second elapsed.
    Tick(TickData),
    /// Quarter `ended` is over; the session now waits at a break.
    QuarterEnd { ended: u8, score: (u16, u16) },
    /// Regulation is over.
    FullTime { score: (u16, u16) },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickData {
    pub quarter: u8,
    pub clock_secs: u16,
    pub score: (u16, u16),
    /// Set on possession seconds.
    pub possession: Option<PossessionOutcome>,
}

/// Read-only view for presentation layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSnapshot {
    pub status: GameStatus,
    pub quarter: u8,
    pub clock_secs: u16,
    pub home_score: u16,
    pub away_score: u16,
    pub possession: Side,
    pub home_tactic: Tactic,
    pub away_tactic: Tactic,
    pub timeouts_left: (u8, u8),
    pub event_count: usize,
}

#[derive(Debug, Clone)]
struct TeamState {
    roster: Roster,
    lineup: Lineup,
    tactic: Tactic,
    timeouts_left: u8,
}

impl TeamState {
    fn new(setup: TeamSetup, timeouts: u8) -> Self {
        Self { roster: setup.roster, lineup: setup.lineup, tactic: setup.tactic, timeouts_left: timeouts }
    }

    fn on_court(&self) -> Vec<PlayerId> {
        self.lineup.filled().map(|(_, id)| id).filter(|id| self.roster.contains(*id)).collect()
    }
}

pub struct GameSession<R: Rng = ChaCha8Rng> {
    id: Uuid,
    config: GameConfig,
    teams: [TeamState; 2],
    controlled_side: Option<Side>,
    status: GameStatus,
    quarter: u8,
    clock_secs: u16,
    possession: Side,
    possessions_played: u32,
    stats: StatAccumulator,
    log: EventLog,
    rng: R,
    cancelled: bool,
    pub(crate) finalized: bool,
}

impl GameSession<ChaCha8Rng> {
    /// Session with the engine's default seeded RNG.
    pub fn with_seed(setup: GameSetup, config: GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::new(setup, config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameSession<R> {
    /// Validate the setup and config up front; an incomplete lineup never
    /// reaches the resolver.
    pub fn new(setup: GameSetup, config: GameConfig, rng: R) -> Result<Self, GameError> {
        config.validate()?;
        setup.validate()?;

        let timeouts = config.simulation.timeouts_per_team;
        let home = TeamState::new(setup.home, timeouts);
        let away = TeamState::new(setup.away, timeouts);
        let stats = StatAccumulator::new(&home.roster, &home.on_court(), &away.roster, &away.on_court());
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, home = %home.roster.name, away = %away.roster.name, "game session created");

        Ok(Self {
            id,
            config,
            teams: [home, away],
            controlled_side: setup.controlled_side,
            status: GameStatus::Ready,
            quarter: 1,
            clock_secs: QUARTER_SECS,
            possession: Side::Home,
            possessions_played: 0,
            stats,
            log: EventLog::new(),
            rng,
            cancelled: false,
            finalized: false,
        })
    }

    fn team(&self, side: Side) -> &TeamState {
        &self.teams[side.index()]
    }

    fn team_mut(&mut self, side: Side) -> &mut TeamState {
        &mut self.teams[side.index()]
    }

    fn push_event(&mut self, category: EventCategory, side: Option<Side>, text: String) {
        self.log.push(GameEvent::new(self.quarter, self.clock_secs, category, side, text));
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Ready → Playing. Returns false from any other status.
    pub fn start(&mut self) -> bool {
        if self.cancelled || self.status != GameStatus::Ready {
            return false;
        }
        self.status = GameStatus::Playing;
        let text = format!(
            "Tip-off: {} ({}) vs {} ({})",
            self.team(Side::Home).roster.name,
            self.team(Side::Home).tactic,
            self.team(Side::Away).roster.name,
            self.team(Side::Away).tactic
        );
        self.push_event(EventCategory::Info, None, text);
        tracing::info!(session = %self.id, "tip-off");
        true
    }

    /// Advance one simulated second. No-op unless Playing.
    pub fn tick(&mut self) -> StepResult {
        if self.cancelled || self.status != GameStatus::Playing {
            return StepResult::Inert(self.status);
        }

        self.clock_secs = self.clock_secs.saturating_sub(1);
        for side in Side::BOTH {
            let on_court = self.team(side).on_court();
            self.stats.add_seconds_played(side, &on_court, 1);
        }

        let elapsed = QUARTER_SECS - self.clock_secs;
        let possession = if elapsed % self.config.simulation.possession_interval_secs == 0 {
            self.run_possession()
        } else {
            None
        };

        if self.clock_secs == 0 {
            return self.end_quarter();
        }

        StepResult::Tick(TickData {
            quarter: self.quarter,
            clock_secs: self.clock_secs,
            score: self.score(),
            possession,
        })
    }

    fn end_quarter(&mut self) -> StepResult {
        let ended = self.quarter;
        let score = self.score();
        if ended < QUARTERS {
            let text = format!(
                "End of Q{}: {} {} - {} {}",
                ended,
                self.team(Side::Home).roster.name,
                score.0,
                self.team(Side::Away).roster.name,
                score.1
            );
            self.push_event(EventCategory::Info, None, text);
            self.quarter += 1;
            self.clock_secs = QUARTER_SECS;
            self.stats.start_quarter();
            self.status = GameStatus::QuarterBreak;
            self.reroll_ai_tactics();
            tracing::debug!(session = %self.id, quarter = ended, home = score.0, away = score.1, "quarter over");
            StepResult::QuarterEnd { ended, score }
        } else {
            let text = format!(
                "Final: {} {} - {} {}",
                self.team(Side::Home).roster.name,
                score.0,
                self.team(Side::Away).roster.name,
                score.1
            );
            self.push_event(EventCategory::Info, None, text);
            self.status = GameStatus::Finished;
            tracing::info!(session = %self.id, home = score.0, away = score.1, "final buzzer");
            StepResult::FullTime { score }
        }
    }

    /// Every AI-managed side may switch tactics between quarters.
    fn reroll_ai_tactics(&mut self) {
        let chance = self.config.simulation.tactic_reroll_chance;
        for side in Side::BOTH {
            if self.controlled_side == Some(side) {
                continue;
            }
            if self.rng.gen::<f64>() < chance {
                let next = Tactic::random(&mut self.rng);
                if next != self.team(side).tactic {
                    self.team_mut(side).tactic = next;
                    let text = format!("{} switches to a {} game plan", self.team(side).roster.name, next);
                    self.push_event(EventCategory::Info, Some(side), text);
                }
            }
        }
    }

    /// QuarterBreak → Playing.
    pub fn begin_next_quarter(&mut self) -> bool {
        if self.cancelled || self.status != GameStatus::QuarterBreak {
            return false;
        }
        self.status = GameStatus::Playing;
        self.push_event(EventCategory::Info, None, format!("Start of Q{}", self.quarter));
        true
    }

    /// Playing → Paused. Calling it again changes nothing.
    pub fn pause(&mut self) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        self.status = GameStatus::Paused;
        true
    }

    /// Paused → Playing.
    pub fn resume(&mut self) -> bool {
        if self.cancelled || self.status != GameStatus::Paused {
            return false;
        }
        self.status = GameStatus::Playing;
        true
    }

    /// Force Finished without a box-score fold. Later ticks stay inert.
    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        self.status = GameStatus::Finished;
        self.push_event(EventCategory::Info, None, "Game cancelled".to_string());
        tracing::info!(session = %self.id, quarter = self.quarter, clock = self.clock_secs, "game cancelled");
    }

    // =========================================================================
    // Possessions
    // =========================================================================

    fn run_possession(&mut self) -> Option<PossessionOutcome> {
        let offense = self.possession;
        self.possession = offense.opponent();
        self.possessions_played += 1;

        let short = [offense, offense.opponent()]
            .into_iter()
            .find(|&side| !self.ensure_full_lineup(side));
        if let Some(side) = short {
            let text = format!("Possession skipped: {} cannot field five players", self.team(side).roster.name);
            self.push_event(EventCategory::Info, Some(side), text);
            return None;
        }

        let cap = self.config.simulation.rotation_cap;
        let [home, away] = &self.teams;
        let (off, def) = match offense {
            Side::Home => (home, away),
            Side::Away => (away, home),
        };
        let ctx = PossessionContext {
            offense,
            offense_tactic: off.tactic,
            offense_five: StartingFive::resolve(&off.roster, &off.lineup),
            defense_five: StartingFive::resolve(&def.roster, &def.lineup),
            offense_strength: team_strength(&off.roster, &off.lineup, off.tactic, cap),
            defense_strength: team_strength(&def.roster, &def.lineup, def.tactic, cap),
        };

        let outcome = resolve_possession(&ctx, &self.config.simulation, &mut self.rng)?;
        apply_outcome(&outcome, &ctx, &mut self.stats, &mut self.log, self.quarter, self.clock_secs);
        debug_assert!(self.stats.check_invariants().is_ok());
        Some(outcome)
    }

    /// Fill lineup slots whose player has left the roster with the best
    /// available bench player (same position first). Returns false when a
    /// slot stays empty.
    fn ensure_full_lineup(&mut self, side: Side) -> bool {
        for position in Position::ALL {
            let current = self.team(side).lineup.get(position);
            if current.is_some_and(|id| self.team(side).roster.contains(id)) {
                continue;
            }
            let Some(replacement) = self.pick_substitute(side, position) else {
                tracing::warn!(session = %self.id, %side, %position, "no substitute available");
                return false;
            };
            let departed = current
                .and_then(|id| self.stats.lines(side).iter().find(|l| l.player_id == id))
                .map(|l| l.name.clone())
                .unwrap_or_else(|| "an empty slot".to_string());
            self.team_mut(side).lineup.set(position, Some(replacement.id));
            tracing::warn!(session = %self.id, %side, %position, player = %replacement.id, "stale lineup slot substituted");
            let text = format!("{} replaces {} at {}", replacement.name, departed, position);
            self.push_event(EventCategory::Info, Some(side), text);
        }
        true
    }

    fn pick_substitute(&self, side: Side, position: Position) -> Option<Player> {
        let team = self.team(side);
        let bench: Vec<&Player> = team
            .roster
            .rotation(team.roster.len())
            .into_iter()
            .filter(|p| !team.lineup.contains(p.id))
            .collect();
        bench
            .iter()
            .find(|p| p.position == position)
            .or_else(|| bench.first())
            .map(|p| (*p).clone())
    }

    // =========================================================================
    // Host intervention
    // =========================================================================

    /// Change a side's tactic; takes effect on the next possession.
    pub fn set_tactic(&mut self, side: Side, tactic: Tactic) -> bool {
        if self.status == GameStatus::Finished {
            return false;
        }
        if self.team(side).tactic == tactic {
            return true;
        }
        self.team_mut(side).tactic = tactic;
        let text = format!("{} switches to a {} game plan", self.team(side).roster.name, tactic);
        self.push_event(EventCategory::Info, Some(side), text);
        true
    }

    /// Spend a timeout and pause. False when none are left or the ball is not live.
    pub fn call_timeout(&mut self, side: Side) -> bool {
        if !matches!(self.status, GameStatus::Playing | GameStatus::Paused) {
            return false;
        }
        if self.team(side).timeouts_left == 0 {
            return false;
        }
        self.team_mut(side).timeouts_left -= 1;
        self.status = GameStatus::Paused;
        let text = format!(
            "Timeout {} ({} left)",
            self.team(side).roster.name,
            self.team(side).timeouts_left
        );
        self.push_event(EventCategory::Timeout, Some(side), text);
        true
    }

    /// Take a player off the roster mid-game (injury, release). The lineup
    /// slot is refilled lazily at the next possession.
    pub fn remove_player(&mut self, side: Side, id: PlayerId) -> Option<Player> {
        let removed = self.team_mut(side).roster.remove_player(id)?;
        tracing::info!(session = %self.id, %side, player = %id, "player removed from roster");
        Some(removed)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    pub fn clock_secs(&self) -> u16 {
        self.clock_secs
    }

    /// `(home, away)`.
    pub fn score(&self) -> (u16, u16) {
        (self.stats.score(Side::Home), self.stats.score(Side::Away))
    }

    /// Side with the ball on the next possession.
    pub fn possession(&self) -> Side {
        self.possession
    }

    pub fn possessions_played(&self) -> u32 {
        self.possessions_played
    }

    pub fn tactic(&self, side: Side) -> Tactic {
        self.team(side).tactic
    }

    pub fn lineup(&self, side: Side) -> &Lineup {
        &self.team(side).lineup
    }

    pub fn roster(&self, side: Side) -> &Roster {
        &self.team(side).roster
    }

    pub fn timeouts_left(&self, side: Side) -> u8 {
        self.team(side).timeouts_left
    }

    pub fn events(&self) -> &EventLog {
        &self.log
    }

    pub fn stats(&self) -> &StatAccumulator {
        &self.stats
    }

    pub fn box_score(&self) -> BoxScore {
        self.stats.snapshot()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let (home_score, away_score) = self.score();
        SessionSnapshot {
            status: self.status,
            quarter: self.quarter,
            clock_secs: self.clock_secs,
            home_score,
            away_score,
            possession: self.possession,
            home_tactic: self.tactic(Side::Home),
            away_tactic: self.tactic(Side::Away),
            timeouts_left: (self.timeouts_left(Side::Home), self.timeouts_left(Side::Away)),
            event_count: self.log.len(),
        }
    }
}
