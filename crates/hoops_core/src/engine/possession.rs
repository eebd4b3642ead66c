//! Possession Resolver
//!
//! Resolves one trip down the floor in two steps:
//! 1. [`resolve_possession`] draws every random decision and returns a
//!    [`PossessionOutcome`]. It never touches session state.
//! 2. [`apply_outcome`] commits that outcome to the stat accumulator and the
//!    event log in one go (score, player counters and plus-minus together).
//!
//! ## Decision tree
//! ```text
//! roll < successRate ──► scoring trip: shot selector picks 3 / 2 / free throws
//!                         ├─ field goal: made, assist 70% (distinct passer)
//!                         ├─ free throws: 1-3 attempts, shooting foul on a defender
//!                         └─ offensive rebound credit 30%
//! otherwise ──► empty trip (sub-roll)
//!                 ├─ < 0.4  missed field goal + defensive rebound
//!                 ├─ < 0.7  turnover, steal 50%
//!                 └─ else   offensive foul
//! always: non-shooting defensive foul 10%; block 5% on empty trips
//! ```
//! Free throws come from the shot selector only; the independent defensive
//! foul never sends anyone to the line, so attempts are never counted twice.

use super::config::SimulationConfig;
use super::event_log::EventLog;
use super::stats::StatAccumulator;
use crate::models::{EventCategory, GameEvent, Player, PlayerId, Position, Side};
use crate::tactics::{draw_shot, success_rate, ShotType, StartingFive, Tactic};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Everything the resolver reads for one possession.
#[derive(Debug, Clone, Copy)]
pub struct PossessionContext<'a> {
    pub offense: Side,
    pub offense_tactic: Tactic,
    pub offense_five: StartingFive<'a>,
    pub defense_five: StartingFive<'a>,
    pub offense_strength: f64,
    pub defense_strength: f64,
}

impl<'a> PossessionContext<'a> {
    fn offense_player(&self, slot: usize) -> Option<&'a Player> {
        self.offense_five.at(Position::ALL[slot])
    }

    fn defense_player(&self, slot: usize) -> Option<&'a Player> {
        self.defense_five.at(Position::ALL[slot])
    }

    fn name(&self, id: PlayerId) -> &'a str {
        self.offense_five
            .players()
            .chain(self.defense_five.players())
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
            .unwrap_or("unknown player")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FreeThrowTrip {
    pub attempts: u8,
    pub made: u8,
    pub fouled_by: PlayerId,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rebound {
    pub player: PlayerId,
    pub offensive: bool,
}

/// How a non-scoring trip ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum EmptyTrip {
    MissedShot { shot: ShotType },
    Turnover { stolen_by: Option<PlayerId> },
    OffensiveFoul,
}

/// Transient result of one possession.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PossessionOutcome {
    pub offense: Side,
    pub success_rate: f64,
    /// The scoring branch was taken (free-throw trips may still end with 0 points).
    pub scored: bool,
    pub shot: Option<ShotType>,
    pub points: u16,
    pub primary: PlayerId,
    pub secondary: PlayerId,
    pub assist: Option<PlayerId>,
    pub free_throws: Option<FreeThrowTrip>,
    pub rebound: Option<Rebound>,
    pub empty_trip: Option<EmptyTrip>,
    pub defensive_foul: Option<PlayerId>,
    pub block: Option<PlayerId>,
}

impl PossessionOutcome {
    pub fn defense(&self) -> Side {
        self.offense.opponent()
    }
}

/// Draw one possession. Returns `None` when either five is incomplete.
pub fn resolve_possession<R: Rng + ?Sized>(
    ctx: &PossessionContext<'_>,
    cfg: &SimulationConfig,
    rng: &mut R,
) -> Option<PossessionOutcome> {
    if !ctx.offense_five.is_complete() || !ctx.defense_five.is_complete() {
        return None;
    }

    let rate = success_rate(ctx.offense_strength, ctx.defense_strength, cfg);
    let scored = rng.gen::<f64>() < rate;

    // Baseline selection: uniform over the five slots, no attribute weighting.
    let primary = ctx.offense_player(rng.gen_range(0..5))?;
    let secondary = ctx.offense_player(rng.gen_range(0..5))?;

    let mut outcome = PossessionOutcome {
        offense: ctx.offense,
        success_rate: rate,
        scored,
        shot: None,
        points: 0,
        primary: primary.id,
        secondary: secondary.id,
        assist: None,
        free_throws: None,
        rebound: None,
        empty_trip: None,
        defensive_foul: None,
        block: None,
    };

    if scored {
        let shot = draw_shot(ctx.offense_tactic, primary.position, rng);
        outcome.shot = Some(shot);
        match shot {
            ShotType::FreeThrows => {
                let attempts: u8 = rng.gen_range(1..=3);
                let make_chance = cfg.free_throw_base
                    + f64::from(primary.attributes.free_throw) / cfg.free_throw_divisor;
                let made = (0..attempts).filter(|_| rng.gen::<f64>() < make_chance).count() as u8;
                let fouled_by = ctx.defense_player(rng.gen_range(0..5))?.id;
                outcome.free_throws = Some(FreeThrowTrip { attempts, made, fouled_by });
                outcome.points = u16::from(made);
            }
            ShotType::Two | ShotType::Three => {
                outcome.points = shot.points();
                if secondary.id != primary.id && rng.gen::<f64>() < cfg.assist_chance {
                    outcome.assist = Some(secondary.id);
                }
            }
        }
        if rng.gen::<f64>() < cfg.scoring_rebound_chance {
            let player = ctx.offense_player(rng.gen_range(0..5))?.id;
            outcome.rebound = Some(Rebound { player, offensive: true });
        }
    } else {
        let sub_roll = rng.gen::<f64>();
        if sub_roll < cfg.missed_shot_threshold {
            let shot = match draw_shot(ctx.offense_tactic, primary.position, rng) {
                ShotType::FreeThrows => ShotType::Two,
                other => other,
            };
            outcome.shot = Some(shot);
            let player = ctx.defense_player(rng.gen_range(0..5))?.id;
            outcome.rebound = Some(Rebound { player, offensive: false });
            outcome.empty_trip = Some(EmptyTrip::MissedShot { shot });
        } else if sub_roll < cfg.turnover_threshold {
            let stolen_by = if rng.gen::<f64>() < cfg.steal_chance {
                Some(ctx.defense_player(rng.gen_range(0..5))?.id)
            } else {
                None
            };
            outcome.empty_trip = Some(EmptyTrip::Turnover { stolen_by });
        } else {
            outcome.empty_trip = Some(EmptyTrip::OffensiveFoul);
        }
    }

    if rng.gen::<f64>() < cfg.defensive_foul_chance {
        outcome.defensive_foul = Some(ctx.defense_player(rng.gen_range(0..5))?.id);
    }
    if !scored && rng.gen::<f64>() < cfg.block_chance {
        outcome.block = Some(ctx.defense_player(rng.gen_range(0..5))?.id);
    }

    Some(outcome)
}

/// Commit an outcome. Returns the points scored by the offense.
pub fn apply_outcome(
    outcome: &PossessionOutcome,
    ctx: &PossessionContext<'_>,
    stats: &mut StatAccumulator,
    log: &mut EventLog,
    quarter: u8,
    clock_secs: u16,
) -> u16 {
    let offense = outcome.offense;
    let defense = outcome.defense();
    let shooter = ctx.name(outcome.primary);
    let event = |category: EventCategory, side: Side, text: String| {
        GameEvent::new(quarter, clock_secs, category, Some(side), text)
    };

    let mut points = 0;
    if outcome.scored {
        match (outcome.shot, outcome.free_throws) {
            (Some(ShotType::FreeThrows), Some(trip)) => {
                stats.record_foul(defense, trip.fouled_by);
                log.push(event(
                    EventCategory::Foul,
                    defense,
                    format!("{} fouls {} on the drive", ctx.name(trip.fouled_by), shooter),
                ));
                points = stats.record_free_throws(offense, outcome.primary, trip.attempts, trip.made);
                let category = if points > 0 { EventCategory::Score } else { EventCategory::Info };
                log.push(event(
                    category,
                    offense,
                    format!("{} makes {} of {} free throws", shooter, trip.made, trip.attempts),
                ));
            }
            (Some(shot), _) if shot.is_field_goal() => {
                points = stats.record_field_goal(offense, outcome.primary, shot, true);
                let text = match outcome.assist {
                    Some(assister) => {
                        stats.record_assist(offense, assister);
                        format!("{} hits a {} (assist: {})", shooter, shot.label(), ctx.name(assister))
                    }
                    None => format!("{} hits a {}", shooter, shot.label()),
                };
                log.push(event(EventCategory::Score, offense, text));
            }
            _ => {}
        }
        if let Some(rebound) = outcome.rebound {
            stats.record_rebound(offense, rebound.player, true);
            log.push(event(
                EventCategory::Info,
                offense,
                format!("{} crashes the glass for an offensive rebound", ctx.name(rebound.player)),
            ));
        }
        let offense_ids: Vec<PlayerId> = ctx.offense_five.players().map(|p| p.id).collect();
        let defense_ids: Vec<PlayerId> = ctx.defense_five.players().map(|p| p.id).collect();
        stats.apply_plus_minus(offense, points, &offense_ids, &defense_ids);
    } else {
        match outcome.empty_trip {
            Some(EmptyTrip::MissedShot { shot }) => {
                stats.record_field_goal(offense, outcome.primary, shot, false);
                let rebounder = outcome.rebound.map(|r| r.player);
                if let Some(player) = rebounder {
                    stats.record_rebound(defense, player, false);
                }
                log.push(event(
                    EventCategory::Defense,
                    defense,
                    match rebounder {
                        Some(player) => format!(
                            "{} misses a {}, {} grabs the rebound",
                            shooter,
                            shot.label(),
                            ctx.name(player)
                        ),
                        None => format!("{} misses a {}", shooter, shot.label()),
                    },
                ));
            }
            Some(EmptyTrip::Turnover { stolen_by }) => {
                stats.record_turnover(offense, outcome.primary);
                match stolen_by {
                    Some(thief) => {
                        stats.record_steal(defense, thief);
                        log.push(event(
                            EventCategory::Defense,
                            defense,
                            format!("{} steals the ball from {}", ctx.name(thief), shooter),
                        ));
                    }
                    None => log.push(event(
                        EventCategory::Turnover,
                        offense,
                        format!("{} turns the ball over", shooter),
                    )),
                }
            }
            Some(EmptyTrip::OffensiveFoul) => {
                stats.record_foul(offense, outcome.primary);
                stats.record_turnover(offense, outcome.primary);
                log.push(event(
                    EventCategory::Foul,
                    offense,
                    format!("Offensive foul on {}", shooter),
                ));
            }
            None => {}
        }
        if let Some(blocker) = outcome.block {
            stats.record_block(defense, blocker);
            log.push(event(
                EventCategory::Defense,
                defense,
                format!("{} blocks {}", ctx.name(blocker), shooter),
            ));
        }
    }

    if let Some(fouler) = outcome.defensive_foul {
        stats.record_foul(defense, fouler);
        log.push(event(EventCategory::Foul, defense, format!("Foul on {}", ctx.name(fouler))));
    }

    points
}
