//! Tactic Strength Calculator
//!
//! Effective team strength = rotation average + tactic bonus. The bonus is
//! floored to an integer before it is added; a missing lineup slot simply
//! contributes 0 to its term.

use super::Tactic;
use crate::engine::config::SimulationConfig;
use crate::models::{Lineup, Player, Position, Roster};

/// The five on-court players resolved against a roster.
#[derive(Debug, Clone, Copy)]
pub struct StartingFive<'a> {
    slots: [Option<&'a Player>; 5],
}

impl<'a> StartingFive<'a> {
    pub fn resolve(roster: &'a Roster, lineup: &Lineup) -> Self {
        let mut slots = [None; 5];
        for position in Position::ALL {
            slots[position.slot()] = lineup.get(position).and_then(|id| roster.get(id));
        }
        Self { slots }
    }

    pub fn at(&self, position: Position) -> Option<&'a Player> {
        self.slots[position.slot()]
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn players(&self) -> impl Iterator<Item = &'a Player> + '_ {
        self.slots.iter().flatten().copied()
    }
}

/// Average overall of the top `rotation_cap` players. Rosters smaller than
/// five still divide by five.
pub fn base_strength(roster: &Roster, rotation_cap: usize) -> f64 {
    let rotation = roster.rotation(rotation_cap);
    let total: u32 = rotation.iter().map(|p| u32::from(p.overall)).sum();
    let divisor = rotation.len().max(5);
    f64::from(total) / divisor as f64
}

/// Integer bonus a tactic adds on top of the base strength.
pub fn tactic_bonus(tactic: Tactic, five: &StartingFive<'_>) -> u32 {
    let attr = |position: Position, pick: fn(&Player) -> u8| -> u32 {
        five.at(position).map(|p| u32::from(pick(p))).unwrap_or(0)
    };
    match tactic {
        Tactic::Balanced => 5,
        Tactic::Inside => {
            (attr(Position::C, |p| p.attributes.rebounding)
                + attr(Position::PF, |p| p.attributes.rebounding))
                / 5
        }
        Tactic::Outside => {
            (attr(Position::PG, |p| p.attributes.three_point)
                + attr(Position::SG, |p| p.attributes.three_point))
                / 5
        }
        Tactic::FastBreak => {
            Position::ALL.iter().map(|&pos| attr(pos, |p| p.attributes.speed)).sum::<u32>() / 10
        }
        Tactic::Defense => {
            Position::ALL.iter().map(|&pos| attr(pos, |p| p.attributes.defense)).sum::<u32>() / 10
        }
    }
}

pub fn team_strength(roster: &Roster, lineup: &Lineup, tactic: Tactic, rotation_cap: usize) -> f64 {
    let five = StartingFive::resolve(roster, lineup);
    base_strength(roster, rotation_cap) + f64::from(tactic_bonus(tactic, &five))
}

/// Chance the offense scores on a possession.
pub fn success_rate(offense_strength: f64, defense_strength: f64, cfg: &SimulationConfig) -> f64 {
    let raw = 0.5 + (offense_strength - defense_strength) / cfg.strength_divisor;
    raw.clamp(cfg.success_rate_min, cfg.success_rate_max)
}
