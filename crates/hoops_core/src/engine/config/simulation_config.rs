//! Possession Resolution Configuration

use serde::{Deserialize, Serialize};

/// Probabilities and constants of the possession resolver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    // === Cadence ===
    /// Simulated seconds between possessions (default: 12)
    pub possession_interval_secs: u16,

    // === Success Rate ===
    /// Strength difference divisor (default: 200)
    pub strength_divisor: f64,
    /// Lower clamp of the scoring chance (default: 0.2)
    pub success_rate_min: f64,
    /// Upper clamp of the scoring chance (default: 0.8)
    pub success_rate_max: f64,
    /// Players counted towards base strength (default: 8)
    pub rotation_cap: usize,

    // === Scoring Branch ===
    /// Assist credited to a distinct secondary player (default: 0.7)
    pub assist_chance: f64,
    /// Offensive rebound credited on a scoring trip (default: 0.3)
    pub scoring_rebound_chance: f64,
    /// Free throw make chance = base + rating / divisor (default: 0.5, 200)
    pub free_throw_base: f64,
    pub free_throw_divisor: f64,

    // === Empty Trip ===
    /// Sub-roll below this: missed shot + defensive rebound (default: 0.4)
    pub missed_shot_threshold: f64,
    /// Sub-roll below this: live-ball turnover, otherwise offensive foul (default: 0.7)
    pub turnover_threshold: f64,
    /// Steal credited on a turnover (default: 0.5)
    pub steal_chance: f64,

    // === Independent Rolls ===
    /// Extra non-shooting defensive foul (default: 0.1)
    pub defensive_foul_chance: f64,
    /// Block on an empty trip (default: 0.05)
    pub block_chance: f64,

    // === Game Management ===
    /// Chance a non-controlled side re-rolls its tactic at a quarter break (default: 0.3)
    pub tactic_reroll_chance: f64,
    /// Timeouts per team per game (default: 7)
    pub timeouts_per_team: u8,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            possession_interval_secs: 12,

            strength_divisor: 200.0,
            success_rate_min: 0.2,
            success_rate_max: 0.8,
            rotation_cap: 8,

            assist_chance: 0.7,
            scoring_rebound_chance: 0.3,
            free_throw_base: 0.5,
            free_throw_divisor: 200.0,

            missed_shot_threshold: 0.4,
            turnover_threshold: 0.7,
            steal_chance: 0.5,

            defensive_foul_chance: 0.1,
            block_chance: 0.05,

            tactic_reroll_chance: 0.3,
            timeouts_per_team: 7,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), String> {
        let probabilities = [
            ("success_rate_min", self.success_rate_min),
            ("success_rate_max", self.success_rate_max),
            ("assist_chance", self.assist_chance),
            ("scoring_rebound_chance", self.scoring_rebound_chance),
            ("free_throw_base", self.free_throw_base),
            ("missed_shot_threshold", self.missed_shot_threshold),
            ("turnover_threshold", self.turnover_threshold),
            ("steal_chance", self.steal_chance),
            ("defensive_foul_chance", self.defensive_foul_chance),
            ("block_chance", self.block_chance),
            ("tactic_reroll_chance", self.tactic_reroll_chance),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be within [0, 1], got {}", name, value));
            }
        }
        if self.success_rate_min > self.success_rate_max {
            return Err("success_rate_min exceeds success_rate_max".to_string());
        }
        if self.missed_shot_threshold > self.turnover_threshold {
            return Err("missed_shot_threshold exceeds turnover_threshold".to_string());
        }
        if self.possession_interval_secs == 0 {
            return Err("possession_interval_secs must be positive".to_string());
        }
        if self.strength_divisor <= 0.0 || self.free_throw_divisor <= 0.0 {
            return Err("divisors must be positive".to_string());
        }
        if self.rotation_cap == 0 {
            return Err("rotation_cap must be positive".to_string());
        }
        Ok(())
    }
}
