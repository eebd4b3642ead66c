//! # Engine Configuration Module
//!
//! Every tuning constant of the possession resolver and the playback loop
//! lives here so balance changes never touch engine code.
//!
//! ## Usage
//! ```rust
//! use hoops_core::engine::config::GameConfig;
//!
//! let config = GameConfig::default();
//! let headless = GameConfig::fast_forward();
//! assert!(headless.validate().is_ok());
//! ```

mod playback_config;
mod simulation_config;

pub use playback_config::{PlaybackConfig, ALLOWED_SPEEDS};
pub use simulation_config::SimulationConfig;

use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Full engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GameConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

impl GameConfig {
    /// Baseline rule set.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Headless runs: top speed, no waiting at quarter breaks.
    pub fn fast_forward() -> Self {
        let mut cfg = Self::default();
        cfg.playback.speed = 4;
        cfg.playback.auto_continue_quarters = true;
        cfg.playback.max_ticks_per_frame = u32::MAX;
        cfg
    }

    /// Quicker possessions and a wider scoring window.
    pub fn high_scoring() -> Self {
        let mut cfg = Self::default();
        cfg.simulation.possession_interval_secs = 8;
        cfg.simulation.success_rate_max = 0.9;
        cfg.simulation.missed_shot_threshold = 0.5;
        cfg
    }

    pub fn validate(&self) -> Result<(), GameError> {
        self.simulation.validate().map_err(GameError::InvalidConfig)?;
        self.playback.validate().map_err(GameError::InvalidConfig)?;
        Ok(())
    }

    pub fn from_json(content: &str) -> Result<Self, GameError> {
        let cfg: GameConfig = serde_json::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml(content: &str) -> Result<Self, GameError> {
        let cfg: GameConfig = serde_yaml::from_str(content)
            .map_err(|e| GameError::InvalidConfig(format!("YAML parse error: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GameError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let cfg = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content)?,
            _ => Self::from_json(&content)?,
        };
        tracing::info!(path = %path.display(), "loaded game config");
        Ok(cfg)
    }
}

// ========== Tests ==========
