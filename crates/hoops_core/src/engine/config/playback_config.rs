//! Playback Loop Configuration

use serde::{Deserialize, Serialize};

/// Speeds the playback loop accepts.
pub const ALLOWED_SPEEDS: [u8; 3] = [1, 2, 4];

/// Fixed-step loop parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Wall-clock milliseconds per simulated second at speed 1 (default: 1000/60)
    pub step_duration_ms: f64,
    /// Initial speed multiplier (default: 1)
    pub speed: u8,
    /// Leave a quarter break on the next frame instead of waiting for the host (default: true)
    pub auto_continue_quarters: bool,
    /// Upper bound on ticks processed in a single frame, guards against a
    /// host that stalls for minutes (default: 600)
    pub max_ticks_per_frame: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            step_duration_ms: 1000.0 / 60.0,
            speed: 1,
            auto_continue_quarters: true,
            max_ticks_per_frame: 600,
        }
    }
}

impl PlaybackConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.step_duration_ms.is_finite() && self.step_duration_ms > 0.0) {
            return Err(format!("step_duration_ms must be positive, got {}", self.step_duration_ms));
        }
        if !ALLOWED_SPEEDS.contains(&self.speed) {
            return Err(format!("speed must be one of {:?}, got {}", ALLOWED_SPEEDS, self.speed));
        }
        if self.max_ticks_per_frame == 0 {
            return Err("max_ticks_per_frame must be positive".to_string());
        }
        Ok(())
    }
}
