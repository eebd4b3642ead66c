pub mod config;
pub mod event_log;
pub mod finalize; // Season fold after the final buzzer
pub mod playback;
pub mod possession;
pub mod scheduler; // Tick sources and cancellation
pub mod session;
pub mod stats;

#[cfg(test)]
mod properties;

pub use config::{GameConfig, PlaybackConfig, SimulationConfig};
pub use event_log::EventLog;
pub use finalize::{
    InMemorySeasonStore, NoPostGameCheck, PlayerDelta, PostGameCheck, SeasonDelta, SeasonStatsStore,
    SeasonTotals,
};
pub use playback::{run_fast_forward, run_realtime, FrameReport, PlaybackController};
pub use possession::{
    apply_outcome, resolve_possession, EmptyTrip, FreeThrowTrip, PossessionContext, PossessionOutcome,
    Rebound,
};
pub use scheduler::{
    CancellationToken, FrameHandle, FrameScheduler, ManualWallClock, QueuedScheduler, SystemWallClock,
    WallClock,
};
pub use session::{
    GameSession, GameSetup, GameStatus, SessionSnapshot, StepResult, TeamSetup, TickData, QUARTERS,
    QUARTER_SECS,
};
pub use stats::StatAccumulator;
