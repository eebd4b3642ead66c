//! Playback Controller
//!
//! Fixed-step, variable-speed loop over a [`GameSession`]. Each host frame
//! adds `elapsed × speed` wall milliseconds to an accumulator and runs one
//! session tick per `step_duration_ms` drained from it, so the number of
//! simulated seconds depends only on total wall time and speed, never on how
//! often the host delivers frames.
//!
//! The controller owns the session for its whole lifetime and is the only
//! mutator. Cancellation is cooperative: the token is checked at the top of
//! every frame and before every tick, and a pending frame request is always
//! withdrawn from the scheduler on shutdown.

use super::config::{PlaybackConfig, ALLOWED_SPEEDS};
use super::finalize::{PostGameCheck, SeasonStatsStore};
use super::scheduler::{CancellationToken, FrameHandle, FrameScheduler, QueuedScheduler, WallClock};
use super::session::{GameSession, GameStatus, StepResult};
use crate::error::GameError;
use crate::models::{BoxScore, Side};
use crate::tactics::Tactic;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// What one frame callback did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Session ticks run during this frame.
    pub ticks: u32,
    /// Events appended during this frame.
    pub new_events: usize,
    pub status: GameStatus,
    /// The handle did not match the pending request and was ignored.
    pub stale: bool,
}

pub struct PlaybackController<R: Rng = ChaCha8Rng, S: FrameScheduler = QueuedScheduler> {
    session: GameSession<R>,
    scheduler: S,
    config: PlaybackConfig,
    speed: u8,
    accumulator_ms: f64,
    last_wall_ms: Option<f64>,
    pending: Option<FrameHandle>,
    token: CancellationToken,
    closed: bool,
}

impl<R: Rng, S: FrameScheduler> PlaybackController<R, S> {
    pub fn new(session: GameSession<R>, scheduler: S, config: PlaybackConfig) -> Result<Self, GameError> {
        config.validate().map_err(GameError::InvalidConfig)?;
        let speed = config.speed;
        Ok(Self {
            session,
            scheduler,
            config,
            speed,
            accumulator_ms: 0.0,
            last_wall_ms: None,
            pending: None,
            token: CancellationToken::new(),
            closed: false,
        })
    }

    /// Tip off (if not yet started) and request the first frame.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.closed || self.token.is_cancelled() || self.session.is_finished() {
            return false;
        }
        if self.session.status() == GameStatus::Ready {
            self.session.start();
        }
        self.last_wall_ms = Some(now_ms);
        self.accumulator_ms = 0.0;
        self.schedule();
        tracing::debug!(session = %self.session.id(), speed = self.speed, "playback started");
        true
    }

    fn schedule(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(self.scheduler.request_frame());
        }
    }

    fn report(&self, ticks: u32, cursor: usize, stale: bool) -> FrameReport {
        FrameReport {
            ticks,
            new_events: self.session.events().len().saturating_sub(cursor),
            status: self.session.status(),
            stale,
        }
    }

    /// Host frame callback.
    pub fn on_frame(&mut self, handle: FrameHandle, now_ms: f64) -> FrameReport {
        let cursor = self.session.events().len();
        if self.pending != Some(handle) {
            return self.report(0, cursor, true);
        }
        self.pending = None;

        if self.token.is_cancelled() {
            self.close();
            return self.report(0, cursor, false);
        }
        if self.closed {
            return self.report(0, cursor, false);
        }

        let elapsed = self.last_wall_ms.map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last_wall_ms = Some(now_ms);

        match self.session.status() {
            GameStatus::Playing => self.accumulator_ms += elapsed * f64::from(self.speed),
            GameStatus::QuarterBreak if self.config.auto_continue_quarters => {
                if self.session.begin_next_quarter() {
                    self.accumulator_ms += elapsed * f64::from(self.speed);
                }
            }
            _ => {}
        }

        let step = self.config.step_duration_ms;
        let mut ticks = 0;
        while self.accumulator_ms >= step && ticks < self.config.max_ticks_per_frame {
            if self.token.is_cancelled() {
                self.close();
                return self.report(ticks, cursor, false);
            }
            match self.session.tick() {
                StepResult::Tick(_) => {}
                StepResult::QuarterEnd { .. } => {
                    if self.config.auto_continue_quarters {
                        self.session.begin_next_quarter();
                    }
                }
                StepResult::FullTime { .. } => {
                    self.accumulator_ms = 0.0;
                    ticks += 1;
                    break;
                }
                StepResult::Inert(_) => {
                    self.accumulator_ms = 0.0;
                    break;
                }
            }
            self.accumulator_ms -= step;
            ticks += 1;
        }

        if self.session.is_finished() {
            tracing::info!(session = %self.session.id(), "playback finished");
        } else {
            self.schedule();
        }
        self.report(ticks, cursor, false)
    }

    /// Stop accumulating wall time. Idempotent.
    pub fn pause(&mut self) -> bool {
        self.session.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.session.resume()
    }

    pub fn set_speed(&mut self, speed: u8) -> Result<(), GameError> {
        if !ALLOWED_SPEEDS.contains(&speed) {
            return Err(GameError::InvalidSpeed(speed));
        }
        self.speed = speed;
        Ok(())
    }

    /// Tear down: cancel an unfinished session and withdraw the pending frame.
    /// Safe to call repeatedly.
    pub fn close(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        if self.closed {
            return;
        }
        self.closed = true;
        self.token.cancel();
        if !self.session.is_finished() {
            self.session.cancel();
        }
        tracing::debug!(session = %self.session.id(), "playback closed");
    }

    pub fn begin_next_quarter(&mut self) -> bool {
        self.session.begin_next_quarter()
    }

    pub fn set_tactic(&mut self, side: Side, tactic: Tactic) -> bool {
        self.session.set_tactic(side, tactic)
    }

    pub fn call_timeout(&mut self, side: Side) -> bool {
        self.session.call_timeout(side)
    }

    pub fn finalize<St, C>(&mut self, store: &mut St, checks: &mut C) -> Result<BoxScore, GameError>
    where
        St: SeasonStatsStore + ?Sized,
        C: PostGameCheck + ?Sized,
    {
        self.session.finalize(store, checks)
    }

    /// Handle the host shares to cancel from outside the frame callback.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn session(&self) -> &GameSession<R> {
        &self.session
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Give the session back (for finalize or inspection), withdrawing any
    /// pending frame first.
    pub fn into_session(mut self) -> GameSession<R> {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.session
    }
}

/// Headless driver: play to the final buzzer as fast as possible, skipping
/// quarter breaks. Stops early if the session is paused or cancelled.
/// Returns the number of ticks run.
pub fn run_fast_forward<R: Rng>(session: &mut GameSession<R>) -> u32 {
    if session.status() == GameStatus::Ready {
        session.start();
    }
    let mut ticks = 0;
    loop {
        match session.tick() {
            StepResult::Tick(_) => ticks += 1,
            StepResult::QuarterEnd { .. } => {
                ticks += 1;
                session.begin_next_quarter();
            }
            StepResult::FullTime { .. } => {
                ticks += 1;
                break;
            }
            StepResult::Inert(GameStatus::QuarterBreak) => {
                session.begin_next_quarter();
            }
            StepResult::Inert(_) => break,
        }
    }
    ticks
}

/// Real-time driver over a [`QueuedScheduler`]: waits `frame_interval` via
/// `sleep`, delivers the pending frame with the clock's time, and hands each
/// report to `observe`. Returns once no frame is pending.
pub fn run_realtime<R, C, Sl, O>(
    controller: &mut PlaybackController<R, QueuedScheduler>,
    clock: &C,
    frame_interval: Duration,
    mut sleep: Sl,
    mut observe: O,
) -> GameStatus
where
    R: Rng,
    C: WallClock + ?Sized,
    Sl: FnMut(Duration),
    O: FnMut(&FrameReport, &GameSession<R>),
{
    if controller.pending_frame().is_none() && !controller.start(clock.now_ms()) {
        return controller.session().status();
    }
    while let Some(handle) = controller.scheduler_mut().next_frame() {
        sleep(frame_interval);
        let report = controller.on_frame(handle, clock.now_ms());
        observe(&report, controller.session());
    }
    controller.session().status()
}
