//! Tick sources for the playback controller.
//!
//! The controller never owns a timer. It asks a [`FrameScheduler`] for the
//! next frame callback and must cancel the pending handle itself on close;
//! a scheduled callback is never assumed to disappear on its own.

use std::cell::Cell;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Cooperative stop flag shared between the host and the controller.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Identifies one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Host-side frame delivery (a UI animation-frame loop, a timer, a test harness).
pub trait FrameScheduler {
    /// Ask for one callback; the host later calls `on_frame` with the handle.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a pending callback.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Scheduler pumped explicitly by the caller. Used by the CLI driver and tests.
#[derive(Debug, Default)]
pub struct QueuedScheduler {
    next_id: u64,
    queue: VecDeque<FrameHandle>,
}

impl QueuedScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the oldest requested frame.
    pub fn next_frame(&mut self) -> Option<FrameHandle> {
        self.queue.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl FrameScheduler for QueuedScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.queue.push_back(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.queue.retain(|h| *h != handle);
    }
}

/// Millisecond wall-clock source.
pub trait WallClock {
    fn now_ms(&self) -> f64;
}

/// Monotonic clock anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemWallClock {
    origin: Instant,
}

impl SystemWallClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemWallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock for SystemWallClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock advanced by hand, for deterministic playback tests.
#[derive(Debug, Default)]
pub struct ManualWallClock {
    now: Cell<f64>,
}

impl ManualWallClock {
    pub fn new(start_ms: f64) -> Self {
        Self { now: Cell::new(start_ms) }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl WallClock for ManualWallClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
