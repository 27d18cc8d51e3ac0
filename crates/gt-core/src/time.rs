//! Session time model.
//!
//! # Design
//!
//! Travel sessions measure elapsed time and insert settle delays through the
//! [`Clock`] trait instead of calling `Instant::now` / `thread::sleep`
//! directly.  Time is expressed as a monotonic `Duration` since the clock's
//! origin, so the same session code runs against:
//!
//! - [`SystemClock`]: real wall-clock time; `sleep` blocks the thread.
//! - [`ManualClock`]: virtual time; `sleep` advances the clock instantly.
//!   Tests use it to exercise timeouts without waiting.

use std::sync::Mutex;
use std::time::{Duration, Instant};

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Monotonic time source plus a blocking wait.
///
/// Implementations must be `Send + Sync` so one clock can be shared by every
/// agent controller in the process.
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;

    /// Block the caller for `duration`.
    fn sleep(&self, duration: Duration);

    /// Time elapsed since `earlier` (a value previously returned by `now`).
    /// Saturates to zero rather than panicking on a non-monotonic source.
    fn since(&self, earlier: Duration) -> Duration {
        self.now().saturating_sub(earlier)
    }
}

// ── SystemClock ───────────────────────────────────────────────────────────────

/// Real time, measured from the moment the clock was created.
#[derive(Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

// ── ManualClock ───────────────────────────────────────────────────────────────

/// Virtual time that only moves when told to.
///
/// `sleep(d)` advances the clock by `d` and returns immediately.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock at `start` instead of zero.
    pub fn starting_at(start: Duration) -> Self {
        Self { now: Mutex::new(start) }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}
