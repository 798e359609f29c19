//! Time sources for the notification scheduler
//!
//! The scheduler never reads the wall clock directly. It asks a [`Clock`] for
//! the time elapsed since the clock's origin, which lets tests drive timers
//! by hand and lets the runtime use tokio's (pausable) monotonic time.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

/// Monotonic time source
pub trait Clock: Send + Sync {
    /// Time elapsed since this clock's origin
    fn now(&self) -> Duration;
}

/// Logical clock advanced explicitly
///
/// Clones share the same time, so a test can keep a handle while the
/// scheduler owns another.
///
/// # Example
///
/// ```
/// use sentinelx_core::clock::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// clock.advance(Duration::from_millis(250));
/// assert_eq!(clock.now(), Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    elapsed: Arc<Mutex<Duration>>,
}

impl ManualClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        *self.elapsed.lock() += by;
    }

    /// Jump to an absolute time. Moving backwards is ignored.
    pub fn set(&self, to: Duration) {
        let mut elapsed = self.elapsed.lock();
        if to > *elapsed {
            *elapsed = to;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.elapsed.lock()
    }
}

/// Clock backed by `tokio::time::Instant`
///
/// Follows tokio's paused time in tests (`#[tokio::test(start_paused = true)]`).
#[derive(Debug, Clone)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}
