use std::time::{Duration, Instant};

use tracing::trace;

/// Rate limiter for host window-resize events.
///
/// The first event after a quiet period fires immediately. Events arriving
/// within `interval` of the last firing collapse into a single trailing
/// firing, delivered by `poll` once the interval has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeThrottle {
    interval: Duration,
    last_fired: Option<Instant>,
    pending: bool,
}

impl ResizeThrottle {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
            pending: false,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Records an event; returns `true` when the resize should run now.
    pub fn on_event(&mut self, now: Instant) -> bool {
        if self.is_ready(now) {
            self.fire(now);
            return true;
        }
        trace!("resize event throttled");
        self.pending = true;
        false
    }

    /// Returns `true` when a deferred resize is due.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.pending && self.is_ready(now) {
            self.fire(now);
            return true;
        }
        false
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }

    fn is_ready(&self, now: Instant) -> bool {
        self.last_fired
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval)
    }

    fn fire(&mut self, now: Instant) {
        self.last_fired = Some(now);
        self.pending = false;
    }
}
