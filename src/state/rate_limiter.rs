//! Minimum-interval event gate.
//!
//! Remembers when it last let an event through and rejects anything arriving
//! sooner than `min_interval` afterwards. Rejected events do not move the window.

use std::time::{Duration, Instant};

/// Accepts at most one event per `min_interval`.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Duration,
    last_accepted: Option<Instant>,
}

impl RateLimiter {
    /// Limiter that accepts its first event.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_accepted: None,
        }
    }

    /// Minimum spacing between accepted events.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// When the last event was accepted.
    pub fn last_accepted(&self) -> Option<Instant> {
        self.last_accepted
    }

    /// Accept the event at `now` if the window has elapsed.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        let open = match self.last_accepted {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.min_interval,
        };
        if open {
            self.last_accepted = Some(now);
        }
        open
    }

    /// Forget the last accepted event.
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}
