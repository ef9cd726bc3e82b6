//! Minimum-interval gate for forecast updates

use std::time::{Duration, Instant};

/// Default minimum time between two forecast fetches
pub const MIN_TIME_BETWEEN_UPDATES: Duration = Duration::from_secs(3 * 60);

/// Allows at most one call per interval
#[derive(Debug)]
pub struct Throttle {
    /// Minimum time between permitted calls
    interval: Duration,
    /// Time of the last permitted call
    last_call: Option<Instant>,
}

impl Throttle {
    /// Create a new throttle
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_call: None,
        }
    }

    /// Check if a call is allowed at `now` and record it
    pub fn allow_at(&mut self, now: Instant) -> bool {
        match self.last_call {
            Some(last) if now.saturating_duration_since(last) <= self.interval => false,
            _ => {
                self.last_call = Some(now);
                true
            }
        }
    }

    /// Record a call that bypassed the gate
    pub fn mark_at(&mut self, now: Instant) {
        self.last_call = Some(now);
    }

    /// Time left at `now` until the window closes; zero once it has
    pub fn time_until_next_call_at(&self, now: Instant) -> Duration {
        self.last_call.map_or(Duration::ZERO, |last| {
            self.interval
                .saturating_sub(now.saturating_duration_since(last))
        })
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(MIN_TIME_BETWEEN_UPDATES)
    }
}
