//! Exponential backoff for polling loops

use std::time::Duration;

/// Capped exponential backoff bounded by an overall timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub initial: Duration,
    pub max: Duration,
    pub timeout: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(5),
            max: Duration::from_secs(60),
            timeout: Duration::from_secs(1800),
        }
    }
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration, timeout: Duration) -> Self {
        Self {
            initial,
            max,
            timeout,
        }
    }

    /// Delay before poll number `attempt` (zero-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.min(31)).unwrap_or(u32::MAX);
        self.initial.saturating_mul(factor).min(self.max)
    }

    /// Next sleep given time already spent, or `None` once the timeout is reached
    pub fn next_sleep(&self, attempt: u32, elapsed: Duration) -> Option<Duration> {
        if elapsed >= self.timeout {
            return None;
        }
        Some(self.delay(attempt).min(self.timeout - elapsed))
    }
}
