//! Randomized courtesy delay between consecutive fetches.

use std::time::Duration;

use dirscout_core::DelayRange;
use rand::Rng;
use tokio_util::sync::CancellationToken;

/// Sleeps for a random duration drawn from a [`DelayRange`].
///
/// A disabled throttle never sleeps, which keeps tests and batch runs
/// deterministic.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    range: DelayRange,
}

impl Throttle {
    #[must_use]
    pub fn new(range: DelayRange) -> Self {
        Self { range }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self::new(DelayRange::NONE)
    }

    #[must_use]
    pub fn range(&self) -> DelayRange {
        self.range
    }

    /// Draws the next delay. Always within `[min, max]`.
    #[must_use]
    pub fn next_delay(&self) -> Duration {
        if self.range.is_disabled() {
            return Duration::ZERO;
        }
        let ms = rand::rng().random_range(self.range.min_ms()..=self.range.max_ms());
        Duration::from_millis(ms)
    }

    /// Waits out one delay. Returns `false` if `cancel` fired first.
    pub async fn pause(&self, cancel: &CancellationToken) -> bool {
        let delay = self.next_delay();
        if delay.is_zero() {
            return !cancel.is_cancelled();
        }
        tokio::select! {
            () = cancel.cancelled() => false,
            () = tokio::time::sleep(delay) => true,
        }
    }
}
