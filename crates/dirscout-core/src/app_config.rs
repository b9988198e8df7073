use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Inclusive millisecond interval a randomized courtesy delay is drawn from.
///
/// Only constructible through [`DelayRange::new`] or parsing, so
/// `min_ms <= max_ms` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    min_ms: u64,
    max_ms: u64,
}

impl DelayRange {
    /// A range that never sleeps.
    pub const NONE: Self = Self {
        min_ms: 0,
        max_ms: 0,
    };

    /// # Errors
    ///
    /// Returns a description of the problem when `min_ms > max_ms`.
    pub fn new(min_ms: u64, max_ms: u64) -> Result<Self, String> {
        if min_ms > max_ms {
            return Err(format!("lower bound {min_ms} exceeds upper bound {max_ms}"));
        }
        Ok(Self { min_ms, max_ms })
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.max_ms == 0
    }

    #[must_use]
    pub fn min_ms(&self) -> u64 {
        self.min_ms
    }

    #[must_use]
    pub fn max_ms(&self) -> u64 {
        self.max_ms
    }

    #[must_use]
    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    #[must_use]
    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }
}

impl FromStr for DelayRange {
    type Err = String;

    /// Accepts `"min-max"` or a single value meaning a fixed delay.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (lo, hi) = match s.split_once('-') {
            Some((lo, hi)) => (lo.trim(), hi.trim()),
            None => (s, s),
        };
        let min_ms = lo
            .parse::<u64>()
            .map_err(|e| format!("\"{lo}\" is not a millisecond value: {e}"))?;
        let max_ms = hi
            .parse::<u64>()
            .map_err(|e| format!("\"{hi}\" is not a millisecond value: {e}"))?;
        Self::new(min_ms, max_ms)
    }
}

impl std::fmt::Display for DelayRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min_ms, self.max_ms)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub profile_path: Option<PathBuf>,
    pub output_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_fetches: usize,
    pub listing_delay: DelayRange,
    pub detail_delay: DelayRange,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}
