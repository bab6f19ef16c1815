//! Fetch cache configuration

use std::time::Duration;

/// Default deduplication window
pub const DEFAULT_DEDUPE_INTERVAL: Duration = Duration::from_millis(60_000);

/// Default pause between failed attempts
pub const DEFAULT_ERROR_RETRY_INTERVAL: Duration = Duration::from_millis(5_000);

/// Default number of retries after the first failure
pub const DEFAULT_ERROR_RETRY_COUNT: u32 = 2;

/// Options shared by every section reading through the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchConfig {
    /// Reads of the same key within this window reuse the resolved value
    pub dedupe_interval: Duration,
    /// Refetch known keys when the window regains focus
    pub revalidate_on_focus: bool,
    /// Refetch known keys when connectivity returns
    pub revalidate_on_reconnect: bool,
    /// Keep serving the last good value while a refetch is in flight
    pub keep_previous_data: bool,
    /// Retries after the first failed attempt
    pub error_retry_count: u32,
    /// Pause between attempts
    pub error_retry_interval: Duration,
    /// Upper bound on cached keys
    pub max_capacity: u64,
}

impl FetchConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With deduplication window
    #[inline]
    #[must_use]
    pub fn with_dedupe_interval(mut self, interval: Duration) -> Self {
        self.dedupe_interval = interval;
        self
    }

    /// With retry policy
    #[inline]
    #[must_use]
    pub fn with_retry(mut self, count: u32, interval: Duration) -> Self {
        self.error_retry_count = count;
        self.error_retry_interval = interval;
        self
    }

    /// With focus/reconnect revalidation
    #[inline]
    #[must_use]
    pub fn with_revalidation(mut self, on_focus: bool, on_reconnect: bool) -> Self {
        self.revalidate_on_focus = on_focus;
        self.revalidate_on_reconnect = on_reconnect;
        self
    }

    /// With capacity bound, applied to fresh and previous values alike
    #[inline]
    #[must_use]
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }

    /// With keep-previous-data
    #[inline]
    #[must_use]
    pub fn with_keep_previous_data(mut self, keep: bool) -> Self {
        self.keep_previous_data = keep;
        self
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            dedupe_interval: DEFAULT_DEDUPE_INTERVAL,
            revalidate_on_focus: false,
            revalidate_on_reconnect: false,
            keep_previous_data: true,
            error_retry_count: DEFAULT_ERROR_RETRY_COUNT,
            error_retry_interval: DEFAULT_ERROR_RETRY_INTERVAL,
            max_capacity: 1_000,
        }
    }
}
