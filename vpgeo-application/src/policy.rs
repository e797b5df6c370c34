use std::time::Duration;

const DEFAULT_THROTTLE_BACKOFF: Duration = Duration::from_secs(5);
const DEFAULT_MAX_THROTTLED_RETRIES: u32 = 3;
const DEFAULT_MAX_FAILED_RETRIES: u32 = 2;

/// How the queue deals with failed lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuePolicy {
    /// Pause of the queue after a lookup has been throttled.
    pub throttle_backoff: Duration,
    /// Requeues of a lookup that keeps being throttled.
    pub max_throttled_retries: u32,
    /// Requeues after timeouts, connection errors and server errors.
    pub max_failed_retries: u32,
}

impl Default for QueuePolicy {
    fn default() -> Self {
        Self {
            throttle_backoff: DEFAULT_THROTTLE_BACKOFF,
            max_throttled_retries: DEFAULT_MAX_THROTTLED_RETRIES,
            max_failed_retries: DEFAULT_MAX_FAILED_RETRIES,
        }
    }
}
