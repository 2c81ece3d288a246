//! How long and how often lock acquisition retries

use crate::config::consts::{LOCK_BACKOFF, LOCK_TIMEOUT, MAX_LOCK_BACKOFF};
use std::time::Duration;

/// Retry schedule for lock acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockPolicy {
    /// Pause after the first failed attempt
    pub initial_delay: Duration,
    /// Upper bound for the doubling pause
    pub max_delay: Duration,
    /// `None` waits until the lock is granted, however long that takes
    pub timeout: Option<Duration>,
}

impl LockPolicy {
    /// A policy that never gives up, polling at a fixed `interval`.
    pub fn unbounded(interval: Duration) -> Self {
        Self {
            initial_delay: interval,
            max_delay: interval,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self {
            initial_delay: LOCK_BACKOFF,
            max_delay: MAX_LOCK_BACKOFF,
            timeout: Some(LOCK_TIMEOUT),
        }
    }
}
