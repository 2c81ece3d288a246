//! Constants that are part of the store's observable behaviour

use std::time::Duration;

/// Retries a read performs after its first attempt before giving up
pub const MAX_READ_ATTEMPTS: u32 = 5;

/// Pause after the first contended lock attempt
pub const LOCK_BACKOFF: Duration = Duration::from_millis(1);

/// Ceiling for the doubling lock backoff
pub const MAX_LOCK_BACKOFF: Duration = Duration::from_millis(50);

/// How long lock acquisition waits before failing
pub const LOCK_TIMEOUT: Duration = Duration::from_secs(30);

/// A lock wait longer than this is logged once
pub const SLOW_LOCK_WARNING: Duration = Duration::from_secs(2);

/// Prefix of staging files created next to documents
pub const STAGING_PREFIX: &str = ".httpino-";

/// Suffix of staging files created next to documents
pub const STAGING_SUFFIX: &str = ".tmp";
