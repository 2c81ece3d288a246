//! Error types for file locking

use super::LockMode;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Error type for lock operations
#[derive(Debug, Error)]
pub enum LockError {
    /// The file stayed locked by someone else for the whole timeout
    #[error("Timeout after {waited:?} waiting for {mode} lock on {}", .path.display())]
    Timeout {
        path: PathBuf,
        mode: LockMode,
        waited: Duration,
    },

    /// The OS rejected the lock request for a reason other than contention
    #[error("I/O error acquiring {mode} lock on {}: {source}", .path.display())]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
        mode: LockMode,
    },
}
