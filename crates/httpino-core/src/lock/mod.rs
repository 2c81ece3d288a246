//! Advisory file locking for whole-document reads and writes
//!
//! Locks are taken on the document file itself, covering its entire length,
//! using the fs2 crate. Readers take shared locks, writers take exclusive
//! locks. Contention is absorbed by polling with jittered exponential backoff
//! until the policy's timeout elapses.

use std::fmt;
use std::fs::File;
use std::path::Path;

mod acquire;
mod error;
mod guard;
mod policy;

pub use error::LockError;
pub use guard::FileLock;
pub use policy::LockPolicy;


/// Kind of advisory lock held on a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockMode {
    /// Any number of holders; excludes `Exclusive`
    Shared,
    /// Single holder; excludes every other lock
    Exclusive,
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockMode::Shared => f.write_str("shared"),
            LockMode::Exclusive => f.write_str("exclusive"),
        }
    }
}

/// Locks an already opened file, waiting according to `policy`.
///
/// The returned guard owns `file`; dropping it releases the lock and closes
/// the descriptor. `path` is only used for diagnostics.
///
/// # Errors
///
/// Returns `LockError::Timeout` when the policy's timeout elapses while the
/// file is still locked by someone else, and `LockError::Io` for any other
/// failure reported by the OS.
///
/// # Examples
///
/// ```no_run
/// use httpino_core::lock::{acquire, LockMode, LockPolicy};
/// use std::fs::File;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let path = Path::new("/tmp/document.json");
/// let file = File::open(path)?;
/// let guard = acquire(file, path, LockMode::Shared, &LockPolicy::default())?;
/// // Read through `guard.file()` here
/// drop(guard);
/// # Ok(())
/// # }
/// ```
pub fn acquire(
    file: File,
    path: &Path,
    mode: LockMode,
    policy: &LockPolicy,
) -> Result<FileLock, LockError> {
    acquire::acquire_with_retry(file, path, mode, policy)
}

/// Shorthand for [`acquire`] with [`LockMode::Shared`].
pub fn lock_shared(file: File, path: &Path, policy: &LockPolicy) -> Result<FileLock, LockError> {
    acquire(file, path, LockMode::Shared, policy)
}

/// Shorthand for [`acquire`] with [`LockMode::Exclusive`].
pub fn lock_exclusive(
    file: File,
    path: &Path,
    policy: &LockPolicy,
) -> Result<FileLock, LockError> {
    acquire(file, path, LockMode::Exclusive, policy)
}
