//! Lock acquisition logic with backoff and timeout

use super::{FileLock, LockError, LockMode, LockPolicy};
use crate::config::consts::SLOW_LOCK_WARNING;
use fs2::FileExt;
use rand::Rng;
use std::fs::File;
use std::io;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use tracing::warn;

/// Polls for the lock until it is granted or the policy gives up
pub(crate) fn acquire_with_retry(
    file: File,
    path: &Path,
    mode: LockMode,
    policy: &LockPolicy,
) -> Result<FileLock, LockError> {
    let start = Instant::now();
    let mut delay = policy.initial_delay;
    let mut warned = false;

    loop {
        match try_lock(&file, mode) {
            Ok(()) => return Ok(FileLock::new(file, path.to_path_buf(), mode)),
            Err(e) if is_contended(&e) => {
                let elapsed = start.elapsed();

                let mut pause = with_jitter(delay);
                if let Some(timeout) = policy.timeout {
                    if elapsed >= timeout {
                        return Err(LockError::Timeout {
                            path: path.to_path_buf(),
                            mode,
                            waited: elapsed,
                        });
                    }
                    // Never sleep past the deadline
                    pause = pause.min(timeout - elapsed);
                }

                if !warned && elapsed >= SLOW_LOCK_WARNING {
                    warn!(
                        path = %path.display(),
                        %mode,
                        waited_ms = elapsed.as_millis() as u64,
                        "still waiting for file lock"
                    );
                    warned = true;
                }

                thread::sleep(pause);
                delay = (delay * 2).min(policy.max_delay);
            }
            Err(e) => {
                return Err(LockError::Io {
                    source: e,
                    path: path.to_path_buf(),
                    mode,
                });
            }
        }
    }
}

// Fully qualified: newer std has inherent File::try_lock* with other signatures
fn try_lock(file: &File, mode: LockMode) -> io::Result<()> {
    match mode {
        LockMode::Shared => FileExt::try_lock_shared(file),
        LockMode::Exclusive => FileExt::try_lock_exclusive(file),
    }
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || (err.raw_os_error().is_some()
            && err.raw_os_error() == fs2::lock_contended_error().raw_os_error())
}

/// Adds up to half of `delay` again so contending callers spread out
pub(crate) fn with_jitter(delay: Duration) -> Duration {
    let half = (delay.as_micros() / 2) as u64;
    if half == 0 {
        return delay;
    }
    delay + Duration::from_micros(rand::thread_rng().gen_range(0..=half))
}
