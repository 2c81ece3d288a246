//! RAII guard for document locks

use super::LockMode;
use fs2::FileExt;
use std::fs::File;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A held advisory lock together with the file it was taken on.
///
/// Dropping the guard unlocks and closes the file, so the lock is released
/// on every exit path including early returns and panics.
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
    mode: LockMode,
}

impl FileLock {
    pub(crate) fn new(file: File, path: PathBuf, mode: LockMode) -> Self {
        Self { file, path, mode }
    }

    /// The locked file. `&File` implements `Read`, `Write` and `Seek`.
    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> LockMode {
        self.mode
    }
}

impl Deref for FileLock {
    type Target = File;

    fn deref(&self) -> &File {
        &self.file
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Closing the descriptor releases the lock as well; unlocking first
        // just makes the release independent of other open handles.
        if let Err(e) = FileExt::unlock(&self.file) {
            debug!(path = %self.path.display(), error = %e, "explicit unlock failed");
        }
    }
}
