//! Reads with bounded retry of transient failures

use super::Store;
use crate::codec::{Codec, CodecError};
use crate::error::{Result, StoreError};
use crate::lock::{self, LockMode};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Outcome of one locked read-and-decode pass
enum Attempt<T> {
    Decoded(T),
    Empty,
    Failed(CodecError),
}

pub(super) fn read_document<C, T>(
    store: &Store<C>,
    path: &Path,
    first_attempt: u32,
) -> Result<Option<T>>
where
    C: Codec,
    T: DeserializeOwned,
{
    let max_attempts = store.config().max_read_attempts;
    let mut attempt = first_attempt;

    loop {
        match read_once(store, path)? {
            Attempt::Decoded(value) => return Ok(Some(value)),
            Attempt::Empty => {
                if attempt >= max_attempts {
                    debug!(path = %path.display(), attempt, "document still empty, giving up");
                    return Ok(None);
                }
                debug!(path = %path.display(), attempt, "empty document, retrying");
            }
            Attempt::Failed(source) => {
                if attempt >= max_attempts {
                    return Err(StoreError::Decode {
                        source,
                        path: path.to_path_buf(),
                        attempts: attempt - first_attempt + 1,
                    });
                }
                debug!(
                    path = %path.display(),
                    attempt,
                    error = %source,
                    "unreadable document, retrying"
                );
            }
        }
        attempt += 1;
    }
}

/// Opens, share-locks, reads and decodes once. The lock is released on return.
fn read_once<C, T>(store: &Store<C>, path: &Path) -> Result<Attempt<T>>
where
    C: Codec,
    T: DeserializeOwned,
{
    let file = File::open(path).map_err(StoreError::io(path, "open document"))?;
    let source = lock::acquire(file, path, LockMode::Shared, store.lock_policy())?;

    let mut bytes = Vec::new();
    let mut reader: &File = source.file();
    if let Err(e) = reader.read_to_end(&mut bytes) {
        return Ok(Attempt::Failed(CodecError::Io(e)));
    }

    Ok(match store.codec().decode(&bytes) {
        Ok(Some(value)) => Attempt::Decoded(value),
        Ok(None) => Attempt::Empty,
        Err(e) => Attempt::Failed(e),
    })
}
