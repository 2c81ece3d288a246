//! Atomic whole-file replacement

use super::Store;
use crate::codec::Codec;
use crate::config::consts::{STAGING_PREFIX, STAGING_SUFFIX};
use crate::error::{Result, StoreError};
use crate::lock::{self, LockMode};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::trace;

pub(super) fn write_document<C, T>(store: &Store<C>, path: &Path, value: &T) -> Result<()>
where
    C: Codec,
    T: Serialize + ?Sized,
{
    let staging = stage(store, path, value)?;

    let len = staging
        .as_file()
        .metadata()
        .map_err(StoreError::io(staging.path(), "inspect staging file"))?
        .len();

    transfer(store, staging.as_file(), path, len)?;

    // Removing the staging file is part of a successful write. On error
    // paths above, dropping `staging` removes it instead.
    let staging_path = staging.path().to_path_buf();
    staging
        .close()
        .map_err(StoreError::io(staging_path, "remove staging file"))?;

    trace!(path = %path.display(), bytes = len, "document written");
    Ok(())
}

/// Encodes `value` into a fresh private temporary file
fn stage<C, T>(store: &Store<C>, path: &Path, value: &T) -> Result<NamedTempFile>
where
    C: Codec,
    T: Serialize + ?Sized,
{
    let dir = match &store.config().staging_dir {
        Some(dir) => dir.as_path(),
        None => match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        },
    };

    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(STAGING_SUFFIX)
        .tempfile_in(dir)
        .map_err(StoreError::io(dir, "create staging file in"))?;

    let mut writer = BufWriter::new(staging.as_file());
    store
        .codec()
        .encode(value, &mut writer)
        .map_err(|source| StoreError::Encode {
            source,
            path: path.to_path_buf(),
        })?;
    writer
        .flush()
        .map_err(StoreError::io(staging.path(), "write staging file"))?;
    drop(writer);

    Ok(staging)
}

/// Replaces the destination's content with the first `len` bytes of `staging`
fn transfer<C: Codec>(store: &Store<C>, staging: &File, path: &Path, len: u64) -> Result<()> {
    // Opening must not truncate: the content still belongs to whoever holds
    // the lock right now.
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(StoreError::io(path, "open destination"))?;

    let dest = lock::acquire(file, path, LockMode::Exclusive, store.lock_policy())?;

    dest.set_len(0)
        .map_err(StoreError::io(path, "truncate destination"))?;

    let mut source = staging;
    source
        .seek(SeekFrom::Start(0))
        .map_err(StoreError::io(path, "rewind staging file for"))?;

    // File-to-file copy; std uses copy_file_range/sendfile where available
    let mut out: &File = dest.file();
    let copied = io::copy(&mut Read::take(source, len), &mut out)
        .map_err(StoreError::io(path, "copy document into"))?;
    if copied != len {
        return Err(StoreError::Io {
            source: io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("staging file ended after {copied} of {len} bytes"),
            ),
            path: path.to_path_buf(),
            operation: "copy document into",
        });
    }

    dest.set_len(len)
        .map_err(StoreError::io(path, "resize destination"))?;

    if store.config().sync {
        dest.sync_all()
            .map_err(StoreError::io(path, "sync destination"))?;
    }

    Ok(())
}
