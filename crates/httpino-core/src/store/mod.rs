//! Whole-document persistence under concurrent access
//!
//! A [`Store`] bundles the settings and codec that every read and write
//! shares. It holds no per-file state: each operation opens, locks, reads or
//! replaces, and releases the document before returning.

use crate::codec::{Codec, JsonCodec};
use crate::config::StoreConfig;
use crate::error::Result;
use crate::lock::LockPolicy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

mod read;
mod write;


/// Reads and writes JSON documents in shared files
#[derive(Debug, Clone)]
pub struct Store<C = JsonCodec> {
    config: StoreConfig,
    lock_policy: LockPolicy,
    codec: C,
}

impl Store<JsonCodec> {
    /// Creates a store using a JSON codec configured from `config.codec`
    pub fn new(config: StoreConfig) -> Self {
        let codec = JsonCodec::new(config.codec);
        Self::with_codec(config, codec)
    }
}

impl Default for Store<JsonCodec> {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl<C: Codec> Store<C> {
    pub fn with_codec(config: StoreConfig, codec: C) -> Self {
        let lock_policy = config.lock.policy();
        Self {
            config,
            lock_policy,
            codec,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn lock_policy(&self) -> &LockPolicy {
        &self.lock_policy
    }

    /// Replaces the document at `path` with the encoding of `value`.
    ///
    /// The value is staged in a private temporary file first, then copied
    /// into the destination under an exclusive lock and the destination is
    /// cut to exactly the new length. Concurrent lock-respecting readers see
    /// either the previous or the new document in full.
    ///
    /// The destination is created if missing; its parent directory must
    /// exist. Failures are returned immediately and never retried.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use httpino_core::Store;
    /// use std::collections::BTreeMap;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let store = Store::default();
    /// let mut doc = BTreeMap::new();
    /// doc.insert("user", "alice");
    /// store.write("/tmp/session.json", &doc)?;
    ///
    /// let back: Option<BTreeMap<String, String>> = store.read("/tmp/session.json")?;
    /// assert_eq!(back.unwrap()["user"], "alice");
    /// # Ok(())
    /// # }
    /// ```
    pub fn write<T>(&self, path: impl AsRef<Path>, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        write::write_document(self, path.as_ref(), value)
    }

    /// Reads and decodes the document at `path`.
    ///
    /// A read that hits malformed content or an empty document is retried
    /// from scratch up to `max_read_attempts` more times. When retries run
    /// out, malformed content is reported as [`StoreError::Decode`] while an
    /// empty document yields `Ok(None)`.
    ///
    /// Failing to open the file or to lock it is not retried.
    ///
    /// [`StoreError::Decode`]: crate::StoreError::Decode
    pub fn read<T>(&self, path: impl AsRef<Path>) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        read::read_document(self, path.as_ref(), 0)
    }

    /// Like [`Store::read`], but counting attempts from `attempt` instead of 0.
    ///
    /// An `attempt` at or beyond `max_read_attempts` allows exactly one try.
    pub fn read_from_attempt<T>(&self, path: impl AsRef<Path>, attempt: u32) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        read::read_document(self, path.as_ref(), attempt)
    }

    /// [`Store::read`], with an empty document mapped to `T::default()`
    pub fn read_or_default<T>(&self, path: impl AsRef<Path>) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        Ok(self.read(path)?.unwrap_or_default())
    }
}
