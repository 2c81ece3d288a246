//! Conversion between in-memory values and document bytes
//!
//! The store only moves bytes in and out of files safely; what those bytes
//! mean is decided by a [`Codec`]. [`JsonCodec`] is the production codec.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use thiserror::Error;

mod json;

pub use json::{CodecConfig, JsonCodec};

/// Encodes values into document bytes and decodes them back.
pub trait Codec: Send + Sync {
    fn encode<T>(&self, value: &T, out: &mut dyn Write) -> Result<(), CodecError>
    where
        T: Serialize + ?Sized;

    /// Decodes a whole document.
    ///
    /// `Ok(None)` means the document holds no value (empty content or an
    /// explicit null), which readers treat differently from malformed bytes.
    fn decode<T>(&self, bytes: &[u8]) -> Result<Option<T>, CodecError>
    where
        T: DeserializeOwned;
}

#[derive(Debug, Error)]
pub enum CodecError {
    /// Malformed or mistyped content, including bad numbers and truncation
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
