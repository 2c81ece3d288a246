use crate::codec::CodecError;
use crate::lock::LockError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("LOCK_FAILED: {0}")]
    Lock(#[from] LockError),

    #[error("IO_ERROR: failed to {operation} {}: {source}", .path.display())]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
        operation: &'static str,
    },

    #[error("ENCODE_FAILED: could not encode document for {}: {source}", .path.display())]
    Encode {
        #[source]
        source: CodecError,
        path: PathBuf,
    },

    #[error("DECODE_FAILED: {} unreadable after {attempts} attempts: {source}", .path.display())]
    Decode {
        #[source]
        source: CodecError,
        path: PathBuf,
        attempts: u32,
    },
}

impl StoreError {
    pub(crate) fn io(
        path: impl Into<PathBuf>,
        operation: &'static str,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| StoreError::Io {
            source,
            path,
            operation,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("CONFIG_READ_ERROR: failed to read {}: {source}", .path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("CONFIG_PARSE_ERROR: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("CONFIG_SERIALIZE_ERROR: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
