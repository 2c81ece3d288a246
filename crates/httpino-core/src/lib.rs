//! Concurrency-safe persistence of JSON documents in shared files.
//!
//! Writers stage the encoded document in a private temporary file and then
//! replace the destination's content under an exclusive advisory lock.
//! Readers decode under a shared lock and retry a bounded number of times
//! when they observe a transiently corrupt or empty document.

// Core modules
pub mod codec;
pub mod config;
pub mod error;
pub mod lock;
pub mod store;

// Re-export commonly used types
pub use codec::{Codec, CodecConfig, CodecError, JsonCodec};
pub use config::StoreConfig;
pub use error::{ConfigError, Result, StoreError};
pub use lock::{LockError, LockMode, LockPolicy};
pub use store::Store;
