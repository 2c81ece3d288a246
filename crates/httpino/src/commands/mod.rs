//! CLI command implementations

pub mod hammer;
pub mod read;
pub mod write;

use anyhow::{Context, Result};
use httpino_core::{Store, StoreConfig};
use std::path::Path;

/// Builds the store from `--config`, or from defaults
pub fn load_store(config: Option<&Path>) -> Result<Store> {
    let config = match config {
        Some(path) => StoreConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => StoreConfig::default(),
    };
    tracing::debug!(?config, "store configured");
    Ok(Store::new(config))
}
