//! `httpino read` - print a stored document

use crate::output::print_document;
use anyhow::{Context, Result};
use httpino_core::Store;
use serde_json::Value;
use std::path::Path;

pub fn run(store: &Store, path: &Path, pretty: bool) -> Result<()> {
    let document: Option<Value> = store
        .read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    print_document(&document.unwrap_or(Value::Null), pretty)?;
    Ok(())
}
