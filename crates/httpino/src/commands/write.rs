//! `httpino write` - atomically replace a document

use anyhow::{Context, Result};
use httpino_core::Store;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

pub fn run(store: &Store, path: &Path, json: &str) -> Result<()> {
    let text = if json == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read document from stdin")?;
        buffer
    } else {
        json.to_string()
    };

    let document: Value = serde_json::from_str(&text).context("Document is not valid JSON")?;

    store
        .write(path, &document)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), "document written");
    Ok(())
}
