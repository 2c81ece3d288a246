//! Document and config fixtures

use std::path::{Path, PathBuf};

/// A document large enough that a stale tail would be obvious
pub fn large_array_json(entries: usize) -> String {
    let items: Vec<String> = (0..entries).map(|i| i.to_string()).collect();
    format!("[{}]", items.join(","))
}

/// Writes `content` to `dir/name` without any locking and returns the path
pub fn write_raw(dir: &Path, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write fixture");
    path
}

/// Writes a store config file into `dir` and returns its path
pub fn write_config(dir: &Path, toml: &str) -> PathBuf {
    write_raw(dir, "httpino.toml", toml)
}
