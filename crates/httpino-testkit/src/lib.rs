//! Test utilities for httpino
//!
//! This crate provides shared testing utilities used across the httpino workspace.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub mod fixtures;

/// Creates a temporary directory within `.tmp/` at the current directory
///
/// Concurrency tests create many files; keeping them under one gitignored
/// directory makes leftovers easy to find when a test aborts.
///
/// # Returns
///
/// A `TempDir` instance that automatically cleans up on drop.
///
/// # Panics
///
/// Panics if:
/// - Unable to determine current directory
/// - Unable to create `.tmp/` directory
/// - Unable to create temporary subdirectory
///
/// # Examples
///
/// ```rust
/// use httpino_testkit::temp_dir_in_workspace;
///
/// let temp = temp_dir_in_workspace();
/// let file_path = temp.path().join("doc.json");
/// std::fs::write(&file_path, "{}").unwrap();
/// // Cleanup happens automatically when temp is dropped
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Alternative with Result for non-test code
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let tmp_base = std::env::current_dir()?.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}

/// Path of a compiled example binary of the crate under test
///
/// Integration test binaries live in `target/<profile>/deps/`; cargo puts
/// example binaries in the sibling `target/<profile>/examples/`.
pub fn example_bin(name: &str) -> PathBuf {
    let mut path = std::env::current_exe().expect("Failed to get current executable path");

    path.pop(); // Remove test binary name
    path.pop(); // Remove "deps"
    path.push("examples");
    path.push(name);

    if cfg!(target_os = "windows") {
        path.set_extension("exe");
    }

    path
}

/// Lists file names in `dir`, sorted
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read directory")
        .map(|entry| {
            entry
                .expect("Failed to read directory entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}
