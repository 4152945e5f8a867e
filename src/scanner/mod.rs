//! Corpus file discovery.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively collect every file under `root` with the given extension
/// (case-insensitive), as absolute paths.
///
/// Traversal order is unspecified and callers must not rely on it. A missing
/// or empty root yields an empty list, not an error — an empty corpus is a
/// valid (if pointless) input.
pub fn find_files(root: &Path, extension: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_extension(e.path(), extension))
        .map(|e| {
            std::fs::canonicalize(e.path()).unwrap_or_else(|_| e.path().to_path_buf())
        })
        .collect()
}

/// Collect the `.json` files of a corpus root.
pub fn find_json_files(root: &Path) -> Vec<PathBuf> {
    find_files(root, "json")
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
