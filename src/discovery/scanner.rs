//! Directory scanner for stylesheets.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Whether a path names a stylesheet (`.css`, any case).
pub fn is_stylesheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("css"))
}

/// Recursively collect stylesheets below `root`, sorted by path.
pub fn scan_directory(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }

    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file() && is_stylesheet(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}
