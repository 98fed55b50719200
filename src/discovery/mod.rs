//! Finding the stylesheets and options a build works on.

mod scanner;

use std::path::{Path, PathBuf};

use crate::config::{SpriteOptions, CONFIG_FILENAME};
use crate::error::{Result, SpriteError};

pub use scanner::{is_stylesheet, scan_directory};

/// A stylesheet found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path used below the output directory. Files found by walking a
    /// directory keep their path relative to it; explicit files keep only
    /// their file name.
    pub relative: PathBuf,
}

/// Expand files and directories into the stylesheets they name.
///
/// Explicit files are taken as-is whatever their extension. Directories
/// are walked for `.css` files.
pub fn discover(inputs: &[PathBuf]) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            for path in scan_directory(input) {
                let relative = path.strip_prefix(input).unwrap_or(&path).to_path_buf();
                files.push(SourceFile { path, relative });
            }
        } else if input.is_file() {
            let relative = input
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| input.clone());
            files.push(SourceFile {
                path: input.clone(),
                relative,
            });
        } else {
            return Err(SpriteError::Io {
                path: input.clone(),
                message: "No such file or directory".to_string(),
            });
        }
    }

    tracing::debug!(count = files.len(), "discovered stylesheets");
    Ok(files)
}

/// Load options from `explicit`, or from `csssprite.yaml` in `dir` when it
/// exists. Falls back to defaults.
pub fn load_options(explicit: Option<&Path>, dir: &Path) -> Result<SpriteOptions> {
    if let Some(path) = explicit {
        return SpriteOptions::load(path);
    }

    let candidate = dir.join(CONFIG_FILENAME);
    if candidate.is_file() {
        tracing::debug!(path = %candidate.display(), "using options file");
        SpriteOptions::load(&candidate)
    } else {
        Ok(SpriteOptions::default())
    }
}
