//! Composite emission.
//!
//! Composites are stored under a content-addressed file name, so identical
//! buffers map to the same file and changed buffers bust caches.

use std::path::PathBuf;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::config::SpriteOptions;
use crate::error::{Result, SpriteError};

/// Number of hex digits of the content hash kept in file names.
const HASH_LEN: usize = 7;

/// Persists composite buffers and names the URL they are reachable at.
///
/// The URL only depends on the buffer, so stylesheets can be rewritten
/// before anything is written.
#[async_trait]
pub trait Emitter: Send + Sync {
    /// URL the buffer is reachable at once written.
    fn reference(&self, buffer: &[u8]) -> String;

    async fn write(&self, buffer: &[u8]) -> Result<()>;

    async fn emit(&self, buffer: &[u8]) -> Result<String> {
        self.write(buffer).await?;
        Ok(self.reference(buffer))
    }
}

/// File name for a composite: `sprite.<hash>.png`.
pub fn sprite_file_name(buffer: &[u8]) -> String {
    let digest = hex::encode(Sha256::digest(buffer));
    format!("sprite.{}.png", &digest[..HASH_LEN])
}

/// Writes composites below a build output directory.
#[derive(Debug, Clone)]
pub struct FileEmitter {
    root: PathBuf,
    output_path: String,
    css_image_path: String,
}

impl FileEmitter {
    /// Emit into `root`, using the path prefixes from `options`.
    pub fn new(root: impl Into<PathBuf>, options: &SpriteOptions) -> Self {
        Self {
            root: root.into(),
            output_path: options.output_path.clone(),
            css_image_path: options.effective_css_image_path().to_string(),
        }
    }
}

#[async_trait]
impl Emitter for FileEmitter {
    fn reference(&self, buffer: &[u8]) -> String {
        format!("{}{}", self.css_image_path, sprite_file_name(buffer))
    }

    async fn write(&self, buffer: &[u8]) -> Result<()> {
        let file_name = sprite_file_name(buffer);
        let path = self.root.join(format!("{}{}", self.output_path, file_name));

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SpriteError::Emit {
                    path: parent.to_path_buf(),
                    message: format!("Failed to create directory: {}", e),
                })?;
        }

        tokio::fs::write(&path, buffer)
            .await
            .map_err(|e| SpriteError::Emit {
                path: path.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!(path = %path.display(), bytes = buffer.len(), "emitted sprite");
        Ok(())
    }
}
