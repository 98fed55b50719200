//! Stylesheet transform pipeline.
//!
//! parse -> opt-in check -> group -> (pack -> rewrite) per group ->
//! prepend composite rules -> serialize -> write composites.
//!
//! Groups are drained from the end of the grouping order, and every
//! composite rule is prepended, so composite rules end up in reverse order of
//! group formation. Existing output depends on that order.
//!
//! Composite urls are derived from the image bytes, so every group is packed
//! and the stylesheet rewritten before any composite is written. A failure
//! in any group leaves nothing on disk.

use std::path::Path;

use serde::Serialize;

use crate::config::SpriteOptions;
use crate::emit::{Emitter, FileEmitter};
use crate::error::{Result, SpriteError};
use crate::pack::{pack_group, ImagePacker, Packer};
use crate::sprite::{apply_placements, group_images, PixelRatio, RepeatMode};
use crate::stylesheet::{parse_stylesheet, Node, Stylesheet};

/// Comment text that enables spriting for a stylesheet.
pub const ENABLE_MARKER: &str = "csssprite-enable";

/// Enable marker used by stylesheets written for sprite-loader.
pub const LEGACY_ENABLE_MARKER: &str = "sprite-loader-enable";

/// The first top-level comment mentioning one of these decides whether the
/// stylesheet is processed.
const MARKER_PREFIXES: [&str; 2] = ["csssprite", "sprite-loader"];

/// Tracing target of the per-stylesheet line enabled by the `debug` option.
pub const DEBUG_TARGET: &str = "csssprite::debug";

/// Whether the stylesheet opted in to spriting.
pub fn is_enabled(sheet: &Stylesheet) -> bool {
    sheet
        .comments()
        .find(|text| MARKER_PREFIXES.iter().any(|prefix| text.contains(prefix)))
        .is_some_and(|text| matches!(text.trim(), ENABLE_MARKER | LEGACY_ENABLE_MARKER))
}

/// One composite produced by a transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedSprite {
    pub url: String,
    pub ratio: PixelRatio,
    pub repeat: RepeatMode,
    pub members: usize,
    pub width: u32,
    pub height: u32,
}

/// Result of transforming one stylesheet.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub css: String,
    /// False when the stylesheet did not opt in and was passed through.
    pub processed: bool,
    /// Composites in processing order.
    pub sprites: Vec<EmittedSprite>,
}

/// A rewritten stylesheet whose composites are not written yet.
#[derive(Debug, Clone)]
pub struct PreparedTransform {
    pub css: String,
    pub processed: bool,
    pending: Vec<(EmittedSprite, Vec<u8>)>,
}

impl PreparedTransform {
    fn passthrough(css: &str) -> Self {
        Self {
            css: css.to_string(),
            processed: false,
            pending: Vec::new(),
        }
    }

    /// Composites waiting to be written, in processing order.
    pub fn sprites(&self) -> impl Iterator<Item = &EmittedSprite> {
        self.pending.iter().map(|(sprite, _)| sprite)
    }
}

/// Sprite transform bound to a packing engine and an emitter.
pub struct SpriteTransform<P = ImagePacker, E = FileEmitter> {
    packer: P,
    emitter: E,
    options: SpriteOptions,
}

impl SpriteTransform<ImagePacker, FileEmitter> {
    /// Transform that writes composites below `output_root`.
    pub fn with_output(output_root: impl Into<std::path::PathBuf>, options: SpriteOptions) -> Self {
        let emitter = FileEmitter::new(output_root, &options);
        Self::new(ImagePacker::new(), emitter, options)
    }
}

impl<P: Packer, E: Emitter> SpriteTransform<P, E> {
    pub fn new(packer: P, emitter: E, options: SpriteOptions) -> Self {
        Self {
            packer,
            emitter,
            options,
        }
    }

    pub fn options(&self) -> &SpriteOptions {
        &self.options
    }

    /// Transform stylesheet source and write its composites. Image urls
    /// resolve against `context`.
    pub async fn process(&self, css: &str, context: &Path) -> Result<TransformOutput> {
        let prepared = self.prepare(css, context).await?;
        self.commit(prepared).await
    }

    /// Read, transform and write a stylesheet file's composites, resolving
    /// images next to it.
    pub async fn process_file(&self, path: &Path) -> Result<TransformOutput> {
        let prepared = self.prepare_file(path).await?;
        self.commit(prepared).await
    }

    /// Pack every group and rewrite the stylesheet without writing anything.
    pub async fn prepare(&self, css: &str, context: &Path) -> Result<PreparedTransform> {
        self.run(css, context, context).await
    }

    /// Like [`prepare`](Self::prepare) for a stylesheet on disk.
    pub async fn prepare_file(&self, path: &Path) -> Result<PreparedTransform> {
        let css = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SpriteError::Io {
                path: path.to_path_buf(),
                message: format!("Failed to read stylesheet: {}", e),
            })?;
        let context = path.parent().unwrap_or_else(|| Path::new("."));
        self.run(&css, context, path).await
    }

    /// Write the composites of a prepared stylesheet.
    pub async fn commit(&self, prepared: PreparedTransform) -> Result<TransformOutput> {
        let mut sprites = Vec::with_capacity(prepared.pending.len());
        for (sprite, buffer) in prepared.pending {
            self.emitter.write(&buffer).await?;
            sprites.push(sprite);
        }

        Ok(TransformOutput {
            css: prepared.css,
            processed: prepared.processed,
            sprites,
        })
    }

    async fn run(&self, css: &str, context: &Path, resource: &Path) -> Result<PreparedTransform> {
        let mut sheet = parse_stylesheet(css)?;
        if !is_enabled(&sheet) {
            tracing::debug!(resource = %resource.display(), "not enabled, passing through");
            return Ok(PreparedTransform::passthrough(css));
        }

        let mut worklist = group_images(&sheet);
        if !worklist.is_empty() {
            if self.options.debug {
                tracing::info!(target: DEBUG_TARGET, "csssprite: {}", resource.display());
            } else {
                tracing::debug!(resource = %resource.display(), groups = worklist.len(), "found sprite groups");
            }
        }

        let mut composite_rules = Vec::with_capacity(worklist.len());
        let mut pending = Vec::with_capacity(worklist.len());

        while let Some(group) = worklist.pop() {
            tracing::debug!(
                ratio = %group.ratio,
                repeat = %group.repeat,
                members = group.members.len(),
                "packing group"
            );

            let pack = pack_group(&self.packer, &group, context).await?;
            let url = self.emitter.reference(&pack.image);

            if let Some(rule) = apply_placements(&mut sheet, &group, &pack, &url, context) {
                composite_rules.push(Node::Rule(rule));
            }

            let sprite = EmittedSprite {
                url,
                ratio: group.ratio,
                repeat: group.repeat,
                members: group.members.len(),
                width: pack.width,
                height: pack.height,
            };
            pending.push((sprite, pack.image));
        }

        sheet.prepend(composite_rules);

        Ok(PreparedTransform {
            css: sheet.to_string(),
            processed: true,
            pending,
        })
    }
}
