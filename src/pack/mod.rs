//! Composite image packing.
//!
//! A [`Packer`] turns the source images of one sprite group into a single
//! composite plus the offset of every source inside it. The layout depends
//! on the group's repeat mode: horizontally tiling images are stacked
//! top to bottom, vertically tiling images are placed left to right, and
//! everything else is bin-packed.

mod composite;
mod layout;

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::error::Result;
use crate::sprite::{Group, RepeatMode};

pub use composite::{compose, ImagePacker, PADDING};
pub use layout::{arrange, Arrangement};

/// Placement of one source image inside a composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Output of packing one group.
#[derive(Debug, Clone)]
pub struct PackResult {
    /// Encoded composite image.
    pub image: Vec<u8>,
    /// Placement per resolved source path.
    pub placements: HashMap<PathBuf, Placement>,
    pub width: u32,
    pub height: u32,
}

/// Arrangement strategy for a composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Stack vertically; every image keeps the full row to tile along x.
    TopDown,
    /// Place side by side; every image keeps the full column to tile along y.
    LeftRight,
    /// Growing binary-tree bin packing.
    BinaryTree,
}

impl Layout {
    pub fn for_repeat(repeat: RepeatMode) -> Self {
        match repeat {
            RepeatMode::RepeatX => Layout::TopDown,
            RepeatMode::RepeatY => Layout::LeftRight,
            RepeatMode::NoRepeat => Layout::BinaryTree,
        }
    }
}

/// Packing engine.
#[async_trait]
pub trait Packer: Send + Sync {
    /// Pack `images` (resolved paths) into one composite suited to `repeat`.
    async fn pack(&self, images: &[PathBuf], repeat: RepeatMode) -> Result<PackResult>;
}

/// Resolve an image url from a stylesheet against the stylesheet's directory.
///
/// The result is lexically normalized so `a/../b.png` and `b.png` resolve to
/// the same key.
pub fn resolve_image_path(context: &Path, url: &str) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in context.join(url).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(resolved.components().next_back(), Some(Component::Normal(_))) {
                    resolved.pop();
                } else if !resolved.has_root() {
                    resolved.push("..");
                }
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

/// Resolve every member of `group` and hand them to the packer.
pub async fn pack_group<P: Packer + ?Sized>(
    packer: &P,
    group: &Group,
    context: &Path,
) -> Result<PackResult> {
    let paths: Vec<PathBuf> = group
        .members
        .iter()
        .map(|m| resolve_image_path(context, &m.url))
        .collect();

    packer.pack(&paths, group.repeat).await
}
