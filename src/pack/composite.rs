//! Composite image rendering.
//!
//! Loads source images, lays them out and encodes the composite as PNG.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::{Result, SpriteError};
use crate::sprite::RepeatMode;

use super::{arrange, Layout, PackResult, Packer, Placement};

/// Gap in pixels kept between neighbouring images in a composite.
pub const PADDING: u32 = 20;

/// Packer backed by the `image` crate.
#[derive(Debug, Clone)]
pub struct ImagePacker {
    padding: u32,
}

impl ImagePacker {
    pub fn new() -> Self {
        Self { padding: PADDING }
    }

    pub fn with_padding(padding: u32) -> Self {
        Self { padding }
    }
}

impl Default for ImagePacker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Packer for ImagePacker {
    async fn pack(&self, images: &[PathBuf], repeat: RepeatMode) -> Result<PackResult> {
        let images = images.to_vec();
        let layout = Layout::for_repeat(repeat);
        let padding = self.padding;

        tokio::task::spawn_blocking(move || compose(&images, layout, padding))
            .await
            .map_err(|e| SpriteError::Pack {
                message: format!("Packing task failed: {}", e),
                help: None,
            })?
    }
}

/// Compose the images at `paths` into one PNG.
///
/// A path listed more than once is drawn once and shares its placement.
pub fn compose(paths: &[PathBuf], layout: Layout, padding: u32) -> Result<PackResult> {
    let mut unique: Vec<&PathBuf> = Vec::with_capacity(paths.len());
    for path in paths {
        if !unique.contains(&path) {
            unique.push(path);
        }
    }

    if unique.is_empty() {
        return Err(SpriteError::Pack {
            message: "No images to pack".to_string(),
            help: None,
        });
    }

    let sources = unique
        .iter()
        .map(|path| load_image(path))
        .collect::<Result<Vec<RgbaImage>>>()?;

    let sizes: Vec<(u32, u32)> = sources.iter().map(|img| (img.width(), img.height())).collect();
    let arrangement = arrange(&sizes, layout, padding);

    let mut canvas = RgbaImage::new(arrangement.width, arrangement.height);
    let mut placements = HashMap::with_capacity(unique.len());

    for ((path, source), &(x, y)) in unique.iter().zip(&sources).zip(&arrangement.positions) {
        image::imageops::replace(&mut canvas, source, x as i64, y as i64);
        placements.insert(
            (*path).clone(),
            Placement {
                x,
                y,
                width: source.width(),
                height: source.height(),
            },
        );
    }

    let mut buffer = Vec::new();
    DynamicImage::ImageRgba8(canvas)
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| SpriteError::Pack {
            message: format!("Failed to encode sprite: {}", e),
            help: None,
        })?;

    Ok(PackResult {
        image: buffer,
        placements,
        width: arrangement.width,
        height: arrangement.height,
    })
}

fn load_image(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|e| SpriteError::Pack {
        message: format!("Failed to load image {}: {}", path.display(), e),
        help: Some("Check that the file exists and is a PNG, JPEG or GIF image".to_string()),
    })?;
    Ok(img.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    fn write_image(dir: &Path, name: &str, w: u32, h: u32, colour: [u8; 4]) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(w, h, Rgba(colour)).save(&path).unwrap();
        path
    }

    fn decode(result: &PackResult) -> RgbaImage {
        image::load_from_memory(&result.image).unwrap().to_rgba8()
    }

    #[test]
    fn test_compose_preserves_pixels() {
        let dir = tempdir().unwrap();
        let red = write_image(dir.path(), "red.png", 4, 4, [255, 0, 0, 255]);
        let blue = write_image(dir.path(), "blue.png", 2, 3, [0, 0, 255, 255]);

        let result = compose(&[red.clone(), blue.clone()], Layout::BinaryTree, 2).unwrap();
        let img = decode(&result);
        assert_eq!((img.width(), img.height()), (result.width, result.height));

        let r = result.placements[&red];
        let b = result.placements[&blue];
        assert_eq!((r.width, r.height), (4, 4));
        assert_eq!((b.width, b.height), (2, 3));
        assert_eq!(img.get_pixel(r.x, r.y).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(b.x + 1, b.y + 2).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_compose_top_down_dimensions() {
        let dir = tempdir().unwrap();
        let a = write_image(dir.path(), "a.png", 10, 4, [1, 2, 3, 255]);
        let b = write_image(dir.path(), "b.png", 6, 5, [4, 5, 6, 255]);

        let result = compose(&[a.clone(), b.clone()], Layout::TopDown, PADDING).unwrap();

        assert_eq!((result.width, result.height), (10, 4 + PADDING + 5));
        assert_eq!((result.placements[&a].x, result.placements[&a].y), (0, 0));
        assert_eq!((result.placements[&b].x, result.placements[&b].y), (0, 4 + PADDING));
    }

    #[test]
    fn test_compose_padding_is_transparent() {
        let dir = tempdir().unwrap();
        let a = write_image(dir.path(), "a.png", 2, 2, [9, 9, 9, 255]);
        let b = write_image(dir.path(), "b.png", 2, 2, [9, 9, 9, 255]);

        let result = compose(&[a, b], Layout::LeftRight, 3).unwrap();
        let img = decode(&result);
        assert_eq!(img.get_pixel(3, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_compose_duplicate_paths_share_placement() {
        let dir = tempdir().unwrap();
        let a = write_image(dir.path(), "a.png", 3, 3, [1, 1, 1, 255]);

        let result = compose(&[a.clone(), a.clone()], Layout::TopDown, PADDING).unwrap();
        assert_eq!(result.placements.len(), 1);
        assert_eq!((result.width, result.height), (3, 3));
    }

    #[test]
    fn test_compose_missing_image_fails() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.png");

        let err = compose(&[missing], Layout::BinaryTree, PADDING).unwrap_err();
        assert!(matches!(err, SpriteError::Pack { .. }));
        assert!(err.to_string().contains("missing.png"));
    }

    #[test]
    fn test_compose_empty_fails() {
        assert!(compose(&[], Layout::BinaryTree, PADDING).is_err());
    }

    #[tokio::test]
    async fn test_image_packer_uses_repeat_layout() {
        let dir = tempdir().unwrap();
        let a = write_image(dir.path(), "a.png", 5, 5, [1, 1, 1, 255]);
        let b = write_image(dir.path(), "b.png", 5, 5, [2, 2, 2, 255]);

        let packer = ImagePacker::with_padding(1);
        let result = packer.pack(&[a, b], RepeatMode::RepeatY).await.unwrap();

        assert_eq!((result.width, result.height), (11, 5));
    }
}
