//! csssprite - CSS image sprite generator
//!
//! Scans opted-in stylesheets for `background` images, packs images that
//! share a pixel ratio and repeat mode into one composite PNG, and rewrites
//! the stylesheet to reference the composite at the right offsets.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod emit;
pub mod error;
pub mod output;
pub mod pack;
pub mod sprite;
pub mod stylesheet;
pub mod transform;

pub use config::SpriteOptions;
pub use emit::{sprite_file_name, Emitter, FileEmitter};
pub use error::{Result, SpriteError};
pub use pack::{ImagePacker, Layout, PackResult, Packer, Placement};
pub use sprite::{group_images, BackgroundImageRef, Group, GroupKey, PixelRatio, RepeatMode};
pub use stylesheet::{parse_stylesheet, Stylesheet};
pub use transform::{is_enabled, EmittedSprite, PreparedTransform, SpriteTransform, TransformOutput};
