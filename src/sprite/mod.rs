//! Sprite detection, grouping and rewriting.
//!
//! Background images referenced by style rules are found by the scanner,
//! filtered for eligibility, then partitioned into groups that each become
//! one composite image. After a group is packed, the rewrite step projects
//! the placements back onto the rule tree.

mod eligibility;
mod group;
mod rewrite;
mod scan;

use std::fmt;

use serde::Serialize;

use crate::stylesheet::{DeclarationId, RuleId};

pub use eligibility::{has_manual_position, is_eligible, is_remote};
pub use group::{group_images, Grouper};
pub use rewrite::{apply_placements, to_relative_unit, HIDDEN_POSITION};
pub use scan::{find_background_image, repeat_mode, IGNORE_MARKER};

/// Display density of a source image.
///
/// Detected from the filename only: a URL ending in `2x.png` is high
/// density. Image metadata is never inspected, so `@2x.jpg` or a 2x image
/// without the suffix is treated as 1x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PixelRatio {
    #[serde(rename = "1x")]
    X1,
    #[serde(rename = "2x")]
    X2,
}

/// Filename suffix that marks a high-density image.
pub const RETINA_SUFFIX: &str = "2x.png";

impl PixelRatio {
    pub fn from_url(url: &str) -> Self {
        if url.ends_with(RETINA_SUFFIX) {
            PixelRatio::X2
        } else {
            PixelRatio::X1
        }
    }
}

impl fmt::Display for PixelRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelRatio::X1 => write!(f, "1x"),
            PixelRatio::X2 => write!(f, "2x"),
        }
    }
}

/// How a background tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatMode {
    RepeatX,
    RepeatY,
    #[default]
    NoRepeat,
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatMode::RepeatX => write!(f, "repeat-x"),
            RepeatMode::RepeatY => write!(f, "repeat-y"),
            RepeatMode::NoRepeat => write!(f, "no-repeat"),
        }
    }
}

/// A local image reference found in a rule's background declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundImageRef {
    /// Path as written in the stylesheet, unquoted and trimmed.
    pub url: String,
    /// Rule the reference came from.
    pub rule: RuleId,
    /// Declaration that is rewritten into `background-position`.
    pub declaration: DeclarationId,
}

/// Key that partitions references into independent composites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub ratio: PixelRatio,
    pub repeat: RepeatMode,
}

/// References that are packed into one composite image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub ratio: PixelRatio,
    pub repeat: RepeatMode,
    /// Members in encounter order.
    pub members: Vec<BackgroundImageRef>,
}

impl Group {
    pub fn key(&self) -> GroupKey {
        GroupKey {
            ratio: self.ratio,
            repeat: self.repeat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_ratio_from_url() {
        assert_eq!(PixelRatio::from_url("img/icon@2x.png"), PixelRatio::X2);
        assert_eq!(PixelRatio::from_url("img/icon-2x.png"), PixelRatio::X2);
        assert_eq!(PixelRatio::from_url("img/icon.png"), PixelRatio::X1);
        // Only the png suffix is recognised.
        assert_eq!(PixelRatio::from_url("img/icon@2x.jpg"), PixelRatio::X1);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(PixelRatio::X2.to_string(), "2x");
        assert_eq!(RepeatMode::RepeatX.to_string(), "repeat-x");
        assert_eq!(RepeatMode::default().to_string(), "no-repeat");
    }
}
