//! Sprite eligibility rules.

use crate::stylesheet::Rule;

use super::BackgroundImageRef;

/// Whether a url points off the local filesystem.
pub fn is_remote(url: &str) -> bool {
    url.starts_with("http") || url.starts_with("//")
}

/// Whether the rule positions its background by hand.
pub fn has_manual_position(rule: &Rule) -> bool {
    rule.has_property("background-position")
}

/// A detected image is sprited only if it is local and its rule does not
/// already set `background-position`.
pub fn is_eligible(rule: &Rule, image: &BackgroundImageRef) -> bool {
    !is_remote(&image.url) && !has_manual_position(rule)
}
