//! Declaration scanner.
//!
//! Declarations are scanned last to first, so the declaration that wins the
//! cascade inside a rule is the one considered.

use std::sync::LazyLock;

use regex::Regex;

use crate::stylesheet::Rule;

use super::{BackgroundImageRef, RepeatMode};

/// Marker placed after the image path inside `url(...)` to opt a
/// declaration out of spriting, e.g. `url(icon.png#spriteignore)`.
pub const IGNORE_MARKER: &str = "#spriteignore";

static BACKGROUND_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)url\(([^)]+\.(?:png|jpg|jpeg|gif))([^)]*)\)").expect("valid url pattern")
});

static REPEAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"repeat-(x|y)").expect("valid repeat pattern"));

/// Find the image reference a rule's background resolves to.
///
/// Returns `None` when no `background`/`background-image` declaration holds a
/// single local-looking image url, or when the winning declaration carries
/// the ignore marker. An ignored declaration does not fall back to an
/// earlier one.
pub fn find_background_image(rule: &Rule) -> Option<BackgroundImageRef> {
    for declaration in rule.declarations().rev() {
        if !(declaration.is("background") || declaration.is("background-image")) {
            continue;
        }

        // Layered backgrounds cannot be expressed as one sprite position.
        if BACKGROUND_URL.find_iter(&declaration.value).count() != 1 {
            continue;
        }

        let Some(caps) = BACKGROUND_URL.captures(&declaration.value) else {
            continue;
        };

        let trailing = caps.get(2).map_or("", |m| m.as_str());
        if trailing.to_ascii_lowercase().contains(IGNORE_MARKER) {
            return None;
        }

        let url = caps[1].replace(['\'', '"'], "").trim().to_string();
        return Some(BackgroundImageRef {
            url,
            rule: rule.id(),
            declaration: declaration.id(),
        });
    }

    None
}

/// Determine how a rule's background repeats.
///
/// The last `background` or `background-repeat` declaration mentioning
/// `repeat-x`/`repeat-y` decides; anything else is no-repeat.
pub fn repeat_mode(rule: &Rule) -> RepeatMode {
    for declaration in rule.declarations().rev() {
        if !(declaration.is("background") || declaration.is("background-repeat")) {
            continue;
        }

        if let Some(caps) = REPEAT.captures(&declaration.value) {
            return match &caps[1] {
                "x" => RepeatMode::RepeatX,
                _ => RepeatMode::RepeatY,
            };
        }
    }

    RepeatMode::NoRepeat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylesheet::{parse_stylesheet, Stylesheet};

    fn sheet(css: &str) -> Stylesheet {
        parse_stylesheet(css).unwrap()
    }

    fn image_of(css: &str) -> Option<String> {
        let sheet = sheet(css);
        let rule = sheet.rules().next().unwrap();
        find_background_image(rule).map(|r| r.url)
    }

    fn repeat_of(css: &str) -> RepeatMode {
        let sheet = sheet(css);
        let mode = repeat_mode(sheet.rules().next().unwrap());
        mode
    }

    #[test]
    fn test_finds_background_shorthand() {
        assert_eq!(image_of(".a { background: url(img/a.png) no-repeat; }"), Some("img/a.png".into()));
    }

    #[test]
    fn test_finds_background_image() {
        assert_eq!(image_of(".a { background-image: url(a.gif); }"), Some("a.gif".into()));
    }

    #[test]
    fn test_strips_quotes_and_whitespace() {
        assert_eq!(image_of(".a { background: url( \"a.jpg\" ); }"), Some("a.jpg".into()));
        assert_eq!(image_of(".a { background: url('b.jpeg'); }"), Some("b.jpeg".into()));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(image_of(".a { background: URL(a.PNG); }"), Some("a.PNG".into()));
    }

    #[test]
    fn test_ignores_other_extensions() {
        assert_eq!(image_of(".a { background: url(a.svg); }"), None);
        assert_eq!(image_of(".a { background: url(a.webp); }"), None);
    }

    #[test]
    fn test_ignores_other_properties() {
        assert_eq!(image_of(".a { list-style-image: url(a.png); }"), None);
        assert_eq!(image_of(".a { color: red; }"), None);
    }

    #[test]
    fn test_last_declaration_wins() {
        let css = ".a { background: url(first.png); background-image: url(second.png); }";
        assert_eq!(image_of(css), Some("second.png".into()));
    }

    #[test]
    fn test_falls_back_past_non_matching_declaration() {
        let css = ".a { background: url(a.png); background: none; }";
        assert_eq!(image_of(css), Some("a.png".into()));
    }

    #[test]
    fn test_ignore_marker_opts_out() {
        assert_eq!(image_of(".a { background: url(a.png#spriteignore); }"), None);
        assert_eq!(image_of(".a { background: url(a.png?#SpriteIgnore); }"), None);
    }

    #[test]
    fn test_ignore_marker_does_not_fall_back() {
        let css = ".a { background: url(a.png); background: url(b.png#spriteignore); }";
        assert_eq!(image_of(css), None);
    }

    #[test]
    fn test_layered_background_is_skipped() {
        assert_eq!(image_of(".a { background: url(a.png), url(b.png); }"), None);
    }

    #[test]
    fn test_reference_points_at_declaration() {
        let sheet = sheet(".a { color: red; background: url(a.png); }");
        let rule = sheet.rules().next().unwrap();
        let found = find_background_image(rule).unwrap();

        assert_eq!(found.rule, rule.id());
        let decl = rule.declarations().nth(1).unwrap();
        assert_eq!(found.declaration, decl.id());
    }

    #[test]
    fn test_repeat_mode_default() {
        assert_eq!(repeat_of(".a { background: url(a.png); }"), RepeatMode::NoRepeat);
    }

    #[test]
    fn test_repeat_mode_from_shorthand() {
        assert_eq!(repeat_of(".a { background: url(a.png) repeat-x; }"), RepeatMode::RepeatX);
        assert_eq!(repeat_of(".a { background: url(a.png) repeat-y; }"), RepeatMode::RepeatY);
    }

    #[test]
    fn test_repeat_mode_from_longhand() {
        let css = ".a { background: url(a.png); background-repeat: repeat-y; }";
        assert_eq!(repeat_of(css), RepeatMode::RepeatY);
    }

    #[test]
    fn test_repeat_mode_last_wins() {
        let css = ".a { background-repeat: repeat-x; background-repeat: repeat-y; }";
        assert_eq!(repeat_of(css), RepeatMode::RepeatY);
    }
}
