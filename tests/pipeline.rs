//! End-to-end transform with real images on disk.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use pretty_assertions::assert_eq;
use tempfile::{tempdir, TempDir};

use csssprite::stylesheet::{Node, Rule};
use csssprite::{parse_stylesheet, PixelRatio, RepeatMode, SpriteOptions, SpriteTransform};

const LOGO: [u8; 4] = [255, 0, 0, 255];
const NAV: [u8; 4] = [0, 255, 0, 255];

fn fixture() -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("site.css");
    fs::read_to_string(path).unwrap()
}

fn write_icon(dir: &Path, name: &str, w: u32, h: u32, colour: [u8; 4]) {
    let path = dir.join("img").join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbaImage::from_pixel(w, h, Rgba(colour)).save(path).unwrap();
}

/// Site directory with the fixture stylesheet and the images it sprites.
fn site() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let css = dir.path().join("css");
    fs::create_dir_all(&css).unwrap();
    fs::write(css.join("site.css"), fixture()).unwrap();

    write_icon(&css, "logo.png", 12, 4, LOGO);
    write_icon(&css, "nav.png", 6, 6, NAV);
    write_icon(&css, "badge@2x.png", 32, 32, [0, 0, 255, 255]);
    write_icon(&css, "stripe.png", 1, 8, [9, 9, 9, 255]);

    (dir, css.join("site.css"))
}

fn options() -> SpriteOptions {
    SpriteOptions {
        output_path: "img/".to_string(),
        ..Default::default()
    }
}

fn rule<'a>(rules: &'a [&'a Rule], selector: &str) -> &'a Rule {
    rules
        .iter()
        .find(|r| r.selectors.iter().any(|s| s == selector))
        .copied()
        .unwrap_or_else(|| panic!("no rule for {selector}"))
}

fn value(rule: &Rule, property: &str) -> Option<String> {
    rule.declarations()
        .rev()
        .find(|d| d.is(property))
        .map(|d| d.value.clone())
}

fn offset(value: &str) -> (u32, u32) {
    let parse = |v: &str| -> u32 { v.trim_start_matches('-').trim_end_matches("pr").parse().unwrap() };
    let mut parts = value.split(' ');
    (parse(parts.next().unwrap()), parse(parts.next().unwrap()))
}

#[tokio::test]
async fn test_fixture_transform() {
    let (dir, stylesheet) = site();
    let out = dir.path().join("dist");
    let transform = SpriteTransform::with_output(&out, options());

    let output = transform.process_file(&stylesheet).await.unwrap();
    assert!(output.processed);

    // Last formed group first.
    let keys: Vec<(PixelRatio, RepeatMode, usize)> = output
        .sprites
        .iter()
        .map(|s| (s.ratio, s.repeat, s.members))
        .collect();
    assert_eq!(
        keys,
        vec![
            (PixelRatio::X1, RepeatMode::RepeatX, 1),
            (PixelRatio::X2, RepeatMode::NoRepeat, 1),
            (PixelRatio::X1, RepeatMode::NoRepeat, 2),
        ]
    );

    for sprite in &output.sprites {
        assert!(out.join(&sprite.url).is_file(), "missing {}", sprite.url);
    }

    let sheet = parse_stylesheet(&output.css).unwrap();
    let nodes = sheet.nodes();
    let composite_selectors: Vec<Vec<String>> = nodes[..3]
        .iter()
        .map(|n| match n {
            Node::Rule(r) => r.selectors.clone(),
            other => panic!("expected composite rule, got {other:?}"),
        })
        .collect();
    assert_eq!(
        composite_selectors,
        vec![
            vec![".stripe".to_string()],
            vec![".badge".to_string()],
            vec![".logo".to_string(), ".nav .home".to_string(), ".nav .about".to_string()],
        ]
    );
    assert_eq!(nodes[3], Node::Comment(" csssprite-enable ".to_string()));

    let rules: Vec<&Rule> = sheet.rules().skip(3).collect();

    let badge = rule(&rules, ".badge");
    assert_eq!(value(badge, "background-position").as_deref(), Some("0 0"));
    assert_eq!(value(badge, "background-size").as_deref(), Some("32pr 32pr"));

    let banner = rule(&rules, ".banner");
    assert_eq!(value(banner, "background").as_deref(), Some("url(img/banner.jpg)"));

    let hero = rule(&rules, ".hero");
    assert_eq!(
        value(hero, "background").as_deref(),
        Some("url(https://cdn.example.org/hero.png)")
    );
    let legacy = rule(&rules, ".legacy");
    assert!(value(legacy, "background-position").is_none());
    let layered = rule(&rules, ".layered");
    assert!(value(layered, "background-size").is_none());

    assert!(output
        .css
        .contains("@media (min-width: 600px) {\n  .logo { background: url(img/logo-wide.png); }\n}"));
    assert!(output.css.contains("@import url(\"reset.css\");"));
}

#[tokio::test]
async fn test_offsets_point_at_source_pixels() {
    let (dir, stylesheet) = site();
    let out = dir.path().join("dist");
    let transform = SpriteTransform::with_output(&out, options());

    let output = transform.process_file(&stylesheet).await.unwrap();
    let sprite = output
        .sprites
        .iter()
        .find(|s| s.members == 2)
        .unwrap();
    let composite = image::open(out.join(&sprite.url)).unwrap().to_rgba8();
    assert_eq!((composite.width(), composite.height()), (sprite.width, sprite.height));

    let sheet = parse_stylesheet(&output.css).unwrap();
    let rules: Vec<&Rule> = sheet.rules().skip(3).collect();

    for (selector, colour, size) in [(".logo", LOGO, (12, 4)), (".nav .home", NAV, (6, 6))] {
        let r = rule(&rules, selector);
        let (x, y) = offset(&value(r, "background-position").unwrap());
        assert_eq!(composite.get_pixel(x, y).0, colour, "{selector} top-left");
        assert_eq!(
            composite.get_pixel(x + size.0 - 1, y + size.1 - 1).0,
            colour,
            "{selector} bottom-right"
        );
        assert_eq!(
            value(r, "background-size").unwrap(),
            format!("{}pr {}pr", sprite.width, sprite.height)
        );
    }
}

#[tokio::test]
async fn test_rebuild_is_deterministic() {
    let (dir, stylesheet) = site();
    let transform = SpriteTransform::with_output(dir.path().join("dist"), options());

    let first = transform.process_file(&stylesheet).await.unwrap();
    let second = transform.process_file(&stylesheet).await.unwrap();

    assert_eq!(first.css, second.css);
    let files = fs::read_dir(dir.path().join("dist").join("img")).unwrap().count();
    assert_eq!(files, 3);
}
