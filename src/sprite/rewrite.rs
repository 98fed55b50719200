//! Projection of packing results back onto the rule tree.
//!
//! For every placed member the originating rule gains a `background-size`
//! covering the whole composite, and the originating declaration is turned
//! into a `background-position` pointing at the member's slot. One extra
//! rule per group, matching all member selectors, carries the composite
//! itself. That rule must precede the originals so their positions win.

use std::path::Path;

use crate::pack::{resolve_image_path, PackResult};
use crate::stylesheet::{Rule, Stylesheet};

use super::Group;

/// Position of the composite until a member rule positions it.
pub const HIDDEN_POSITION: &str = "-9999px -9999px";

/// Unit used for sprite offsets and sizes. Downstream tooling converts it
/// proportionally, so it is never rewritten to `px` here.
const RELATIVE_UNIT: &str = "pr";

/// Format a length in the sprite unit; zero is written unitless.
pub fn to_relative_unit(value: i64) -> String {
    if value == 0 {
        "0".to_string()
    } else {
        format!("{}{}", value, RELATIVE_UNIT)
    }
}

/// Rewrite the members of `group` to use the composite at `sprite_url`.
///
/// Members without a placement in `pack` are left untouched. Returns the
/// rule that sets the composite background, or `None` when no member was
/// placed. The caller decides where to insert it.
pub fn apply_placements(
    sheet: &mut Stylesheet,
    group: &Group,
    pack: &PackResult,
    sprite_url: &str,
    context: &Path,
) -> Option<Rule> {
    let size = format!(
        "{} {}",
        to_relative_unit(i64::from(pack.width)),
        to_relative_unit(i64::from(pack.height))
    );
    let mut selectors: Vec<String> = Vec::new();

    for member in &group.members {
        let path = resolve_image_path(context, &member.url);
        let Some(placement) = pack.placements.get(&path) else {
            tracing::debug!(url = %member.url, "no placement for sprite member");
            continue;
        };

        let size_declaration = sheet.create_declaration("background-size", size.clone());
        let Some(rule) = sheet.rule_mut(member.rule) else {
            continue;
        };

        selectors.extend(rule.selectors.iter().cloned());
        rule.push_declaration(size_declaration);

        if let Some(declaration) = rule.declaration_mut(member.declaration) {
            declaration.property = "background-position".to_string();
            declaration.value = format!(
                "{} {}",
                to_relative_unit(-i64::from(placement.x)),
                to_relative_unit(-i64::from(placement.y))
            );
        }
    }

    if selectors.is_empty() {
        return None;
    }

    let background = sheet.create_declaration(
        "background",
        format!("url({}) no-repeat {}", sprite_url, HIDDEN_POSITION),
    );
    let mut rule = sheet.create_rule(selectors);
    rule.push_declaration(background);
    Some(rule)
}
