//! Partitioning of eligible images into sprite groups.

use std::collections::HashMap;

use crate::stylesheet::{Rule, Stylesheet};

use super::{
    find_background_image, is_eligible, repeat_mode, BackgroundImageRef, Group, GroupKey,
    PixelRatio,
};

/// Collects eligible references into groups keyed by (ratio, repeat).
///
/// Groups are kept in the order their first member was seen.
#[derive(Debug, Default)]
pub struct Grouper {
    groups: Vec<Group>,
    index: HashMap<GroupKey, usize>,
}

impl Grouper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan one rule and add its image to the matching group.
    ///
    /// Returns false when the rule has no eligible image.
    pub fn add_rule(&mut self, rule: &Rule) -> bool {
        let Some(image) = find_background_image(rule) else {
            return false;
        };
        if !is_eligible(rule, &image) {
            return false;
        }

        let key = GroupKey {
            ratio: PixelRatio::from_url(&image.url),
            repeat: repeat_mode(rule),
        };
        self.insert(key, image);
        true
    }

    /// Append a reference to the group for `key`, creating it if needed.
    pub fn insert(&mut self, key: GroupKey, image: BackgroundImageRef) {
        let slot = *self.index.entry(key).or_insert_with(|| {
            self.groups.push(Group {
                ratio: key.ratio,
                repeat: key.repeat,
                members: Vec::new(),
            });
            self.groups.len() - 1
        });
        self.groups[slot].members.push(image);
    }

    /// Finish grouping. Only non-empty groups are returned.
    pub fn into_groups(self) -> Vec<Group> {
        self.groups
            .into_iter()
            .filter(|g| !g.members.is_empty())
            .collect()
    }
}

/// Group every eligible background image of a stylesheet, in source order.
pub fn group_images(sheet: &Stylesheet) -> Vec<Group> {
    let mut grouper = Grouper::new();
    for rule in sheet.rules() {
        grouper.add_rule(rule);
    }
    grouper.into_groups()
}
