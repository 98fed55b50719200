//! Composite layout algorithms.
//!
//! Every item is reserved `padding` extra pixels to its right and bottom.
//! The padding after the last row/column is trimmed from the composite size.

use super::Layout;

/// Positions for a list of item sizes, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement {
    pub positions: Vec<(u32, u32)>,
    pub width: u32,
    pub height: u32,
}

/// Lay out items of the given `(width, height)` sizes.
pub fn arrange(sizes: &[(u32, u32)], layout: Layout, padding: u32) -> Arrangement {
    if sizes.is_empty() {
        return Arrangement {
            positions: vec![],
            width: 0,
            height: 0,
        };
    }

    let padded: Vec<(u32, u32)> = sizes
        .iter()
        .map(|&(w, h)| (w + padding, h + padding))
        .collect();

    let positions = match layout {
        Layout::TopDown => stack(&padded, |(_, h)| (0, h)),
        Layout::LeftRight => stack(&padded, |(w, _)| (w, 0)),
        Layout::BinaryTree => GrowingPacker::default().fit(&padded),
    };

    let width = positions
        .iter()
        .zip(&padded)
        .map(|(&(x, _), &(w, _))| x + w)
        .max()
        .unwrap_or(0);
    let height = positions
        .iter()
        .zip(&padded)
        .map(|(&(_, y), &(_, h))| y + h)
        .max()
        .unwrap_or(0);

    Arrangement {
        positions,
        width: width.saturating_sub(padding),
        height: height.saturating_sub(padding),
    }
}

/// Place items one after another, advancing by `step` of each item.
fn stack(items: &[(u32, u32)], step: impl Fn((u32, u32)) -> (u32, u32)) -> Vec<(u32, u32)> {
    let mut cursor = (0, 0);
    items
        .iter()
        .map(|&item| {
            let at = cursor;
            let (dx, dy) = step(item);
            cursor = (cursor.0 + dx, cursor.1 + dy);
            at
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct Node {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    used: bool,
    right: Option<usize>,
    down: Option<usize>,
}

impl Node {
    fn free(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            used: false,
            right: None,
            down: None,
        }
    }
}

/// Binary-tree packer whose canvas grows right or down as needed,
/// preferring to keep the canvas roughly square.
#[derive(Debug, Default)]
struct GrowingPacker {
    nodes: Vec<Node>,
    root: usize,
}

impl GrowingPacker {
    fn fit(mut self, items: &[(u32, u32)]) -> Vec<(u32, u32)> {
        // Largest side first; ties keep input order.
        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by(|&a, &b| {
            let side = |i: usize| items[i].0.max(items[i].1);
            side(b).cmp(&side(a)).then_with(|| a.cmp(&b))
        });

        let (w0, h0) = items[order[0]];
        self.nodes.push(Node::free(0, 0, w0, h0));
        self.root = 0;

        let mut positions = vec![(0, 0); items.len()];
        for &idx in &order {
            let (w, h) = items[idx];
            let node = match self.find(self.root, w, h) {
                Some(node) => node,
                None => self.grow(w, h),
            };
            positions[idx] = self.split(node, w, h);
        }
        positions
    }

    fn find(&self, idx: usize, w: u32, h: u32) -> Option<usize> {
        let node = self.nodes[idx];
        if node.used {
            node.right
                .and_then(|r| self.find(r, w, h))
                .or_else(|| node.down.and_then(|d| self.find(d, w, h)))
        } else if w <= node.w && h <= node.h {
            Some(idx)
        } else {
            None
        }
    }

    fn split(&mut self, idx: usize, w: u32, h: u32) -> (u32, u32) {
        let Node { x, y, w: nw, h: nh, .. } = self.nodes[idx];
        let down = self.push(Node::free(x, y + h, nw, nh - h));
        let right = self.push(Node::free(x + w, y, nw - w, h));
        let node = &mut self.nodes[idx];
        node.used = true;
        node.down = Some(down);
        node.right = Some(right);
        (x, y)
    }

    /// Grow the canvas so a `w`x`h` item fits, returning the free node for it.
    fn grow(&mut self, w: u32, h: u32) -> usize {
        let root = self.nodes[self.root];
        let can_grow_down = w <= root.w;
        let can_grow_right = h <= root.h;
        let should_grow_right = can_grow_right && root.h >= root.w + w;
        let should_grow_down = can_grow_down && root.w >= root.h + h;

        if should_grow_right || (can_grow_right && !should_grow_down) {
            let spare = self.push(Node::free(root.w, 0, w, root.h));
            self.reroot(root.w + w, root.h, Some(spare), Some(self.root));
            spare
        } else {
            // Widen when the item is larger than the canvas on both axes.
            let width = root.w.max(w);
            let spare = self.push(Node::free(0, root.h, width, h));
            self.reroot(width, root.h + h, Some(self.root), Some(spare));
            spare
        }
    }

    fn reroot(&mut self, w: u32, h: u32, right: Option<usize>, down: Option<usize>) {
        let root = self.push(Node {
            x: 0,
            y: 0,
            w,
            h,
            used: true,
            right,
            down,
        });
        self.root = root;
    }

    fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}
