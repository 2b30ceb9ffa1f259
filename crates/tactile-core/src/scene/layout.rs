//! Box layout for the in-memory scene
//!
//! Containers stack their visible children in a column or a row, inset by
//! their padding and separated by their row gap. Labels wrap by character
//! count at the width they are given. `Dimension::Fill` takes the width the
//! parent offers; a `Fill` height is treated like `Content`. Scroll offsets
//! shift a container's children, and every node is clipped to its
//! ancestors.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use super::{NodeProps, Scene};
use crate::host::{Dimension, Flow, NodeId, NodeKind};
use crate::text::{byte_offset_of_char, char_count};
use crate::ui::styling::{BaseDir, TextAlign};

/// Screen placement of every visible node
#[derive(Debug, Default)]
pub struct Layout {
    rects: BTreeMap<NodeId, Rectangle>,
    clips: BTreeMap<NodeId, Rectangle>,
    order: Vec<NodeId>,
}

impl Layout {
    pub(super) fn compute(scene: &Scene) -> Self {
        let mut layout = Self::default();
        let screen = Rectangle::new(Point::zero(), scene.viewport());
        layout.place(scene, scene.root(), Point::zero(), scene.viewport().width, screen);
        layout
    }

    /// Bounds of `id` in screen coordinates
    pub fn rect(&self, id: NodeId) -> Option<Rectangle> {
        self.rects.get(&id).copied()
    }

    /// Area of the screen `id` may paint into
    pub fn clip(&self, id: NodeId) -> Option<Rectangle> {
        self.clips.get(&id).copied()
    }

    /// Visible nodes, parents before children
    pub fn paint_order(&self) -> &[NodeId] {
        &self.order
    }

    fn place(&mut self, scene: &Scene, id: NodeId, origin: Point, avail_w: u32, clip: Rectangle) {
        let Some(node) = scene.node(id) else {
            return;
        };
        let props = node.props();
        if props.hidden {
            return;
        }

        let size = measure(scene, id, avail_w);
        let rect = Rectangle::new(origin, size);
        self.rects.insert(id, rect);
        self.clips.insert(id, clip);
        self.order.push(id);

        let inner_clip = clip.intersection(&rect);
        let pad = props.padding as i32;
        let inner_w = size.width.saturating_sub(props.padding * 2);
        let children = visible_children(scene, id);

        match props.flow {
            Flow::Column => {
                let mut y = origin.y + pad - node.scroll_y();
                for child in children {
                    let child_size = measure(scene, child, inner_w);
                    let dx = align_offset(props, inner_w, child_size.width);
                    let at = Point::new(origin.x + pad + dx, y);
                    self.place(scene, child, at, inner_w, inner_clip);
                    y += child_size.height as i32 + props.row_gap as i32;
                }
            }
            Flow::Row => {
                let sizes = row_sizes(scene, &children, inner_w, props.row_gap);
                let total: u32 = sizes.iter().map(|s| s.width).sum::<u32>()
                    + props.row_gap * (sizes.len().saturating_sub(1) as u32);

                let mut x = origin.x + pad + align_offset(props, inner_w, total);
                let mut remaining = inner_w;
                for (child, child_size) in children.into_iter().zip(sizes) {
                    let at = Point::new(x, origin.y + pad - node.scroll_y());
                    self.place(scene, child, at, remaining, inner_clip);
                    x += (child_size.width + props.row_gap) as i32;
                    remaining = remaining.saturating_sub(child_size.width + props.row_gap);
                }
            }
        }
    }
}

/// Horizontal offset of a child inside its parent's content box
fn align_offset(parent: &NodeProps, inner_w: u32, child_w: u32) -> i32 {
    let slack = inner_w.saturating_sub(child_w) as i32;
    match (parent.text_align, parent.base_dir) {
        (TextAlign::Center, _) => slack / 2,
        (_, BaseDir::Rtl) => slack,
        _ => 0,
    }
}

fn visible_children(scene: &Scene, id: NodeId) -> Vec<NodeId> {
    scene
        .node(id)
        .map(|node| {
            node.children()
                .iter()
                .copied()
                .filter(|&child| scene.node(child).is_some_and(|c| !c.props().hidden))
                .collect()
        })
        .unwrap_or_default()
}

fn row_sizes(scene: &Scene, children: &[NodeId], inner_w: u32, gap: u32) -> Vec<Size> {
    let mut remaining = inner_w;
    children
        .iter()
        .map(|&child| {
            let size = measure(scene, child, remaining);
            remaining = remaining.saturating_sub(size.width + gap);
            size
        })
        .collect()
}

/// Advance and line height of a mono font
pub(super) fn char_metrics(font: &MonoFont<'_>) -> (u32, u32) {
    (
        font.character_size.width + font.character_spacing,
        font.character_size.height,
    )
}

/// Split `text` into lines of at most `per_line` characters, breaking at
/// newlines and codepoint boundaries.
pub(super) fn wrap_lines(text: &str, per_line: usize) -> Vec<&str> {
    let per_line = per_line.max(1);
    let mut lines = Vec::new();

    for mut rest in text.split('\n') {
        loop {
            let cut = byte_offset_of_char(rest, per_line);
            lines.push(&rest[..cut]);
            rest = &rest[cut..];
            if rest.is_empty() {
                break;
            }
        }
    }
    lines
}

/// Outer size of `id` when offered `avail_w` pixels of width
pub(super) fn measure(scene: &Scene, id: NodeId, avail_w: u32) -> Size {
    let Some(node) = scene.node(id) else {
        return Size::zero();
    };
    let props = node.props();
    let pad = props.padding * 2;

    let width = match props.width {
        Dimension::Fill => avail_w,
        Dimension::Px(w) => w,
        Dimension::Content => {
            (content_width(scene, id, avail_w.saturating_sub(pad)) + pad).min(avail_w)
        }
    };
    let inner_w = width.saturating_sub(pad);

    let height = match props.height {
        Dimension::Px(h) => h,
        Dimension::Fill | Dimension::Content => content_height(scene, id, inner_w) + pad,
    };

    Size::new(width, height)
}

fn content_width(scene: &Scene, id: NodeId, avail_w: u32) -> u32 {
    let Some(node) = scene.node(id) else {
        return 0;
    };
    let props = node.props();

    match node.kind() {
        NodeKind::Label => {
            let (advance, _) = char_metrics(props.font.font());
            let widest = props
                .text
                .as_deref()
                .map(|text| {
                    text.split('\n')
                        .map(|line| char_count(line.as_bytes()))
                        .max()
                        .unwrap_or(0)
                })
                .unwrap_or(0);
            (widest as u32 * advance).min(avail_w)
        }
        NodeKind::Image => props.image.map_or(0, |image| image.size.width),
        NodeKind::Container | NodeKind::Button => {
            let children = visible_children(scene, id);
            match props.flow {
                Flow::Column => children
                    .iter()
                    .map(|&child| measure(scene, child, avail_w).width)
                    .max()
                    .unwrap_or(0),
                Flow::Row => {
                    let sizes = row_sizes(scene, &children, avail_w, props.row_gap);
                    sizes.iter().map(|s| s.width).sum::<u32>()
                        + props.row_gap * (sizes.len().saturating_sub(1) as u32)
                }
            }
        }
    }
}

fn content_height(scene: &Scene, id: NodeId, inner_w: u32) -> u32 {
    let Some(node) = scene.node(id) else {
        return 0;
    };
    let props = node.props();

    match node.kind() {
        NodeKind::Label => {
            let (advance, line_height) = char_metrics(props.font.font());
            let per_line = (inner_w / advance.max(1)) as usize;
            let lines = props
                .text
                .as_deref()
                .map_or(0, |text| wrap_lines(text, per_line).len());
            lines as u32 * line_height
        }
        NodeKind::Image => props.image.map_or(0, |image| image.size.height),
        NodeKind::Container | NodeKind::Button => {
            let children = visible_children(scene, id);
            match props.flow {
                Flow::Column => {
                    let heights: u32 = children
                        .iter()
                        .map(|&child| measure(scene, child, inner_w).height)
                        .sum();
                    heights + props.row_gap * (children.len().saturating_sub(1) as u32)
                }
                Flow::Row => row_sizes(scene, &children, inner_w, props.row_gap)
                    .iter()
                    .map(|s| s.height)
                    .max()
                    .unwrap_or(0),
            }
        }
    }
}
