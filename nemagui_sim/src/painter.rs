// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A painter that records draw calls.

use kurbo::{Rect, Vec2};
use nemagui_core::display::Painter;
use nemagui_core::tree::{GraphicsItem, ItemKind, NodeFlags, NodeId};

/// One recorded draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaintOp {
    /// [`Painter::set_clip`].
    SetClip(Rect),
    /// [`Painter::clear`].
    Clear(Rect),
    /// [`Painter::draw_item`].
    Item {
        /// The node drawn.
        node: NodeId,
        /// Its item kind.
        kind: ItemKind,
        /// Its absolute rectangle.
        rect: Rect,
    },
    /// [`Painter::begin_buffer`].
    BeginBuffer(usize),
    /// [`Painter::end_buffer`].
    EndBuffer,
    /// [`Painter::blit_buffer`].
    Blit {
        /// Buffer index.
        buffer: usize,
        /// Blit offset.
        offset: Vec2,
        /// Blit opacity.
        opacity: f32,
    },
}

/// A [`Painter`] that appends every call to a list.
#[derive(Clone, Debug, Default)]
pub struct RecordingPainter {
    ops: Vec<PaintOp>,
}

impl RecordingPainter {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the calls recorded so far.
    #[must_use]
    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    /// Returns and forgets the calls recorded so far.
    pub fn take(&mut self) -> Vec<PaintOp> {
        core::mem::take(&mut self.ops)
    }

    /// Returns the nodes drawn, in draw order.
    #[must_use]
    pub fn drawn_nodes(&self) -> Vec<NodeId> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::Item { node, .. } => Some(*node),
                _ => None,
            })
            .collect()
    }

    /// Returns the absolute rectangle `node` was last drawn at.
    #[must_use]
    pub fn last_rect(&self, node: NodeId) -> Option<Rect> {
        self.ops.iter().rev().find_map(|op| match op {
            PaintOp::Item { node: n, rect, .. } if *n == node => Some(*rect),
            _ => None,
        })
    }
}

impl Painter for RecordingPainter {
    fn set_clip(&mut self, clip: Rect) {
        self.ops.push(PaintOp::SetClip(clip));
    }

    fn clear(&mut self, area: Rect) {
        self.ops.push(PaintOp::Clear(area));
    }

    fn draw_item(&mut self, node: NodeId, item: &GraphicsItem, _flags: NodeFlags, rect: Rect) {
        self.ops.push(PaintOp::Item {
            node,
            kind: item.kind(),
            rect,
        });
    }

    fn begin_buffer(&mut self, buffer: usize) {
        self.ops.push(PaintOp::BeginBuffer(buffer));
    }

    fn end_buffer(&mut self) {
        self.ops.push(PaintOp::EndBuffer);
    }

    fn blit_buffer(&mut self, buffer: usize, offset: Vec2, opacity: f32) {
        self.ops.push(PaintOp::Blit {
            buffer,
            offset,
            opacity,
        });
    }
}
