// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The draw pass.
//!
//! The core never touches pixels. Once per frame the host calls
//! [`Engine::draw`] with its [`Painter`]; the engine drains the scene tree's
//! dirty channels into a damage region, walks the visible trees depth-first
//! and, for every node that intersects the damage, sets the clip and invokes
//! the node's draw function (or [`Painter::draw_item`] when it has none).
//!
//! # Damage
//!
//! In [`Screen`](DisplayMode::Screen) mode the damage region is the union of
//! the absolute rectangles of the dirty nodes of the current screen. The
//! whole display is redrawn instead when the display mode changed since the
//! previous frame, when a redraw was forced, during screen transitions and
//! while a popup is shown.
//!
//! # Clipping
//!
//! A node is clipped to the intersection of its own rectangle, the
//! rectangles of all its ancestors and the damage region. Subtrees whose
//! clip is empty are skipped, and so are hidden subtrees.

use alloc::boxed::Box;

use kurbo::{Point, Rect, Vec2};

use crate::anim_buffer::TransitionFrame;
use crate::engine::Engine;
use crate::screen::DisplayMode;
use crate::trace::FrameEvent;
use crate::tree::{GraphicsItem, NodeFlags, NodeId, SceneTree};

/// Host drawing capability.
///
/// All rectangles are in display coordinates.
pub trait Painter {
    /// Restricts subsequent drawing to `clip`.
    fn set_clip(&mut self, clip: Rect);

    /// Fills `area` with the background.
    fn clear(&mut self, area: Rect);

    /// Draws a node that has no draw function of its own.
    fn draw_item(&mut self, node: NodeId, item: &GraphicsItem, flags: NodeFlags, rect: Rect) {
        _ = (node, item, flags, rect);
    }

    /// Redirects drawing into off-screen buffer `buffer`.
    fn begin_buffer(&mut self, buffer: usize) {
        _ = buffer;
    }

    /// Ends drawing into the current off-screen buffer.
    fn end_buffer(&mut self) {}

    /// Composites off-screen buffer `buffer` onto the display.
    fn blit_buffer(&mut self, buffer: usize, offset: Vec2, opacity: f32) {
        _ = (buffer, offset, opacity);
    }
}

/// Per-node draw function, called with the node's item, flags and absolute
/// rectangle after the clip has been set.
pub type DrawFn = Box<dyn Fn(&mut dyn Painter, &GraphicsItem, NodeFlags, Rect)>;

/// Summary of one draw pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStats {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Display mode of the frame.
    pub mode: DisplayMode,
    /// Bounding box of the redrawn region, or `None` if nothing was drawn.
    pub damage: Option<Rect>,
    /// Number of nodes whose draw function ran.
    pub nodes_drawn: u32,
}

/// Frame-to-frame draw bookkeeping.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Display {
    frame_index: u64,
    last_mode: Option<DisplayMode>,
    full: bool,
    clear: bool,
    buffers_ready: bool,
}

impl Display {
    /// The next frame redraws the whole display.
    pub(crate) fn request_full(&mut self) {
        self.full = true;
    }

    /// The next frame clears the whole display before drawing.
    pub(crate) fn request_clear(&mut self) {
        self.clear = true;
        self.full = true;
    }

    /// The animation buffers must be rendered again.
    pub(crate) fn invalidate_buffers(&mut self) {
        self.buffers_ready = false;
    }

    pub(crate) fn is_pending(&self, mode: DisplayMode) -> bool {
        self.full || self.last_mode != Some(mode)
    }
}

/// Recursive draw walk.
struct Walker<'a> {
    tree: &'a SceneTree,
    painter: &'a mut dyn Painter,
    drawn: u32,
}

impl Walker<'_> {
    /// Draws `node` and its subtree. `origin` is the absolute origin of the
    /// node's parent content.
    fn walk(&mut self, node: NodeId, origin: Point, clip: Rect) {
        let tree = self.tree;
        let i = node.index() as usize;
        let flags = tree.flags[i];
        if flags.contains(NodeFlags::HIDDEN) {
            return;
        }
        let rect = tree.rect[i] + origin.to_vec2();
        let own = clip.intersect(rect);
        if own.is_zero_area() {
            return;
        }

        self.painter.set_clip(own);
        let item = &tree.item[i];
        match &tree.draw[i] {
            Some(draw) => draw(&mut *self.painter, item, flags, rect),
            None => self.painter.draw_item(node, item, flags, rect),
        }
        self.drawn += 1;

        let child_origin = rect.origin() + item.content_offset();
        for child in tree.children(node) {
            self.walk(child, child_origin, own);
        }
    }
}

impl Engine {
    /// Returns whether [`draw`](Self::draw) would draw anything.
    #[must_use]
    pub fn needs_update(&self) -> bool {
        self.tree.has_damage() || self.display.is_pending(self.screens.mode)
    }

    /// Draws one frame through `painter`.
    pub fn draw(&mut self, painter: &mut dyn Painter) -> FrameStats {
        let mode = self.screens.mode;
        let screen = Rect::from_origin_size(Point::ORIGIN, self.config.resolution);
        let damaged = self.tree.take_damage();
        let vacated = self.tree.take_vacated();
        let full = self.display.is_pending(mode);
        let clear = self.display.clear;
        let current = self.screens.current();

        let mut walker = Walker {
            tree: &self.tree,
            painter,
            drawn: 0,
        };

        let damage = match (mode, self.screens.transition, self.screens.popup) {
            (DisplayMode::ScreenTransition, Some(transition), _) => {
                let progress = self.registry.get(self.screen_transition).progress();
                let frame = self
                    .buffers
                    .plan(&transition, progress, self.config.resolution);
                match frame {
                    TransitionFrame::Textured { layers } => {
                        if !self.display.buffers_ready {
                            for layer in &layers {
                                walker.painter.begin_buffer(layer.buffer);
                                walker.painter.set_clip(screen);
                                walker.painter.clear(screen);
                                walker.walk(layer.node, Point::ORIGIN, screen);
                                walker.painter.end_buffer();
                            }
                            self.display.buffers_ready = true;
                        }
                        walker.painter.set_clip(screen);
                        walker.painter.clear(screen);
                        for layer in &layers {
                            walker
                                .painter
                                .blit_buffer(layer.buffer, layer.offset, layer.opacity);
                        }
                    }
                    TransitionFrame::Direct { passes } => {
                        walker.painter.set_clip(screen);
                        walker.painter.clear(screen);
                        for pass in &passes {
                            walker.walk(pass.node, pass.offset.to_point(), screen);
                        }
                    }
                }
                Some(screen)
            }
            (DisplayMode::Popup, _, Some(popup)) => {
                if full || !damaged.is_empty() {
                    if clear {
                        walker.painter.set_clip(screen);
                        walker.painter.clear(screen);
                    }
                    walker.walk(current, Point::ORIGIN, screen);
                    walker.walk(popup.node, popup.offset.to_point(), screen);
                    Some(screen)
                } else {
                    None
                }
            }
            _ => {
                let region = if full {
                    Some(screen)
                } else {
                    let moved = vacated
                        .iter()
                        .filter(|&&(n, _)| self.tree.is_within(n, current))
                        .map(|&(_, area)| area);
                    damaged
                        .iter()
                        .filter_map(|&raw| NodeId::from_raw(raw))
                        .filter(|&n| self.tree.is_within(n, current))
                        .map(|n| self.tree.absolute_rect(n))
                        .chain(moved)
                        .reduce(|a, b| a.union(b))
                        .map(|r| r.intersect(screen))
                        .filter(|r| !r.is_zero_area())
                };
                if let Some(region) = region {
                    if clear {
                        walker.painter.set_clip(region);
                        walker.painter.clear(region);
                    }
                    walker.walk(current, Point::ORIGIN, region);
                }
                region
            }
        };

        let stats = FrameStats {
            frame_index: self.display.frame_index,
            mode,
            damage,
            nodes_drawn: walker.drawn,
        };
        self.display.frame_index += 1;
        self.display.last_mode = Some(mode);
        self.display.full = false;
        self.display.clear = false;

        let time = self.clock.now();
        self.tracer.frame(&FrameEvent {
            frame_index: stats.frame_index,
            mode,
            damage,
            nodes_drawn: stats.nodes_drawn,
            time,
        });
        stats
    }
}
