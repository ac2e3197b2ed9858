// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen transition frame planning.
//!
//! A transition between two screens is drawn in one of two ways, chosen per
//! frame from the number of off-screen buffers the host provides:
//!
//! - **Textured** (two or more buffers): both screens are rendered once into
//!   buffers 0 and 1 when the transition starts; every frame then only blits
//!   the buffers at an offset, or cross-fades them.
//! - **Direct** (fewer than two buffers): both screen trees are redrawn each
//!   frame at their pixel offsets. A fade cannot be expressed this way and
//!   degrades to the linear slide of the screen group's layout.

use kurbo::{Size, Vec2};

use crate::screen::ScreenTransition;
use crate::tree::{Layout, NodeId};

/// Visual effect of a screen transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Slide along the x axis.
    #[default]
    LinearHorizontal,
    /// Slide along the y axis.
    LinearVertical,
    /// Cross-fade.
    Fade,
}

/// A screen tree drawn directly at an offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Root of the screen tree.
    pub node: NodeId,
    /// Offset from the screen origin, in pixels.
    pub offset: Vec2,
}

/// One off-screen buffer composited onto the display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BufferLayer {
    /// Buffer index.
    pub buffer: usize,
    /// Screen rendered into the buffer.
    pub node: NodeId,
    /// Blit offset, in pixels.
    pub offset: Vec2,
    /// Blit opacity in `[0, 1]`.
    pub opacity: f32,
}

/// How to draw one frame of a screen transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionFrame {
    /// Composite pre-rendered buffers; the outgoing screen comes first.
    Textured {
        /// Layers in blit order.
        layers: [BufferLayer; 2],
    },
    /// Redraw both screen trees; the outgoing screen comes first.
    Direct {
        /// Passes in draw order.
        passes: [Placement; 2],
    },
}

/// The host's pool of off-screen animation buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationBuffers {
    count: usize,
}

impl AnimationBuffers {
    /// Creates a pool of `count` buffers.
    #[must_use]
    pub const fn new(count: usize) -> Self {
        Self { count }
    }

    /// Returns the number of buffers.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Returns whether transitions are composited from buffers.
    #[must_use]
    pub const fn is_textured(&self) -> bool {
        self.count >= 2
    }

    /// Plans one frame of `transition` at the given progress.
    #[must_use]
    pub fn plan(
        &self,
        transition: &ScreenTransition,
        progress: f32,
        resolution: Size,
    ) -> TransitionFrame {
        let p = progress.clamp(0.0, 1.0);
        let ScreenTransition { from, to, .. } = *transition;

        if self.is_textured() && transition.effect == Effect::Fade {
            return TransitionFrame::Textured {
                layers: [
                    BufferLayer {
                        buffer: 0,
                        node: from,
                        offset: Vec2::ZERO,
                        opacity: 1.0 - p,
                    },
                    BufferLayer {
                        buffer: 1,
                        node: to,
                        offset: Vec2::ZERO,
                        opacity: p,
                    },
                ],
            };
        }

        let (from_offset, to_offset) = slide_offsets(transition, p, resolution);
        if self.is_textured() {
            TransitionFrame::Textured {
                layers: [
                    BufferLayer {
                        buffer: 0,
                        node: from,
                        offset: from_offset,
                        opacity: 1.0,
                    },
                    BufferLayer {
                        buffer: 1,
                        node: to,
                        offset: to_offset,
                        opacity: 1.0,
                    },
                ],
            }
        } else {
            TransitionFrame::Direct {
                passes: [
                    Placement {
                        node: from,
                        offset: from_offset,
                    },
                    Placement {
                        node: to,
                        offset: to_offset,
                    },
                ],
            }
        }
    }
}

/// Offsets of the outgoing and incoming screens for a slide.
///
/// The screen on the left (or top) sits at `-factor * extent` and the other
/// one follows at `(1 - factor) * extent`, where `factor` is the progress
/// when moving right and its complement otherwise.
fn slide_offsets(transition: &ScreenTransition, p: f32, resolution: Size) -> (Vec2, Vec2) {
    let layout = match transition.effect {
        Effect::LinearHorizontal => Layout::Horizontal,
        Effect::LinearVertical => Layout::Vertical,
        Effect::Fade => transition.layout,
    };
    let extent = layout.extent(resolution);
    let factor = f64::from(if transition.go_right { p } else { 1.0 - p });
    let leading = layout.vec(-factor * extent);
    let trailing = layout.vec((1.0 - factor) * extent);
    if transition.go_right {
        (leading, trailing)
    } else {
        (trailing, leading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RES: Size = Size::new(400.0, 200.0);

    fn transition(effect: Effect, go_right: bool, layout: Layout) -> ScreenTransition {
        ScreenTransition {
            from: NodeId(0),
            to: NodeId(1),
            go_right,
            effect,
            layout,
        }
    }

    fn direct(frame: TransitionFrame) -> [Placement; 2] {
        match frame {
            TransitionFrame::Direct { passes } => passes,
            TransitionFrame::Textured { .. } => panic!("expected a direct frame"),
        }
    }

    #[test]
    fn slide_right_moves_destination_in_from_the_right() {
        let t = transition(Effect::LinearHorizontal, true, Layout::Horizontal);
        let buffers = AnimationBuffers::new(0);

        let [from, to] = direct(buffers.plan(&t, 0.0, RES));
        assert_eq!((from.offset, to.offset), (Vec2::ZERO, Vec2::new(400.0, 0.0)));

        let [from, to] = direct(buffers.plan(&t, 0.25, RES));
        assert_eq!((from.offset, to.offset), (Vec2::new(-100.0, 0.0), Vec2::new(300.0, 0.0)));

        let [from, to] = direct(buffers.plan(&t, 1.0, RES));
        assert_eq!((from.offset, to.offset), (Vec2::new(-400.0, 0.0), Vec2::ZERO));
    }

    #[test]
    fn slide_left_moves_destination_in_from_the_left() {
        let t = transition(Effect::LinearHorizontal, false, Layout::Horizontal);
        let [from, to] = direct(AnimationBuffers::new(1).plan(&t, 0.25, RES));
        assert_eq!(from.offset, Vec2::new(100.0, 0.0));
        assert_eq!(to.offset, Vec2::new(-300.0, 0.0));
    }

    #[test]
    fn vertical_slide_uses_height() {
        let t = transition(Effect::LinearVertical, true, Layout::Horizontal);
        let [from, to] = direct(AnimationBuffers::new(0).plan(&t, 0.5, RES));
        assert_eq!(from.offset, Vec2::new(0.0, -100.0));
        assert_eq!(to.offset, Vec2::new(0.0, 100.0));
    }

    #[test]
    fn fade_with_buffers_cross_fades() {
        let t = transition(Effect::Fade, true, Layout::Horizontal);
        let frame = AnimationBuffers::new(2).plan(&t, 0.25, RES);
        let TransitionFrame::Textured { layers } = frame else {
            panic!("expected a textured frame");
        };
        assert_eq!((layers[0].buffer, layers[0].opacity), (0, 0.75));
        assert_eq!((layers[1].buffer, layers[1].opacity), (1, 0.25));
        assert_eq!(layers[1].offset, Vec2::ZERO);
    }

    #[test]
    fn fade_without_buffers_slides_along_group_layout() {
        let t = transition(Effect::Fade, true, Layout::Vertical);
        let [from, to] = direct(AnimationBuffers::new(0).plan(&t, 0.5, RES));
        assert_eq!(from.offset, Vec2::new(0.0, -100.0));
        assert_eq!(to.offset, Vec2::new(0.0, 100.0));
    }

    #[test]
    fn textured_slide_keeps_full_opacity() {
        let t = transition(Effect::LinearHorizontal, true, Layout::Horizontal);
        let TransitionFrame::Textured { layers } = AnimationBuffers::new(3).plan(&t, 0.5, RES)
        else {
            panic!("expected a textured frame");
        };
        assert_eq!(layers[0].offset, Vec2::new(-200.0, 0.0));
        assert_eq!(layers[1].offset, Vec2::new(200.0, 0.0));
        assert!(layers.iter().all(|l| l.opacity == 1.0), "no fade");
    }
}
