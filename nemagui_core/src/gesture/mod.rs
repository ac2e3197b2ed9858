// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture dispatch: routing press, swipe and release samples to nodes.
//!
//! The host feeds discrete pointer samples into
//! [`Engine::press`](crate::engine::Engine::press),
//! [`Engine::swipe`](crate::engine::Engine::swipe) and
//! [`Engine::release`](crate::engine::Engine::release). Between a press and
//! its release the dispatcher remembers the pressed node, the offset
//! travelled so far and a smoothed swipe velocity.
//!
//! For each gesture the target node sees, in order: its built-in widget
//! behaviour (slider, checkbox, window scrolling, ...), its gesture handler,
//! and finally the matching [`Trigger`](crate::event::Trigger) on its event
//! list.
//!
//! # Swipe margin
//!
//! A press becomes a swipe only once the pointer has travelled further than
//! [`EngineConfig::swipe_margin`](crate::config::EngineConfig::swipe_margin)
//! from the press point. On nodes with
//! [`DRAG`](crate::tree::NodeFlags::DRAG) the margin is zero. A swipe on a
//! node without `DRAG` aborts the press instead.
//!
//! # Screen swipes
//!
//! Swiping on the background of the current screen drags the screen
//! transition event by hand: the transition is started and paused, and every
//! swipe sample moves its progress by the distance travelled as a fraction of
//! the screen. On release the transition resumes, towards the neighbouring
//! screen or back to the original one when released before
//! [`EngineConfig::abort_threshold`](crate::config::EngineConfig::abort_threshold).

mod dispatch;
mod velocity;

use alloc::boxed::Box;
use core::fmt;

use kurbo::{Point, Vec2};

use crate::actions::ActionCtx;
use crate::tree::NodeId;

pub(crate) use velocity::SwipeVelocity;

/// Callback attached to a node for one kind of gesture.
pub type GestureHandler = Box<dyn FnMut(&mut ActionCtx<'_>, &GestureInfo)>;

/// What a gesture handler is told about the gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureInfo {
    /// Node the gesture is routed to.
    pub node: NodeId,
    /// Pointer position relative to the node's top-left corner.
    pub local: Point,
    /// Movement since the previous sample; zero for press and release.
    pub delta: Vec2,
}

/// Which gesture handler slot of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum HandlerKind {
    Press,
    Release,
    Swipe,
    Abort,
}

/// The optional gesture handlers of one node.
#[derive(Default)]
pub struct Handlers {
    /// Called when the node is pressed.
    pub press: Option<GestureHandler>,
    /// Called when the node is released.
    pub release: Option<GestureHandler>,
    /// Called for every swipe sample routed to the node.
    pub swipe: Option<GestureHandler>,
    /// Called when a swipe disqualifies a press on the node.
    pub abort: Option<GestureHandler>,
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("press", &self.press.is_some())
            .field("release", &self.release.is_some())
            .field("swipe", &self.swipe.is_some())
            .field("abort", &self.abort.is_some())
            .finish()
    }
}

impl Handlers {
    pub(crate) fn slot(&mut self, kind: HandlerKind) -> &mut Option<GestureHandler> {
        match kind {
            HandlerKind::Press => &mut self.press,
            HandlerKind::Release => &mut self.release,
            HandlerKind::Swipe => &mut self.swipe,
            HandlerKind::Abort => &mut self.abort,
        }
    }
}

/// Dispatcher state carried from a press to its release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct GestureState {
    /// Node that owns the current gesture.
    pub(crate) pressed: Option<NodeId>,
    /// Pointer travel since the press.
    pub(crate) offset: Vec2,
    /// The swipe margin has been exceeded.
    pub(crate) swiping: bool,
    /// The screen transition follows the pointer.
    pub(crate) grabbed: bool,
    pub(crate) velocity: SwipeVelocity,
}

impl GestureState {
    pub(crate) const fn new(velocity_alpha: f32) -> Self {
        Self {
            pressed: None,
            offset: Vec2::ZERO,
            swiping: false,
            grabbed: false,
            velocity: SwipeVelocity::new(velocity_alpha),
        }
    }

    /// Forgets the current gesture.
    pub(crate) fn clear(&mut self) {
        self.pressed = None;
        self.offset = Vec2::ZERO;
        self.swiping = false;
        self.grabbed = false;
        self.velocity.reset();
    }
}
