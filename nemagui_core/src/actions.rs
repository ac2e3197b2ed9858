// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Callback context and built-in event actions.
//!
//! Event actions and gesture handlers receive an [`ActionCtx`]. It gives
//! direct mutable access to the scene tree; anything that affects engine
//! state beyond the tree (switching screens, popups, driving other events)
//! is queued as a [`Request`] and applied by the engine once the current
//! dispatch has finished.

use alloc::vec::Vec;

use crate::anim_buffer::Effect;
use crate::event::{EventId, Firing, RunFlags, Trigger};
use crate::tree::{NodeId, SceneTree};

/// A deferred engine operation queued by a callback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Request {
    /// Start a timed transition to another screen.
    ShowScreen {
        /// Destination screen.
        target: NodeId,
        /// Visual effect.
        effect: Effect,
        /// Whether the destination enters from the right (or bottom).
        go_right: bool,
    },
    /// Switch to a screen immediately.
    SetCurrentScreen(NodeId),
    /// Show a popup over the current screen.
    ShowPopup(NodeId),
    /// Dismiss the popup.
    ClosePopup,
    /// Deliver a trigger to an event.
    Trigger {
        /// Target event.
        event: EventId,
        /// Trigger to deliver.
        trigger: Trigger,
    },
    /// Stop an event.
    Stop {
        /// Target event.
        event: EventId,
        /// Jump to the terminal value first.
        force_finish: bool,
    },
}

/// Context passed to event actions and gesture handlers.
#[derive(Debug)]
pub struct ActionCtx<'a> {
    tree: &'a mut SceneTree,
    requests: &'a mut Vec<Request>,
    now: f64,
    source: NodeId,
    event: Option<EventId>,
}

impl<'a> ActionCtx<'a> {
    pub(crate) fn new(
        tree: &'a mut SceneTree,
        requests: &'a mut Vec<Request>,
        now: f64,
        source: NodeId,
        event: Option<EventId>,
    ) -> Self {
        Self {
            tree,
            requests,
            now,
            source,
            event,
        }
    }

    /// Returns the scene tree.
    #[must_use]
    pub fn tree(&self) -> &SceneTree {
        &*self.tree
    }

    /// Returns the scene tree for mutation.
    pub fn tree_mut(&mut self) -> &mut SceneTree {
        &mut *self.tree
    }

    /// Returns the wall time of the dispatch, in seconds.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Returns the node the event or gesture belongs to.
    #[must_use]
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Returns the event being fired, or `None` inside a gesture handler.
    #[must_use]
    pub fn event(&self) -> Option<EventId> {
        self.event
    }

    /// Queues a request.
    pub fn request(&mut self, request: Request) {
        self.requests.push(request);
    }

    /// Queues a timed transition to `target`.
    pub fn show_screen(&mut self, target: NodeId, effect: Effect, go_right: bool) {
        self.request(Request::ShowScreen {
            target,
            effect,
            go_right,
        });
    }

    /// Queues a popup.
    pub fn show_popup(&mut self, popup: NodeId) {
        self.request(Request::ShowPopup(popup));
    }

    /// Queues dismissal of the popup.
    pub fn close_popup(&mut self) {
        self.request(Request::ClosePopup);
    }

    /// Queues a trigger for another event.
    pub fn trigger(&mut self, event: EventId, trigger: Trigger) {
        self.request(Request::Trigger { event, trigger });
    }

    /// Queues stopping another event.
    pub fn stop(&mut self, event: EventId, force_finish: bool) {
        self.request(Request::Stop {
            event,
            force_finish,
        });
    }
}

/// Starts a transition to `target` when the event starts.
pub fn show_screen(
    target: NodeId,
    effect: Effect,
    go_right: bool,
) -> impl FnMut(&mut ActionCtx<'_>, &Firing) + 'static {
    move |ctx, firing| {
        if firing.flags.contains(RunFlags::FIRST_RUN) {
            ctx.show_screen(target, effect, go_right);
        }
    }
}

/// Shows `popup` when the event starts.
pub fn show_popup(popup: NodeId) -> impl FnMut(&mut ActionCtx<'_>, &Firing) + 'static {
    move |ctx, firing| {
        if firing.flags.contains(RunFlags::FIRST_RUN) {
            ctx.show_popup(popup);
        }
    }
}

/// Closes the popup when the event starts.
pub fn close_popup() -> impl FnMut(&mut ActionCtx<'_>, &Firing) + 'static {
    |ctx, firing| {
        if firing.flags.contains(RunFlags::FIRST_RUN) {
            ctx.close_popup();
        }
    }
}

/// Drives the opacity of an image or rectangle node with the event's
/// progress, hiding it while fully transparent.
pub fn fade_node(node: NodeId) -> impl FnMut(&mut ActionCtx<'_>, &Firing) + 'static {
    move |ctx, firing| {
        let tree = ctx.tree_mut();
        let _ = tree.set_value(node, firing.progress);
        tree.set_hidden(node, firing.progress <= 0.0);
    }
}

/// Drives the value of a gauge, needle, slider or progress bar with the
/// event's progress.
pub fn set_value(node: NodeId) -> impl FnMut(&mut ActionCtx<'_>, &Firing) + 'static {
    move |ctx, firing| {
        let _ = ctx.tree_mut().set_value(node, firing.progress);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::Rect;

    use super::*;
    use crate::tree::{GraphicsItem, NodeFlags};

    #[test]
    fn show_screen_requests_only_on_first_run() {
        let mut tree = SceneTree::new();
        let target = tree.create_node(Rect::ZERO, GraphicsItem::Screen, NodeFlags::empty());
        let mut requests = Vec::new();
        let mut action = show_screen(target, Effect::LinearHorizontal, true);

        let mut ctx = ActionCtx::new(&mut tree, &mut requests, 0.0, target, None);
        action(&mut ctx, &Firing { progress: 0.0, flags: RunFlags::FIRST_RUN });
        action(&mut ctx, &Firing { progress: 0.5, flags: RunFlags::empty() });
        action(&mut ctx, &Firing { progress: 1.0, flags: RunFlags::LAST_RUN });

        assert_eq!(
            requests,
            vec![Request::ShowScreen { target, effect: Effect::LinearHorizontal, go_right: true }]
        );
    }

    #[test]
    fn fade_node_hides_at_zero() {
        let mut tree = SceneTree::new();
        let img = tree.create_node(Rect::ZERO, GraphicsItem::Image { opacity: 1.0 }, NodeFlags::empty());
        let mut requests = Vec::new();
        let mut action = fade_node(img);
        {
            let mut ctx = ActionCtx::new(&mut tree, &mut requests, 0.0, img, None);
            action(&mut ctx, &Firing { progress: 0.25, flags: RunFlags::empty() });
        }
        assert_eq!(tree.item(img).value(), Some(0.25));
        assert!(tree.is_visible(img));
        {
            let mut ctx = ActionCtx::new(&mut tree, &mut requests, 0.0, img, None);
            action(&mut ctx, &Firing { progress: 0.0, flags: RunFlags::LAST_RUN });
        }
        assert!(!tree.is_visible(img));
    }
}
