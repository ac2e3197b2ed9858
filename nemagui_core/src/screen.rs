// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screens, popups and the screen transition state machine.
//!
//! The display is always in one of three [`DisplayMode`]s:
//!
//! - [`Screen`](DisplayMode::Screen): the current screen is shown.
//! - [`ScreenTransition`](DisplayMode::ScreenTransition): the screen
//!   transition event is moving from the current screen to another one.
//! - [`Popup`](DisplayMode::Popup): a popup tree is drawn centred over the
//!   current screen; a release outside of it dismisses it.
//!
//! Screens are organised in [`ScreenGroup`]s. Swiping on the background of a
//! screen moves to its neighbour in the group; [`Engine::show_screen`] can
//! move to any screen of any group.
//!
//! One [`Transition`](crate::event::Transition) event with the
//! [`ScreenTransition`](crate::event::Role::ScreenTransition) role drives
//! every screen change. When it settles at 1 the destination becomes the
//! current screen; when it settles back at 0 the change is abandoned.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size, Vec2};

use crate::anim_buffer::Effect;
use crate::engine::Engine;
use crate::event::{EventKind, Status, Trigger};
use crate::tree::{Hit, Layout, NodeFlags, NodeId, SceneTree};
use crate::trace::{DisplayModeEvent, ScreenChangeEvent};

/// What the display is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    /// The current screen.
    #[default]
    Screen,
    /// A transition between two screens.
    ScreenTransition,
    /// A popup over the current screen.
    Popup,
}

/// Screens that can be swiped between, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScreenGroup {
    /// Swipe axis.
    pub layout: Layout,
    /// Root nodes of the screens, first to last.
    pub screens: Vec<NodeId>,
}

impl ScreenGroup {
    /// Creates a group.
    #[must_use]
    pub fn new(layout: Layout, screens: Vec<NodeId>) -> Self {
        Self { layout, screens }
    }
}

/// All screen groups of an application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScreenGroups {
    groups: Vec<ScreenGroup>,
}

impl ScreenGroups {
    /// Collects the groups. The first screen of the first group is shown at
    /// start.
    ///
    /// # Panics
    ///
    /// Panics if there are no groups or a group has no screens.
    #[must_use]
    pub fn new(groups: Vec<ScreenGroup>) -> Self {
        assert!(!groups.is_empty(), "at least one screen group is required");
        assert!(
            groups.iter().all(|g| !g.screens.is_empty()),
            "screen groups must not be empty"
        );
        Self { groups }
    }

    /// A single group.
    #[must_use]
    pub fn single(layout: Layout, screens: Vec<NodeId>) -> Self {
        Self::new(alloc::vec![ScreenGroup::new(layout, screens)])
    }

    /// Returns the groups.
    #[must_use]
    pub fn groups(&self) -> &[ScreenGroup] {
        &self.groups
    }

    /// Returns the group and index of a screen.
    #[must_use]
    pub fn locate(&self, screen: NodeId) -> Option<(usize, usize)> {
        self.groups.iter().enumerate().find_map(|(g, group)| {
            group
                .screens
                .iter()
                .position(|&s| s == screen)
                .map(|i| (g, i))
        })
    }
}

/// A popup being shown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Popup {
    /// Root node of the popup tree.
    pub node: NodeId,
    /// Offset that centres the popup on the display.
    pub offset: Vec2,
}

impl Popup {
    /// Centres `node` on a display of the given resolution.
    #[must_use]
    pub fn centred(tree: &SceneTree, node: NodeId, resolution: Size) -> Self {
        let rect = tree.rect(node);
        let centre = ((resolution.to_vec2() - rect.size().to_vec2()) / 2.0).to_point();
        Self {
            node,
            offset: centre - rect.origin(),
        }
    }

    /// Returns the popup's rectangle on the display.
    #[must_use]
    pub fn bounds(&self, tree: &SceneTree) -> Rect {
        tree.rect(self.node) + self.offset
    }
}

/// A screen change in progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenTransition {
    /// Screen being left.
    pub from: NodeId,
    /// Destination screen.
    pub to: NodeId,
    /// The destination enters from the right (or bottom).
    pub go_right: bool,
    /// Visual effect.
    pub effect: Effect,
    /// Layout of the destination's screen group.
    pub layout: Layout,
}

/// Screen bookkeeping owned by the engine.
#[derive(Clone, Debug)]
pub(crate) struct ScreenState {
    pub(crate) groups: ScreenGroups,
    pub(crate) group: usize,
    pub(crate) index: usize,
    pub(crate) mode: DisplayMode,
    pub(crate) popup: Option<Popup>,
    pub(crate) transition: Option<ScreenTransition>,
}

impl ScreenState {
    pub(crate) fn new(groups: ScreenGroups) -> Self {
        Self {
            groups,
            group: 0,
            index: 0,
            mode: DisplayMode::Screen,
            popup: None,
            transition: None,
        }
    }

    pub(crate) fn current(&self) -> NodeId {
        self.groups.groups[self.group].screens[self.index]
    }

    pub(crate) fn layout(&self) -> Layout {
        self.groups.groups[self.group].layout
    }

    /// Neighbour of the current screen: the next one when `forward`.
    pub(crate) fn neighbour(&self, forward: bool) -> Option<NodeId> {
        let screens = &self.groups.groups[self.group].screens;
        let index = if forward {
            self.index + 1
        } else {
            self.index.checked_sub(1)?
        };
        screens.get(index).copied()
    }
}

impl Engine {
    /// Returns the display mode.
    #[must_use]
    pub fn display_mode(&self) -> DisplayMode {
        self.screens.mode
    }

    /// Switches the display mode and schedules a full redraw.
    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        let from = self.screens.mode;
        if from == mode {
            return;
        }
        self.screens.mode = mode;
        self.display.request_full();
        let time = self.clock.now();
        self.tracer.display_mode(&DisplayModeEvent {
            from,
            to: mode,
            time,
        });
    }

    /// Returns the current screen.
    #[must_use]
    pub fn current_screen(&self) -> NodeId {
        self.screens.current()
    }

    /// Returns the group and index of the current screen.
    #[must_use]
    pub fn current_position(&self) -> (usize, usize) {
        (self.screens.group, self.screens.index)
    }

    /// Returns the screen groups.
    #[must_use]
    pub fn screen_groups(&self) -> &ScreenGroups {
        &self.screens.groups
    }

    /// Returns the popup being shown, if any.
    #[must_use]
    pub fn popup(&self) -> Option<&Popup> {
        self.screens.popup.as_ref()
    }

    /// Returns the screen change in progress, if any.
    #[must_use]
    pub fn screen_transition(&self) -> Option<&ScreenTransition> {
        self.screens.transition.as_ref()
    }

    /// Switches to `screen` immediately and dispatches
    /// [`ScreenEntered`](Trigger::ScreenEntered) on it.
    ///
    /// # Panics
    ///
    /// Panics if `screen` is not in any screen group.
    pub fn set_current_screen(&mut self, screen: NodeId) {
        self.enter_screen(screen);
        self.settle();
    }

    /// Shows `popup` centred over the current screen.
    pub fn set_popup(&mut self, popup: NodeId) {
        self.tree.validate(popup);
        let popup = Popup::centred(&self.tree, popup, self.config.resolution);
        self.screens.popup = Some(popup);
        self.set_display_mode(DisplayMode::Popup);
    }

    /// Dismisses the popup.
    pub fn close_popup(&mut self) {
        self.screens.popup = None;
        if self.screens.mode == DisplayMode::Popup {
            self.set_display_mode(DisplayMode::Screen);
        }
    }

    /// Starts a timed transition from the current screen to `target`.
    ///
    /// Ignored while another screen change is in progress and when `target`
    /// already is the current screen.
    ///
    /// # Panics
    ///
    /// Panics if `target` is not in any screen group.
    pub fn show_screen(&mut self, target: NodeId, effect: Effect, go_right: bool) {
        self.begin_show_screen(target, effect, go_right);
        self.settle();
    }

    /// Finds the node under the point `(x, y)`.
    ///
    /// Without an explicit `root` the search starts at the popup when one is
    /// shown and contains the point, and at the current screen otherwise.
    /// The offset is added to the root's position.
    #[must_use]
    pub fn find_node_under_cursor(
        &self,
        root: Option<NodeId>,
        required: NodeFlags,
        x: f64,
        y: f64,
        x_offset: f64,
        y_offset: f64,
    ) -> Option<Hit> {
        let point = Point::new(x, y);
        let offset = Vec2::new(x_offset, y_offset);
        if let Some(root) = root {
            return self.tree.hit_test(root, required, point, offset);
        }
        if self.screens.mode == DisplayMode::Popup
            && let Some(popup) = self.screens.popup
            && popup.bounds(&self.tree).contains(point - offset)
        {
            return self
                .tree
                .hit_test(popup.node, required, point, offset + popup.offset);
        }
        self.tree
            .hit_test(self.screens.current(), required, point, offset)
    }

    /// Returns where the tree of `node` is placed on the display.
    pub(crate) fn tree_offset(&self, node: NodeId) -> Vec2 {
        match self.screens.popup {
            Some(popup)
                if self.screens.mode == DisplayMode::Popup
                    && self.tree.is_within(node, popup.node) =>
            {
                popup.offset
            }
            _ => Vec2::ZERO,
        }
    }

    pub(crate) fn begin_show_screen(&mut self, target: NodeId, effect: Effect, go_right: bool) {
        let (group, _) = self.locate_screen(target);
        if self.screens.mode == DisplayMode::ScreenTransition || target == self.screens.current() {
            return;
        }
        self.screens.popup = None;
        self.screens.transition = Some(ScreenTransition {
            from: self.screens.current(),
            to: target,
            go_right,
            effect,
            layout: self.screens.groups.groups[group].layout,
        });
        self.display.invalidate_buffers();

        let now = self.clock.now();
        let base = self.config.screen_transition_duration;
        let id = self.screen_transition;
        self.drive(id, now, |kind, _, emit| {
            if let EventKind::Transition(t) = kind {
                t.set_duration(base, now);
                t.set_reversed(false, now);
                t.start(now, emit);
            }
        });
        self.set_display_mode(DisplayMode::ScreenTransition);
    }

    /// Makes `screen` current and dispatches `ScreenEntered` on it.
    pub(crate) fn enter_screen(&mut self, screen: NodeId) {
        let (group, index) = self.locate_screen(screen);
        let from = self.screens.current();
        self.screens.group = group;
        self.screens.index = index;
        if self.tree.flags(screen).contains(NodeFlags::FILL_IMAGE) {
            self.display.request_clear();
        }
        self.display.request_full();
        if from != screen {
            let time = self.clock.now();
            self.tracer
                .screen_changed(&ScreenChangeEvent { from, to: screen, time });
        }
        self.dispatch_node(screen, Trigger::ScreenEntered);
    }

    /// Finishes or abandons a screen change once its event has settled.
    pub(crate) fn sync_screen_transition(&mut self) {
        if self.screens.mode != DisplayMode::ScreenTransition {
            return;
        }
        let event = self.registry.get(self.screen_transition);
        if event.status() != Status::Stopped {
            return;
        }
        let completed = event.progress() >= 1.0;
        let transition = self.screens.transition.take();
        self.set_display_mode(DisplayMode::Screen);
        if completed && let Some(t) = transition {
            self.enter_screen(t.to);
        }
    }

    fn locate_screen(&self, screen: NodeId) -> (usize, usize) {
        self.tree.validate(screen);
        let position = self.screens.groups.locate(screen);
        assert!(
            position.is_some(),
            "screen {screen:?} is not in any screen group"
        );
        position.unwrap_or_default()
    }
}
