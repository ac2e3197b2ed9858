// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with topology, properties and damage
//! tracking.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size, Vec2};
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::flags::NodeFlags;
use super::id::{INVALID, NodeId};
use super::item::{GraphicsItem, ItemKind, Response};
use super::traverse::{Ancestors, Children};
use crate::dirty;
use crate::display::DrawFn;
use crate::gesture::{GestureHandler, Handlers};

/// Struct-of-arrays storage for all scene nodes.
///
/// Nodes are addressed by [`NodeId`] handles. The whole forest is built once
/// when the application starts; nodes are never destroyed, so slots are
/// never recycled. Each node's rectangle is relative to its parent's origin.
pub struct SceneTree {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,

    // -- Properties --
    pub(crate) rect: Vec<Rect>,
    pub(crate) item: Vec<GraphicsItem>,
    pub(crate) flags: Vec<NodeFlags>,

    // -- Host capabilities --
    pub(crate) draw: Vec<Option<DrawFn>>,
    pub(crate) handlers: Vec<Handlers>,

    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,
    pub(crate) damaged: bool,
    /// Absolute areas left behind by nodes that moved or shrank.
    pub(crate) vacated: Vec<(NodeId, Rect)>,
}

impl core::fmt::Debug for SceneTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SceneTree")
            .field("len", &self.len)
            .field("damaged", &self.damaged)
            .finish_non_exhaustive()
    }
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            rect: Vec::new(),
            item: Vec::new(),
            flags: Vec::new(),
            draw: Vec::new(),
            handlers: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            damaged: false,
            vacated: Vec::new(),
        }
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // -- Construction API --

    /// Creates a new parentless node and returns its handle.
    ///
    /// `rect` is relative to the parent the node is later added to.
    pub fn create_node(&mut self, rect: Rect, item: GraphicsItem, flags: NodeFlags) -> NodeId {
        let idx = self.len;
        self.len += 1;
        self.parent.push(INVALID);
        self.first_child.push(INVALID);
        self.next_sibling.push(INVALID);
        self.rect.push(rect);
        self.item.push(item);
        self.flags.push(flags);
        self.draw.push(None);
        self.handlers.push(Handlers::default());
        self.mark(idx, dirty::APPEARANCE);
        NodeId(idx)
    }

    /// Adds `child` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is unknown, if `child` already has a parent,
    /// or if `child` is `parent` or one of its ancestors.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.validate(parent);
        self.validate(child);
        let p = parent.0;
        let c = child.0;
        assert!(p != c, "a node cannot be its own child");
        assert!(
            !self.is_within(parent, child),
            "adding {child:?} under {parent:?} would create a cycle"
        );
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
        }

        // Child depends on parent for placement and visibility.
        let _ = self.dirty.add_dependency(c, p, dirty::GEOMETRY);
        let _ = self.dirty.add_dependency(c, p, dirty::VISIBILITY);

        if self.item[c as usize].is_window() {
            for a in Ancestors::new(self, c).collect::<Vec<_>>() {
                self.flags[a.0 as usize].insert(NodeFlags::CONTAINS_WINDOW);
            }
        }
        self.mark_eager(c, dirty::GEOMETRY);
    }

    /// Sets the draw capability of a node.
    pub fn set_draw(&mut self, id: NodeId, draw: DrawFn) {
        self.validate(id);
        self.draw[id.0 as usize] = Some(draw);
        self.mark(id.0, dirty::APPEARANCE);
    }

    /// Sets the press handler of a node.
    pub fn on_press(&mut self, id: NodeId, handler: GestureHandler) {
        self.validate(id);
        self.handlers[id.0 as usize].press = Some(handler);
    }

    /// Sets the release handler of a node.
    pub fn on_release(&mut self, id: NodeId, handler: GestureHandler) {
        self.validate(id);
        self.handlers[id.0 as usize].release = Some(handler);
    }

    /// Sets the swipe (drag) handler of a node.
    pub fn on_swipe(&mut self, id: NodeId, handler: GestureHandler) {
        self.validate(id);
        self.handlers[id.0 as usize].swipe = Some(handler);
    }

    /// Sets the abort handler of a node, invoked when a swipe disqualifies a
    /// press on a node that is not drag-capable.
    pub fn on_abort(&mut self, id: NodeId, handler: GestureHandler) {
        self.validate(id);
        self.handlers[id.0 as usize].abort = Some(handler);
    }

    // -- Topology queries --

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        NodeId::from_raw(self.parent[id.0 as usize])
    }

    /// Returns an iterator over the direct children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.0 as usize])
    }

    /// Returns an iterator over the ancestors of a node, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        self.validate(id);
        Ancestors::new(self, id.0)
    }

    /// Returns whether `node` is `ancestor` or lies in its subtree.
    #[must_use]
    pub fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    // -- Property getters --

    /// Returns the rectangle of a node, relative to its parent.
    #[must_use]
    pub fn rect(&self, id: NodeId) -> Rect {
        self.validate(id);
        self.rect[id.0 as usize]
    }

    /// Returns the size of a node.
    #[must_use]
    pub fn size(&self, id: NodeId) -> Size {
        self.rect(id).size()
    }

    /// Returns the graphics item of a node.
    #[must_use]
    pub fn item(&self, id: NodeId) -> &GraphicsItem {
        self.validate(id);
        &self.item[id.0 as usize]
    }

    /// Returns the item kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> ItemKind {
        self.item(id).kind()
    }

    /// Returns the flags of a node.
    #[must_use]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.validate(id);
        self.flags[id.0 as usize]
    }

    /// Returns whether the node and all of its ancestors are unhidden.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        !self.flags(id).contains(NodeFlags::HIDDEN)
            && self
                .ancestors(id)
                .all(|a| !self.flags[a.0 as usize].contains(NodeFlags::HIDDEN))
    }

    /// Returns the absolute origin of a node, relative to the root of its
    /// tree, including the content offsets of enclosing windows.
    #[must_use]
    pub fn absolute_origin(&self, id: NodeId) -> Point {
        let mut origin = self.rect(id).origin();
        for a in self.ancestors(id) {
            let i = a.0 as usize;
            origin += self.rect[i].origin().to_vec2() + self.item[i].content_offset();
        }
        origin
    }

    /// Returns the absolute rectangle of a node.
    #[must_use]
    pub fn absolute_rect(&self, id: NodeId) -> Rect {
        Rect::from_origin_size(self.absolute_origin(id), self.size(id))
    }

    // -- Mutation API (auto-marks dirty) --

    /// Moves or resizes a node. Descendants are damaged with it.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        self.validate(id);
        let old = self.rect[id.0 as usize];
        if old == rect {
            return;
        }
        if self.is_visible(id) {
            let area = self.absolute_rect(id);
            self.vacated.push((id, area));
        }
        self.rect[id.0 as usize] = rect;
        self.mark_eager(id.0, dirty::GEOMETRY);
    }

    /// Replaces the graphics item of a node.
    pub fn set_item(&mut self, id: NodeId, item: GraphicsItem) {
        *self.item_mut(id) = item;
    }

    /// Returns mutable access to the graphics item of a node.
    ///
    /// The node and its subtree are damaged, since the item may carry a
    /// content offset.
    pub fn item_mut(&mut self, id: NodeId) -> &mut GraphicsItem {
        self.validate(id);
        self.mark_eager(id.0, dirty::GEOMETRY);
        &mut self.item[id.0 as usize]
    }

    /// Sets the value of a gauge, needle, slider, progress bar, image or
    /// rectangle from a fraction in `[0, 1]`.
    ///
    /// Returns `true` if the value changed.
    pub fn set_value(&mut self, id: NodeId, fraction: f32) -> bool {
        self.validate(id);
        let changed = self.item[id.0 as usize].set_value(fraction);
        if changed {
            self.mark(id.0, dirty::APPEARANCE);
        }
        changed
    }

    /// Replaces the flags of a node.
    ///
    /// Changing [`HIDDEN`](NodeFlags::HIDDEN) damages the whole subtree; any
    /// other change damages only the node.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        self.validate(id);
        let old = self.flags[id.0 as usize];
        if old == flags {
            return;
        }
        self.flags[id.0 as usize] = flags;
        if (old ^ flags).contains(NodeFlags::HIDDEN) {
            self.mark_eager(id.0, dirty::VISIBILITY);
        } else {
            self.mark(id.0, dirty::APPEARANCE);
        }
    }

    /// Sets the given flags on a node.
    pub fn insert_flags(&mut self, id: NodeId, flags: NodeFlags) {
        let f = self.flags(id) | flags;
        self.set_flags(id, f);
    }

    /// Clears the given flags on a node.
    pub fn remove_flags(&mut self, id: NodeId, flags: NodeFlags) {
        let f = self.flags(id) - flags;
        self.set_flags(id, f);
    }

    /// Hides or shows a node and its subtree.
    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
        if hidden {
            self.insert_flags(id, NodeFlags::HIDDEN);
        } else {
            self.remove_flags(id, NodeFlags::HIDDEN);
        }
    }

    /// Marks a node for redraw without changing any property.
    pub fn invalidate(&mut self, id: NodeId) {
        self.validate(id);
        self.mark(id.0, dirty::APPEARANCE);
    }

    // -- Built-in widget behaviour --

    /// Runs the built-in press behaviour of a node.
    pub(crate) fn widget_press(&mut self, id: NodeId, local: Point) -> Response {
        let size = self.size(id);
        let response = match self.item[id.0 as usize].widget_mut() {
            Some(w) => w.press(local, size),
            None => Response::NONE,
        };
        self.apply_response(id, response)
    }

    /// Runs the built-in drag behaviour of a node.
    pub(crate) fn widget_drag(&mut self, id: NodeId, local: Point, delta: Vec2) -> Response {
        let size = self.size(id);
        let response = match self.item[id.0 as usize].widget_mut() {
            Some(w) => w.drag(local, delta, size),
            None => Response::NONE,
        };
        self.apply_response(id, response)
    }

    /// Runs the built-in release behaviour of a node, including checkbox
    /// toggling and radio group selection.
    pub(crate) fn widget_release(&mut self, id: NodeId) -> Response {
        let response = match self.kind(id) {
            ItemKind::Checkbox => {
                let f = self.flags[id.0 as usize] ^ NodeFlags::CHECKED;
                self.set_flags(id, f);
                Response::CHANGED
            }
            ItemKind::RadioButton => self.select_radio(id),
            _ => {
                let size = self.size(id);
                match self.item[id.0 as usize].widget_mut() {
                    Some(w) => w.release(size),
                    None => Response::NONE,
                }
            }
        };
        self.apply_response(id, response)
    }

    /// Checks a radio button and unchecks its radio-button siblings.
    fn select_radio(&mut self, id: NodeId) -> Response {
        if self.flags[id.0 as usize].contains(NodeFlags::CHECKED) {
            return Response::NONE;
        }
        if let Some(parent) = self.parent(id) {
            let siblings: Vec<NodeId> = self
                .children(parent)
                .filter(|&s| s != id && self.kind(s) == ItemKind::RadioButton)
                .collect();
            for s in siblings {
                self.remove_flags(s, NodeFlags::CHECKED);
            }
        }
        self.insert_flags(id, NodeFlags::CHECKED);
        Response::CHANGED
    }

    fn apply_response(&mut self, id: NodeId, response: Response) -> Response {
        if response.redraw {
            self.mark_eager(id.0, dirty::GEOMETRY);
        }
        response
    }

    // -- Damage --

    /// Returns whether any node has been marked dirty since the last
    /// [`take_damage`](Self::take_damage).
    #[must_use]
    pub fn has_damage(&self) -> bool {
        self.damaged
    }

    /// Drains all dirty channels and returns the raw indices of damaged
    /// nodes, sorted and deduplicated.
    pub fn take_damage(&mut self) -> Vec<u32> {
        let mut nodes: Vec<u32> = self
            .dirty
            .drain(dirty::APPEARANCE)
            .deterministic()
            .run()
            .collect();
        nodes.extend(
            self.dirty
                .drain(dirty::VISIBILITY)
                .affected()
                .deterministic()
                .run(),
        );
        nodes.extend(
            self.dirty
                .drain(dirty::GEOMETRY)
                .affected()
                .deterministic()
                .run(),
        );
        nodes.sort_unstable();
        nodes.dedup();
        self.damaged = false;
        nodes
    }

    /// Drains the areas nodes occupied before they were moved or resized
    /// since the last call, paired with the node that left them.
    pub fn take_vacated(&mut self) -> Vec<(NodeId, Rect)> {
        core::mem::take(&mut self.vacated)
    }

    // -- Internal helpers --

    /// Panics if the handle does not belong to this tree.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            id.0 < self.len,
            "unknown NodeId: {id:?} (len {})",
            self.len
        );
    }

    fn mark(&mut self, idx: u32, channel: understory_dirty::Channel) {
        self.dirty.mark(idx, channel);
        self.damaged = true;
    }

    fn mark_eager(&mut self, idx: u32, channel: understory_dirty::Channel) {
        self.dirty.mark_with(idx, channel, &EagerPolicy);
        self.damaged = true;
    }
}
