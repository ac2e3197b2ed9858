// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit-testing.
//!
//! The walk is depth-first with children tested before their parent: the
//! first node in that order whose rectangle contains the point and whose
//! flags intersect the required set wins. It is not a best-match search.

use kurbo::{Point, Rect, Vec2};

use super::flags::NodeFlags;
use super::id::{INVALID, NodeId};
use super::item::ItemKind;
use super::store::SceneTree;

/// A successful hit-test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// The matched node.
    pub node: NodeId,
    /// The point relative to the matched node's origin.
    pub local: Point,
}

/// Innermost window or swipe window containing the point, with its absolute
/// origin.
#[derive(Clone, Copy)]
struct Enclosing {
    node: u32,
    origin: Point,
}

impl SceneTree {
    /// Finds the node under `point` in the tree rooted at `root`.
    ///
    /// `offset` is the absolute position of `root`'s parent space (for
    /// example the centring offset of a popup). Hidden subtrees are skipped,
    /// and so are the children of a window when the point lies outside it.
    ///
    /// When the match is a bare [`Screen`](ItemKind::Screen) item inside a
    /// window, the enclosing window is returned instead, so that both the
    /// window chrome and its empty background can be dragged.
    #[must_use]
    pub fn hit_test(
        &self,
        root: NodeId,
        required: NodeFlags,
        point: Point,
        offset: Vec2,
    ) -> Option<Hit> {
        self.validate(root);
        self.visit(root.0, required, point, offset.to_point(), None)
    }

    /// Tests one node and its subtree. `origin` is the absolute origin of
    /// the node's parent content.
    fn visit(
        &self,
        idx: u32,
        required: NodeFlags,
        point: Point,
        origin: Point,
        window: Option<Enclosing>,
    ) -> Option<Hit> {
        let i = idx as usize;
        let flags = self.flags[i];
        if flags.contains(NodeFlags::HIDDEN) {
            return None;
        }
        let rect: Rect = self.rect[i] + origin.to_vec2();
        let inside = rect.contains(point);
        let item = &self.item[i];

        let mut window = window;
        if inside && item.is_window() {
            window = Some(Enclosing {
                node: idx,
                origin: rect.origin(),
            });
        }

        let descend = !flags.contains(NodeFlags::STOP_RECURSION)
            && self.first_child[i] != INVALID
            && (inside || !item.is_window());
        if descend {
            let child_origin = rect.origin() + item.content_offset();
            let mut child = self.first_child[i];
            while child != INVALID {
                if let Some(hit) = self.visit(child, required, point, child_origin, window) {
                    return Some(hit);
                }
                child = self.next_sibling[child as usize];
            }
        }

        if !inside || !flags.intersects(required) {
            return None;
        }
        if item.kind() == ItemKind::Screen
            && let Some(w) = window.filter(|w| w.node != idx)
        {
            return Some(Hit {
                node: NodeId(w.node),
                local: (point - w.origin).to_point(),
            });
        }
        Some(Hit {
            node: NodeId(idx),
            local: (point - rect.origin()).to_point(),
        })
    }
}
