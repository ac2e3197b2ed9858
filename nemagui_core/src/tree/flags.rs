// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node flag set.

bitflags::bitflags! {
    /// Per-node state and capability flags.
    ///
    /// The capability bits ([`PRESS`](Self::PRESS), [`RELEASE`](Self::RELEASE),
    /// [`DRAG`](Self::DRAG)) are fixed when the scene is built; the state bits
    /// are mutated by the gesture dispatcher and event callbacks.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u16 {
        /// The node and its subtree are neither drawn nor hit-tested.
        const HIDDEN = 1 << 0;
        /// The node is currently pressed.
        const HIGHLIGHTED = 1 << 1;
        /// Checkbox / radio button checked state.
        const CHECKED = 1 << 2;
        /// The node background is an image.
        const FILL_IMAGE = 1 << 3;
        /// The node background is a solid color.
        const FILL_COLOR = 1 << 4;
        /// Hit-testing does not descend into children.
        const STOP_RECURSION = 1 << 5;
        /// The node is driven by a running animation.
        const ANIMATED = 1 << 6;
        /// The subtree contains a window or swipe window.
        const CONTAINS_WINDOW = 1 << 7;
        /// The node accepts drag gestures.
        const DRAG = 1 << 8;
        /// The node accepts press gestures.
        const PRESS = 1 << 9;
        /// The node accepts release gestures.
        const RELEASE = 1 << 10;
    }
}

impl NodeFlags {
    /// Capability bits that make a node a target for a press; also the
    /// capabilities of a plain tappable widget.
    pub const PRESSABLE: Self = Self::PRESS.union(Self::RELEASE);

    /// Capability bits for a draggable widget.
    pub const DRAGGABLE: Self = Self::PRESS.union(Self::RELEASE).union(Self::DRAG);
}
