// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The scene tree uses multi-channel dirty tracking (via [`understory_dirty`])
//! to work out which part of the display has to be redrawn after gestures
//! and event callbacks mutate nodes.
//!
//! # Propagation semantics
//!
//! - **Local-only**: [`APPEARANCE`] is marked with the default policy. Only
//!   the node itself is redrawn when, for example, its highlighted flag or a
//!   slider value changes.
//!
//! - **Propagating**: [`VISIBILITY`] and [`GEOMETRY`] use
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and have dependency edges
//!   from child to parent. Hiding a node, moving it, or scrolling a window
//!   changes the absolute placement or visibility of the whole subtree.
//!
//! # Consumption
//!
//! [`SceneTree::take_damage`](crate::tree::SceneTree::take_damage) drains all
//! channels; the [`Display`](crate::display::Display) turns the drained nodes
//! into a damage rectangle for the next frame.

use understory_dirty::Channel;

/// Node content changed: value, opacity, highlight or checked state.
pub const APPEARANCE: Channel = Channel::new(0);

/// Hidden flag changed; descendants appear or disappear with the node.
pub const VISIBILITY: Channel = Channel::new(1);

/// Node rectangle or content offset changed; descendants move with it.
pub const GEOMETRY: Channel = Channel::new(2);
