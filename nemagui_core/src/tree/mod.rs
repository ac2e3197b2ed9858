// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene tree data model.
//!
//! A *node* is an element of a statically built scene. Each node has:
//!
//! - An identity ([`NodeId`]), a bare index into the tree's arena.
//! - Topology: parent, first-child and next-sibling links forming an
//!   ordered forest. Every screen and popup is the root of one tree.
//! - A rectangle relative to its parent, a [`GraphicsItem`] payload and a
//!   [`NodeFlags`] set.
//! - Optional host capabilities: a draw function and press / release /
//!   swipe / abort gesture handlers.
//!
//! Nodes are stored in struct-of-arrays layout. They are created while the
//! scene is built and live as long as the tree; the engine only mutates
//! their properties afterwards.
//!
//! # Dirty tracking
//!
//! Property mutations automatically mark the corresponding dirty channel
//! (see [`dirty`](crate::dirty)), which the display drains into a damage
//! region once per frame.

mod flags;
mod hit;
mod id;
pub mod item;
mod store;
mod traverse;

pub use flags::NodeFlags;
pub use hit::Hit;
pub use id::{INVALID, NodeId};
pub use item::{GraphicsItem, ItemKind, Layout};
pub use store::SceneTree;
pub use traverse::{Ancestors, Children};
