// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene tree, gesture dispatch and event/animation engine for
//! retained-mode embedded GUIs.
//!
//! `nemagui_core` is the part of a small-display GUI toolkit that decides
//! *what* happens: which node a finger touched, which animations run, which
//! screen is shown and what needs redrawing. Pixels, display controllers,
//! assets and input devices belong to the host, which the core reaches
//! through a few narrow traits. It is `no_std` compatible (with `alloc`) and
//! stores the scene in struct-of-arrays form addressed by index handles.
//!
//! # Architecture
//!
//! Everything runs on one thread inside the host's main loop:
//!
//! ```text
//!   input samples ──► Engine::press / swipe / release
//!                          │  hit-test, widget behaviour, gesture handlers
//!                          ▼
//!   host timer ─────► Engine::timer_tick ──► events fire ──► actions
//!                          │                                   │
//!                          │        requests (screens, popups) ◄┘
//!                          ▼
//!   Engine::needs_update ──► Engine::draw(&mut dyn Painter)
//! ```
//!
//! **[`tree`]**: struct-of-arrays scene tree with parent / first-child /
//! next-sibling links, graphics item payloads, node flags and hit-testing.
//!
//! **[`dirty`]**: multi-channel dirty tracking via `understory_dirty`.
//! Property mutations mark the appropriate channel; the draw pass drains them
//! into a damage region.
//!
//! **[`event`]**: the three event state machines (transition, periodic,
//! periodic transition), trigger and retrigger semantics, and the event
//! registry.
//!
//! **[`timer`]** and **[`clock`]**: the single shared animation timer and
//! the wall-clock source, both supplied by the host.
//!
//! **[`gesture`]**: press / swipe / release routing, the swipe margin and
//! hand-driven screen transitions.
//!
//! **[`screen`]**: display modes, screen groups, popups and the screen
//! transition state machine.
//!
//! **[`anim_buffer`]** and **[`display`]**: transition frame planning and
//! the damage-driven draw walk through the host [`Painter`](display::Painter).
//!
//! **[`actions`]**: the context handed to callbacks and the built-in event
//! actions.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! engine instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod actions;
pub mod anim_buffer;
pub mod clock;
pub mod config;
pub mod dirty;
pub mod display;
pub mod engine;
pub mod event;
pub mod gesture;
pub mod screen;
pub mod time;
pub mod timer;
pub mod trace;
pub mod tree;
