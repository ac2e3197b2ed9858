// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic host simulation for the NemaGUI engine.
//!
//! A real host owns a display, a touch controller and a hardware timer. This
//! crate stands in for all three so that whole interaction sequences can be
//! replayed in tests and demos with exact timing:
//!
//! - [`SimTimer`]: a [`TimerService`](nemagui_core::timer::TimerService)
//!   that records arm and cancel calls instead of firing.
//! - [`RecordingPainter`]: a [`Painter`](nemagui_core::display::Painter)
//!   that records draw calls.
//! - [`Harness`]: owns the engine, a
//!   [`ManualClock`](nemagui_core::clock::ManualClock) and the two above,
//!   and offers scripted input ([`Input`]) and time stepping.

mod harness;
mod painter;
mod timer;

#[cfg(test)]
mod scenarios;

pub use harness::{Harness, Input};
pub use painter::{PaintOp, RecordingPainter};
pub use timer::{SimTimer, TimerCall};
