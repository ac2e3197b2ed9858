// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the engine.
//!
//! This module provides a [`TraceSink`] trait with one method per engine
//! state change. All method bodies default to no-ops, so implementing only
//! the events you care about is fine.
//!
//! [`Tracer`] owns an optional boxed [`TraceSink`]. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! Times are wall-clock seconds as reported by the engine's
//! [`Clock`](crate::clock::Clock).
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;

use kurbo::Rect;

use crate::event::{EventId, RunFlags, Status};
use crate::screen::DisplayMode;
use crate::tree::NodeId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which gesture entry point was invoked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// A press started.
    Press,
    /// A press turned into a swipe, or a swipe continued.
    Swipe,
    /// The pointer was released.
    Release,
    /// A swipe disqualified a press on a node that cannot be dragged.
    Abort,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted for every callback invocation of an event.
#[derive(Clone, Copy, Debug)]
pub struct EventFiredEvent {
    /// The event.
    pub event: EventId,
    /// Its source node.
    pub source: NodeId,
    /// Progress passed to the callback.
    pub progress: f32,
    /// Flags passed to the callback.
    pub flags: RunFlags,
    /// Wall time of the firing.
    pub time: f64,
}

/// Emitted when an event's run status changes.
#[derive(Clone, Copy, Debug)]
pub struct StatusChangeEvent {
    /// The event.
    pub event: EventId,
    /// Previous status.
    pub from: Status,
    /// New status.
    pub to: Status,
    /// Wall time of the change.
    pub time: f64,
}

/// Emitted for every gesture handled by the dispatcher.
#[derive(Clone, Copy, Debug)]
pub struct GestureEvent {
    /// Gesture entry point.
    pub kind: GestureKind,
    /// Node the gesture was routed to, if any.
    pub node: Option<NodeId>,
    /// Pointer x in screen coordinates.
    pub x: f64,
    /// Pointer y in screen coordinates.
    pub y: f64,
    /// Wall time of the gesture.
    pub time: f64,
}

/// Emitted when the display mode changes.
#[derive(Clone, Copy, Debug)]
pub struct DisplayModeEvent {
    /// Previous mode.
    pub from: DisplayMode,
    /// New mode.
    pub to: DisplayMode,
    /// Wall time of the change.
    pub time: f64,
}

/// Emitted when the shared timer is armed or cancelled.
#[derive(Clone, Copy, Debug)]
pub struct TimerEvent {
    /// `true` when armed, `false` when cancelled.
    pub armed: bool,
    /// Timer period in milliseconds.
    pub period_ms: u32,
    /// Wall time of the change.
    pub time: f64,
}

/// Emitted when the current screen changes.
#[derive(Clone, Copy, Debug)]
pub struct ScreenChangeEvent {
    /// Previous screen.
    pub from: NodeId,
    /// New screen.
    pub to: NodeId,
    /// Wall time of the change.
    pub time: f64,
}

/// Emitted at the end of every draw pass.
#[derive(Clone, Copy, Debug)]
pub struct FrameEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Display mode the frame was drawn in.
    pub mode: DisplayMode,
    /// Bounding box of the redrawn region, or `None` if nothing was drawn.
    pub damage: Option<Rect>,
    /// Number of nodes whose draw function ran.
    pub nodes_drawn: u32,
    /// Wall time of the frame.
    pub time: f64,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called for every event callback invocation.
    fn on_event_fired(&mut self, e: &EventFiredEvent) {
        _ = e;
    }

    /// Called when an event changes status.
    fn on_status_changed(&mut self, e: &StatusChangeEvent) {
        _ = e;
    }

    /// Called for every dispatched gesture.
    fn on_gesture(&mut self, e: &GestureEvent) {
        _ = e;
    }

    /// Called when the display mode changes.
    fn on_display_mode(&mut self, e: &DisplayModeEvent) {
        _ = e;
    }

    /// Called when the shared timer is armed or cancelled.
    fn on_timer(&mut self, e: &TimerEvent) {
        _ = e;
    }

    /// Called when the current screen changes.
    fn on_screen_changed(&mut self, e: &ScreenChangeEvent) {
        _ = e;
    }

    /// Called after every draw pass.
    fn on_frame(&mut self, e: &FrameEvent) {
        _ = e;
    }
}

/// Shares a sink with the caller, who keeps a handle to inspect it.
impl<S: TraceSink + ?Sized> TraceSink for Rc<RefCell<S>> {
    fn on_event_fired(&mut self, e: &EventFiredEvent) {
        self.borrow_mut().on_event_fired(e);
    }

    fn on_status_changed(&mut self, e: &StatusChangeEvent) {
        self.borrow_mut().on_status_changed(e);
    }

    fn on_gesture(&mut self, e: &GestureEvent) {
        self.borrow_mut().on_gesture(e);
    }

    fn on_display_mode(&mut self, e: &DisplayModeEvent) {
        self.borrow_mut().on_display_mode(e);
    }

    fn on_timer(&mut self, e: &TimerEvent) {
        self.borrow_mut().on_timer(e);
    }

    fn on_screen_changed(&mut self, e: &ScreenChangeEvent) {
        self.borrow_mut().on_screen_changed(e);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.borrow_mut().on_frame(e);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Owner of an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
#[derive(Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns whether events reach a sink.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    /// Emits an [`EventFiredEvent`].
    #[inline]
    pub fn event_fired(&mut self, e: &EventFiredEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_event_fired(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`StatusChangeEvent`].
    #[inline]
    pub fn status_changed(&mut self, e: &StatusChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_status_changed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`GestureEvent`].
    #[inline]
    pub fn gesture(&mut self, e: &GestureEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_gesture(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DisplayModeEvent`].
    #[inline]
    pub fn display_mode(&mut self, e: &DisplayModeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_display_mode(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TimerEvent`].
    #[inline]
    pub fn timer(&mut self, e: &TimerEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_timer(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ScreenChangeEvent`].
    #[inline]
    pub fn screen_changed(&mut self, e: &ScreenChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_screen_changed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameEvent`].
    #[inline]
    pub fn frame(&mut self, e: &FrameEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
