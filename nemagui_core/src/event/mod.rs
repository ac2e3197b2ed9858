// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events: triggerable units of animation and timing logic.
//!
//! Each event is one of three state machines sharing the same status model:
//!
//! - [`Transition`]: a duration-bounded 0→1 ramp, optionally reversible.
//! - [`Periodic`]: fires once every period until stopped.
//! - [`PeriodicTransition`]: a duration-bounded ramp repeated every period.
//!
//! The state machines are pure: every operation takes the current wall time
//! in seconds and reports callback invocations through an emitter, so they
//! can be tested without an engine. The [`Registry`] links them to their
//! source nodes and the [`Engine`](crate::engine::Engine) drives them.
//!
//! # Retrigger precedence
//!
//! When a user trigger reaches an event that is running or paused, the
//! [`Retrigger`] bits are applied in this order:
//!
//! 1. [`RESTART`](Retrigger::RESTART), then [`RESET`](Retrigger::RESET),
//!    then [`FINISH`](Retrigger::FINISH), each only if set.
//! 2. [`REVERSE`](Retrigger::REVERSE), if the event is running
//!    (transitions only).
//! 3. [`PAUSE`](Retrigger::PAUSE) if running, otherwise
//!    [`RESUME`](Retrigger::RESUME) if paused.
//!
//! [`IGNORE`](Retrigger::IGNORE) is checked before any of this by the
//! dispatcher: a running event with `IGNORE` set does not see the trigger.

mod periodic;
mod periodic_transition;
mod registry;
mod transition;

pub use periodic::Periodic;
pub use periodic_transition::PeriodicTransition;
pub use registry::{Action, Event, EventId, NodeEvents, Registry, Role};
pub use transition::Transition;

/// Run status of an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Status {
    /// Not running; ticks are ignored.
    #[default]
    Stopped,
    /// Advancing on every timer tick.
    Running,
    /// Frozen; progress is kept until resumed.
    Paused,
}

bitflags::bitflags! {
    /// Flags passed to an event callback with each invocation.
    ///
    /// [`FIRST_RUN`](Self::FIRST_RUN) and [`LAST_RUN`](Self::LAST_RUN) mark
    /// the first and the settling invocation of a run;
    /// [`REVERSED`](Self::REVERSED) is set while a transition plays
    /// backwards.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RunFlags: u8 {
        /// First invocation of a run.
        const FIRST_RUN = 1 << 0;
        /// Final invocation of a run.
        const LAST_RUN = 1 << 1;
        /// The transition is playing from 1 towards 0.
        const REVERSED = 1 << 2;
    }
}

bitflags::bitflags! {
    /// How a repeated user trigger affects an event that is already active.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Retrigger: u8 {
        /// A running event does not react to its trigger.
        const IGNORE = 1 << 0;
        /// Stop and start again from the initial value.
        const RESTART = 1 << 1;
        /// Stop at the initial value.
        const RESET = 1 << 2;
        /// Jump to the terminal value and stop.
        const FINISH = 1 << 3;
        /// Play the other way; also flips direction when a run settles.
        const REVERSE = 1 << 4;
        /// Pause a running event.
        const PAUSE = 1 << 5;
        /// Resume a paused event.
        const RESUME = 1 << 6;
    }
}

/// The cause that can start or advance an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// The source node was pressed.
    Press,
    /// The source node was released.
    Release,
    /// The source node was dragged.
    Drag,
    /// A tick of the shared timer.
    Timer,
    /// The engine started.
    AppStart,
    /// The source screen became the current screen.
    ScreenEntered,
    /// The source widget's value changed.
    ValueChanged,
    /// Only started explicitly.
    #[default]
    None,
}

/// One callback invocation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Firing {
    /// Progress in `[0, 1]`.
    pub progress: f32,
    /// Edge flags for this invocation.
    pub flags: RunFlags,
}

/// The state machine of an event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EventKind {
    /// One-shot ramp.
    Transition(Transition),
    /// Fixed-rate repeat.
    Periodic(Periodic),
    /// Ramp repeated every period.
    PeriodicTransition(PeriodicTransition),
}

impl EventKind {
    /// Returns the run status.
    #[must_use]
    pub fn status(&self) -> Status {
        match self {
            Self::Transition(t) => t.status(),
            Self::Periodic(p) => p.status(),
            Self::PeriodicTransition(p) => p.status(),
        }
    }

    /// Returns the current progress.
    #[must_use]
    pub fn progress(&self) -> f32 {
        match self {
            Self::Transition(t) => t.progress(),
            Self::Periodic(p) => p.progress(),
            Self::PeriodicTransition(p) => p.progress(),
        }
    }

    /// Returns whether the event is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status() == Status::Running
    }

    /// Starts a run.
    pub fn start(&mut self, now: f64, emit: &mut dyn FnMut(Firing)) {
        match self {
            Self::Transition(t) => t.start(now, emit),
            Self::Periodic(p) => p.start(now, emit),
            Self::PeriodicTransition(p) => p.start(now, emit),
        }
    }

    /// Stops the event, optionally jumping to the terminal value first.
    pub fn stop(&mut self, now: f64, force_finish: bool, emit: &mut dyn FnMut(Firing)) {
        match self {
            Self::Transition(t) => t.stop(now, force_finish, emit),
            Self::Periodic(p) => p.stop(force_finish, emit),
            Self::PeriodicTransition(p) => p.stop(force_finish, emit),
        }
    }

    /// Advances a running event to `now`.
    pub fn tick(&mut self, now: f64, retrigger: Retrigger, emit: &mut dyn FnMut(Firing)) {
        match self {
            Self::Transition(t) => t.tick(now, retrigger, emit),
            Self::Periodic(p) => p.tick(now, emit),
            Self::PeriodicTransition(p) => p.tick(now, emit),
        }
    }

    /// Applies a user trigger: starts a stopped event, or applies the
    /// retrigger bits to an active one.
    pub fn trigger(&mut self, now: f64, retrigger: Retrigger, emit: &mut dyn FnMut(Firing)) {
        match self {
            Self::Transition(t) => t.trigger(now, retrigger, emit),
            Self::Periodic(p) => p.trigger(now, retrigger, emit),
            Self::PeriodicTransition(p) => p.trigger(now, retrigger, emit),
        }
    }
}

/// Clamps a ramp value to `[0, 1]`, mapping NaN to zero.
#[inline]
#[expect(
    clippy::cast_possible_truncation,
    reason = "progress is stored as f32; the value is already in [0, 1]"
)]
pub(crate) fn clamp_unit(v: f64) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0) as f32
    }
}
