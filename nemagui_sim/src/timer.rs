// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated timer service.

use std::cell::RefCell;
use std::rc::Rc;

use nemagui_core::timer::{TimerId, TimerService};

/// One call the engine made on the timer service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerCall {
    /// A timer was created.
    Create(TimerId),
    /// A timer was armed with the given period in milliseconds.
    Arm(TimerId, u32),
    /// A timer was cancelled.
    Cancel(TimerId),
}

#[derive(Debug, Default)]
struct State {
    next_id: u32,
    armed: Option<u32>,
    calls: Vec<TimerCall>,
}

/// A [`TimerService`] that never fires on its own.
///
/// The [`Harness`](crate::Harness) asks it whether a timer is armed and
/// delivers the ticks itself. Clones share the same state, so a test can
/// keep a handle after moving one into the engine.
#[derive(Clone, Debug, Default)]
pub struct SimTimer {
    state: Rc<RefCell<State>>,
}

impl SimTimer {
    /// Creates a service with no timers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the period of the armed timer, if any.
    #[must_use]
    pub fn armed_period_ms(&self) -> Option<u32> {
        self.state.borrow().armed
    }

    /// Returns whether a timer is armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed_period_ms().is_some()
    }

    /// Returns every call made so far.
    #[must_use]
    pub fn calls(&self) -> Vec<TimerCall> {
        self.state.borrow().calls.clone()
    }
}

impl TimerService for SimTimer {
    fn create(&mut self) -> TimerId {
        let mut state = self.state.borrow_mut();
        let id = TimerId(state.next_id);
        state.next_id += 1;
        state.calls.push(TimerCall::Create(id));
        id
    }

    fn arm_periodic(&mut self, id: TimerId, period_ms: u32) {
        let mut state = self.state.borrow_mut();
        state.armed = Some(period_ms);
        state.calls.push(TimerCall::Arm(id, period_ms));
    }

    fn cancel(&mut self, id: TimerId) {
        let mut state = self.state.borrow_mut();
        state.armed = None;
        state.calls.push(TimerCall::Cancel(id));
    }
}
