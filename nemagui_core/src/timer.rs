// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared animation timer.
//!
//! One periodic timer drives every running event. The host owns the actual
//! hardware or OS timer and exposes it through [`TimerService`]; each
//! expiry is delivered back into the engine as
//! [`Engine::timer_tick`](crate::engine::Engine::timer_tick). The engine
//! arms the timer when an event starts running and cancels it once no event
//! is running, so an idle UI produces no wake-ups.

use core::fmt;

/// Host-assigned identifier of a periodic timer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

impl fmt::Debug for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimerId({})", self.0)
    }
}

/// Host timer capability.
pub trait TimerService {
    /// Allocates a timer.
    fn create(&mut self) -> TimerId;

    /// Arms `id` to fire every `period_ms` milliseconds until cancelled.
    fn arm_periodic(&mut self, id: TimerId, period_ms: u32);

    /// Stops `id` from firing.
    fn cancel(&mut self, id: TimerId);
}

/// The application-wide timer.
///
/// The service timer is created lazily on the first [`start`](Self::start).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timer {
    id: Option<TimerId>,
    period_ms: u32,
    running: bool,
}

impl Timer {
    /// Creates a stopped timer with the given period.
    #[must_use]
    pub const fn new(period_ms: u32) -> Self {
        Self {
            id: None,
            period_ms,
            running: false,
        }
    }

    /// Returns whether the timer is armed.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Returns the period in milliseconds.
    #[must_use]
    pub const fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Returns the tick frequency in hertz. A zero period counts as 1 ms.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "timer frequencies are at most 1 kHz"
    )]
    pub fn frequency(&self) -> f32 {
        (1000.0 / f64::from(self.period_ms.max(1))) as f32
    }

    /// Arms the timer if it is not running. Returns `true` if it was armed
    /// by this call.
    pub fn start(&mut self, service: &mut dyn TimerService) -> bool {
        if self.running {
            return false;
        }
        let id = match self.id {
            Some(id) => id,
            None => {
                let id = service.create();
                self.id = Some(id);
                id
            }
        };
        service.arm_periodic(id, self.period_ms);
        self.running = true;
        true
    }

    /// Cancels the timer if it is running. Returns `true` if it was
    /// cancelled by this call.
    pub fn stop(&mut self, service: &mut dyn TimerService) -> bool {
        if !self.running {
            return false;
        }
        if let Some(id) = self.id {
            service.cancel(id);
        }
        self.running = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[derive(Default)]
    struct Log {
        created: u32,
        calls: Vec<(&'static str, u32)>,
    }

    impl TimerService for Log {
        fn create(&mut self) -> TimerId {
            self.created += 1;
            TimerId(self.created)
        }

        fn arm_periodic(&mut self, id: TimerId, period_ms: u32) {
            self.calls.push(("arm", id.0 * 1000 + period_ms));
        }

        fn cancel(&mut self, id: TimerId) {
            self.calls.push(("cancel", id.0));
        }
    }

    #[test]
    fn creates_once_and_rearms() {
        let mut service = Log::default();
        let mut timer = Timer::new(16);
        assert!(timer.start(&mut service));
        assert!(!timer.start(&mut service), "already running");
        assert!(timer.stop(&mut service));
        assert!(!timer.stop(&mut service), "already stopped");
        assert!(timer.start(&mut service));

        assert_eq!(service.created, 1);
        assert_eq!(
            service.calls,
            [("arm", 1016), ("cancel", 1), ("arm", 1016)]
        );
    }

    #[test]
    fn frequency_guards_zero_period() {
        assert_eq!(Timer::new(16).frequency(), 62.5);
        assert_eq!(Timer::new(0).frequency(), 1000.0);
    }
}
