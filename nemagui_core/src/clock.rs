// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wall-clock sources.
//!
//! Every start time, duration and progress computation in the event engine
//! is expressed in `f64` seconds read from a [`Clock`]. The host supplies
//! the clock; the engine never reads hardware directly.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::Cell;
use core::fmt;

use crate::time::{HostTime, Timebase};

/// A monotonic time source in seconds.
pub trait Clock {
    /// Returns the current time in seconds.
    fn now(&self) -> f64;
}

/// A settable clock for tests and simulation.
///
/// Clones share the same underlying time, so a test can keep one handle and
/// move another into the engine.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    /// Creates a clock reading `start` seconds.
    #[must_use]
    pub fn new(start: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Sets the current time in seconds.
    pub fn set(&self, secs: f64) {
        self.now.set(secs);
    }

    /// Sets the current time in milliseconds.
    pub fn set_millis(&self, ms: u64) {
        self.now.set(ms as f64 / 1000.0);
    }

    /// Moves the clock forward by `secs`.
    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// Adapts a host tick counter into a [`Clock`].
///
/// The first reading becomes the epoch, so the engine sees time starting
/// near zero regardless of how long the counter has been running.
pub struct TickClock {
    read: Box<dyn Fn() -> HostTime>,
    timebase: Timebase,
    epoch: HostTime,
}

impl TickClock {
    /// Creates a clock from a tick-reading function and its timebase.
    #[must_use]
    pub fn new(read: Box<dyn Fn() -> HostTime>, timebase: Timebase) -> Self {
        let epoch = read();
        Self {
            read,
            timebase,
            epoch,
        }
    }
}

impl fmt::Debug for TickClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickClock")
            .field("timebase", &self.timebase)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

impl Clock for TickClock {
    fn now(&self) -> f64 {
        let elapsed = HostTime((self.read)().saturating_ticks_since(self.epoch));
        elapsed.to_secs(self.timebase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(1.0);
        let handle = clock.clone();
        handle.advance(0.5);
        assert!((clock.now() - 1.5).abs() < 1e-12, "shared cell");
        handle.set_millis(16);
        assert!((clock.now() - 0.016).abs() < 1e-12, "millis setter");
    }

    #[test]
    fn tick_clock_starts_at_epoch() {
        let counter = Rc::new(Cell::new(5_000_u64));
        let source = counter.clone();
        let clock = TickClock::new(Box::new(move || HostTime(source.get())), Timebase::MILLIS);
        assert_eq!(clock.now(), 0.0, "first reading is the epoch");
        counter.set(5_250);
        assert!((clock.now() - 0.25).abs() < 1e-12, "250 ms later");
    }
}
