// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-rate repeating event.

use super::{Firing, Retrigger, RunFlags, Status};

/// Fires once every `period` seconds until stopped.
///
/// The start time advances by exactly one period per firing rather than
/// snapping to the tick time, so late ticks do not accumulate phase drift.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Periodic {
    period: f64,
    start: f64,
    status: Status,
}

impl Periodic {
    /// Creates a stopped periodic event.
    ///
    /// A period of zero or less fires on every tick.
    #[must_use]
    pub const fn new(period: f64) -> Self {
        Self {
            period,
            start: 0.0,
            status: Status::Stopped,
        }
    }

    /// Returns the period in seconds.
    #[must_use]
    pub const fn period(&self) -> f64 {
        self.period
    }

    /// Returns the start of the current period.
    #[must_use]
    pub const fn start_time(&self) -> f64 {
        self.start
    }

    /// Returns the run status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Periodic events carry no ramp: progress is 0 before the first
    /// firing of a run and 1 once a period has elapsed.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.status == Status::Stopped { 0.0 } else { 1.0 }
    }

    /// Starts a run anchored at `now`.
    pub fn start(&mut self, now: f64, emit: &mut dyn FnMut(Firing)) {
        self.start = now;
        self.status = Status::Running;
        emit(Firing {
            progress: 0.0,
            flags: RunFlags::FIRST_RUN,
        });
    }

    /// Stops the event; with `force_finish` the callback sees
    /// [`LAST_RUN`](RunFlags::LAST_RUN) once more.
    pub fn stop(&mut self, force_finish: bool, emit: &mut dyn FnMut(Firing)) {
        if self.status == Status::Stopped {
            return;
        }
        self.status = Status::Stopped;
        if force_finish {
            emit(Firing {
                progress: 1.0,
                flags: RunFlags::LAST_RUN,
            });
        }
    }

    /// Fires if a full period has elapsed since the current start time.
    pub fn tick(&mut self, now: f64, emit: &mut dyn FnMut(Firing)) {
        if self.status != Status::Running {
            return;
        }
        if self.period <= 0.0 {
            self.start = now;
        } else if now >= self.start + self.period {
            self.start += self.period;
        } else {
            return;
        }
        emit(Firing {
            progress: 1.0,
            flags: RunFlags::empty(),
        });
    }

    /// Applies a user trigger.
    pub fn trigger(&mut self, now: f64, retrigger: Retrigger, emit: &mut dyn FnMut(Firing)) {
        if self.status == Status::Stopped {
            self.start(now, emit);
            return;
        }

        if retrigger.contains(Retrigger::RESTART) {
            self.stop(false, emit);
            self.start(now, emit);
        }
        if retrigger.contains(Retrigger::RESET) && self.status != Status::Stopped {
            // Re-anchor, fire once, then settle.
            self.start = now;
            self.status = Status::Stopped;
            emit(Firing {
                progress: 0.0,
                flags: RunFlags::empty(),
            });
        }
        if retrigger.contains(Retrigger::FINISH) {
            self.stop(true, emit);
        }
        match self.status {
            Status::Running if retrigger.contains(Retrigger::PAUSE) => {
                self.status = Status::Paused;
            }
            Status::Paused if retrigger.contains(Retrigger::RESUME) => {
                self.start = now;
                self.status = Status::Running;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::event::tests::recorder;

    #[test]
    fn fires_on_period_boundaries_without_drift() {
        let mut log = Vec::new();
        let mut emit = recorder(&mut log);
        let mut p = Periodic::new(0.016);
        p.start(0.0, &mut emit);

        let mut fired_at = Vec::new();
        for ms in [15_u32, 16, 17, 31, 32, 33] {
            let before = p.start_time();
            p.tick(f64::from(ms) / 1000.0, &mut emit);
            if p.start_time() != before {
                fired_at.push(ms);
            }
        }
        drop(emit);

        assert_eq!(fired_at, [16, 32]);
        assert_eq!(p.start_time(), 0.032, "start stepped 0 -> 16 -> 32 ms");
        assert_eq!(log.len(), 3, "start plus two ticks");
    }

    #[test]
    fn start_time_advances_by_whole_periods() {
        let mut emit = |_f: Firing| {};
        let period = 0.0625;
        let mut p = Periodic::new(period);
        p.start(1.0, &mut emit);
        for n in 1..=10 {
            p.tick(1.0 + f64::from(n) * period, &mut emit);
        }
        assert_eq!(p.start_time(), 1.0 + 10.0 * period);
    }

    #[test]
    fn late_tick_fires_once_and_keeps_phase() {
        let mut log = Vec::new();
        let mut emit = recorder(&mut log);
        let mut p = Periodic::new(0.5);
        p.start(0.0, &mut emit);
        p.tick(1.25, &mut emit);
        drop(emit);
        assert_eq!(log.len(), 2);
        assert_eq!(p.start_time(), 0.5, "one period per firing");
    }

    #[test]
    fn zero_period_fires_every_tick() {
        let mut log = Vec::new();
        let mut emit = recorder(&mut log);
        let mut p = Periodic::new(0.0);
        p.start(0.0, &mut emit);
        p.tick(0.0, &mut emit);
        p.tick(0.001, &mut emit);
        drop(emit);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn reset_fires_once_and_stops() {
        let mut log = Vec::new();
        let mut emit = recorder(&mut log);
        let mut p = Periodic::new(1.0);
        p.start(0.0, &mut emit);
        p.trigger(0.4, Retrigger::RESET, &mut emit);
        drop(emit);
        assert_eq!(p.status(), Status::Stopped);
        assert_eq!(p.start_time(), 0.4);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn resume_reanchors_at_now() {
        let mut emit = |_f: Firing| {};
        let toggle = Retrigger::PAUSE | Retrigger::RESUME;
        let mut p = Periodic::new(1.0);
        p.start(0.0, &mut emit);
        p.trigger(0.5, toggle, &mut emit);
        assert_eq!(p.status(), Status::Paused);
        p.trigger(3.0, toggle, &mut emit);
        assert_eq!((p.status(), p.start_time()), (Status::Running, 3.0));
    }

    #[test]
    fn finish_fires_last_run() {
        let mut log = Vec::new();
        let mut emit = recorder(&mut log);
        let mut p = Periodic::new(1.0);
        p.start(0.0, &mut emit);
        p.trigger(0.1, Retrigger::FINISH, &mut emit);
        p.stop(true, &mut emit);
        drop(emit);
        assert_eq!(log.last().map(|f| f.flags), Some(RunFlags::LAST_RUN));
        assert_eq!(log.len(), 2, "stopping twice fires once");
    }
}
