// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Duration-bounded ramp repeated every period.

use super::{Firing, Retrigger, RunFlags, Status, clamp_unit};

/// A 0→1 ramp over `duration` seconds that restarts every `period`
/// seconds, such as a pulsing highlight.
///
/// Between the end of the ramp and the next period boundary the event is
/// idle: progress is pinned to 1 once, with
/// [`LAST_RUN`](RunFlags::LAST_RUN), and no further callbacks fire until the
/// next period starts. A period of zero or less never wraps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeriodicTransition {
    duration: f64,
    period: f64,
    start: f64,
    progress: f32,
    status: Status,
    /// Time into the current period when paused.
    paused_elapsed: f64,
}

impl PeriodicTransition {
    /// Creates a stopped periodic transition.
    #[must_use]
    pub const fn new(duration: f64, period: f64) -> Self {
        Self {
            duration,
            period,
            start: 0.0,
            progress: 0.0,
            status: Status::Stopped,
            paused_elapsed: 0.0,
        }
    }

    /// Returns the ramp duration in seconds.
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.duration
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

    /// Returns the current progress in `[0, 1]`.
    #[must_use]
    pub const fn progress(&self) -> f32 {
        self.progress
    }

    /// Returns the run status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Starts a run anchored at `now`.
    pub fn start(&mut self, now: f64, emit: &mut dyn FnMut(Firing)) {
        self.start = now;
        self.progress = 0.0;
        self.status = Status::Running;
        emit(Firing {
            progress: 0.0,
            flags: RunFlags::FIRST_RUN,
        });
    }

    /// Stops the event, at 1 with [`LAST_RUN`](RunFlags::LAST_RUN) when
    /// `force_finish` is set, otherwise back at 0.
    pub fn stop(&mut self, force_finish: bool, emit: &mut dyn FnMut(Firing)) {
        if self.status == Status::Stopped {
            return;
        }
        self.status = Status::Stopped;
        let (progress, flags) = if force_finish {
            (1.0, RunFlags::LAST_RUN)
        } else {
            (0.0, RunFlags::empty())
        };
        self.progress = progress;
        emit(Firing { progress, flags });
    }

    /// Advances a running event to `now`.
    pub fn tick(&mut self, now: f64, emit: &mut dyn FnMut(Firing)) {
        if self.status != Status::Running {
            return;
        }
        let elapsed = now - self.start;
        if self.period > 0.0 && elapsed >= self.period {
            // Skip whole periods so that late ticks keep the phase.
            #[expect(
                clippy::cast_possible_truncation,
                reason = "elapsed >= period > 0, so the quotient is at least 1"
            )]
            let periods = (elapsed / self.period) as u64;
            self.start += periods as f64 * self.period;
            self.progress = self.ramp(now - self.start);
            emit(Firing {
                progress: self.progress,
                flags: RunFlags::empty(),
            });
        } else if elapsed < self.duration {
            self.progress = self.ramp(elapsed);
            emit(Firing {
                progress: self.progress,
                flags: RunFlags::empty(),
            });
        } else if self.progress < 1.0 {
            self.progress = 1.0;
            emit(Firing {
                progress: 1.0,
                flags: RunFlags::LAST_RUN,
            });
        }
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
        if retrigger.contains(Retrigger::RESET) {
            self.stop(false, emit);
        }
        if retrigger.contains(Retrigger::FINISH) {
            self.stop(true, emit);
        }
        match self.status {
            Status::Running if retrigger.contains(Retrigger::PAUSE) => {
                self.paused_elapsed = now - self.start;
                self.status = Status::Paused;
            }
            Status::Paused if retrigger.contains(Retrigger::RESUME) => {
                self.start = now - self.paused_elapsed;
                self.status = Status::Running;
            }
            _ => {}
        }
    }

    fn ramp(&self, elapsed: f64) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            clamp_unit(elapsed / self.duration)
        }
    }
}
