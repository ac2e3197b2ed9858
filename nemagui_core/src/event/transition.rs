// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Duration-bounded, optionally reversible ramp.

use super::{Firing, Retrigger, RunFlags, Status, clamp_unit};

/// A one-shot ramp of `progress` from 0 to 1 over `duration` seconds, or
/// from 1 to 0 while reversed.
///
/// The ramp is time-based: progress is recomputed from the start time on
/// every tick, so missed ticks never slow it down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    duration: f64,
    start: f64,
    progress: f32,
    status: Status,
    reversed: bool,
}

impl Transition {
    /// Creates a stopped transition.
    ///
    /// A duration of zero or less settles on the first tick.
    #[must_use]
    pub const fn new(duration: f64) -> Self {
        Self {
            duration,
            start: 0.0,
            progress: 0.0,
            status: Status::Stopped,
            reversed: false,
        }
    }

    /// Returns the duration in seconds.
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// Returns the wall time the current run is anchored at.
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

    /// Returns whether the transition is playing (or will next play)
    /// backwards.
    #[must_use]
    pub const fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Changes the duration, keeping the current progress.
    pub fn set_duration(&mut self, duration: f64, now: f64) {
        self.duration = duration;
        self.rebase(now);
    }

    /// Changes the direction, keeping the current progress.
    pub fn set_reversed(&mut self, reversed: bool, now: f64) {
        self.reversed = reversed;
        self.rebase(now);
    }

    /// Starts a run from the initial value for the current direction.
    pub fn start(&mut self, now: f64, emit: &mut dyn FnMut(Firing)) {
        self.start = now;
        self.progress = self.initial();
        self.status = Status::Running;
        emit(Firing {
            progress: self.progress,
            flags: self.flags(RunFlags::FIRST_RUN),
        });
    }

    /// Stops the transition.
    ///
    /// With `force_finish`, progress jumps to the terminal value and the
    /// callback sees [`LAST_RUN`](RunFlags::LAST_RUN); otherwise progress
    /// returns to the initial value and the callback sees no flags. Either
    /// way the direction resets to forwards. Stopping a stopped transition
    /// does nothing.
    pub fn stop(&mut self, now: f64, force_finish: bool, emit: &mut dyn FnMut(Firing)) {
        if self.status == Status::Stopped {
            return;
        }
        self.status = Status::Stopped;
        let firing = if force_finish {
            self.progress = self.terminal();
            Firing {
                progress: self.progress,
                flags: self.flags(RunFlags::LAST_RUN),
            }
        } else {
            self.progress = self.initial();
            self.rebase(now);
            Firing {
                progress: self.progress,
                flags: RunFlags::empty(),
            }
        };
        self.reversed = false;
        emit(firing);
    }

    /// Pauses a running transition.
    pub fn pause(&mut self) {
        if self.status == Status::Running {
            self.status = Status::Paused;
        }
    }

    /// Resumes a paused transition from its current progress.
    pub fn resume(&mut self, now: f64) {
        if self.status == Status::Paused {
            self.rebase(now);
            self.status = Status::Running;
        }
    }

    /// Sets progress directly, as when a finger drags a paused screen
    /// transition.
    pub fn set_progress(&mut self, progress: f32, emit: &mut dyn FnMut(Firing)) {
        self.progress = clamp_unit(f64::from(progress));
        emit(Firing {
            progress: self.progress,
            flags: self.flags(RunFlags::empty()),
        });
    }

    /// Advances a running transition to `now`.
    ///
    /// When the terminal value is reached the transition stops; if
    /// `retrigger` contains [`REVERSE`](Retrigger::REVERSE) the direction
    /// flips so that the next run plays back.
    pub fn tick(&mut self, now: f64, retrigger: Retrigger, emit: &mut dyn FnMut(Firing)) {
        if self.status != Status::Running {
            return;
        }
        let raw = if self.duration <= 0.0 {
            1.0
        } else {
            clamp_unit((now - self.start) / self.duration)
        };
        self.progress = if self.reversed { 1.0 - raw } else { raw };

        if self.progress == self.terminal() {
            self.status = Status::Stopped;
            emit(Firing {
                progress: self.progress,
                flags: self.flags(RunFlags::LAST_RUN),
            });
            if retrigger.contains(Retrigger::REVERSE) {
                self.reversed = !self.reversed;
                self.rebase(now);
            }
        } else {
            emit(Firing {
                progress: self.progress,
                flags: self.flags(RunFlags::empty()),
            });
        }
    }

    /// Applies a user trigger.
    ///
    /// A stopped transition starts; unless `retrigger` contains
    /// [`REVERSE`](Retrigger::REVERSE), a fresh run always plays forwards.
    /// An active transition applies the retrigger bits in the documented
    /// precedence order.
    pub fn trigger(&mut self, now: f64, retrigger: Retrigger, emit: &mut dyn FnMut(Firing)) {
        if self.status == Status::Stopped {
            if !retrigger.contains(Retrigger::REVERSE) {
                self.reversed = false;
            }
            self.start(now, emit);
            return;
        }

        if retrigger.contains(Retrigger::RESTART) {
            self.stop(now, false, emit);
            self.start(now, emit);
        }
        if retrigger.contains(Retrigger::RESET) {
            self.stop(now, false, emit);
        }
        if retrigger.contains(Retrigger::FINISH) {
            self.stop(now, true, emit);
        }
        if self.status == Status::Running && retrigger.contains(Retrigger::REVERSE) {
            self.reversed = !self.reversed;
            self.rebase(now);
        }
        match self.status {
            Status::Running if retrigger.contains(Retrigger::PAUSE) => self.pause(),
            Status::Paused if retrigger.contains(Retrigger::RESUME) => self.resume(now),
            _ => {}
        }
    }

    fn initial(&self) -> f32 {
        if self.reversed { 1.0 } else { 0.0 }
    }

    fn terminal(&self) -> f32 {
        if self.reversed { 0.0 } else { 1.0 }
    }

    fn flags(&self, flags: RunFlags) -> RunFlags {
        if self.reversed {
            flags | RunFlags::REVERSED
        } else {
            flags
        }
    }

    /// Re-anchors the start time so the current progress is reproduced at
    /// `now` in the current direction.
    fn rebase(&mut self, now: f64) {
        let done = if self.reversed {
            1.0 - self.progress
        } else {
            self.progress
        };
        self.start = now - self.duration.max(0.0) * f64::from(done);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::event::tests::recorder;

    #[test]
    fn runs_to_completion() {
        let mut log = Vec::new();
        let mut emit = recorder(&mut log);
        let mut t = Transition::new(0.5);
        t.start(1.0, &mut emit);
        t.tick(1.25, Retrigger::empty(), &mut emit);
        t.tick(1.75, Retrigger::empty(), &mut emit);
        drop(emit);

        assert_eq!(t.status(), Status::Stopped);
        assert_eq!(
            log,
            [
                Firing { progress: 0.0, flags: RunFlags::FIRST_RUN },
                Firing { progress: 0.5, flags: RunFlags::empty() },
                Firing { progress: 1.0, flags: RunFlags::LAST_RUN },
            ]
        );
    }

    #[test]
    fn progress_is_monotonic_and_clamped() {
        let mut t = Transition::new(0.3);
        let mut emit = |_f: Firing| {};
        t.start(0.0, &mut emit);
        let mut last = 0.0;
        for i in 0..40 {
            t.tick(f64::from(i) * 0.01, Retrigger::empty(), &mut emit);
            assert!(t.progress() >= last, "non-decreasing at tick {i}");
            assert!((0.0..=1.0).contains(&t.progress()));
            last = t.progress();
        }

        let mut r = Transition::new(0.3);
        r.set_reversed(true, 0.0);
        r.trigger(0.0, Retrigger::REVERSE, &mut emit);
        assert_eq!(r.progress(), 1.0);
        let mut last = 1.0;
        for i in 0..40 {
            r.tick(f64::from(i) * 0.01, Retrigger::empty(), &mut emit);
            assert!(r.progress() <= last, "non-increasing at tick {i}");
            assert!((0.0..=1.0).contains(&r.progress()));
            last = r.progress();
        }
        assert_eq!(r.status(), Status::Stopped);
    }

    #[test]
    fn start_then_stop_restores_initial_value() {
        let mut emit = |_f: Firing| {};
        let mut t = Transition::new(1.0);
        t.start(0.0, &mut emit);
        t.tick(0.4, Retrigger::empty(), &mut emit);
        t.stop(0.4, false, &mut emit);
        assert_eq!((t.progress(), t.status()), (0.0, Status::Stopped));

        let mut r = Transition::new(1.0);
        r.set_reversed(true, 0.0);
        r.start(0.0, &mut emit);
        r.stop(0.0, false, &mut emit);
        assert_eq!((r.progress(), r.status()), (1.0, Status::Stopped));
        assert!(!r.is_reversed(), "stop clears the direction");
    }

    #[test]
    fn forced_stop_is_idempotent() {
        let mut log = Vec::new();
        let mut emit = recorder(&mut log);
        let mut t = Transition::new(1.0);
        t.start(0.0, &mut emit);
        t.stop(0.2, true, &mut emit);
        let after_first = (t.progress(), t.status());
        t.stop(0.3, true, &mut emit);
        drop(emit);

        assert_eq!(after_first, (1.0, Status::Stopped));
        assert_eq!((t.progress(), t.status()), after_first);
        assert_eq!(log.len(), 2, "second stop fires nothing");
        assert_eq!(log[1].flags, RunFlags::LAST_RUN);
    }

    #[test]
    fn zero_duration_settles_on_first_tick() {
        let mut emit = |_f: Firing| {};
        let mut t = Transition::new(0.0);
        t.start(2.0, &mut emit);
        t.tick(2.0, Retrigger::empty(), &mut emit);
        assert_eq!((t.progress(), t.status()), (1.0, Status::Stopped));

        let mut n = Transition::new(-1.0);
        n.start(0.0, &mut emit);
        n.tick(0.0, Retrigger::empty(), &mut emit);
        assert_eq!(n.progress(), 1.0, "negative duration is clamped");
    }

    #[test]
    fn reverse_retrigger_flips_direction_on_settle() {
        let mut log = Vec::new();
        let mut emit = recorder(&mut log);
        let mut t = Transition::new(1.0);
        t.trigger(0.0, Retrigger::REVERSE, &mut emit);
        t.tick(1.0, Retrigger::REVERSE, &mut emit);
        assert!(t.is_reversed());

        // The next trigger plays backwards from 1.
        t.trigger(2.0, Retrigger::REVERSE, &mut emit);
        t.tick(2.5, Retrigger::REVERSE, &mut emit);
        t.tick(3.0, Retrigger::REVERSE, &mut emit);
        drop(emit);

        assert!(!t.is_reversed(), "flipped back after settling at 0");
        assert_eq!(log[2], Firing { progress: 1.0, flags: RunFlags::FIRST_RUN | RunFlags::REVERSED });
        assert_eq!(log[3], Firing { progress: 0.5, flags: RunFlags::REVERSED });
        assert_eq!(log[4], Firing { progress: 0.0, flags: RunFlags::LAST_RUN | RunFlags::REVERSED });
    }

    #[test]
    fn fresh_trigger_without_reverse_plays_forwards() {
        let mut emit = |_f: Firing| {};
        let mut t = Transition::new(1.0);
        t.set_reversed(true, 0.0);
        t.trigger(0.0, Retrigger::empty(), &mut emit);
        assert_eq!(t.progress(), 0.0);
        assert!(!t.is_reversed());
    }

    #[test]
    fn reverse_while_running_keeps_continuity() {
        let mut emit = |_f: Firing| {};
        let mut t = Transition::new(1.0);
        t.start(0.0, &mut emit);
        t.tick(0.25, Retrigger::empty(), &mut emit);
        t.trigger(0.25, Retrigger::REVERSE, &mut emit);
        assert!(t.is_reversed());
        assert_eq!(t.start_time(), 0.25 - 0.75);

        t.tick(0.25, Retrigger::empty(), &mut emit);
        assert_eq!(t.progress(), 0.25, "no jump on reversal");
        t.tick(0.5, Retrigger::empty(), &mut emit);
        assert_eq!((t.progress(), t.status()), (0.0, Status::Stopped));
    }

    #[test]
    fn pause_and_resume_preserve_progress() {
        let mut emit = |_f: Firing| {};
        let toggle = Retrigger::PAUSE | Retrigger::RESUME;
        let mut t = Transition::new(1.0);
        t.start(0.0, &mut emit);
        t.tick(0.5, Retrigger::empty(), &mut emit);
        t.trigger(0.5, toggle, &mut emit);
        assert_eq!(t.status(), Status::Paused);

        // Time passes while paused.
        t.tick(5.0, Retrigger::empty(), &mut emit);
        assert_eq!(t.progress(), 0.5);

        t.trigger(5.0, toggle, &mut emit);
        assert_eq!(t.status(), Status::Running);
        t.tick(5.25, Retrigger::empty(), &mut emit);
        assert_eq!(t.progress(), 0.75);
    }

    #[test]
    fn retrigger_precedence() {
        let mut log = Vec::new();
        let mut emit = recorder(&mut log);
        let mut t = Transition::new(1.0);
        t.start(0.0, &mut emit);
        t.tick(0.5, Retrigger::empty(), &mut emit);
        // RESTART runs before PAUSE: the restarted run is then paused at 0.
        t.trigger(0.5, Retrigger::RESTART | Retrigger::PAUSE, &mut emit);
        assert_eq!((t.progress(), t.status()), (0.0, Status::Paused));

        // FINISH settles the event, so the RESUME bit has nothing to resume.
        t.trigger(0.6, Retrigger::FINISH | Retrigger::RESUME, &mut emit);
        drop(emit);
        assert_eq!((t.progress(), t.status()), (1.0, Status::Stopped));
        assert_eq!(log.last().map(|f| f.flags), Some(RunFlags::LAST_RUN));
    }

    #[test]
    fn resume_after_duration_change() {
        let mut emit = |_f: Firing| {};
        let mut t = Transition::new(0.3);
        t.start(0.0, &mut emit);
        t.pause();
        t.set_progress(0.5, &mut emit);
        t.set_duration(0.1, 1.0);
        t.resume(1.0);
        t.tick(1.0, Retrigger::empty(), &mut emit);
        assert!((t.progress() - 0.5).abs() < 1e-6, "resumed where it was paused");
        t.tick(1.2, Retrigger::empty(), &mut emit);
        assert_eq!((t.progress(), t.status()), (1.0, Status::Stopped));
    }
}
