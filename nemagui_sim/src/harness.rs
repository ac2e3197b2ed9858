// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The simulated host loop.

use kurbo::{Point, Vec2};
use nemagui_core::clock::ManualClock;
use nemagui_core::config::EngineConfig;
use nemagui_core::display::FrameStats;
use nemagui_core::engine::Engine;
use nemagui_core::event::Event;
use nemagui_core::screen::ScreenGroups;
use nemagui_core::trace::{TraceSink, Tracer};
use nemagui_core::tree::SceneTree;

use crate::painter::RecordingPainter;
use crate::timer::SimTimer;

/// One step of a pointer script.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    /// Put the pointer down.
    Press(Point),
    /// Move the pointer; the delta is taken from the previous position.
    MoveTo(Point),
    /// Lift the pointer where it is.
    Release,
    /// Let simulated time pass, delivering timer ticks.
    Wait(f64),
}

/// Owns an [`Engine`] together with the simulated clock, timer service and
/// painter it runs against.
///
/// Time only moves when the harness is told to. Timer ticks are delivered
/// one period apart while the engine keeps its timer armed, exactly as a
/// host interrupt would.
#[derive(Debug)]
pub struct Harness {
    engine: Engine,
    clock: ManualClock,
    timers: SimTimer,
    painter: RecordingPainter,
    pointer: Point,
}

impl Harness {
    /// Builds an engine at time zero and starts it.
    #[must_use]
    pub fn new(
        config: EngineConfig,
        tree: SceneTree,
        groups: ScreenGroups,
        events: Vec<Event>,
    ) -> Self {
        Self::build(config, tree, groups, events, None)
    }

    /// Like [`new`](Self::new), routing engine diagnostics to `sink` from
    /// the very first dispatch.
    #[must_use]
    pub fn with_sink(
        config: EngineConfig,
        tree: SceneTree,
        groups: ScreenGroups,
        events: Vec<Event>,
        sink: Box<dyn TraceSink>,
    ) -> Self {
        Self::build(config, tree, groups, events, Some(sink))
    }

    fn build(
        config: EngineConfig,
        tree: SceneTree,
        groups: ScreenGroups,
        events: Vec<Event>,
        sink: Option<Box<dyn TraceSink>>,
    ) -> Self {
        let clock = ManualClock::new(0.0);
        let timers = SimTimer::new();
        let mut engine = Engine::new(
            config,
            tree,
            groups,
            events,
            Box::new(clock.clone()),
            Box::new(timers.clone()),
        );
        if let Some(sink) = sink {
            engine.set_tracer(Tracer::new(sink));
        }
        engine.start();
        Self {
            engine,
            clock,
            timers,
            painter: RecordingPainter::new(),
            pointer: Point::ORIGIN,
        }
    }

    /// Returns the engine.
    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Returns the engine for direct calls.
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Returns the timer service handle.
    #[must_use]
    pub fn timers(&self) -> &SimTimer {
        &self.timers
    }

    /// Returns the painter used by [`frame`](Self::frame).
    pub fn painter_mut(&mut self) -> &mut RecordingPainter {
        &mut self.painter
    }

    /// Returns the simulated time in seconds.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.engine.now()
    }

    // -- Time --

    fn period(&self) -> f64 {
        f64::from(self.engine.timer().period_ms().max(1)) / 1000.0
    }

    /// Moves the clock to `ms` milliseconds and delivers one timer tick if
    /// the timer is armed.
    ///
    /// Returns whether a tick was delivered.
    pub fn tick_at_millis(&mut self, ms: u64) -> bool {
        self.clock.set_millis(ms);
        self.deliver_tick()
    }

    /// Advances the clock by one timer period and delivers a tick if the
    /// timer is armed.
    pub fn step(&mut self) -> bool {
        self.clock.advance(self.period());
        self.deliver_tick()
    }

    /// Lets `secs` of simulated time pass, one timer period at a time.
    ///
    /// Returns the number of ticks delivered.
    pub fn run_for(&mut self, secs: f64) -> u32 {
        let end = self.now() + secs;
        let mut ticks = 0;
        while self.now() < end {
            let next = (self.now() + self.period()).min(end);
            self.clock.set(next);
            if self.deliver_tick() {
                ticks += 1;
            }
        }
        ticks
    }

    /// Steps until the timer is cancelled or `max_steps` steps have passed.
    ///
    /// Returns the number of steps taken.
    pub fn run_until_idle(&mut self, max_steps: u32) -> u32 {
        let mut steps = 0;
        while self.timers.is_armed() && steps < max_steps {
            self.step();
            steps += 1;
        }
        steps
    }

    fn deliver_tick(&mut self) -> bool {
        if !self.timers.is_armed() {
            return false;
        }
        self.engine.timer_tick();
        true
    }

    // -- Input --

    /// Presses at `point`.
    pub fn press(&mut self, point: Point) {
        self.pointer = point;
        self.engine.press(point.x, point.y);
    }

    /// Moves the pointer to `point`.
    pub fn move_to(&mut self, point: Point) {
        let delta = point - self.pointer;
        self.pointer = point;
        self.engine.swipe(point.x, point.y, delta.x, delta.y);
    }

    /// Moves the pointer by `delta` in `steps` equal samples.
    pub fn drag_by(&mut self, delta: Vec2, steps: u32) {
        let steps = steps.max(1);
        let step = delta / f64::from(steps);
        for _ in 0..steps {
            self.move_to(self.pointer + step);
        }
    }

    /// Releases the pointer where it is.
    pub fn release(&mut self) {
        self.engine.release(self.pointer.x, self.pointer.y);
    }

    /// Presses and releases at `point`.
    pub fn tap(&mut self, point: Point) {
        self.press(point);
        self.release();
    }

    /// Plays a pointer script.
    pub fn play(&mut self, script: &[Input]) {
        for input in script {
            match *input {
                Input::Press(point) => self.press(point),
                Input::MoveTo(point) => self.move_to(point),
                Input::Release => self.release(),
                Input::Wait(secs) => {
                    self.run_for(secs);
                }
            }
        }
    }

    // -- Display --

    /// Draws a frame into the recording painter if the engine has anything
    /// to draw.
    pub fn frame(&mut self) -> Option<FrameStats> {
        self.engine
            .needs_update()
            .then(|| self.engine.draw(&mut self.painter))
    }
}
