// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted session that exercises the tracing and diagnostics pipeline.
//!
//! Builds a two-screen watch face, taps a button that slides to the second
//! screen, swipes back, and lets a blinking indicator run throughout. Events
//! are printed by a [`PrettyPrintSink`] and recorded by a [`RecorderSink`];
//! the recording is then exported as a Chrome trace JSON file.

use std::cell::RefCell;
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use kurbo::{Point, Rect};
use nemagui_core::actions;
use nemagui_core::anim_buffer::Effect;
use nemagui_core::config::EngineConfig;
use nemagui_core::event::{Event, Retrigger, Trigger};
use nemagui_core::screen::ScreenGroups;
use nemagui_core::trace::{
    DisplayModeEvent, EventFiredEvent, FrameEvent, GestureEvent, ScreenChangeEvent,
    StatusChangeEvent, TimerEvent, TraceSink,
};
use nemagui_core::tree::{GraphicsItem, Layout, NodeFlags, SceneTree};
use nemagui_debug::pretty::PrettyPrintSink;
use nemagui_debug::recorder::RecorderSink;
use nemagui_sim::{Harness, Input};

/// Forwards every event to two sinks.
struct Tee<A, B> {
    a: A,
    b: B,
}

impl<A: TraceSink, B: TraceSink> TraceSink for Tee<A, B> {
    fn on_event_fired(&mut self, e: &EventFiredEvent) {
        self.a.on_event_fired(e);
        self.b.on_event_fired(e);
    }

    fn on_status_changed(&mut self, e: &StatusChangeEvent) {
        self.a.on_status_changed(e);
        self.b.on_status_changed(e);
    }

    fn on_gesture(&mut self, e: &GestureEvent) {
        self.a.on_gesture(e);
        self.b.on_gesture(e);
    }

    fn on_display_mode(&mut self, e: &DisplayModeEvent) {
        self.a.on_display_mode(e);
        self.b.on_display_mode(e);
    }

    fn on_timer(&mut self, e: &TimerEvent) {
        self.a.on_timer(e);
        self.b.on_timer(e);
    }

    fn on_screen_changed(&mut self, e: &ScreenChangeEvent) {
        self.a.on_screen_changed(e);
        self.b.on_screen_changed(e);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.a.on_frame(e);
        self.b.on_frame(e);
    }
}

/// Frames drawn per simulated second.
const FRAME_RATE: u32 = 30;

fn main() {
    let config = EngineConfig::watch_390();
    let full = Rect::from_origin_size(Point::ORIGIN, config.resolution);

    // -- scene -------------------------------------------------------------
    let mut tree = SceneTree::new();
    let home = tree.create_node(full, GraphicsItem::Screen, NodeFlags::DRAGGABLE);
    let details = tree.create_node(full, GraphicsItem::Screen, NodeFlags::DRAGGABLE);
    let button = tree.create_node(
        Rect::new(145.0, 250.0, 245.0, 300.0),
        GraphicsItem::Button,
        NodeFlags::PRESSABLE,
    );
    let indicator = tree.create_node(
        Rect::new(185.0, 40.0, 205.0, 60.0),
        GraphicsItem::Rectangle { opacity: 1.0 },
        NodeFlags::FILL_COLOR,
    );
    tree.add_child(home, button);
    tree.add_child(home, indicator);

    let events = vec![
        Event::transition(button, Trigger::Release, 0.1)
            .with_retrigger(Retrigger::IGNORE)
            .with_action(actions::show_screen(details, Effect::LinearHorizontal, true)),
        Event::periodic_transition(indicator, Trigger::AppStart, 0.25, 0.5)
            .with_action(actions::fade_node(indicator)),
    ];
    let groups = ScreenGroups::single(Layout::Horizontal, vec![home, details]);

    // -- sinks -------------------------------------------------------------
    let recorder = Rc::new(RefCell::new(RecorderSink::new()));
    let sink = Tee {
        a: PrettyPrintSink::new(Box::new(std::io::stdout())),
        b: Rc::clone(&recorder),
    };
    let mut harness = Harness::with_sink(config, tree, groups, events, Box::new(sink));

    // -- script ------------------------------------------------------------
    let frame_interval = 1.0 / f64::from(FRAME_RATE);
    let wait = Input::Wait(frame_interval);
    let mut script = vec![wait; 10];
    script.push(Input::Press(Point::new(195.0, 275.0)));
    script.push(Input::Release);
    script.extend([wait; 20]);
    script.push(Input::Press(Point::new(60.0, 200.0)));
    for x in [100.0, 160.0, 220.0, 280.0] {
        script.push(Input::MoveTo(Point::new(x, 200.0)));
        script.push(wait);
    }
    script.push(Input::Release);
    script.extend([wait; 20]);

    for input in script {
        harness.play(&[input]);
        if matches!(input, Input::Wait(_)) {
            harness.frame();
        }
    }

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    nemagui_debug::chrome::export(recorder.borrow().as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!(
        "Wrote {path}; ended on screen {:?} after {:.2}s",
        harness.engine().current_screen(),
        harness.now()
    );
}
