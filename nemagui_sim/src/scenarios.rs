// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end behaviour of the engine under a simulated host.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size, Vec2};
use nemagui_core::actions::{self, ActionCtx};
use nemagui_core::anim_buffer::Effect;
use nemagui_core::config::EngineConfig;
use nemagui_core::event::{Event, EventKind, RunFlags, Status, Trigger};
use nemagui_core::gesture::{GestureHandler, GestureInfo};
use nemagui_core::screen::{DisplayMode, ScreenGroups};
use nemagui_core::tree::item::Slider;
use nemagui_core::tree::{GraphicsItem, Layout, NodeFlags, NodeId, SceneTree};
use nemagui_debug::recorder::{RecordedEvent, RecorderSink, decode};

use crate::{Harness, Input, PaintOp, TimerCall};

const RES: Size = Size::new(200.0, 100.0);

type Log = Rc<RefCell<Vec<&'static str>>>;

fn logger(log: &Log, name: &'static str) -> GestureHandler {
    let log = Rc::clone(log);
    Box::new(move |_: &mut ActionCtx<'_>, _: &GestureInfo| log.borrow_mut().push(name))
}

/// Two full-screen screens in one horizontal group.
fn screens(tree: &mut SceneTree, flags: NodeFlags) -> [NodeId; 2] {
    let full = Rect::from_origin_size(Point::ORIGIN, RES);
    [
        tree.create_node(full, GraphicsItem::Screen, flags),
        tree.create_node(full, GraphicsItem::Screen, flags),
    ]
}

fn group(s: [NodeId; 2]) -> ScreenGroups {
    ScreenGroups::single(Layout::Horizontal, s.to_vec())
}

fn transition_progress(h: &Harness) -> f32 {
    let engine = h.engine();
    engine
        .registry()
        .get(engine.screen_transition_event())
        .progress()
}

fn transition_status(h: &Harness) -> Status {
    let engine = h.engine();
    engine
        .registry()
        .get(engine.screen_transition_event())
        .status()
}

#[test]
fn button_release_shows_second_screen() {
    let mut tree = SceneTree::new();
    let s = screens(&mut tree, NodeFlags::empty());
    let button = tree.create_node(
        Rect::new(20.0, 20.0, 80.0, 60.0),
        GraphicsItem::Button,
        NodeFlags::PRESSABLE,
    );
    tree.add_child(s[0], button);
    let log = Log::default();
    tree.on_release(button, logger(&log, "release"));
    let events = vec![
        Event::transition(button, Trigger::Release, 0.3).with_action(actions::show_screen(
            s[1],
            Effect::LinearHorizontal,
            true,
        )),
    ];
    let mut h = Harness::new(EngineConfig::new(RES), tree, group(s), events);

    h.tap(Point::new(50.0, 40.0));
    assert_eq!(*log.borrow(), ["release"]);
    assert_eq!(h.engine().display_mode(), DisplayMode::ScreenTransition);
    assert_eq!(transition_status(&h), Status::Running);
    assert_eq!(transition_progress(&h), 0.0);
    let transition = *h.engine().screen_transition().expect("transition started");
    assert_eq!((transition.from, transition.to), (s[0], s[1]));
    assert!(transition.go_right, "enters from the right");
    assert!(h.timers().is_armed(), "timer armed for the transition");

    h.run_for(0.3);
    assert_eq!(h.engine().current_screen(), s[1]);
    assert_eq!(h.engine().current_position(), (0, 1));
    assert_eq!(transition_status(&h), Status::Stopped);
    assert_eq!(h.engine().display_mode(), DisplayMode::Screen);
    assert!(h.engine().screen_transition().is_none(), "transition cleared");
    assert!(!h.timers().is_armed(), "timer cancelled once idle");
}

/// A button on the first screen that slides in the second one.
fn button_to_second_screen() -> (Harness, [NodeId; 2]) {
    let mut tree = SceneTree::new();
    let s = screens(&mut tree, NodeFlags::empty());
    let button = tree.create_node(
        Rect::new(20.0, 20.0, 80.0, 60.0),
        GraphicsItem::Button,
        NodeFlags::PRESSABLE,
    );
    tree.add_child(s[0], button);
    let events = vec![
        Event::transition(button, Trigger::Release, 0.3).with_action(actions::show_screen(
            s[1],
            Effect::LinearHorizontal,
            true,
        )),
    ];
    let h = Harness::new(EngineConfig::new(RES), tree, group(s), events);
    (h, s)
}

#[test]
fn press_grabs_a_running_transition_and_release_completes_it() {
    let (mut h, s) = button_to_second_screen();
    h.tap(Point::new(50.0, 40.0));
    h.run_for(0.16);
    let grabbed_at = transition_progress(&h);
    assert!(grabbed_at >= 1.0 / 3.0, "past the abort threshold: {grabbed_at}");

    h.press(Point::new(150.0, 50.0));
    assert_eq!(transition_status(&h), Status::Paused);
    h.run_for(0.1);
    assert_eq!(transition_progress(&h), grabbed_at, "held while pressed");
    assert_eq!(h.engine().display_mode(), DisplayMode::ScreenTransition);

    h.release();
    assert_eq!(transition_status(&h), Status::Running);
    assert!(h.run_until_idle(100) < 100, "transition never settled");
    assert_eq!(h.engine().current_screen(), s[1]);
    assert_eq!(h.engine().display_mode(), DisplayMode::Screen);
}

#[test]
fn press_grabs_an_early_transition_and_release_aborts_it() {
    let (mut h, s) = button_to_second_screen();
    h.tap(Point::new(50.0, 40.0));
    h.run_for(0.048);
    let grabbed_at = transition_progress(&h);
    assert!(
        grabbed_at > 0.0 && grabbed_at < 1.0 / 3.0,
        "before the abort threshold: {grabbed_at}"
    );

    h.press(Point::new(150.0, 50.0));
    assert_eq!(transition_status(&h), Status::Paused);
    h.release();
    assert!(h.run_until_idle(100) < 100, "transition never settled");
    assert_eq!(transition_progress(&h), 0.0);
    assert_eq!(h.engine().current_screen(), s[0]);
    assert_eq!(h.engine().display_mode(), DisplayMode::Screen);
}

#[test]
fn short_swipe_aborts_back_to_original_screen() {
    let mut tree = SceneTree::new();
    let s = screens(&mut tree, NodeFlags::DRAGGABLE);
    let mut h = Harness::new(EngineConfig::new(RES), tree, group(s), Vec::new());
    h.engine_mut().set_current_screen(s[1]);

    h.play(&[
        Input::Press(Point::new(10.0, 10.0)),
        Input::MoveTo(Point::new(60.0, 10.0)),
    ]);
    assert_eq!(h.engine().display_mode(), DisplayMode::ScreenTransition);
    let transition = *h.engine().screen_transition().expect("swipe started a transition");
    assert_eq!((transition.from, transition.to), (s[1], s[0]));
    assert!(!transition.go_right, "a rightward swipe brings in the previous screen");
    assert_eq!(transition_status(&h), Status::Paused);
    assert!((transition_progress(&h) - 0.25).abs() < 1e-6, "50 of 200 px");

    h.release();
    assert_eq!(transition_status(&h), Status::Running);

    let mut last = transition_progress(&h);
    let mut steps = 0;
    while transition_status(&h) != Status::Stopped {
        assert!(steps < 100, "transition never settled");
        h.step();
        let progress = transition_progress(&h);
        assert!(progress <= last, "progress moved forward: {last} -> {progress}");
        last = progress;
        steps += 1;
    }
    assert_eq!(last, 0.0);
    assert_eq!(h.engine().current_screen(), s[1]);
    assert_eq!(h.engine().display_mode(), DisplayMode::Screen);
}

#[test]
fn long_swipe_completes_to_neighbour() {
    let mut tree = SceneTree::new();
    let s = screens(&mut tree, NodeFlags::DRAGGABLE);
    let mut h = Harness::new(EngineConfig::new(RES), tree, group(s), Vec::new());

    h.press(Point::new(180.0, 50.0));
    h.drag_by(Vec2::new(-120.0, 0.0), 4);
    assert!(
        (transition_progress(&h) - 0.6).abs() < 1e-6,
        "120 of 200 px dragged"
    );
    h.release();
    h.run_until_idle(100);

    assert_eq!(h.engine().current_screen(), s[1]);
    assert_eq!(transition_status(&h), Status::Stopped);
}

#[test]
fn periodic_event_keeps_its_phase() {
    let mut tree = SceneTree::new();
    let s = screens(&mut tree, NodeFlags::empty());
    let fired = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&fired);
    let events = vec![
        Event::periodic(s[0], Trigger::AppStart, 0.016).with_action(move |ctx, f| {
            if !f.flags.contains(RunFlags::FIRST_RUN) {
                log.borrow_mut().push(ctx.now());
            }
        }),
    ];
    let mut h = Harness::new(EngineConfig::new(RES), tree, group(s), events);
    let id = h.engine().registry().ids().next().expect("periodic event");
    let start_time = |h: &Harness| match h.engine().registry().get(id).kind() {
        EventKind::Periodic(p) => p.start_time(),
        other => panic!("expected a periodic event, got {other:?}"),
    };

    let mut starts = Vec::new();
    for ms in [15, 16, 17, 31, 32, 48] {
        assert!(h.tick_at_millis(ms), "timer stays armed");
        starts.push(start_time(&h));
    }

    assert_eq!(*fired.borrow(), [0.016, 0.032, 0.048]);
    assert_eq!(starts, [0.0, 0.016, 0.016, 0.016, 0.032, 0.048]);
}

#[test]
fn swipe_margin_separates_taps_from_swipes() {
    let mut tree = SceneTree::new();
    let s = screens(&mut tree, NodeFlags::empty());
    let button = tree.create_node(
        Rect::new(20.0, 20.0, 80.0, 60.0),
        GraphicsItem::Button,
        NodeFlags::PRESSABLE,
    );
    let slider = tree.create_node(
        Rect::new(100.0, 20.0, 180.0, 60.0),
        GraphicsItem::Slider(Slider::default()),
        NodeFlags::DRAGGABLE,
    );
    tree.add_child(s[0], button);
    tree.add_child(s[0], slider);
    let log = Log::default();
    tree.on_abort(button, logger(&log, "abort"));
    tree.on_release(button, logger(&log, "release"));
    tree.on_swipe(slider, logger(&log, "slide"));
    let mut h = Harness::new(EngineConfig::new(RES), tree, group(s), Vec::new());

    let directions = [
        Vec2::new(1.0, 0.0),
        Vec2::new(-1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(0.6, -0.8),
    ];
    for dir in directions {
        for distance in [1.0, 2.5, 4.9] {
            log.borrow_mut().clear();
            h.press(Point::new(50.0, 40.0));
            h.drag_by(dir * distance, 3);
            h.release();
            assert_eq!(
                *log.borrow(),
                ["release"],
                "{distance} px towards {dir:?} is still a tap"
            );
        }

        log.borrow_mut().clear();
        h.press(Point::new(50.0, 40.0));
        h.drag_by(dir * 8.0, 2);
        h.release();
        assert_eq!(*log.borrow(), ["abort"], "8 px towards {dir:?} is a swipe");

        log.borrow_mut().clear();
        h.press(Point::new(140.0, 40.0));
        h.drag_by(dir, 1);
        h.release();
        assert_eq!(
            *log.borrow(),
            ["slide"],
            "1 px on a draggable node towards {dir:?} is a swipe"
        );
    }
}

#[test]
fn trace_records_a_full_screen_change() {
    let mut tree = SceneTree::new();
    let s = screens(&mut tree, NodeFlags::empty());
    let recorder = Rc::new(RefCell::new(RecorderSink::new()));
    let mut h = Harness::with_sink(
        EngineConfig::new(RES),
        tree,
        group(s),
        Vec::new(),
        Box::new(Rc::clone(&recorder)),
    );

    h.engine_mut().show_screen(s[1], Effect::Fade, true);
    h.frame();
    h.run_until_idle(100);
    h.frame();

    let recorder = recorder.borrow();
    let events: Vec<_> = decode(recorder.as_bytes()).collect();
    let modes: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            RecordedEvent::DisplayMode(m) => Some(m.to),
            _ => None,
        })
        .collect();
    assert_eq!(modes, [DisplayMode::ScreenTransition, DisplayMode::Screen]);
    assert!(
        events.iter().any(|e| matches!(
            e,
            RecordedEvent::ScreenChanged(c) if c.from == s[0] && c.to == s[1]
        )),
        "screen change recorded"
    );
    let timer: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            RecordedEvent::Timer(t) => Some(t.armed),
            _ => None,
        })
        .collect();
    assert_eq!(timer, [true, false]);
    let frames = events
        .iter()
        .filter(|e| matches!(e, RecordedEvent::Frame(_)))
        .count();
    assert_eq!(frames, 2);
    assert_eq!(
        h.timers().calls().len(),
        3,
        "created once, armed once, cancelled once"
    );
    assert!(matches!(h.timers().calls()[0], TimerCall::Create(_)));
}

#[test]
fn buffered_transition_renders_screens_once() {
    let mut tree = SceneTree::new();
    let s = screens(&mut tree, NodeFlags::empty());
    let config = EngineConfig::new(RES).with_animation_buffers(2);
    let mut h = Harness::new(config, tree, group(s), Vec::new());
    h.frame();
    h.painter_mut().take();

    h.engine_mut().show_screen(s[1], Effect::LinearHorizontal, true);
    h.step();
    h.frame().expect("transition frame");
    let first = h.painter_mut().take();
    let begins = first
        .iter()
        .filter(|op| matches!(op, PaintOp::BeginBuffer(_)))
        .count();
    let blits = first
        .iter()
        .filter(|op| matches!(op, PaintOp::Blit { .. }))
        .count();
    assert_eq!((begins, blits), (2, 2));

    h.step();
    h.frame().expect("transition frame");
    let second = h.painter_mut().take();
    assert!(
        !second.iter().any(|op| matches!(op, PaintOp::BeginBuffer(_))),
        "buffers are reused"
    );
    assert!(
        second.iter().any(|op| matches!(op, PaintOp::Blit { buffer: 1, .. })),
        "incoming screen blitted"
    );
}

#[test]
fn direct_transition_draws_both_screens_offset() {
    let mut tree = SceneTree::new();
    let s = screens(&mut tree, NodeFlags::empty());
    let mut h = Harness::new(EngineConfig::new(RES), tree, group(s), Vec::new());
    h.frame();
    h.painter_mut().take();

    h.engine_mut().show_screen(s[1], Effect::LinearHorizontal, true);
    h.run_for(0.15);
    h.frame().expect("transition frame");

    let painter = h.painter_mut();
    assert_eq!(painter.drawn_nodes(), [s[0], s[1]]);
    let from = painter.last_rect(s[0]).expect("outgoing drawn");
    let to = painter.last_rect(s[1]).expect("incoming drawn");
    assert!((from.x0 + 100.0).abs() < 1e-9, "halfway out: {from:?}");
    assert!((to.x0 - 100.0).abs() < 1e-9, "halfway in: {to:?}");
}

#[test]
fn only_damaged_nodes_are_redrawn() {
    let mut tree = SceneTree::new();
    let s = screens(&mut tree, NodeFlags::empty());
    let label = tree.create_node(
        Rect::new(10.0, 10.0, 60.0, 30.0),
        GraphicsItem::Label,
        NodeFlags::empty(),
    );
    let other = tree.create_node(
        Rect::new(120.0, 60.0, 180.0, 90.0),
        GraphicsItem::Label,
        NodeFlags::empty(),
    );
    tree.add_child(s[0], label);
    tree.add_child(s[0], other);
    let mut h = Harness::new(EngineConfig::new(RES), tree, group(s), Vec::new());
    h.frame();
    h.painter_mut().take();

    h.engine_mut().tree_mut().invalidate(label);
    let stats = h.frame().expect("label damaged");
    assert_eq!(stats.damage, Some(Rect::new(10.0, 10.0, 60.0, 30.0)));
    assert_eq!(h.painter_mut().drawn_nodes(), [s[0], label]);
}

#[test]
fn popup_release_outside_closes_it() {
    let mut tree = SceneTree::new();
    let s = screens(&mut tree, NodeFlags::PRESSABLE);
    let popup = tree.create_node(
        Rect::new(0.0, 0.0, 80.0, 40.0),
        GraphicsItem::Container,
        NodeFlags::empty(),
    );
    let ok = tree.create_node(
        Rect::new(10.0, 10.0, 70.0, 30.0),
        GraphicsItem::Button,
        NodeFlags::PRESSABLE,
    );
    tree.add_child(popup, ok);
    let log = Log::default();
    tree.on_release(ok, logger(&log, "ok"));
    let events =
        vec![Event::transition(ok, Trigger::Release, 0.0).with_action(actions::close_popup())];
    let mut h = Harness::new(EngineConfig::new(RES), tree, group(s), events);

    h.engine_mut().set_popup(popup);
    assert_eq!(h.engine().display_mode(), DisplayMode::Popup);
    h.tap(Point::new(100.0, 50.0));
    assert_eq!(*log.borrow(), ["ok"]);
    assert_eq!(h.engine().display_mode(), DisplayMode::Screen);

    h.engine_mut().set_popup(popup);
    h.tap(Point::new(5.0, 5.0));
    assert!(h.engine().popup().is_none(), "dismissed by a tap outside");
    assert_eq!(*log.borrow(), ["ok"]);
}
