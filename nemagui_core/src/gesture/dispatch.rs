// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Press, swipe and release entry points.

use kurbo::{Point, Vec2};

use super::{GestureInfo, HandlerKind};
use crate::actions::ActionCtx;
use crate::anim_buffer::Effect;
use crate::engine::Engine;
use crate::event::{EventKind, Status, Trigger};
use crate::screen::{DisplayMode, ScreenTransition};
use crate::trace::{GestureEvent, GestureKind};
use crate::tree::{ItemKind, Layout, NodeFlags, NodeId};

impl Engine {
    /// Handles a press at `(x, y)`.
    ///
    /// During a screen transition the press grabs the transition instead of
    /// reaching a node: it pauses there until released or swiped.
    pub fn press(&mut self, x: f64, y: f64) {
        let now = self.clock.now();
        self.gesture.clear();

        if self.screens.mode == DisplayMode::ScreenTransition {
            let id = self.screen_transition;
            self.drive(id, now, |kind, _, _| {
                if let EventKind::Transition(t) = kind {
                    t.pause();
                }
            });
            self.gesture.grabbed = true;
            self.gesture.pressed = Some(self.screens.current());
            self.trace_gesture(GestureKind::Press, self.gesture.pressed, x, y, now);
            self.settle();
            return;
        }

        let hit = self.find_node_under_cursor(None, NodeFlags::PRESSABLE, x, y, 0.0, 0.0);
        self.trace_gesture(GestureKind::Press, hit.map(|h| h.node), x, y, now);
        let Some(hit) = hit else {
            return;
        };
        let node = hit.node;
        self.gesture.pressed = Some(node);
        self.tree.insert_flags(node, NodeFlags::HIGHLIGHTED);

        if self.tree.flags(node).contains(NodeFlags::PRESS) {
            let response = self.tree.widget_press(node, hit.local);
            if response.value_changed {
                self.dispatch_node(node, Trigger::ValueChanged);
            }
            let info = GestureInfo {
                node,
                local: hit.local,
                delta: Vec2::ZERO,
            };
            self.call_handler(node, HandlerKind::Press, &info, now);
            self.dispatch_node(node, Trigger::Press);
        }
        self.settle();
    }

    /// Handles a pointer move to `(x, y)` by `(dx, dy)` since the previous
    /// sample.
    pub fn swipe(&mut self, x: f64, y: f64, dx: f64, dy: f64) {
        let now = self.clock.now();
        let delta = Vec2::new(dx, dy);
        self.gesture.offset += delta;

        if self.gesture.grabbed {
            self.feed_screen_transition(delta, now);
            self.trace_gesture(GestureKind::Swipe, self.gesture.pressed, x, y, now);
            self.settle();
            return;
        }

        let node = match self.gesture.pressed {
            Some(node) => node,
            None => {
                let Some(hit) =
                    self.find_node_under_cursor(None, NodeFlags::DRAG, x, y, 0.0, 0.0)
                else {
                    return;
                };
                self.gesture.pressed = Some(hit.node);
                hit.node
            }
        };
        let flags = self.tree.flags(node);

        let delta = if self.gesture.swiping {
            delta
        } else {
            let margin = if flags.contains(NodeFlags::DRAG) {
                0.0
            } else {
                self.config.swipe_margin
            };
            if self.gesture.offset.hypot() <= margin {
                return;
            }
            self.gesture.swiping = true;
            // The whole travel so far is the first swipe step.
            self.gesture.offset
        };

        if !flags.contains(NodeFlags::DRAG) {
            self.abort_press(node, x, y, now);
            self.settle();
            return;
        }

        if self.screens.mode == DisplayMode::Screen
            && self.tree.kind(node) == ItemKind::Screen
            && node == self.screens.current()
        {
            self.begin_screen_swipe(node, delta, now);
            self.trace_gesture(GestureKind::Swipe, Some(node), x, y, now);
            self.settle();
            return;
        }

        let local = Point::new(x, y) - self.tree_offset(node) - self.tree.absolute_origin(node);
        let local = local.to_point();
        let response = self.tree.widget_drag(node, local, delta);
        if response.value_changed {
            self.dispatch_node(node, Trigger::ValueChanged);
        }
        let info = GestureInfo { node, local, delta };
        self.call_handler(node, HandlerKind::Swipe, &info, now);
        self.dispatch_node(node, Trigger::Drag);
        self.trace_gesture(GestureKind::Swipe, Some(node), x, y, now);
        self.settle();
    }

    /// Handles the pointer being lifted at `(x, y)`.
    pub fn release(&mut self, x: f64, y: f64) {
        let now = self.clock.now();
        let point = Point::new(x, y);

        if self.gesture.grabbed {
            self.release_screen_transition(now);
        } else if let Some(node) = self.gesture.pressed {
            self.tree.remove_flags(node, NodeFlags::HIGHLIGHTED);
            let outside_popup = self.screens.mode == DisplayMode::Popup
                && self
                    .screens
                    .popup
                    .is_some_and(|p| !p.bounds(&self.tree).contains(point));
            if outside_popup {
                self.close_popup();
            } else if self.tree.flags(node).contains(NodeFlags::RELEASE) {
                let response = self.tree.widget_release(node);
                if response.value_changed {
                    self.dispatch_node(node, Trigger::ValueChanged);
                }
                let local = point - self.tree_offset(node) - self.tree.absolute_origin(node);
                let info = GestureInfo {
                    node,
                    local: local.to_point(),
                    delta: Vec2::ZERO,
                };
                self.call_handler(node, HandlerKind::Release, &info, now);
                self.dispatch_node(node, Trigger::Release);
            }
        }

        self.trace_gesture(GestureKind::Release, self.gesture.pressed, x, y, now);
        self.gesture.clear();
        self.settle();
    }

    /// Cancels the press on a node that cannot be dragged.
    fn abort_press(&mut self, node: NodeId, x: f64, y: f64, now: f64) {
        self.tree.remove_flags(node, NodeFlags::HIGHLIGHTED);
        let local = Point::new(x, y) - self.tree_offset(node) - self.tree.absolute_origin(node);
        let info = GestureInfo {
            node,
            local: local.to_point(),
            delta: Vec2::ZERO,
        };
        self.call_handler(node, HandlerKind::Abort, &info, now);
        self.trace_gesture(GestureKind::Abort, Some(node), x, y, now);
        self.gesture.pressed = None;
        self.gesture.swiping = false;
    }

    /// Starts dragging the screen transition towards the neighbour of the
    /// current screen in the direction of `delta`.
    fn begin_screen_swipe(&mut self, screen: NodeId, delta: Vec2, now: f64) {
        let layout = self.screens.layout();
        let along = layout.along(delta);
        if along == 0.0 {
            return;
        }
        // Moving the finger left (or up) brings in the next screen.
        let go_right = along < 0.0;
        let Some(target) = self.screens.neighbour(go_right) else {
            return;
        };

        self.tree.remove_flags(screen, NodeFlags::HIGHLIGHTED);
        self.screens.transition = Some(ScreenTransition {
            from: screen,
            to: target,
            go_right,
            effect: match layout {
                Layout::Horizontal => Effect::LinearHorizontal,
                Layout::Vertical => Effect::LinearVertical,
            },
            layout,
        });
        self.display.invalidate_buffers();

        let base = self.config.screen_transition_duration;
        let id = self.screen_transition;
        self.drive(id, now, |kind, _, emit| {
            if let EventKind::Transition(t) = kind {
                t.set_duration(base, now);
                t.set_reversed(false, now);
                t.start(now, emit);
                t.pause();
            }
        });
        self.set_display_mode(DisplayMode::ScreenTransition);
        self.gesture.grabbed = true;
        self.gesture.velocity.reset();
        self.feed_screen_transition(delta, now);
    }

    /// Moves the grabbed screen transition by a pointer movement.
    fn feed_screen_transition(&mut self, delta: Vec2, now: f64) {
        let Some(transition) = self.screens.transition else {
            return;
        };
        let extent = transition.layout.extent(self.config.resolution);
        if extent <= 0.0 {
            return;
        }
        let along = transition.layout.along(delta);
        let step = (if transition.go_right { -along } else { along }) / extent;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "a swipe step is a small fraction of a screen"
        )]
        let step = step as f32;

        let id = self.screen_transition;
        let progress = self.registry.get(id).progress();
        self.drive(id, now, |kind, _, emit| {
            if let EventKind::Transition(t) = kind {
                t.set_progress(progress + step, emit);
            }
        });
        let frequency = self.timer.frequency();
        self.gesture.velocity.update(step * frequency);
    }

    /// Lets go of the grabbed screen transition: it resumes towards the
    /// destination, or back to the original screen when released early.
    fn release_screen_transition(&mut self, now: f64) {
        let id = self.screen_transition;
        if self.registry.get(id).status() != Status::Paused {
            return;
        }
        let base = self.config.screen_transition_duration;
        let speed = f64::from(self.gesture.velocity.get().abs());
        let duration = if speed == 0.0 {
            base
        } else {
            (base / speed).clamp(0.0, base)
        };
        let abort = self.registry.get(id).progress() < self.config.abort_threshold;
        self.drive(id, now, |kind, _, _| {
            if let EventKind::Transition(t) = kind {
                t.set_duration(duration, now);
                t.set_reversed(abort, now);
                t.resume(now);
            }
        });
    }

    /// Calls a gesture handler of `node`, if it has one.
    fn call_handler(&mut self, node: NodeId, kind: HandlerKind, info: &GestureInfo, now: f64) {
        let i = node.index() as usize;
        let Some(mut handler) = self.tree.handlers[i].slot(kind).take() else {
            return;
        };
        {
            let mut ctx = ActionCtx::new(&mut self.tree, &mut self.requests, now, node, None);
            handler(&mut ctx, info);
        }
        // Keep a handler installed from inside the callback.
        let slot = self.tree.handlers[i].slot(kind);
        if slot.is_none() {
            *slot = Some(handler);
        }
    }

    fn trace_gesture(&mut self, kind: GestureKind, node: Option<NodeId>, x: f64, y: f64, now: f64) {
        self.tracer.gesture(&GestureEvent {
            kind,
            node,
            x,
            y,
            time: now,
        });
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use kurbo::Rect;

    use super::*;
    use crate::engine::tests::{engine_with, two_screens};
    use crate::event::{Event, Retrigger, RunFlags};
    use crate::gesture::GestureHandler;
    use crate::tree::GraphicsItem;
    use crate::tree::item::Slider;

    fn log_handler(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> GestureHandler {
        let log = Rc::clone(log);
        Box::new(move |_: &mut ActionCtx<'_>, _: &GestureInfo| log.borrow_mut().push(name))
    }

    #[test]
    fn press_highlights_and_release_fires_handlers() {
        let (mut tree, s) = two_screens();
        let button = tree.create_node(
            Rect::new(10.0, 10.0, 50.0, 30.0),
            GraphicsItem::Button,
            NodeFlags::PRESSABLE,
        );
        tree.add_child(s[0], button);
        let log = Rc::new(RefCell::new(Vec::new()));
        tree.on_press(button, log_handler(&log, "press"));
        tree.on_release(button, log_handler(&log, "release"));
        let (mut engine, _, _) = engine_with(tree, &s, Vec::new());

        engine.press(20.0, 20.0);
        assert!(engine.tree().flags(button).contains(NodeFlags::HIGHLIGHTED));
        engine.release(20.0, 20.0);
        assert!(!engine.tree().flags(button).contains(NodeFlags::HIGHLIGHTED));
        assert_eq!(*log.borrow(), ["press", "release"]);
    }

    #[test]
    fn small_move_on_tap_widget_is_not_a_swipe() {
        let (mut tree, s) = two_screens();
        let button = tree.create_node(
            Rect::new(10.0, 10.0, 50.0, 30.0),
            GraphicsItem::Button,
            NodeFlags::PRESSABLE,
        );
        tree.add_child(s[0], button);
        let log = Rc::new(RefCell::new(Vec::new()));
        tree.on_abort(button, log_handler(&log, "abort"));
        tree.on_release(button, log_handler(&log, "release"));
        let (mut engine, _, _) = engine_with(tree, &s, Vec::new());

        engine.press(20.0, 20.0);
        engine.swipe(23.0, 20.0, 3.0, 0.0);
        engine.release(23.0, 20.0);
        assert_eq!(*log.borrow(), ["release"]);

        engine.press(20.0, 20.0);
        engine.swipe(26.0, 20.0, 6.0, 0.0);
        engine.release(26.0, 20.0);
        assert_eq!(*log.borrow(), ["release", "abort"]);
    }

    #[test]
    fn slider_follows_drag_and_reports_value_change() {
        let (mut tree, s) = two_screens();
        let slider = tree.create_node(
            Rect::new(0.0, 40.0, 100.0, 60.0),
            GraphicsItem::Slider(Slider::default()),
            NodeFlags::DRAGGABLE,
        );
        tree.add_child(s[0], slider);
        let changes = Rc::new(RefCell::new(0_u32));
        let count = Rc::clone(&changes);
        let events = vec![
            Event::transition(slider, Trigger::ValueChanged, 1.0)
                .with_retrigger(Retrigger::RESTART)
                .with_action(move |_, f| {
                    if f.flags.contains(RunFlags::FIRST_RUN) {
                        *count.borrow_mut() += 1;
                    }
                }),
        ];
        let (mut engine, _, _) = engine_with(tree, &s, events);

        engine.press(10.0, 50.0);
        assert_eq!(engine.tree().item(slider).value(), Some(0.1));
        engine.swipe(11.0, 50.0, 1.0, 0.0);
        assert_eq!(engine.tree().item(slider).value(), Some(0.11));
        engine.release(11.0, 50.0);
        assert_eq!(engine.display_mode(), DisplayMode::Screen, "no screen swipe");
        assert_eq!(*changes.borrow(), 2, "press and drag changed the value");
    }

    #[test]
    fn screen_swipe_without_neighbour_does_nothing() {
        let (tree, s) = two_screens();
        let (mut engine, _, _) = engine_with(tree, &s, Vec::new());
        engine.press(10.0, 10.0);
        engine.swipe(60.0, 10.0, 50.0, 0.0);
        assert_eq!(engine.display_mode(), DisplayMode::Screen, "no screen to the left");
        engine.release(60.0, 10.0);
    }

    #[test]
    fn fast_fling_completes_screen_swipe() {
        let (tree, s) = two_screens();
        let (mut engine, clock, _) = engine_with(tree, &s, Vec::new());
        engine.press(150.0, 10.0);
        engine.swipe(70.0, 10.0, -80.0, 0.0);
        assert_eq!(engine.display_mode(), DisplayMode::ScreenTransition);
        let st = engine.screen_transition_event();
        assert_eq!(engine.registry().get(st).progress(), 0.4);

        engine.release(70.0, 10.0);
        assert_eq!(engine.registry().get(st).status(), Status::Running);
        for _ in 0..40 {
            clock.advance(0.016);
            engine.timer_tick();
        }
        assert_eq!(engine.current_screen(), s[1]);
        assert_eq!(engine.display_mode(), DisplayMode::Screen);
    }

    #[test]
    fn release_outside_popup_closes_it() {
        let (mut tree, s) = two_screens();
        let popup = tree.create_node(
            Rect::new(0.0, 0.0, 40.0, 20.0),
            GraphicsItem::Container,
            NodeFlags::PRESSABLE,
        );
        let log = Rc::new(RefCell::new(Vec::new()));
        tree.on_release(popup, log_handler(&log, "popup"));
        let (mut engine, _, _) = engine_with(tree, &s, Vec::new());
        engine.set_popup(popup);
        let bounds = engine.popup().map(|p| p.bounds(engine.tree()));
        assert_eq!(bounds, Some(Rect::new(80.0, 40.0, 120.0, 60.0)));

        engine.press(100.0, 50.0);
        engine.release(100.0, 50.0);
        assert_eq!(*log.borrow(), ["popup"]);
        assert_eq!(engine.display_mode(), DisplayMode::Popup);

        engine.press(100.0, 50.0);
        engine.release(5.0, 5.0);
        assert_eq!(engine.display_mode(), DisplayMode::Screen);
        assert_eq!(*log.borrow(), ["popup"], "popup handler not run");
    }
}
