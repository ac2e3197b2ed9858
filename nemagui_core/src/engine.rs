// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The engine context.
//!
//! [`Engine`] owns everything that changes at runtime: the scene tree, the
//! event registry, the shared timer, screen and popup state, gesture state
//! and the draw bookkeeping. The host drives it from a single thread:
//!
//! 1. Build the [`SceneTree`], the [`Event`]s and the [`ScreenGroups`].
//! 2. Create the engine with a [`Clock`] and a [`TimerService`], then call
//!    [`start`](Engine::start).
//! 3. Forward pointer input to [`press`](Engine::press),
//!    [`swipe`](Engine::swipe) and [`release`](Engine::release), and every
//!    expiry of the host timer to [`timer_tick`](Engine::timer_tick).
//! 4. Whenever [`needs_update`](Engine::needs_update) is true, call
//!    [`draw`](Engine::draw).
//!
//! Callbacks never re-enter the engine. Anything they ask for beyond tree
//! mutation is queued as a [`Request`] and applied when the current entry
//! point finishes dispatching.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::actions::{ActionCtx, Request};
use crate::anim_buffer::AnimationBuffers;
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::display::Display;
use crate::event::{Event, EventId, EventKind, Firing, Registry, Retrigger, Trigger};
use crate::gesture::GestureState;
use crate::screen::{ScreenGroups, ScreenState};
use crate::timer::{Timer, TimerService};
use crate::trace::{EventFiredEvent, StatusChangeEvent, TimerEvent, Tracer};
use crate::tree::{NodeId, SceneTree};

/// The engine context, passed by exclusive reference through every entry
/// point.
pub struct Engine {
    pub(crate) config: EngineConfig,
    pub(crate) tree: SceneTree,
    pub(crate) registry: Registry,
    pub(crate) timer: Timer,
    pub(crate) timer_service: Box<dyn TimerService>,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) gesture: GestureState,
    pub(crate) screens: ScreenState,
    pub(crate) buffers: AnimationBuffers,
    pub(crate) display: Display,
    pub(crate) tracer: Tracer,
    pub(crate) requests: Vec<Request>,
    /// The event with the screen transition role.
    pub(crate) screen_transition: EventId,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("tree", &self.tree)
            .field("registry", &self.registry)
            .field("timer", &self.timer)
            .field("screens", &self.screens)
            .field("gesture", &self.gesture)
            .field("tracer", &self.tracer)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Creates an engine showing the first screen of the first group.
    ///
    /// When none of `events` has the
    /// [`ScreenTransition`](crate::event::Role::ScreenTransition) role, a
    /// plain one is appended, sourced at the first screen.
    ///
    /// # Panics
    ///
    /// Panics if a screen or an event source is not a node of `tree`, or if
    /// the events declare more than one screen transition event or one that
    /// is not a [`Transition`](crate::event::Transition).
    #[must_use]
    pub fn new(
        config: EngineConfig,
        tree: SceneTree,
        groups: ScreenGroups,
        events: Vec<Event>,
        clock: Box<dyn Clock>,
        timer_service: Box<dyn TimerService>,
    ) -> Self {
        for group in groups.groups() {
            for &screen in &group.screens {
                tree.validate(screen);
            }
        }
        let mut registry = Registry::new(events, &tree);
        let screens = ScreenState::new(groups);
        let screen_transition = match registry.screen_transition() {
            Some(id) => id,
            None => registry.push(
                Event::transition(
                    screens.current(),
                    Trigger::None,
                    config.screen_transition_duration,
                )
                .as_screen_transition(),
                &tree,
            ),
        };

        Self {
            config,
            tree,
            registry,
            timer: Timer::new(config.timer_period_ms),
            timer_service,
            clock,
            gesture: GestureState::new(config.velocity_alpha),
            screens,
            buffers: AnimationBuffers::new(config.animation_buffers),
            display: Display::default(),
            tracer: Tracer::none(),
            requests: Vec::new(),
            screen_transition,
        }
    }

    /// Routes diagnostics to `tracer`.
    pub fn set_tracer(&mut self, tracer: Tracer) {
        self.tracer = tracer;
    }

    /// Dispatches [`AppStart`](Trigger::AppStart) to every event and
    /// [`ScreenEntered`](Trigger::ScreenEntered) to the initial screen.
    pub fn start(&mut self) {
        let ids: Vec<EventId> = self.registry.ids().collect();
        for id in ids {
            self.dispatch_event(id, Trigger::AppStart);
        }
        let screen = self.screens.current();
        self.dispatch_node(screen, Trigger::ScreenEntered);
        self.display.request_full();
        self.settle();
    }

    // -- Accessors --

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the scene tree.
    #[must_use]
    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    /// Returns the scene tree for mutation.
    pub fn tree_mut(&mut self) -> &mut SceneTree {
        &mut self.tree
    }

    /// Returns the event registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the shared timer.
    #[must_use]
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Returns the event driving screen transitions.
    #[must_use]
    pub fn screen_transition_event(&self) -> EventId {
        self.screen_transition
    }

    /// Returns the clock reading in seconds.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    // -- Event dispatch --

    /// Delivers `trigger` to one event.
    ///
    /// Returns whether the event accepted the trigger.
    pub fn handle_event(&mut self, id: EventId, trigger: Trigger) -> bool {
        let handled = self.dispatch_event(id, trigger);
        self.settle();
        handled
    }

    /// Delivers `trigger` to every event of `node`, in registration order.
    ///
    /// A [`Timer`](Trigger::Timer) trigger stops at the first event that
    /// handles it; [`timer_tick`](Self::timer_tick) is the entry point that
    /// advances every running event.
    pub fn handle_node_events(&mut self, node: NodeId, trigger: Trigger) {
        self.tree.validate(node);
        self.dispatch_node(node, trigger);
        self.settle();
    }

    /// Stops an event, jumping to its terminal value first when
    /// `force_finish` is set.
    pub fn stop_event(&mut self, id: EventId, force_finish: bool) {
        self.registry.validate(id);
        let now = self.clock.now();
        self.drive(id, now, |kind, _, emit| kind.stop(now, force_finish, emit));
        self.settle();
    }

    /// Advances every running event, in registration order.
    ///
    /// Call on every expiry of the host timer. Cancels the timer once no
    /// event is running.
    pub fn timer_tick(&mut self) {
        let now = self.clock.now();
        let running: Vec<EventId> = self
            .registry
            .ids()
            .filter(|&id| self.registry.get(id).kind().is_running())
            .collect();
        for id in running {
            self.drive(id, now, |kind, retrigger, emit| {
                kind.tick(now, retrigger, emit);
            });
        }
        self.settle();
        if !self.registry.any_running() && self.timer.stop(&mut *self.timer_service) {
            self.tracer.timer(&TimerEvent {
                armed: false,
                period_ms: self.timer.period_ms(),
                time: now,
            });
        }
    }

    pub(crate) fn dispatch_event(&mut self, id: EventId, trigger: Trigger) -> bool {
        if !self.registry.get(id).accepts(trigger) {
            return false;
        }
        let now = self.clock.now();
        if trigger == Trigger::Timer {
            self.drive(id, now, |kind, retrigger, emit| {
                kind.tick(now, retrigger, emit);
            });
        } else {
            self.drive(id, now, |kind, retrigger, emit| {
                kind.trigger(now, retrigger, emit);
            });
        }
        true
    }

    pub(crate) fn dispatch_node(&mut self, node: NodeId, trigger: Trigger) {
        let ids: Vec<EventId> = self.registry.node_events(node).collect();
        for id in ids {
            if self.dispatch_event(id, trigger) && trigger == Trigger::Timer {
                break;
            }
        }
    }

    /// Runs `op` on the state machine of event `id`, routing its firings to
    /// the event's action and the tracer.
    pub(crate) fn drive(
        &mut self,
        id: EventId,
        now: f64,
        op: impl FnOnce(&mut EventKind, Retrigger, &mut dyn FnMut(Firing)),
    ) {
        let Self {
            tree,
            registry,
            requests,
            tracer,
            ..
        } = self;
        let Event {
            kind,
            action,
            retrigger,
            source,
            ..
        } = &mut registry.events[id.index() as usize];
        let source = *source;
        let before = kind.status();

        let mut emit = |firing: Firing| {
            tracer.event_fired(&EventFiredEvent {
                event: id,
                source,
                progress: firing.progress,
                flags: firing.flags,
                time: now,
            });
            if let Some(action) = action.as_mut() {
                let mut ctx = ActionCtx::new(&mut *tree, &mut *requests, now, source, Some(id));
                action(&mut ctx, &firing);
            }
        };
        op(kind, *retrigger, &mut emit);

        let after = kind.status();
        if before != after {
            tracer.status_changed(&StatusChangeEvent {
                event: id,
                from: before,
                to: after,
                time: now,
            });
        }
        if id == self.screen_transition {
            self.display.request_full();
        }
    }

    /// Applies queued requests, finishes settled screen transitions and arms
    /// the timer if anything is running.
    pub(crate) fn settle(&mut self) {
        self.process_requests();
        self.sync_screen_transition();
        self.process_requests();
        self.ensure_timer();
    }

    fn process_requests(&mut self) {
        while !self.requests.is_empty() {
            let batch = core::mem::take(&mut self.requests);
            for request in batch {
                self.apply(request);
            }
        }
    }

    fn apply(&mut self, request: Request) {
        match request {
            Request::ShowScreen {
                target,
                effect,
                go_right,
            } => self.begin_show_screen(target, effect, go_right),
            Request::SetCurrentScreen(screen) => self.enter_screen(screen),
            Request::ShowPopup(popup) => self.set_popup(popup),
            Request::ClosePopup => self.close_popup(),
            Request::Trigger { event, trigger } => {
                self.registry.validate(event);
                self.dispatch_event(event, trigger);
            }
            Request::Stop {
                event,
                force_finish,
            } => {
                self.registry.validate(event);
                let now = self.clock.now();
                self.drive(event, now, |kind, _, emit| {
                    kind.stop(now, force_finish, emit);
                });
            }
        }
    }

    fn ensure_timer(&mut self) {
        if self.registry.any_running() && self.timer.start(&mut *self.timer_service) {
            let time = self.clock.now();
            self.tracer.timer(&TimerEvent {
                armed: true,
                period_ms: self.timer.period_ms(),
                time,
            });
        }
    }
}
