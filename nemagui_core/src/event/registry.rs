// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event definitions and the flat event registry.
//!
//! Events live in one flat array in registration order. At construction
//! each event is also spliced onto a singly linked list hanging off its
//! source node, so that gestures can dispatch to a node's events without
//! scanning the whole registry.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use super::{
    EventKind, Firing, Periodic, PeriodicTransition, Retrigger, Status, Transition, Trigger,
};
use crate::actions::ActionCtx;
use crate::tree::{INVALID, NodeId, SceneTree};

/// Callback invoked with every firing of an event.
pub type Action = Box<dyn FnMut(&mut ActionCtx<'_>, &Firing)>;

/// A handle to an event in a [`Registry`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(pub(crate) u32);

impl EventId {
    /// Returns the registration index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Rebuilds a handle from a registration index, for example one read
    /// back from a trace recording.
    #[inline]
    #[must_use]
    pub const fn from_index(index: u32) -> Self {
        Self(index)
    }
}

impl fmt::Debug for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventId({})", self.0)
    }
}

/// What an event is used for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Role {
    /// An ordinary node event.
    #[default]
    Normal,
    /// The application-wide event driving screen transitions.
    ScreenTransition,
}

/// A triggerable state machine attached to a source node.
pub struct Event {
    pub(crate) trigger: Trigger,
    pub(crate) retrigger: Retrigger,
    pub(crate) source: NodeId,
    pub(crate) kind: EventKind,
    pub(crate) action: Option<Action>,
    pub(crate) role: Role,
    pub(crate) next_in_node: u32,
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("trigger", &self.trigger)
            .field("retrigger", &self.retrigger)
            .field("source", &self.source)
            .field("kind", &self.kind)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl Event {
    /// Creates an event of the given kind.
    #[must_use]
    pub fn new(source: NodeId, trigger: Trigger, kind: EventKind) -> Self {
        Self {
            trigger,
            retrigger: Retrigger::empty(),
            source,
            kind,
            action: None,
            role: Role::Normal,
            next_in_node: INVALID,
        }
    }

    /// Creates a [`Transition`] event.
    #[must_use]
    pub fn transition(source: NodeId, trigger: Trigger, duration: f64) -> Self {
        Self::new(source, trigger, EventKind::Transition(Transition::new(duration)))
    }

    /// Creates a [`Periodic`] event.
    #[must_use]
    pub fn periodic(source: NodeId, trigger: Trigger, period: f64) -> Self {
        Self::new(source, trigger, EventKind::Periodic(Periodic::new(period)))
    }

    /// Creates a [`PeriodicTransition`] event.
    #[must_use]
    pub fn periodic_transition(
        source: NodeId,
        trigger: Trigger,
        duration: f64,
        period: f64,
    ) -> Self {
        Self::new(
            source,
            trigger,
            EventKind::PeriodicTransition(PeriodicTransition::new(duration, period)),
        )
    }

    /// Sets the retrigger flags.
    #[must_use]
    pub fn with_retrigger(mut self, retrigger: Retrigger) -> Self {
        self.retrigger = retrigger;
        self
    }

    /// Sets the callback.
    #[must_use]
    pub fn with_action(mut self, action: impl FnMut(&mut ActionCtx<'_>, &Firing) + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    /// Designates this event as the one driving screen transitions.
    #[must_use]
    pub fn as_screen_transition(mut self) -> Self {
        self.role = Role::ScreenTransition;
        self
    }

    /// Returns the trigger this event reacts to.
    #[must_use]
    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    /// Returns the retrigger flags.
    #[must_use]
    pub fn retrigger(&self) -> Retrigger {
        self.retrigger
    }

    /// Returns the source node.
    #[must_use]
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Returns the state machine.
    #[must_use]
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// Returns the role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the run status.
    #[must_use]
    pub fn status(&self) -> Status {
        self.kind.status()
    }

    /// Returns the current progress.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.kind.progress()
    }

    /// Whether `trigger` should be delivered to this event.
    ///
    /// A matching trigger is delivered unless the event is running and
    /// ignores retriggers; a timer tick is always delivered to a running
    /// event.
    #[must_use]
    pub fn accepts(&self, trigger: Trigger) -> bool {
        let running = self.kind.is_running();
        (self.trigger == trigger && (!running || !self.retrigger.contains(Retrigger::IGNORE)))
            || (trigger == Trigger::Timer && running)
    }
}

/// Flat registry of all events, in registration order.
pub struct Registry {
    pub(crate) events: Vec<Event>,
    node_head: Vec<u32>,
    screen_transition: Option<EventId>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("events", &self.events)
            .field("screen_transition", &self.screen_transition)
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Builds the registry and links every event onto its source node's
    /// list, in registration order.
    ///
    /// # Panics
    ///
    /// Panics if an event's source is not a node of `tree`, if more than one
    /// event has the [`ScreenTransition`](Role::ScreenTransition) role, or if
    /// that event is not a [`Transition`].
    #[must_use]
    pub fn new(events: Vec<Event>, tree: &SceneTree) -> Self {
        let mut registry = Self {
            events: Vec::with_capacity(events.len()),
            node_head: vec![INVALID; tree.len()],
            screen_transition: None,
        };
        for event in events {
            registry.push(event, tree);
        }
        registry
    }

    /// Appends an event and links it onto its source node's list.
    pub(crate) fn push(&mut self, mut event: Event, tree: &SceneTree) -> EventId {
        assert!(
            (event.source.index() as usize) < tree.len(),
            "event source {:?} is not a node of the scene tree",
            event.source
        );
        #[expect(
            clippy::cast_possible_truncation,
            reason = "events are declared statically; their count is far below u32::MAX"
        )]
        let id = EventId(self.events.len() as u32);
        if event.role == Role::ScreenTransition {
            assert!(
                self.screen_transition.is_none(),
                "more than one screen transition event"
            );
            assert!(
                matches!(event.kind, EventKind::Transition(_)),
                "the screen transition event must be a Transition"
            );
            self.screen_transition = Some(id);
        }

        event.next_in_node = INVALID;
        let src = event.source.index() as usize;
        if self.node_head.len() < tree.len() {
            self.node_head.resize(tree.len(), INVALID);
        }
        if self.node_head[src] == INVALID {
            self.node_head[src] = id.0;
        } else {
            // Walk to last event of the node.
            let mut last = self.node_head[src];
            while self.events[last as usize].next_in_node != INVALID {
                last = self.events[last as usize].next_in_node;
            }
            self.events[last as usize].next_in_node = id.0;
        }
        self.events.push(event);
        id
    }

    /// Returns the number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns an event.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not belong to this registry.
    #[must_use]
    pub fn get(&self, id: EventId) -> &Event {
        self.validate(id);
        &self.events[id.0 as usize]
    }

    /// Returns the handles of all events in registration order.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "ids were created from u32 indices"
    )]
    pub fn ids(&self) -> impl Iterator<Item = EventId> + use<'_> {
        (0..self.events.len()).map(|i| EventId(i as u32))
    }

    /// Returns the events of a node, in registration order.
    #[must_use]
    pub fn node_events(&self, node: NodeId) -> NodeEvents<'_> {
        let head = self
            .node_head
            .get(node.index() as usize)
            .copied()
            .unwrap_or(INVALID);
        NodeEvents {
            registry: self,
            current: head,
        }
    }

    /// Returns the screen transition event, if one is registered.
    #[must_use]
    pub fn screen_transition(&self) -> Option<EventId> {
        self.screen_transition
    }

    /// Returns whether any event is running.
    #[must_use]
    pub fn any_running(&self) -> bool {
        self.events.iter().any(|e| e.kind.is_running())
    }

    pub(crate) fn validate(&self, id: EventId) {
        assert!(
            (id.0 as usize) < self.events.len(),
            "unknown EventId: {id:?} (len {})",
            self.events.len()
        );
    }
}

/// An iterator over the events of one node.
///
/// Created by [`Registry::node_events`].
#[derive(Debug)]
pub struct NodeEvents<'a> {
    registry: &'a Registry,
    current: u32,
}

impl Iterator for NodeEvents<'_> {
    type Item = EventId;

    fn next(&mut self) -> Option<EventId> {
        if self.current == INVALID {
            return None;
        }
        let id = self.current;
        self.current = self.registry.events[id as usize].next_in_node;
        Some(EventId(id))
    }
}
