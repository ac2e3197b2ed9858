// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records, one tag byte followed by the
//! event fields. Times and coordinates are stored as `f64` bit patterns.
//! [`decode`] reads them back as an iterator of [`RecordedEvent`].

use kurbo::Rect;
use nemagui_core::event::{EventId, RunFlags, Status};
use nemagui_core::screen::DisplayMode;
use nemagui_core::trace::{
    DisplayModeEvent, EventFiredEvent, FrameEvent, GestureEvent, GestureKind, ScreenChangeEvent,
    StatusChangeEvent, TimerEvent, TraceSink,
};
use nemagui_core::tree::NodeId;

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_EVENT_FIRED: u8 = 1;
const TAG_STATUS_CHANGED: u8 = 2;
const TAG_GESTURE: u8 = 3;
const TAG_DISPLAY_MODE: u8 = 4;
const TAG_TIMER: u8 = 5;
const TAG_SCREEN_CHANGED: u8 = 6;
const TAG_FRAME: u8 = 7;

/// Node slot stored for "no node".
const NO_NODE: u32 = u32::MAX;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f32(&mut self, v: f32) {
        self.write_u32(v.to_bits());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_status(&mut self, s: Status) {
        self.write_u8(match s {
            Status::Stopped => 0,
            Status::Running => 1,
            Status::Paused => 2,
        });
    }

    fn write_mode(&mut self, m: DisplayMode) {
        self.write_u8(match m {
            DisplayMode::Screen => 0,
            DisplayMode::ScreenTransition => 1,
            DisplayMode::Popup => 2,
        });
    }

    fn write_gesture(&mut self, k: GestureKind) {
        self.write_u8(match k {
            GestureKind::Press => 0,
            GestureKind::Swipe => 1,
            GestureKind::Release => 2,
            GestureKind::Abort => 3,
        });
    }

    fn write_option_rect(&mut self, r: Option<Rect>) {
        match r {
            Some(r) => {
                self.write_u8(1);
                for v in [r.x0, r.y0, r.x1, r.y1] {
                    self.write_f64(v);
                }
            }
            None => {
                self.write_u8(0);
                for _ in 0..4 {
                    self.write_f64(0.0);
                }
            }
        }
    }
}

impl TraceSink for RecorderSink {
    fn on_event_fired(&mut self, e: &EventFiredEvent) {
        self.write_u8(TAG_EVENT_FIRED);
        self.write_u32(e.event.index());
        self.write_u32(e.source.index());
        self.write_f32(e.progress);
        self.write_u8(e.flags.bits());
        self.write_f64(e.time);
    }

    fn on_status_changed(&mut self, e: &StatusChangeEvent) {
        self.write_u8(TAG_STATUS_CHANGED);
        self.write_u32(e.event.index());
        self.write_status(e.from);
        self.write_status(e.to);
        self.write_f64(e.time);
    }

    fn on_gesture(&mut self, e: &GestureEvent) {
        self.write_u8(TAG_GESTURE);
        self.write_gesture(e.kind);
        self.write_u32(e.node.map_or(NO_NODE, NodeId::index));
        self.write_f64(e.x);
        self.write_f64(e.y);
        self.write_f64(e.time);
    }

    fn on_display_mode(&mut self, e: &DisplayModeEvent) {
        self.write_u8(TAG_DISPLAY_MODE);
        self.write_mode(e.from);
        self.write_mode(e.to);
        self.write_f64(e.time);
    }

    fn on_timer(&mut self, e: &TimerEvent) {
        self.write_u8(TAG_TIMER);
        self.write_u8(u8::from(e.armed));
        self.write_u32(e.period_ms);
        self.write_f64(e.time);
    }

    fn on_screen_changed(&mut self, e: &ScreenChangeEvent) {
        self.write_u8(TAG_SCREEN_CHANGED);
        self.write_u32(e.from.index());
        self.write_u32(e.to.index());
        self.write_f64(e.time);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.write_u8(TAG_FRAME);
        self.write_u64(e.frame_index);
        self.write_mode(e.mode);
        self.write_option_rect(e.damage);
        self.write_u32(e.nodes_drawn);
        self.write_f64(e.time);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// An [`EventFiredEvent`].
    EventFired(EventFiredEvent),
    /// A [`StatusChangeEvent`].
    StatusChanged(StatusChangeEvent),
    /// A [`GestureEvent`].
    Gesture(GestureEvent),
    /// A [`DisplayModeEvent`].
    DisplayMode(DisplayModeEvent),
    /// A [`TimerEvent`].
    Timer(TimerEvent),
    /// A [`ScreenChangeEvent`].
    ScreenChanged(ScreenChangeEvent),
    /// A [`FrameEvent`].
    Frame(FrameEvent),
}

impl RecordedEvent {
    /// Returns the wall time carried by the event, in seconds.
    #[must_use]
    pub fn time(&self) -> f64 {
        match self {
            Self::EventFired(e) => e.time,
            Self::StatusChanged(e) => e.time,
            Self::Gesture(e) => e.time,
            Self::DisplayMode(e) => e.time,
            Self::Timer(e) => e.time,
            Self::ScreenChanged(e) => e.time,
            Self::Frame(e) => e.time,
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?;
        self.pos += N;
        bytes.try_into().ok()
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.read_array::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    fn read_f32(&mut self) -> Option<f32> {
        self.read_u32().map(f32::from_bits)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_status(&mut self) -> Option<Status> {
        Some(match self.read_u8()? {
            0 => Status::Stopped,
            1 => Status::Running,
            _ => Status::Paused,
        })
    }

    fn read_mode(&mut self) -> Option<DisplayMode> {
        Some(match self.read_u8()? {
            0 => DisplayMode::Screen,
            1 => DisplayMode::ScreenTransition,
            _ => DisplayMode::Popup,
        })
    }

    fn read_gesture(&mut self) -> Option<GestureKind> {
        Some(match self.read_u8()? {
            0 => GestureKind::Press,
            1 => GestureKind::Swipe,
            2 => GestureKind::Release,
            _ => GestureKind::Abort,
        })
    }

    fn read_option_rect(&mut self) -> Option<Option<Rect>> {
        let present = self.read_u8()?;
        let rect = Rect::new(
            self.read_f64()?,
            self.read_f64()?,
            self.read_f64()?,
            self.read_f64()?,
        );
        Some((present != 0).then_some(rect))
    }

    fn decode_event_fired(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::EventFired(EventFiredEvent {
            event: EventId::from_index(self.read_u32()?),
            source: NodeId::from_index(self.read_u32()?),
            progress: self.read_f32()?,
            flags: RunFlags::from_bits_truncate(self.read_u8()?),
            time: self.read_f64()?,
        }))
    }

    fn decode_status_changed(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::StatusChanged(StatusChangeEvent {
            event: EventId::from_index(self.read_u32()?),
            from: self.read_status()?,
            to: self.read_status()?,
            time: self.read_f64()?,
        }))
    }

    fn decode_gesture(&mut self) -> Option<RecordedEvent> {
        let kind = self.read_gesture()?;
        let node = self.read_u32()?;
        Some(RecordedEvent::Gesture(GestureEvent {
            kind,
            node: (node != NO_NODE).then_some(NodeId::from_index(node)),
            x: self.read_f64()?,
            y: self.read_f64()?,
            time: self.read_f64()?,
        }))
    }

    fn decode_display_mode(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::DisplayMode(DisplayModeEvent {
            from: self.read_mode()?,
            to: self.read_mode()?,
            time: self.read_f64()?,
        }))
    }

    fn decode_timer(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Timer(TimerEvent {
            armed: self.read_u8()? != 0,
            period_ms: self.read_u32()?,
            time: self.read_f64()?,
        }))
    }

    fn decode_screen_changed(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ScreenChanged(ScreenChangeEvent {
            from: NodeId::from_index(self.read_u32()?),
            to: NodeId::from_index(self.read_u32()?),
            time: self.read_f64()?,
        }))
    }

    fn decode_frame(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Frame(FrameEvent {
            frame_index: self.read_u64()?,
            mode: self.read_mode()?,
            damage: self.read_option_rect()?,
            nodes_drawn: self.read_u32()?,
            time: self.read_f64()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_EVENT_FIRED => self.decode_event_fired(),
            TAG_STATUS_CHANGED => self.decode_status_changed(),
            TAG_GESTURE => self.decode_gesture(),
            TAG_DISPLAY_MODE => self.decode_display_mode(),
            TAG_TIMER => self.decode_timer(),
            TAG_SCREEN_CHANGED => self.decode_screen_changed(),
            TAG_FRAME => self.decode_frame(),
            // Unknown tag: the rest of the buffer cannot be framed.
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fired() -> EventFiredEvent {
        EventFiredEvent {
            event: EventId::from_index(2),
            source: NodeId::from_index(9),
            progress: 0.75,
            flags: RunFlags::LAST_RUN | RunFlags::REVERSED,
            time: 1.25,
        }
    }

    #[test]
    fn event_fired_survives_recording() {
        let mut rec = RecorderSink::new();
        let orig = sample_fired();
        rec.on_event_fired(&orig);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::EventFired(e) => {
                assert_eq!(e.event, orig.event);
                assert_eq!(e.source, orig.source);
                assert_eq!(e.progress, orig.progress);
                assert_eq!(e.flags, orig.flags);
                assert_eq!(e.time, orig.time);
            }
            other => panic!("expected EventFired, got {other:?}"),
        }
    }

    #[test]
    fn gesture_without_node() {
        let mut rec = RecorderSink::new();
        rec.on_gesture(&GestureEvent {
            kind: GestureKind::Release,
            node: None,
            x: 3.0,
            y: 4.0,
            time: 0.5,
        });
        rec.on_gesture(&GestureEvent {
            kind: GestureKind::Press,
            node: Some(NodeId::from_index(0)),
            x: 1.0,
            y: 2.0,
            time: 0.25,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 2);
        match (&events[0], &events[1]) {
            (RecordedEvent::Gesture(a), RecordedEvent::Gesture(b)) => {
                assert_eq!(a.kind, GestureKind::Release);
                assert_eq!(a.node, None);
                assert_eq!((a.x, a.y), (3.0, 4.0));
                assert_eq!(b.node, Some(NodeId::from_index(0)));
            }
            other => panic!("expected two gestures, got {other:?}"),
        }
    }

    #[test]
    fn frame_damage_is_optional() {
        let mut rec = RecorderSink::new();
        rec.on_frame(&FrameEvent {
            frame_index: 11,
            mode: DisplayMode::Popup,
            damage: Some(Rect::new(0.0, 0.0, 20.0, 10.0)),
            nodes_drawn: 3,
            time: 2.0,
        });
        rec.on_frame(&FrameEvent {
            frame_index: 12,
            mode: DisplayMode::Screen,
            damage: None,
            nodes_drawn: 0,
            time: 2.1,
        });

        let frames: Vec<_> = decode(rec.as_bytes())
            .filter_map(|e| match e {
                RecordedEvent::Frame(f) => Some(f),
                _ => None,
            })
            .collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].damage, Some(Rect::new(0.0, 0.0, 20.0, 10.0)));
        assert_eq!(frames[0].mode, DisplayMode::Popup);
        assert_eq!(frames[1].damage, None);
        assert_eq!(frames[1].frame_index, 12);
    }

    #[test]
    fn mixed_stream_keeps_order() {
        let mut rec = RecorderSink::new();
        rec.on_timer(&TimerEvent {
            armed: true,
            period_ms: 16,
            time: 0.0,
        });
        rec.on_status_changed(&StatusChangeEvent {
            event: EventId::from_index(0),
            from: Status::Stopped,
            to: Status::Running,
            time: 0.0,
        });
        rec.on_event_fired(&sample_fired());
        rec.on_display_mode(&DisplayModeEvent {
            from: DisplayMode::Screen,
            to: DisplayMode::ScreenTransition,
            time: 0.1,
        });
        rec.on_screen_changed(&ScreenChangeEvent {
            from: NodeId::from_index(1),
            to: NodeId::from_index(2),
            time: 0.4,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 5);
        assert!(matches!(
            events[0],
            RecordedEvent::Timer(TimerEvent {
                armed: true,
                period_ms: 16,
                ..
            })
        ));
        assert!(matches!(events[1], RecordedEvent::StatusChanged(_)));
        assert!(matches!(events[2], RecordedEvent::EventFired(_)));
        assert!(matches!(events[3], RecordedEvent::DisplayMode(_)));
        assert!(matches!(events[4], RecordedEvent::ScreenChanged(_)));
        assert_eq!(events[4].time(), 0.4);
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn truncated_record_stops_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_event_fired(&sample_fired());
        rec.on_event_fired(&sample_fired());
        let bytes = rec.into_bytes();

        let events: Vec<_> = decode(&bytes[..bytes.len() - 3]).collect();
        assert_eq!(events.len(), 1);
    }
}
