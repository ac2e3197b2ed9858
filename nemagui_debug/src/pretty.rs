// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are printed in milliseconds of engine wall time.

use std::io::Write;

use kurbo::Rect;
use nemagui_core::event::RunFlags;
use nemagui_core::trace::{
    DisplayModeEvent, EventFiredEvent, FrameEvent, GestureEvent, GestureKind, ScreenChangeEvent,
    StatusChangeEvent, TimerEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn ms(secs: f64) -> f64 {
    secs * 1000.0
}

fn gesture_name(kind: GestureKind) -> &'static str {
    match kind {
        GestureKind::Press => "press",
        GestureKind::Swipe => "swipe",
        GestureKind::Release => "release",
        GestureKind::Abort => "abort",
    }
}

fn flag_letters(flags: RunFlags) -> String {
    let mut out = String::new();
    for (flag, letter) in [
        (RunFlags::FIRST_RUN, 'F'),
        (RunFlags::LAST_RUN, 'L'),
        (RunFlags::REVERSED, 'R'),
    ] {
        out.push(if flags.contains(flag) { letter } else { '-' });
    }
    out
}

fn rect_text(rect: Option<Rect>) -> String {
    match rect {
        Some(r) => format!("({},{})-({},{})", r.x0, r.y0, r.x1, r.y1),
        None => "none".into(),
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_event_fired(&mut self, e: &EventFiredEvent) {
        let _ = writeln!(
            self.writer,
            "[fire] event={} source={} progress={:.3} flags={} at {:.1}ms",
            e.event.index(),
            e.source.index(),
            e.progress,
            flag_letters(e.flags),
            ms(e.time),
        );
    }

    fn on_status_changed(&mut self, e: &StatusChangeEvent) {
        let _ = writeln!(
            self.writer,
            "[status] event={} {:?} -> {:?} at {:.1}ms",
            e.event.index(),
            e.from,
            e.to,
            ms(e.time),
        );
    }

    fn on_gesture(&mut self, e: &GestureEvent) {
        let node = e
            .node
            .map_or_else(|| "-".into(), |n| n.index().to_string());
        let _ = writeln!(
            self.writer,
            "[gesture:{}] node={node} pos=({},{}) at {:.1}ms",
            gesture_name(e.kind),
            e.x,
            e.y,
            ms(e.time),
        );
    }

    fn on_display_mode(&mut self, e: &DisplayModeEvent) {
        let _ = writeln!(
            self.writer,
            "[mode] {:?} -> {:?} at {:.1}ms",
            e.from,
            e.to,
            ms(e.time),
        );
    }

    fn on_timer(&mut self, e: &TimerEvent) {
        let state = if e.armed { "armed" } else { "cancelled" };
        let _ = writeln!(
            self.writer,
            "[timer] {state} period={}ms at {:.1}ms",
            e.period_ms,
            ms(e.time),
        );
    }

    fn on_screen_changed(&mut self, e: &ScreenChangeEvent) {
        let _ = writeln!(
            self.writer,
            "[screen] {} -> {} at {:.1}ms",
            e.from.index(),
            e.to.index(),
            ms(e.time),
        );
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] index={} mode={:?} damage={} drawn={} at {:.1}ms",
            e.frame_index,
            e.mode,
            rect_text(e.damage),
            e.nodes_drawn,
            ms(e.time),
        );
    }
}
