// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Each event gets its own track (`tid` = event index + 1). A run shows up as
//! a duration slice from the status change that started it to the one that
//! stopped it; individual firings are instant markers on the same track.
//! Gestures, display mode changes, timer changes and frames go to track 0.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use nemagui_core::event::Status;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::EventFired(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Fire",
                    "cat": "Event",
                    "ts": secs_to_us(e.time),
                    "pid": 0,
                    "tid": e.event.index() + 1,
                    "s": "t",
                    "args": {
                        "source": e.source.index(),
                        "progress": e.progress,
                        "flags": e.flags.bits(),
                    }
                }));
            }
            RecordedEvent::StatusChanged(e) => {
                let ph = match (e.from, e.to) {
                    (Status::Stopped, _) => "B",
                    (_, Status::Stopped) => "E",
                    _ => "i",
                };
                let mut event = json!({
                    "ph": ph,
                    "name": format!("Event {}", e.event.index()),
                    "cat": "Event",
                    "ts": secs_to_us(e.time),
                    "pid": 0,
                    "tid": e.event.index() + 1,
                    "args": {
                        "from": format!("{:?}", e.from),
                        "to": format!("{:?}", e.to),
                    }
                });
                if ph == "i" {
                    event["s"] = "t".into();
                }
                events.push(event);
            }
            RecordedEvent::Gesture(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.kind),
                    "cat": "Gesture",
                    "ts": secs_to_us(e.time),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "node": e.node.map(|n| n.index()),
                        "x": e.x,
                        "y": e.y,
                    }
                }));
            }
            RecordedEvent::DisplayMode(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "DisplayMode",
                    "cat": "Screen",
                    "ts": secs_to_us(e.time),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "from": format!("{:?}", e.from),
                        "to": format!("{:?}", e.to),
                    }
                }));
            }
            RecordedEvent::Timer(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": if e.armed { "TimerArmed" } else { "TimerCancelled" },
                    "cat": "Timer",
                    "ts": secs_to_us(e.time),
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "period_ms": e.period_ms,
                    }
                }));
            }
            RecordedEvent::ScreenChanged(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "ScreenChanged",
                    "cat": "Screen",
                    "ts": secs_to_us(e.time),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "from": e.from.index(),
                        "to": e.to.index(),
                    }
                }));
            }
            RecordedEvent::Frame(e) => {
                let damage = e.damage.map(|r| [r.x0, r.y0, r.x1, r.y1]);
                events.push(json!({
                    "ph": "i",
                    "name": "Frame",
                    "cat": "Display",
                    "ts": secs_to_us(e.time),
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "frame_index": e.frame_index,
                        "mode": format!("{:?}", e.mode),
                        "damage": damage,
                        "nodes_drawn": e.nodes_drawn,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn secs_to_us(secs: f64) -> f64 {
    secs * 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use nemagui_core::event::{EventId, RunFlags};
    use nemagui_core::trace::{EventFiredEvent, StatusChangeEvent, TraceSink};
    use nemagui_core::tree::NodeId;

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_status_changed(&StatusChangeEvent {
            event: EventId::from_index(0),
            from: Status::Stopped,
            to: Status::Running,
            time: 0.0,
        });
        rec.on_event_fired(&EventFiredEvent {
            event: EventId::from_index(0),
            source: NodeId::from_index(4),
            progress: 1.0,
            flags: RunFlags::FIRST_RUN | RunFlags::LAST_RUN,
            time: 0.25,
        });
        rec.on_status_changed(&StatusChangeEvent {
            event: EventId::from_index(0),
            from: Status::Running,
            to: Status::Stopped,
            time: 0.25,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["tid"], 1);

        assert_eq!(parsed[1]["ph"], "i");
        assert_eq!(parsed[1]["name"], "Fire");
        assert_eq!(parsed[1]["ts"], 250_000.0);

        assert_eq!(parsed[2]["ph"], "E");
        assert_eq!(parsed[2]["name"], parsed[0]["name"]);
    }

    #[test]
    fn pause_is_an_instant() {
        let mut rec = RecorderSink::new();
        rec.on_status_changed(&StatusChangeEvent {
            event: EventId::from_index(2),
            from: Status::Running,
            to: Status::Paused,
            time: 0.5,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["ph"], "i");
        assert_eq!(parsed[0]["s"], "t");
        assert_eq!(parsed[0]["tid"], 3);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
