// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON event recording.
//!
//! [`JsonRecorder`] implements [`TraceSink`] and keeps every event as a
//! [`serde_json::Value`]. [`JsonRecorder::export`] writes them as one JSON
//! array, for diffing composition passes or loading into other tooling.

use std::io::{self, Write};

use serde_json::{Value, json};

use lamina_core::rect::Rect;
use lamina_core::trace::{GeometryEvent, LatchEvent, PassSummary, TraceSink, TransactionEvent};

/// Records trace events as JSON values.
#[derive(Clone, Debug, Default)]
pub struct JsonRecorder {
    events: Vec<Value>,
}

impl JsonRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[Value] {
        &self.events
    }

    /// Discards all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Writes the recorded events as a pretty-printed JSON array.
    pub fn export(&self, writer: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, &self.events)?;
        Ok(())
    }
}

fn rect(r: Rect) -> Value {
    json!([r.left, r.top, r.right, r.bottom])
}

impl TraceSink for JsonRecorder {
    fn on_transaction(&mut self, e: &TransactionEvent) {
        self.events.push(json!({
            "event": "transaction",
            "layer": e.layer.get(),
            "sequence": e.sequence,
            "input": e.input.bits(),
            "output": e.output.bits(),
            "size_changed": e.size_changed,
            "sequence_changed": e.sequence_changed,
            "resize_deferred": e.resize_deferred,
        }));
    }

    fn on_latch(&mut self, e: &LatchEvent) {
        self.events.push(json!({
            "event": "latch",
            "layer": e.layer.get(),
            "frame_size": [e.frame_size.width, e.frame_size.height],
            "dirty_bounds": rect(e.dirty_bounds),
            "recompute_visible_regions": e.recompute_visible_regions,
            "resized": e.resized,
        }));
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        self.events.push(json!({
            "event": "pass",
            "pass_index": s.pass_index,
            "transactions": s.transactions,
            "visible_region_changes": s.visible_region_changes,
            "deferred_resizes": s.deferred_resizes,
            "latched": s.latched,
            "latch_recomputes": s.latch_recomputes,
            "fallbacks": s.fallbacks,
        }));
    }

    fn on_geometry(&mut self, e: &GeometryEvent) {
        self.events.push(json!({
            "event": "geometry",
            "layer": e.layer.get(),
            "output": e.output.0,
            "frame": rect(e.frame),
            "crop": rect(e.crop),
            "orientation": e.orientation.bits(),
            "blending": format!("{:?}", e.blending),
            "fallback": e.fallback,
        }));
    }
}
