// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use lamina_core::rect::Rect;
use lamina_core::trace::{GeometryEvent, LatchEvent, PassSummary, TraceSink, TransactionEvent};
use lamina_core::transaction::TransactionBits;

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

    /// Returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

struct Edges(Rect);

impl std::fmt::Display for Edges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = &self.0;
        write!(f, "[{},{},{},{}]", r.left, r.top, r.right, r.bottom)
    }
}

fn visible(bits: TransactionBits) -> &'static str {
    if bits.contains(TransactionBits::VISIBLE_REGION) {
        "dirty"
    } else {
        "clean"
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_transaction(&mut self, e: &TransactionEvent) {
        let _ = writeln!(
            self.writer,
            "[txn] layer={} seq={} in={:#x} out={:#x} visible={}{}{}",
            e.layer.get(),
            e.sequence,
            e.input.bits(),
            e.output.bits(),
            visible(e.output),
            if e.size_changed { " resized" } else { "" },
            if e.resize_deferred { " deferred" } else { "" },
        );
    }

    fn on_latch(&mut self, e: &LatchEvent) {
        let _ = writeln!(
            self.writer,
            "[latch] layer={} frame={}x{} dirty={} recompute={}",
            e.layer.get(),
            e.frame_size.width,
            e.frame_size.height,
            Edges(e.dirty_bounds),
            e.recompute_visible_regions,
        );
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        let _ = writeln!(
            self.writer,
            "[pass] index={} txns={} visible={} deferred={} latched={} fallbacks={}",
            s.pass_index,
            s.transactions,
            s.visible_region_changes,
            s.deferred_resizes,
            s.latched,
            s.fallbacks,
        );
    }

    fn on_geometry(&mut self, e: &GeometryEvent) {
        let path = if e.fallback { "client" } else { "overlay" };
        let _ = writeln!(
            self.writer,
            "[geometry] layer={} output={} frame={} crop={} orientation={:#x} \
             blending={:?} path={path}",
            e.layer.get(),
            e.output.0,
            Edges(e.frame),
            Edges(e.crop),
            e.orientation.bits(),
            e.blending,
        );
    }
}

#[cfg(test)]
mod tests {
    use lamina_core::display::{DisplayState, OutputId};
    use lamina_core::layer::{CreationFlags, Layer};
    use lamina_core::trace::Tracer;
    use lamina_hwc::HwcLayerDescriptor;

    use super::*;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).expect("trace output is UTF-8")
    }

    #[test]
    fn pretty_print_transaction() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        let mut layer = Layer::new(10, 10, CreationFlags::empty());
        layer.set_alpha(9);
        let _ = layer
            .do_transaction_traced(TransactionBits::empty(), &mut Tracer::new(&mut sink));
        let output = output(sink);
        assert!(output.starts_with("[txn]"), "got: {output}");
        assert!(output.contains("seq=1"), "got: {output}");
        assert!(output.contains("visible=dirty"), "got: {output}");
    }

    #[test]
    fn pretty_print_geometry() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        let mut layer = Layer::new(10, 10, CreationFlags::empty());
        let _ = layer.do_transaction(TransactionBits::empty());
        let display = DisplayState::new(OutputId(4), 8, 8);
        let mut hwc = HwcLayerDescriptor::new();
        let _ = layer.set_geometry_traced(&display, &mut hwc, &mut Tracer::new(&mut sink));
        let output = output(sink);
        assert!(output.contains("output=4"), "got: {output}");
        assert!(output.contains("frame=[0,0,8,8]"), "got: {output}");
        assert!(output.contains("path=overlay"), "got: {output}");
    }

    #[test]
    fn pretty_print_summary() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_pass_summary(&PassSummary {
            pass_index: 3,
            fallbacks: 2,
            ..PassSummary::default()
        });
        let output = output(sink);
        assert!(output.contains("index=3"), "got: {output}");
        assert!(output.contains("fallbacks=2"), "got: {output}");
    }
}
