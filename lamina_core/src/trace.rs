// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the composition pass.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! `*_traced` layer operations call. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`PassSummaryBuilder`] tallies the events of one composition pass and
//! produces a [`PassSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates [`GeometryEvent`] and the
//!   corresponding `TraceSink` method, emitted once per layer per display.

#[cfg(feature = "trace-rich")]
use crate::display::OutputId;
#[cfg(feature = "trace-rich")]
use crate::hwc::Blending;
use crate::layer::LayerId;
use crate::rect::{Rect, Size};
use crate::transaction::TransactionBits;
#[cfg(feature = "trace-rich")]
use crate::transform::Orientation;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted by [`Layer::do_transaction_traced`](crate::layer::Layer::do_transaction_traced).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransactionEvent {
    /// Which layer committed.
    pub layer: LayerId,
    /// Sequence number of the committed state.
    pub sequence: u32,
    /// Flags passed in by the caller.
    pub input: TransactionBits,
    /// Flags returned to the caller.
    pub output: TransactionBits,
    /// The committed size differs from the previous one.
    pub size_changed: bool,
    /// A sequenced property changed.
    pub sequence_changed: bool,
    /// A resize is held back until a matching frame is latched.
    pub resize_deferred: bool,
}

/// Emitted by [`Layer::latch_buffer_traced`](crate::layer::Layer::latch_buffer_traced)
/// when a frame was latched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LatchEvent {
    /// Which layer latched.
    pub layer: LayerId,
    /// Size of the latched frame.
    pub frame_size: Size,
    /// Bounds of the dirty region in layer-stack space.
    pub dirty_bounds: Rect,
    /// Whether visible regions must be recomputed.
    pub recompute_visible_regions: bool,
    /// The frame completed a deferred resize.
    pub resized: bool,
}

/// Emitted by [`Layer::set_geometry_traced`](crate::layer::Layer::set_geometry_traced).
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeometryEvent {
    /// Which layer.
    pub layer: LayerId,
    /// Which display.
    pub output: OutputId,
    /// Destination rectangle in display space.
    pub frame: Rect,
    /// Source crop in buffer space.
    pub crop: Rect,
    /// Layer orientation, possibly [`Orientation::ROT_INVALID`].
    pub orientation: Orientation,
    /// Blending written to the descriptor.
    pub blending: Blending,
    /// The layer needs client composition.
    pub fallback: bool,
}

/// Per-pass totals produced by [`PassSummaryBuilder`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Pass counter.
    pub pass_index: u64,
    /// Number of layers committed.
    pub transactions: u32,
    /// Commits that reported a visible-region change.
    pub visible_region_changes: u32,
    /// Commits that held back a resize.
    pub deferred_resizes: u32,
    /// Frames latched.
    pub latched: u32,
    /// Latches that requested visible-region recomputation.
    pub latch_recomputes: u32,
    /// Layers routed to client composition.
    pub fallbacks: u32,
}

impl PassSummary {
    /// Whether the occlusion pass has to run again.
    #[must_use]
    pub fn needs_visible_regions(&self) -> bool {
        self.visible_region_changes > 0 || self.latch_recomputes > 0
    }
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the composition pass.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a layer commits.
    fn on_transaction(&mut self, e: &TransactionEvent) {
        _ = e;
    }

    /// Called after a layer latches a frame.
    fn on_latch(&mut self, e: &LatchEvent) {
        _ = e;
    }

    /// Called with a per-pass summary.
    fn on_pass_summary(&mut self, s: &PassSummary) {
        _ = s;
    }

    /// Called after geometry is written for a display (requires `trace-rich`
    /// feature).
    #[cfg(feature = "trace-rich")]
    fn on_geometry(&mut self, e: &GeometryEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`TransactionEvent`].
    #[inline]
    pub fn transaction(&mut self, e: &TransactionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transaction(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LatchEvent`].
    #[inline]
    pub fn latch(&mut self, e: &LatchEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_latch(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassSummary`].
    #[inline]
    pub fn pass_summary(&mut self, s: &PassSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_pass_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits a [`GeometryEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn geometry(&mut self, e: &GeometryEvent) {
        if let Some(s) = &mut self.sink {
            s.on_geometry(e);
        }
    }
}

// ---------------------------------------------------------------------------
// PassSummaryBuilder
// ---------------------------------------------------------------------------

/// Tallies the events of one composition pass into a [`PassSummary`].
#[derive(Debug)]
pub struct PassSummaryBuilder {
    summary: PassSummary,
}

impl PassSummaryBuilder {
    /// Starts a summary for the given pass.
    #[must_use]
    pub fn new(pass_index: u64) -> Self {
        Self {
            summary: PassSummary {
                pass_index,
                ..PassSummary::default()
            },
        }
    }

    /// Counts a commit.
    pub fn record_transaction(&mut self, e: &TransactionEvent) {
        self.summary.transactions += 1;
        if e.output.contains(TransactionBits::VISIBLE_REGION) {
            self.summary.visible_region_changes += 1;
        }
        if e.resize_deferred {
            self.summary.deferred_resizes += 1;
        }
    }

    /// Counts a latch.
    pub fn record_latch(&mut self, e: &LatchEvent) {
        self.summary.latched += 1;
        if e.recompute_visible_regions {
            self.summary.latch_recomputes += 1;
        }
    }

    /// Counts a layer routed to client composition.
    pub fn record_fallback(&mut self) {
        self.summary.fallbacks += 1;
    }

    /// Consumes the builder and produces the final [`PassSummary`].
    #[must_use]
    pub fn finish(self) -> PassSummary {
        self.summary
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{CreationFlags, Layer};

    fn sample_transaction(output: TransactionBits) -> TransactionEvent {
        TransactionEvent {
            layer: Layer::new(1, 1, CreationFlags::empty()).id(),
            sequence: 4,
            input: TransactionBits::empty(),
            output,
            size_changed: false,
            sequence_changed: true,
            resize_deferred: false,
        }
    }

    fn sample_latch(recompute: bool) -> LatchEvent {
        LatchEvent {
            layer: Layer::new(1, 1, CreationFlags::empty()).id(),
            frame_size: Size::new(8, 8),
            dirty_bounds: Rect::from_size(8, 8),
            recompute_visible_regions: recompute,
            resized: false,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_transaction(&sample_transaction(TransactionBits::empty()));
        sink.on_latch(&sample_latch(false));
        sink.on_pass_summary(&PassSummary::default());
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.transaction(&sample_transaction(TransactionBits::empty()));
        tracer.latch(&sample_latch(true));
    }

    #[test]
    fn summary_builder_counts_events() {
        let mut builder = PassSummaryBuilder::new(9);
        builder.record_transaction(&sample_transaction(TransactionBits::VISIBLE_REGION));
        builder.record_transaction(&sample_transaction(TransactionBits::empty()));
        builder.record_latch(&sample_latch(false));
        builder.record_fallback();

        let summary = builder.finish();
        assert_eq!(summary.pass_index, 9);
        assert_eq!(summary.transactions, 2);
        assert_eq!(summary.visible_region_changes, 1);
        assert_eq!(summary.latched, 1);
        assert_eq!(summary.latch_recomputes, 0);
        assert_eq!(summary.fallbacks, 1);
        assert!(summary.needs_visible_regions());
    }

    #[test]
    fn empty_pass_needs_nothing() {
        let summary = PassSummaryBuilder::new(0).finish();
        assert_eq!(summary, PassSummary::default());
        assert!(!summary.needs_visible_regions());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            sequences: Vec<u32>,
        }
        impl TraceSink for RecordingSink {
            fn on_transaction(&mut self, e: &TransactionEvent) {
                self.sequences.push(e.sequence);
            }
        }

        let mut sink = RecordingSink {
            sequences: Vec::new(),
        };
        let mut layer = Layer::new(4, 4, CreationFlags::empty());
        layer.set_alpha(7);
        let mut tracer = Tracer::new(&mut sink);
        let _ = layer.do_transaction_traced(TransactionBits::empty(), &mut tracer);
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.sequences, &[1]);
    }
}
