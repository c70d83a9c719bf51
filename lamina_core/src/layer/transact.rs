// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The commit step and buffer latching, both run on the composition context.

use super::base::Layer;
use crate::content::Content;
use crate::display::Display;
use crate::region::Region;
use crate::trace::{LatchEvent, TransactionEvent, Tracer};
use crate::transaction::TransactionBits;
use crate::transform::TransformType;

/// Result of [`Layer::latch_buffer`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Latch {
    /// Layer-stack area that must be redrawn.
    pub dirty: Region,
    /// Whether the new frame invalidates visible regions.
    pub recompute_visible_regions: bool,
}

impl<C: Content> Layer<C> {
    /// Commits `current` into `drawing`.
    ///
    /// `flags` carries the caller's bits; the returned value is `flags` plus
    /// [`TransactionBits::VISIBLE_REGION`] if the size or any sequenced
    /// property changed. Passing [`TransactionBits::DONT_UPDATE_GEOMETRY`]
    /// keeps the pending resize pending.
    pub fn do_transaction(&mut self, flags: TransactionBits) -> TransactionBits {
        self.do_transaction_traced(flags, &mut Tracer::none())
    }

    /// [`do_transaction`](Self::do_transaction) with instrumentation.
    pub fn do_transaction_traced(
        &mut self,
        flags: TransactionBits,
        tracer: &mut Tracer<'_>,
    ) -> TransactionBits {
        let mut out = flags;

        // A frozen layer keeps its size until a frame of the requested size
        // has been latched.
        let defer_resize = !self.content.is_fixed_size()
            && self.current.requested_size != self.current.size;
        if !flags.contains(TransactionBits::DONT_UPDATE_GEOMETRY) && !defer_resize {
            self.current.size = self.current.requested_size;
        }

        let size_changed = self.drawing.size != self.current.size;
        if size_changed {
            out |= TransactionBits::VISIBLE_REGION;
        }

        let sequence_changed = self.current.sequence != self.drawing.sequence;
        if sequence_changed {
            out |= TransactionBits::VISIBLE_REGION;
            self.content_dirty = true;
            let t = &self.current.transform;
            self.needs_filtering =
                !t.preserves_rects() || t.kind().bits() >= TransformType::SCALE.bits();
        }

        self.drawing.clone_from(&self.current);

        tracer.transaction(&TransactionEvent {
            layer: self.id,
            sequence: self.drawing.sequence,
            input: flags,
            output: out,
            size_changed,
            sequence_changed,
            resize_deferred: defer_resize,
        });
        out
    }

    /// Latches the next queued frame of the content, if any.
    pub fn latch_buffer(&mut self) -> Latch {
        self.latch_buffer_traced(&mut Tracer::none())
    }

    /// [`latch_buffer`](Self::latch_buffer) with instrumentation.
    pub fn latch_buffer_traced(&mut self, tracer: &mut Tracer<'_>) -> Latch {
        let Some(latched) = self.content.latch() else {
            return Latch::default();
        };

        let mut resized = false;
        if latched.size == self.current.requested_size && latched.size != self.current.size {
            // The frame matches a frozen resize: apply it at the next commit.
            self.current.size = latched.size;
            self.request_transaction();
            resized = true;
        }

        let window = Region::from_rect(self.drawing.size.to_rect());
        let latch = Latch {
            dirty: self.drawing.transform.transform_region(&window),
            recompute_visible_regions: latched.geometry_changed,
        };

        tracer.latch(&LatchEvent {
            layer: self.id,
            frame_size: latched.size,
            dirty_bounds: latch.dirty.bounds(),
            recompute_visible_regions: latch.recompute_visible_regions,
            resized,
        });
        latch
    }
}

impl<C> Layer<C> {
    /// Whether the layer must be sampled with filtering on `display`.
    pub fn needs_filtering<D: Display + ?Sized>(&self, display: &D) -> bool {
        self.needs_filtering || display.needs_filtering()
    }

    /// Sets the filtering switch used for the current frame.
    pub fn set_filtering(&mut self, filtering: bool) {
        self.filtering = filtering;
    }

    /// The filtering switch used for the current frame.
    #[must_use]
    pub fn filtering(&self) -> bool {
        self.filtering
    }
}
