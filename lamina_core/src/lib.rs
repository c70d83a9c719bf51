// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-layer transaction state and composition geometry for display
//! compositors.
//!
//! `lamina_core` owns the authoritative description of where and how one
//! layer appears on screen. It arbitrates between requested and committed
//! state across an asynchronous transaction protocol and derives the
//! geometry a hardware or shader composition pass consumes. It is `no_std`
//! compatible (with `alloc`).
//!
//! # Architecture
//!
//! One composition pass, as driven by the owning compositor:
//!
//! ```text
//!   requester threads                      composition context
//!   ─────────────────                      ───────────────────
//!   Layer::set_*() ──► current ──┐
//!        │                       │
//!        ▼                       ▼
//!   TransactionFlags ─────► Layer::do_transaction() ──► drawing
//!                                                          │
//!                           Layer::latch_buffer() ◄────────┤
//!                                                          ▼
//!                  per display: set_geometry / set_per_frame_data
//!                                                          │
//!                                                          ▼
//!                                                   HwcLayer descriptor
//! ```
//!
//! **[`layer`]** — [`Layer`](layer::Layer) with its double-buffered
//! [`LayerState`](layer::LayerState), the transaction mutators, the commit
//! step, the geometry engine and visibility bookkeeping. Client ownership
//! and release hooks live in [`ClientLayer`](layer::ClientLayer).
//!
//! **[`transaction`]** — The atomic [`TransactionFlags`](transaction::TransactionFlags)
//! word requesters use to signal pending work.
//!
//! **[`content`]** — The [`Content`](content::Content) capability through
//! which geometry reads the buffer crop and orientation.
//!
//! **[`transform`]** — Classified affine transforms built on `kurbo`.
//!
//! **[`rect`]** / **[`region`]** — Integer pixel rectangles and regions.
//!
//! **[`display`]** / **[`hwc`]** — The display projection and the hardware
//! descriptor contract, both implemented by the compositor.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! composition-pass instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-display
//!   geometry events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod content;
pub mod display;
pub mod hwc;
pub mod layer;
pub mod rect;
pub mod region;
pub mod trace;
pub mod transaction;
pub mod transform;
