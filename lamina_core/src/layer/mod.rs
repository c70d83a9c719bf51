// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-layer transaction state machine and geometry engine.
//!
//! A [`Layer`] holds two copies of its [`LayerState`]:
//!
//! - `current` is written by the transaction mutators
//!   ([`set_position`](Layer::set_position), [`set_alpha`](Layer::set_alpha),
//!   [`set_crop`](Layer::set_crop), ...). Each mutator is a no-op when the
//!   value is unchanged; otherwise it bumps `sequence` and raises
//!   [`TRANSACTION_NEEDED`](crate::transaction::TransactionBits::TRANSACTION_NEEDED).
//! - `drawing` is only written by [`do_transaction`](Layer::do_transaction),
//!   which applies the pending resize, reports whether visible regions must
//!   be recomputed and copies `current` over.
//!
//! Everything downstream of the commit (bounds, mesh, hardware crop and
//! descriptor contents, visibility) reads `drawing`.
//!
//! # Contexts
//!
//! Mutators take `&mut Layer` and are expected to run under the owner's
//! transaction lock. The composition context owns the commit, latching and
//! geometry. The [`TransactionFlags`](crate::transaction::TransactionFlags)
//! word is the only state shared between them without that lock.

mod base;
mod client;
mod geometry;
mod id;
mod state;
mod transact;
mod visibility;

pub use base::Layer;
pub use client::{ClientLayer, SurfaceHandle};
pub use geometry::{GeometryOutcome, compute_bounds, compute_crop};
pub use id::{ClientId, LayerId};
pub use state::{CreationFlags, LayerState, LayerStateFlags};
pub use transact::Latch;
pub use visibility::VisibilityModel;
