// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hardware-composition work lists for [`lamina_core`] layers.
//!
//! This crate sits between the per-layer geometry in [`lamina_core`] and a
//! hardware composer. It defines:
//!
//! - [`HwcLayerDescriptor`] — a plain-value implementation of
//!   [`HwcLayer`](lamina_core::hwc::HwcLayer)
//! - [`WorkList`] — the descriptors of one display in composition order,
//!   with client-composition fallback for transforms the hardware cannot
//!   express
//! - [`DamageRegion`] — display-space damage accumulated from latched frames

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod damage;
mod descriptor;
mod worklist;

pub use damage::DamageRegion;
pub use descriptor::{CompositionType, HwcLayerDescriptor};
pub use worklist::{WorkEntry, WorkList};
