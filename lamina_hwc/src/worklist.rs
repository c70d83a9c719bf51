// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Work list: the hardware descriptors of one display for one frame.

use alloc::vec::Vec;

use lamina_core::content::Content;
use lamina_core::display::{Display, OutputId};
use lamina_core::hwc::HwcLayer;
use lamina_core::layer::{GeometryOutcome, Latch, Layer, LayerId};
use lamina_core::trace::PassSummaryBuilder;

use crate::damage::DamageRegion;
use crate::descriptor::{CompositionType, HwcLayerDescriptor};

/// One layer's slot in a [`WorkList`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkEntry {
    /// The layer the descriptor belongs to.
    pub layer: LayerId,
    /// The descriptor handed to the hardware composer.
    pub hwc: HwcLayerDescriptor,
}

/// The descriptors of one display, in composition order.
///
/// Entries are appended the first time a layer's geometry is written and
/// keep their position until [`clear`](Self::clear). Rebuild the list
/// whenever the layer order or set changes.
#[derive(Clone, Debug)]
pub struct WorkList {
    output: OutputId,
    entries: Vec<WorkEntry>,
    damage: DamageRegion,
}

impl WorkList {
    /// Creates an empty work list for the given output.
    ///
    /// The first frame is fully damaged.
    #[must_use]
    pub fn new(output: OutputId) -> Self {
        Self {
            output,
            entries: Vec::new(),
            damage: DamageRegion::Full,
        }
    }

    /// Target output for this list.
    #[must_use]
    pub fn output(&self) -> OutputId {
        self.output
    }

    /// Drops every entry and marks the display fully damaged.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.damage = DamageRegion::Full;
    }

    /// Entries in composition order.
    #[must_use]
    pub fn entries(&self) -> &[WorkEntry] {
        &self.entries
    }

    /// The descriptor of `layer`, if its geometry has been written.
    #[must_use]
    pub fn get(&self, layer: LayerId) -> Option<&HwcLayerDescriptor> {
        self.entries
            .iter()
            .find(|e| e.layer == layer)
            .map(|e| &e.hwc)
    }

    fn get_mut(&mut self, layer: LayerId) -> Option<&mut HwcLayerDescriptor> {
        self.entries
            .iter_mut()
            .find(|e| e.layer == layer)
            .map(|e| &mut e.hwc)
    }

    fn entry_mut(&mut self, layer: LayerId) -> &mut HwcLayerDescriptor {
        let index = match self.entries.iter().position(|e| e.layer == layer) {
            Some(index) => index,
            None => {
                self.entries.push(WorkEntry {
                    layer,
                    hwc: HwcLayerDescriptor::new(),
                });
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].hwc
    }

    /// Writes `layer`'s geometry, routing it to client composition if the
    /// hardware cannot express its transform.
    pub fn set_geometry<C, D>(&mut self, layer: &Layer<C>, display: &D) -> GeometryOutcome
    where
        C: Content,
        D: Display + ?Sized,
    {
        let hwc = self.entry_mut(layer.id());
        let outcome = layer.set_geometry(display, hwc);
        if outcome.is_fallback() {
            hwc.set_skip(true);
        }
        outcome
    }

    /// [`set_geometry`](Self::set_geometry), counting fallbacks in `summary`.
    pub fn set_geometry_counted<C, D>(
        &mut self,
        layer: &Layer<C>,
        display: &D,
        summary: &mut PassSummaryBuilder,
    ) -> GeometryOutcome
    where
        C: Content,
        D: Display + ?Sized,
    {
        let outcome = self.set_geometry(layer, display);
        if outcome.is_fallback() {
            summary.record_fallback();
        }
        outcome
    }

    /// Writes `layer`'s per-frame data and acquire fence.
    ///
    /// Does nothing if the layer has no entry yet.
    pub fn set_per_frame_data<C, D>(&mut self, layer: &Layer<C>, display: &D)
    where
        C: Content,
        D: Display + ?Sized,
    {
        if let Some(hwc) = self.get_mut(layer.id()) {
            layer.set_per_frame_data(display, hwc);
            layer.set_acquire_fence(display, hwc);
        }
    }

    /// Forwards the on-screen notification to `layer`'s descriptor.
    pub fn on_displayed<C, D>(&mut self, layer: &Layer<C>, display: &D)
    where
        C: Content,
        D: Display + ?Sized,
    {
        layer.on_layer_displayed(display, self.get_mut(layer.id()));
    }

    /// Adds a latched frame's dirty region to this frame's damage.
    pub fn add_damage<D: Display + ?Sized>(&mut self, latch: &Latch, display: &D) {
        self.damage
            .merge(&DamageRegion::project(&latch.dirty, display));
    }

    /// Returns this frame's damage and starts the next frame undamaged.
    pub fn take_damage(&mut self) -> DamageRegion {
        core::mem::replace(&mut self.damage, DamageRegion::None)
    }

    /// Whether any layer needs the client composition path this frame.
    #[must_use]
    pub fn needs_client_composition(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.hwc.composition() == CompositionType::Client)
    }
}
