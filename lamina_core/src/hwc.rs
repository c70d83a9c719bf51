// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract for hardware-composition layer descriptors.
//!
//! A hardware composer accepts one descriptor per layer per display. This
//! crate only *produces* descriptor contents: geometry once per geometry
//! change, visible regions and fences every frame. The descriptor type and
//! the decision between hardware overlay and client (GL) composition belong
//! to the compositor; `lamina_hwc` provides a concrete implementation.
//!
//! # Frame pseudocode
//!
//! ```rust,ignore
//! fn on_frame(layers: &mut [Layer], display: &DisplayState, list: &mut WorkList) {
//!     for (layer, hwc) in layers.iter_mut().zip(list.iter_mut()) {
//!         if geometry_changed {
//!             if layer.set_geometry(display, hwc).is_fallback() {
//!                 hwc.set_skip(true);
//!             }
//!         }
//!         layer.set_per_frame_data(display, hwc);
//!         layer.set_acquire_fence(display, hwc);
//!     }
//!     // commit to the hardware, then:
//!     for (layer, hwc) in layers.iter_mut().zip(list.iter_mut()) {
//!         layer.on_layer_displayed(display, Some(hwc));
//!     }
//! }
//! ```

use crate::rect::Rect;
use crate::region::Region;
use crate::transform::Orientation;

/// How a hardware layer is blended with what lies below it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Blending {
    /// Opaque copy.
    #[default]
    None,
    /// Source colour is premultiplied by alpha.
    Premultiplied,
    /// Source colour is multiplied by alpha during blending.
    Coverage,
}

/// A per-layer, per-display hardware-composition descriptor.
pub trait HwcLayer {
    /// Resets every field to its default before geometry is written.
    fn set_default_state(&mut self);

    /// Excludes the layer from hardware composition.
    fn set_skip(&mut self, skip: bool);

    /// Sets the buffer orientation applied by the hardware.
    fn set_transform(&mut self, orientation: Orientation);

    /// Sets the blending mode.
    fn set_blending(&mut self, blending: Blending);

    /// Sets the destination rectangle in display coordinates.
    fn set_frame(&mut self, frame: Rect);

    /// Sets the source crop in buffer coordinates.
    fn set_crop(&mut self, crop: Rect);

    /// Sets the visible region in display coordinates.
    fn set_visible_region_screen(&mut self, region: &Region);

    /// Sets the acquire fence file descriptor, `-1` for none.
    fn set_acquire_fence_fd(&mut self, fd: i32);

    /// Notifies the descriptor that the frame it described is on screen.
    fn on_displayed(&mut self);
}
