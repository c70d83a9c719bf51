// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The double-buffered layer state record.

use bitflags::bitflags;

use crate::rect::{Rect, Size};
use crate::region::Region;
use crate::transform::Transform;

bitflags! {
    /// Per-layer state flags, updated through a mask by
    /// [`Layer::set_flags`](super::Layer::set_flags).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LayerStateFlags: u8 {
        /// The layer contributes nothing to composition.
        const HIDDEN = 0x01;

        // Remaining bits are carried but not interpreted.
        const _ = !0;
    }
}

bitflags! {
    /// Options fixed when a layer is created.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CreationFlags: u32 {
        /// Start hidden.
        const HIDDEN = 0x0004;
        /// Content colour is not premultiplied by alpha.
        const NON_PREMULTIPLIED = 0x0100;
    }
}

/// Everything a transaction can change about a layer.
///
/// Each [`Layer`](super::Layer) holds two of these: `current`, which
/// mutators write, and `drawing`, the snapshot the last commit produced.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerState {
    /// Active size.
    pub size: Size,
    /// Size to apply at the next commit.
    pub requested_size: Size,
    /// Window crop; empty or invalid means no crop.
    pub crop: Rect,
    /// Position and linear transform in layer-stack space.
    pub transform: Transform,
    /// Draw-order key.
    pub z: i32,
    /// Opacity, 255 is opaque.
    pub alpha: u8,
    /// Display grouping id.
    pub layer_stack: u32,
    /// State flags.
    pub flags: LayerStateFlags,
    /// Area known to be fully transparent.
    pub transparent_region: Region,
    /// Bumped on every geometry-relevant change.
    pub sequence: u32,
}

impl LayerState {
    /// Creates the initial state of a `width` × `height` layer.
    #[must_use]
    pub fn new(width: u32, height: u32, creation: CreationFlags) -> Self {
        let flags = if creation.contains(CreationFlags::HIDDEN) {
            LayerStateFlags::HIDDEN
        } else {
            LayerStateFlags::empty()
        };
        Self {
            size: Size::new(width, height),
            requested_size: Size::new(width, height),
            crop: Rect::INVALID,
            transform: Transform::IDENTITY,
            z: 0,
            alpha: 0xFF,
            layer_stack: 0,
            flags,
            transparent_region: Region::new(),
            sequence: 0,
        }
    }

    /// Returns the window crop, or `None` when no crop is set.
    #[inline]
    #[must_use]
    pub fn window_crop(&self) -> Option<Rect> {
        (!self.crop.is_empty()).then_some(self.crop)
    }
}

impl Default for LayerState {
    fn default() -> Self {
        Self::new(0, 0, CreationFlags::empty())
    }
}
