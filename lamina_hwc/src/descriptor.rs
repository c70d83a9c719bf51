// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A plain-value hardware layer descriptor.

use lamina_core::hwc::{Blending, HwcLayer};
use lamina_core::rect::Rect;
use lamina_core::region::Region;
use lamina_core::transform::Orientation;

/// How a layer is composited on one display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompositionType {
    /// Scanned out by the display hardware.
    #[default]
    Overlay,
    /// Drawn by the client (shader) path into the framebuffer.
    Client,
}

/// What the hardware composer is told about one layer on one display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HwcLayerDescriptor {
    /// Excluded from hardware composition.
    pub skip: bool,
    /// Buffer orientation.
    pub transform: Orientation,
    /// Blending with the layers below.
    pub blending: Blending,
    /// Destination rectangle in display space.
    pub frame: Rect,
    /// Source crop in buffer space.
    pub crop: Rect,
    /// Visible region in display space; cleared once displayed.
    pub visible_region_screen: Region,
    /// Acquire fence, `-1` for none; consumed once displayed.
    pub acquire_fence_fd: i32,
    /// Frames this descriptor has been on screen for.
    pub frames_displayed: u64,
}

impl HwcLayerDescriptor {
    /// Creates a descriptor in its default state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            skip: false,
            transform: Orientation::empty(),
            blending: Blending::None,
            frame: Rect::EMPTY,
            crop: Rect::EMPTY,
            visible_region_screen: Region::new(),
            acquire_fence_fd: -1,
            frames_displayed: 0,
        }
    }

    /// How the layer ends up being composited.
    #[must_use]
    pub fn composition(&self) -> CompositionType {
        if self.skip {
            CompositionType::Client
        } else {
            CompositionType::Overlay
        }
    }
}

impl Default for HwcLayerDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl HwcLayer for HwcLayerDescriptor {
    fn set_default_state(&mut self) {
        let frames_displayed = self.frames_displayed;
        *self = Self {
            frames_displayed,
            ..Self::new()
        };
    }

    fn set_skip(&mut self, skip: bool) {
        self.skip = skip;
    }

    fn set_transform(&mut self, orientation: Orientation) {
        self.transform = orientation;
    }

    fn set_blending(&mut self, blending: Blending) {
        self.blending = blending;
    }

    fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    fn set_crop(&mut self, crop: Rect) {
        self.crop = crop;
    }

    fn set_visible_region_screen(&mut self, region: &Region) {
        self.visible_region_screen.clone_from(region);
    }

    fn set_acquire_fence_fd(&mut self, fd: i32) {
        self.acquire_fence_fd = fd;
    }

    fn on_displayed(&mut self) {
        // The hardware owns the fence now; the region is rebuilt next frame.
        self.acquire_fence_fd = -1;
        self.visible_region_screen.clear();
        self.frames_displayed += 1;
    }
}
