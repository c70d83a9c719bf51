// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visible-region bookkeeping.
//!
//! The regions are computed by the compositor's occlusion pass and stored
//! here once per frame; this crate only reads them back.

use super::base::Layer;
use super::state::LayerStateFlags;
use crate::content::Content;
use crate::region::Region;

/// Regions written by the occlusion pass, in layer-stack space.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibilityModel {
    pub(crate) visible_region: Region,
    pub(crate) covered_region: Region,
    pub(crate) visible_non_transparent_region: Region,
}

impl VisibilityModel {
    /// Area of the layer that is visible on screen.
    #[must_use]
    pub fn visible_region(&self) -> &Region {
        &self.visible_region
    }

    /// Area of the layer covered by layers above it.
    #[must_use]
    pub fn covered_region(&self) -> &Region {
        &self.covered_region
    }

    /// Visible area minus the transparent-region hint.
    #[must_use]
    pub fn visible_non_transparent_region(&self) -> &Region {
        &self.visible_non_transparent_region
    }
}

impl<C> Layer<C> {
    /// The stored regions.
    #[must_use]
    pub fn visibility(&self) -> &VisibilityModel {
        &self.visibility
    }

    /// Stores the visible region.
    pub fn set_visible_region(&mut self, region: Region) {
        self.visibility.visible_region = region;
    }

    /// Stores the covered region.
    pub fn set_covered_region(&mut self, region: Region) {
        self.visibility.covered_region = region;
    }

    /// Stores the visible, non-transparent region.
    pub fn set_visible_non_transparent_region(&mut self, region: Region) {
        self.visibility.visible_non_transparent_region = region;
    }
}

impl<C: Content> Layer<C> {
    /// Whether the content is only shown on secure displays.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.content.is_secure()
    }

    /// Whether the content is protected from capture.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        self.content.is_protected()
    }

    /// Whether the committed state contributes anything to composition.
    ///
    /// Requires the hidden flag clear, a non-zero alpha, and a frame to show.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        let s = &self.drawing;
        !s.flags.contains(LayerStateFlags::HIDDEN) && s.alpha != 0 && self.content.has_frame()
    }
}
