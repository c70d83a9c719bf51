// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display-space damage accumulated from latched frames.

use lamina_core::display::Display;
use lamina_core::region::Region;

/// The part of a display that needs recompositing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DamageRegion {
    /// The entire display needs redrawing.
    #[default]
    Full,
    /// Only this display-space region changed.
    Partial(Region),
    /// Nothing changed; the previous frame can be reused.
    None,
}

impl DamageRegion {
    /// Projects a layer-stack region onto `display`: clipped to the
    /// viewport, then mapped by the display transform.
    #[must_use]
    pub fn project<D: Display + ?Sized>(region: &Region, display: &D) -> Self {
        let clipped = region.intersect_rect(&display.viewport());
        if clipped.is_empty() {
            return Self::None;
        }
        Self::Partial(display.transform().transform_region(&clipped))
    }

    /// Returns `true` if no region needs redrawing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Merges another damage region into this one.
    pub fn merge(&mut self, other: &Self) {
        match other {
            Self::None => {}
            Self::Full => *self = Self::Full,
            Self::Partial(b) => match self {
                Self::Full => {}
                Self::None => *self = other.clone(),
                Self::Partial(a) => {
                    for r in b.rects() {
                        a.or_rect(*r);
                    }
                }
            },
        }
    }
}
