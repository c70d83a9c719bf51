// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display context consumed by the geometry engine.
//!
//! Display rotation and viewport setup happen outside this crate. Layers
//! only need the resulting projection: the layer-stack → display transform,
//! the viewport clip in layer-stack space, and the physical height used to
//! flip mesh coordinates.

use core::fmt;

use crate::rect::Rect;
use crate::transform::Transform;

/// Identifies a specific display output.
///
/// Compositors assign output IDs; core code passes them through without
/// interpreting the value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct OutputId(pub u32);

impl fmt::Debug for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutputId({})", self.0)
    }
}

/// The projection of a layer stack onto one physical display.
pub trait Display {
    /// Which output this is.
    fn id(&self) -> OutputId;

    /// Maps layer-stack coordinates to display coordinates.
    fn transform(&self) -> Transform;

    /// The visible part of the layer stack, in layer-stack coordinates.
    fn viewport(&self) -> Rect;

    /// Physical height in pixels.
    fn height(&self) -> u32;

    /// Whether the projection itself scales and so needs filtering.
    fn needs_filtering(&self) -> bool {
        false
    }

    /// The layer stack shown on this display.
    fn layer_stack(&self) -> u32 {
        0
    }
}

/// A plain-value [`Display`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayState {
    /// Output identity.
    pub id: OutputId,
    /// Layer-stack → display transform.
    pub transform: Transform,
    /// Viewport in layer-stack coordinates.
    pub viewport: Rect,
    /// Physical width.
    pub width: u32,
    /// Physical height.
    pub height: u32,
    /// Layer stack shown on this display.
    pub layer_stack: u32,
}

impl DisplayState {
    /// Creates an untransformed display whose viewport covers
    /// `[0, 0, width, height]`.
    #[must_use]
    pub fn new(id: OutputId, width: u32, height: u32) -> Self {
        Self {
            id,
            transform: Transform::IDENTITY,
            viewport: Rect::from_size(width, height),
            width,
            height,
            layer_stack: 0,
        }
    }

    /// Replaces the viewport.
    #[must_use]
    pub fn with_viewport(mut self, viewport: Rect) -> Self {
        self.viewport = viewport;
        self
    }

    /// Replaces the projection transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

impl Display for DisplayState {
    fn id(&self) -> OutputId {
        self.id
    }

    fn transform(&self) -> Transform {
        self.transform
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn needs_filtering(&self) -> bool {
        // A projection that scales or skews resamples every layer.
        self.transform.kind().bits() >= crate::transform::TransformType::SCALE.bits()
            || !self.transform.preserves_rects()
    }

    fn layer_stack(&self) -> u32 {
        self.layer_stack
    }
}
