// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What a layer shows, and how its buffer maps onto the window.
//!
//! The geometry engine never assumes a concrete layer type. Anything that
//! depends on the content goes through the [`Content`] trait, including the
//! buffer-space crop and whether a resize must wait for a matching frame.
//!
//! - [`PlainContent`] backs colour and dim layers: the whole window is the
//!   content and nothing is latched.
//! - [`BufferContent`] backs layers fed by a producer. Frames are queued by
//!   the producer side and become active when the composition pass latches
//!   them.

use alloc::collections::VecDeque;

use crate::layer::LayerState;
use crate::rect::{Rect, Size};
use crate::transform::Orientation;

/// Content capability of a layer.
///
/// Every method has the default behaviour of a layer without a buffer.
pub trait Content {
    /// The buffer-space rectangle that gets scaled onto the window.
    fn content_crop(&self, state: &LayerState) -> Rect {
        state.size.to_rect()
    }

    /// The orientation the buffer must be read with.
    fn content_transform(&self) -> Orientation {
        Orientation::empty()
    }

    /// Whether every content pixel is opaque.
    fn is_opaque(&self) -> bool {
        false
    }

    /// Whether the window may be resized independently of the content.
    ///
    /// Content that is not fixed size keeps the old window size until a
    /// frame of the requested size is latched.
    fn is_fixed_size(&self) -> bool {
        true
    }

    /// Whether there is anything to show.
    fn has_frame(&self) -> bool {
        true
    }

    /// Whether the content may only be shown on secure displays.
    fn is_secure(&self) -> bool {
        false
    }

    /// Whether the content is protected from capture.
    fn is_protected(&self) -> bool {
        false
    }

    /// Acquire fence of the active frame, `-1` for none.
    fn acquire_fence(&self) -> i32 {
        -1
    }

    /// Makes the next queued frame active, if any.
    fn latch(&mut self) -> Option<Latched> {
        None
    }
}

/// Result of a successful [`Content::latch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Latched {
    /// Size of the newly active frame.
    pub size: Size,
    /// Whether anything affecting visible regions changed with the frame.
    pub geometry_changed: bool,
}

/// Content of colour and dim layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlainContent {
    /// Whether the fill colour is opaque.
    pub opaque: bool,
}

impl Content for PlainContent {
    fn is_opaque(&self) -> bool {
        self.opaque
    }
}

/// How a buffer of the wrong size is fitted to the window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScalingMode {
    /// Hold the window size until a buffer of the requested size arrives.
    #[default]
    Freeze,
    /// Scale the buffer to the window.
    ScaleToWindow,
    /// Scale and crop the buffer to fill the window.
    ScaleCrop,
}

/// One frame produced into a [`BufferContent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Buffer dimensions.
    pub size: Size,
    /// Buffer crop; empty means the whole buffer.
    pub crop: Rect,
    /// Buffer orientation.
    pub transform: Orientation,
    /// Scaling mode chosen by the producer.
    pub scaling_mode: ScalingMode,
    /// Whether the pixel format has no alpha.
    pub opaque: bool,
    /// Acquire fence, `-1` for none.
    pub fence: i32,
}

impl Frame {
    /// A frame of the given size with no crop, transform or fence.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width, height),
            crop: Rect::INVALID,
            transform: Orientation::empty(),
            scaling_mode: ScalingMode::Freeze,
            opaque: false,
            fence: -1,
        }
    }
}

/// Content fed by a frame producer.
#[derive(Clone, Debug, Default)]
pub struct BufferContent {
    queue: VecDeque<Frame>,
    active: Option<Frame>,
    opaque_layer: bool,
    default_scaling_mode: ScalingMode,
}

impl BufferContent {
    /// Creates empty buffer content.
    ///
    /// `opaque_layer` declares the layer opaque regardless of frame format.
    #[must_use]
    pub fn new(opaque_layer: bool, scaling_mode: ScalingMode) -> Self {
        Self {
            queue: VecDeque::new(),
            active: None,
            opaque_layer,
            default_scaling_mode: scaling_mode,
        }
    }

    /// Queues a frame. Returns `true` if the queue was empty, meaning the
    /// composition pass should be woken.
    pub fn queue_frame(&mut self, frame: Frame) -> bool {
        self.queue.push_back(frame);
        self.queue.len() == 1
    }

    /// Number of frames waiting to be latched.
    #[must_use]
    pub fn queued_frames(&self) -> usize {
        self.queue.len()
    }

    /// The frame currently on screen.
    #[must_use]
    pub fn active_frame(&self) -> Option<&Frame> {
        self.active.as_ref()
    }

    fn scaling_mode(&self) -> ScalingMode {
        self.active
            .map_or(self.default_scaling_mode, |f| f.scaling_mode)
    }
}

impl Content for BufferContent {
    fn content_crop(&self, _state: &LayerState) -> Rect {
        match &self.active {
            Some(frame) if !frame.crop.is_empty() => frame.crop,
            Some(frame) => frame.size.to_rect(),
            None => Rect::INVALID,
        }
    }

    fn content_transform(&self) -> Orientation {
        self.active.map_or(Orientation::empty(), |f| f.transform)
    }

    fn is_opaque(&self) -> bool {
        self.active
            .is_some_and(|f| self.opaque_layer || f.opaque)
    }

    fn is_fixed_size(&self) -> bool {
        self.scaling_mode() != ScalingMode::Freeze
    }

    fn has_frame(&self) -> bool {
        self.active.is_some()
    }

    fn acquire_fence(&self) -> i32 {
        self.active.map_or(-1, |f| f.fence)
    }

    fn latch(&mut self) -> Option<Latched> {
        let next = self.queue.pop_front()?;
        let geometry_changed = match self.active {
            None => true,
            Some(prev) => {
                prev.size != next.size
                    || prev.crop != next.crop
                    || prev.transform != next.transform
                    || prev.scaling_mode != next.scaling_mode
                    || prev.opaque != next.opaque
            }
        };
        self.active = Some(next);
        Some(Latched {
            size: next.size,
            geometry_changed,
        })
    }
}
