// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layer record, its construction, and the transaction mutators.

use alloc::string::String;
use alloc::sync::Arc;

use super::id::LayerId;
use super::state::{CreationFlags, LayerState, LayerStateFlags};
use super::visibility::VisibilityModel;
use crate::content::{Content, PlainContent};
use crate::rect::{Rect, Size};
use crate::region::Region;
use crate::transaction::{TransactionBits, TransactionFlags};
use crate::transform::Matrix22;

/// One composited layer.
///
/// `C` supplies the content-dependent parts of the geometry; see
/// [`Content`].
#[derive(Debug)]
pub struct Layer<C = PlainContent> {
    pub(crate) id: LayerId,
    pub(crate) name: String,

    // -- Double-buffered state --
    pub(crate) current: LayerState,
    pub(crate) drawing: LayerState,

    // -- Shared with requester threads --
    pub(crate) transaction_flags: Arc<TransactionFlags>,

    // -- Composition context only --
    pub(crate) content: C,
    pub(crate) visibility: VisibilityModel,
    pub(crate) content_dirty: bool,
    pub(crate) needs_filtering: bool,
    pub(crate) filtering: bool,
    pub(crate) premultiplied_alpha: bool,
}

impl Layer<PlainContent> {
    /// Creates a plain (colour) layer of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32, flags: CreationFlags) -> Self {
        Self::with_content(PlainContent::default(), width, height, flags)
    }
}

impl<C> Layer<C> {
    /// Creates a layer showing `content`.
    ///
    /// Both states start equal: size as given, no crop, identity transform,
    /// full alpha, `z` and layer stack 0, hidden iff requested.
    #[must_use]
    pub fn with_content(content: C, width: u32, height: u32, flags: CreationFlags) -> Self {
        let current = LayerState::new(width, height, flags);
        Self {
            id: LayerId::next(),
            name: String::from("unnamed"),
            drawing: current.clone(),
            current,
            transaction_flags: Arc::new(TransactionFlags::new()),
            content,
            visibility: VisibilityModel::default(),
            content_dirty: false,
            needs_filtering: false,
            filtering: false,
            premultiplied_alpha: !flags.contains(CreationFlags::NON_PREMULTIPLIED),
        }
    }

    // -- Identity --

    /// Returns the layer's identity.
    #[inline]
    #[must_use]
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Returns the debug name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the debug name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // -- State access --

    /// The state mutators write to.
    #[inline]
    #[must_use]
    pub fn current_state(&self) -> &LayerState {
        &self.current
    }

    /// The last committed state.
    #[inline]
    #[must_use]
    pub fn drawing_state(&self) -> &LayerState {
        &self.drawing
    }

    /// The content.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &C {
        &self.content
    }

    /// Mutable access to the content, e.g. for a producer queueing frames.
    #[inline]
    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }

    /// Whether content colour is premultiplied by alpha.
    #[inline]
    #[must_use]
    pub fn premultiplied_alpha(&self) -> bool {
        self.premultiplied_alpha
    }

    /// Whether committed state changed since the flag was last cleared.
    #[inline]
    #[must_use]
    pub fn content_dirty(&self) -> bool {
        self.content_dirty
    }

    /// Clears the content-dirty flag once the layer has been redrawn.
    pub fn clear_content_dirty(&mut self) {
        self.content_dirty = false;
    }

    // -- Transaction flags --

    /// Returns a handle requesters can post bits to without holding the
    /// layer.
    #[must_use]
    pub fn transaction_flags(&self) -> Arc<TransactionFlags> {
        Arc::clone(&self.transaction_flags)
    }

    /// Sets `bits` and returns the prior value.
    pub fn set_transaction_flags(&self, bits: TransactionBits) -> TransactionBits {
        self.transaction_flags.set(bits)
    }

    /// Clears `bits` and returns the subset of them that was set.
    pub fn get_transaction_flags(&self, bits: TransactionBits) -> TransactionBits {
        self.transaction_flags.get_clear(bits)
    }

    /// Signals that `current` has uncommitted changes.
    ///
    /// Returns `true` if the signal was not already pending.
    pub fn request_transaction(&self) -> bool {
        self.transaction_flags.request()
    }

    /// Forces the next transaction to re-evaluate visibility.
    pub fn force_visibility_transaction(&mut self) {
        self.current.sequence = self.current.sequence.wrapping_add(1);
        self.request_transaction();
    }

    // -- Mutators --
    //
    // Each returns `false` without touching anything when the value is
    // unchanged, so repeated requests never cause spurious transactions.

    /// Sets the position, keeping the linear transform.
    pub fn set_position(&mut self, x: f32, y: f32) -> bool {
        let (x, y) = (f64::from(x), f64::from(y));
        let t = &self.current.transform;
        if t.tx() == x && t.ty() == y {
            return false;
        }
        self.current.transform = t.with_translation(x, y);
        self.mark_changed()
    }

    /// Sets the draw-order key.
    pub fn set_layer(&mut self, z: i32) -> bool {
        if self.current.z == z {
            return false;
        }
        self.current.z = z;
        self.mark_changed()
    }

    /// Requests a new size.
    ///
    /// The size takes effect at the next commit; `sequence` is unchanged.
    pub fn set_size(&mut self, width: u32, height: u32) -> bool {
        let size = Size::new(width, height);
        if self.current.requested_size == size {
            return false;
        }
        self.current.requested_size = size;
        self.request_transaction();
        true
    }

    /// Sets the opacity.
    pub fn set_alpha(&mut self, alpha: u8) -> bool {
        if self.current.alpha == alpha {
            return false;
        }
        self.current.alpha = alpha;
        self.mark_changed()
    }

    /// Sets the linear transform, keeping the position.
    pub fn set_matrix(&mut self, matrix: Matrix22) -> bool {
        let next = self.current.transform.with_matrix(matrix);
        if next == self.current.transform {
            return false;
        }
        self.current.transform = next;
        self.mark_changed()
    }

    /// Sets the transparent-region hint.
    pub fn set_transparent_region_hint(&mut self, transparent: Region) -> bool {
        if self.current.transparent_region == transparent {
            return false;
        }
        self.current.transparent_region = transparent;
        self.mark_changed()
    }

    /// Updates the flag bits selected by `mask` to their values in `flags`.
    pub fn set_flags(&mut self, flags: LayerStateFlags, mask: LayerStateFlags) -> bool {
        let next = (self.current.flags & !mask) | (flags & mask);
        if self.current.flags == next {
            return false;
        }
        self.current.flags = next;
        self.mark_changed()
    }

    /// Sets the window crop; [`Rect::INVALID`] removes it.
    pub fn set_crop(&mut self, crop: Rect) -> bool {
        if self.current.crop == crop {
            return false;
        }
        self.current.crop = crop;
        self.mark_changed()
    }

    /// Moves the layer to another layer stack.
    pub fn set_layer_stack(&mut self, layer_stack: u32) -> bool {
        if self.current.layer_stack == layer_stack {
            return false;
        }
        self.current.layer_stack = layer_stack;
        self.mark_changed()
    }

    /// Bumps `sequence`, requests a transaction, and reports the change.
    fn mark_changed(&mut self) -> bool {
        self.current.sequence = self.current.sequence.wrapping_add(1);
        self.request_transaction();
        true
    }
}

impl<C: Content> Layer<C> {
    /// Whether the committed content is fully opaque.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.content.is_opaque()
    }
}
