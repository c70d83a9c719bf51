// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer rectangles in layer, layer-stack, display, and buffer space.
//!
//! Composition geometry is integral: the hardware path only accepts whole
//! pixels, so crops and frames are kept as edge coordinates rather than
//! `kurbo::Rect`.
//!
//! A rectangle with negative width or height is *invalid*. The window crop
//! uses [`Rect::INVALID`] to mean "no crop".

use crate::transform::Orientation;

/// An axis-aligned rectangle described by its four edges.
///
/// `right` and `bottom` are exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

/// Width and height of a layer or buffer, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Horizontal extent.
    pub width: u32,
    /// Vertical extent.
    pub height: u32,
}

impl Size {
    /// Creates a size.
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `[0, 0, width, height]`.
    #[inline]
    #[must_use]
    pub const fn to_rect(self) -> Rect {
        Rect::from_size(self.width, self.height)
    }
}

impl Rect {
    /// The "no rectangle" sentinel: `[0, 0, -1, -1]`.
    pub const INVALID: Self = Self::new(0, 0, -1, -1);

    /// The empty rectangle at the origin.
    pub const EMPTY: Self = Self::new(0, 0, 0, 0);

    /// Creates a rectangle from its edges.
    #[inline]
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates `[0, 0, width, height]`.
    ///
    /// Dimensions larger than `i32::MAX` saturate.
    #[inline]
    #[must_use]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, saturate_i32(width), saturate_i32(height))
    }

    /// Width (may be negative for invalid rectangles).
    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.right.wrapping_sub(self.left)
    }

    /// Height (may be negative for invalid rectangles).
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.bottom.wrapping_sub(self.top)
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Returns the overlap of `self` and `other`.
    ///
    /// The result is empty (possibly invalid) when they do not overlap;
    /// callers test it with [`is_empty`](Self::is_empty).
    #[inline]
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        )
    }

    /// Returns the smallest rectangle containing both. Empty inputs are
    /// ignored.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Returns `true` if `other` lies entirely inside `self`.
    #[inline]
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    /// Moves the rectangle by `(dx, dy)`, saturating at the `i32` range.
    #[inline]
    #[must_use]
    pub const fn offset_by(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.left.saturating_add(dx),
            self.top.saturating_add(dy),
            self.right.saturating_add(dx),
            self.bottom.saturating_add(dy),
        )
    }

    /// Applies a buffer orientation inside a `width` × `height` frame.
    ///
    /// Flips are applied first (horizontal, then vertical) and the 90°
    /// rotation last, which is the order buffer producers use when they
    /// describe their transform.
    #[must_use]
    pub fn apply_orientation(&self, orientation: Orientation, width: i32, height: i32) -> Self {
        let mut r = *self;
        if orientation.contains(Orientation::FLIP_H) {
            r = Self::new(width - r.right, r.top, width - r.left, r.bottom);
        }
        if orientation.contains(Orientation::FLIP_V) {
            r = Self::new(r.left, height - r.bottom, r.right, height - r.top);
        }
        if orientation.contains(Orientation::ROT_90) {
            r = Self::new(height - r.bottom, r.left, height - r.top, r.right);
        }
        r
    }
}

const fn saturate_i32(v: u32) -> i32 {
    if v > i32::MAX as u32 {
        i32::MAX
    } else {
        v as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_and_zero_size_are_empty() {
        assert!(Rect::INVALID.is_empty());
        assert!(Rect::EMPTY.is_empty());
    }

    #[test]
    fn offset_saturates() {
        let r = Rect::new(0, 0, 10, 10).offset_by(i32::MAX, i32::MIN);
        assert_eq!(r, Rect::new(i32::MAX, i32::MIN, i32::MAX, i32::MIN));
        assert!(r.is_empty());
    }

    #[test]
    fn intersect_overlapping() {
        let a = Rect::new(0, 0, 100, 50);
        let b = Rect::new(50, 25, 200, 200);
        assert_eq!(a.intersect(&b), Rect::new(50, 25, 100, 50));
    }

    #[test]
    fn intersect_disjoint_is_empty() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 20, 30, 30);
        assert!(a.intersect(&b).is_empty());
    }

    #[test]
    fn union_ignores_empty() {
        let a = Rect::new(5, 5, 10, 10);
        assert_eq!(a.union(&Rect::INVALID), a);
        assert_eq!(Rect::EMPTY.union(&a), a);
        assert_eq!(
            a.union(&Rect::new(0, 8, 6, 20)),
            Rect::new(0, 5, 10, 20)
        );
    }

    #[test]
    fn flip_h_mirrors_horizontally() {
        let r = Rect::new(10, 20, 30, 40);
        let o = r.apply_orientation(Orientation::FLIP_H, 100, 50);
        assert_eq!(o, Rect::new(70, 20, 90, 40));
    }

    #[test]
    fn flip_v_mirrors_vertically() {
        let r = Rect::new(10, 20, 30, 40);
        let o = r.apply_orientation(Orientation::FLIP_V, 100, 50);
        assert_eq!(o, Rect::new(10, 10, 30, 30));
    }

    #[test]
    fn rot_90_swaps_axes() {
        let r = Rect::new(10, 20, 30, 40);
        let o = r.apply_orientation(Orientation::ROT_90, 100, 50);
        assert_eq!(o, Rect::new(10, 10, 30, 30));
        assert_eq!(o.width(), r.height());
        assert_eq!(o.height(), r.width());
    }

    #[test]
    fn from_size_saturates() {
        let r = Rect::from_size(u32::MAX, 4);
        assert_eq!(r.right, i32::MAX);
        assert_eq!(r.bottom, 4);
    }
}
