// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel regions as sets of disjoint rectangles.

use alloc::vec::Vec;

use crate::rect::Rect;

/// A set of pixels represented as non-overlapping, non-empty rectangles.
///
/// Equality compares the rectangle decomposition, so two regions covering
/// the same pixels built in a different order may compare unequal. Callers
/// that use equality as a change guard get a spurious "changed" at worst.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    /// Creates an empty region.
    #[must_use]
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// Creates a region covering `rect` (empty if `rect` is empty).
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        let mut region = Self::new();
        region.or_rect(rect);
        region
    }

    /// Creates a region covering the union of `rects`.
    #[must_use]
    pub fn from_rects(rects: &[Rect]) -> Self {
        let mut region = Self::new();
        for r in rects {
            region.or_rect(*r);
        }
        region
    }

    /// Returns `true` if the region covers no pixels.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Returns the disjoint rectangles making up the region.
    #[inline]
    #[must_use]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Returns the bounding rectangle, or [`Rect::EMPTY`] for an empty region.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.rects
            .iter()
            .fold(Rect::EMPTY, |acc, r| acc.union(r))
    }

    /// Removes every rectangle.
    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// Adds `rect` to the region.
    pub fn or_rect(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        // Keep the pieces of `rect` not already covered, so the set stays
        // disjoint.
        let mut pieces = Vec::from([rect]);
        for existing in &self.rects {
            let mut next = Vec::with_capacity(pieces.len());
            for piece in &pieces {
                subtract_into(piece, existing, &mut next);
            }
            pieces = next;
            if pieces.is_empty() {
                return;
            }
        }
        self.rects.extend(pieces);
    }

    /// Removes `rect` from the region.
    pub fn subtract_rect(&mut self, rect: Rect) {
        if rect.is_empty() || self.rects.is_empty() {
            return;
        }
        let mut out = Vec::with_capacity(self.rects.len());
        for r in &self.rects {
            subtract_into(r, &rect, &mut out);
        }
        self.rects = out;
    }

    /// Returns the part of the region inside `rect`.
    #[must_use]
    pub fn intersect_rect(&self, rect: &Rect) -> Self {
        let rects = self
            .rects
            .iter()
            .map(|r| r.intersect(rect))
            .filter(|r| !r.is_empty())
            .collect();
        Self { rects }
    }

    /// Returns the region moved by `(dx, dy)`.
    #[must_use]
    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self {
            rects: self.rects.iter().map(|r| r.offset_by(dx, dy)).collect(),
        }
    }

    /// Returns the summed pixel area.
    #[must_use]
    pub fn area(&self) -> i64 {
        self.rects
            .iter()
            .map(|r| i64::from(r.width()) * i64::from(r.height()))
            .sum()
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        Self::from_rect(rect)
    }
}

/// Pushes the parts of `a` not covered by `b` (at most four bands).
fn subtract_into(a: &Rect, b: &Rect, out: &mut Vec<Rect>) {
    let overlap = a.intersect(b);
    if overlap.is_empty() {
        out.push(*a);
        return;
    }
    // Top band.
    if overlap.top > a.top {
        out.push(Rect::new(a.left, a.top, a.right, overlap.top));
    }
    // Bottom band.
    if overlap.bottom < a.bottom {
        out.push(Rect::new(a.left, overlap.bottom, a.right, a.bottom));
    }
    // Left and right of the overlap, within its rows.
    if overlap.left > a.left {
        out.push(Rect::new(a.left, overlap.top, overlap.left, overlap.bottom));
    }
    if overlap.right < a.right {
        out.push(Rect::new(overlap.right, overlap.top, a.right, overlap.bottom));
    }
}
