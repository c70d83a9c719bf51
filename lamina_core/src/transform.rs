// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 2-D layer and display transforms with composition-oriented classification.
//!
//! [`Transform`] wraps a [`kurbo::Affine`] and classifies it on construction:
//!
//! - [`TransformType`] — which kinds of operation are present (translation,
//!   rotation, scale, or something the classifier cannot name).
//! - [`Orientation`] — the rotation/flip component expressed as buffer
//!   transform bits, or [`Orientation::ROT_INVALID`] when the linear part is
//!   not a multiple of 90° (skew or arbitrary rotation).
//!
//! Rectangle transformation maps the four corners and rounds the bounding box
//! to the nearest pixel, which is exact for rect-preserving transforms and a
//! conservative bound otherwise.

use core::ops::Mul;

use bitflags::bitflags;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point};

use crate::rect::Rect;
use crate::region::Region;

bitflags! {
    /// Kinds of operation present in a transform.
    ///
    /// The bit values are ordered so that `bits() >= SCALE.bits()` means
    /// "scales or is unclassifiable", which is what filtering decisions test.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TransformType: u8 {
        /// Non-zero translation.
        const TRANSLATE = 0x01;
        /// 90°/180°/270° rotation.
        const ROTATE = 0x02;
        /// Non-unit scale, or a single-axis flip.
        const SCALE = 0x04;
        /// Skew or non-orthogonal rotation.
        const UNKNOWN = 0x08;
    }
}

bitflags! {
    /// Buffer orientation bits: the rotation/flip part of a transform.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Orientation: u8 {
        /// Mirror horizontally.
        const FLIP_H = 0x01;
        /// Mirror vertically.
        const FLIP_V = 0x02;
        /// Rotate 90° clockwise.
        const ROT_90 = 0x04;
        /// 180° rotation.
        const ROT_180 = Self::FLIP_H.bits() | Self::FLIP_V.bits();
        /// 270° rotation.
        const ROT_270 = Self::ROT_180.bits() | Self::ROT_90.bits();
        /// The transform cannot be expressed as flips and 90° rotations.
        const ROT_INVALID = 0x80;
    }
}

/// A 2×2 linear matrix as sent by clients in a transaction.
///
/// Maps `(x, y)` to `(dsdx·x + dsdy·y, dtdx·x + dtdy·y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix22 {
    /// ∂s/∂x.
    pub dsdx: f32,
    /// ∂t/∂x.
    pub dtdx: f32,
    /// ∂s/∂y.
    pub dsdy: f32,
    /// ∂t/∂y.
    pub dtdy: f32,
}

impl Matrix22 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        dsdx: 1.0,
        dtdx: 0.0,
        dsdy: 0.0,
        dtdy: 1.0,
    };
}

impl Default for Matrix22 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A classified 2-D affine transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    affine: Affine,
    kind: TransformType,
    orientation: Orientation,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        affine: Affine::IDENTITY,
        kind: TransformType::empty(),
        orientation: Orientation::empty(),
    };

    /// Wraps and classifies an affine transform.
    #[must_use]
    pub fn from_affine(affine: Affine) -> Self {
        let (kind, orientation) = classify(affine);
        Self {
            affine,
            kind,
            orientation,
        }
    }

    /// Creates a pure translation.
    #[inline]
    #[must_use]
    pub fn from_translation(x: f64, y: f64) -> Self {
        Self::from_affine(Affine::new([1.0, 0.0, 0.0, 1.0, x, y]))
    }

    /// Creates a transform from a client matrix with no translation.
    #[must_use]
    pub fn from_matrix(m: Matrix22) -> Self {
        Self::from_affine(Affine::new([
            f64::from(m.dsdx),
            f64::from(m.dtdx),
            f64::from(m.dsdy),
            f64::from(m.dtdy),
            0.0,
            0.0,
        ]))
    }

    /// Creates the transform mapping a `width` × `height` area onto itself
    /// with the given orientation.
    ///
    /// With [`Orientation::ROT_90`], `width` and `height` describe the
    /// destination, so the source area is `height` × `width`.
    /// [`Orientation::ROT_INVALID`] yields the identity.
    #[must_use]
    pub fn from_orientation(orientation: Orientation, width: u32, height: u32) -> Self {
        if orientation.contains(Orientation::ROT_INVALID) {
            return Self::IDENTITY;
        }
        let (mut w, mut h) = (f64::from(width), f64::from(height));
        if orientation.contains(Orientation::ROT_90) {
            core::mem::swap(&mut w, &mut h);
        }
        let mut flip_h = Affine::IDENTITY;
        let mut flip_v = Affine::IDENTITY;
        let mut rot = Affine::IDENTITY;
        if orientation.contains(Orientation::FLIP_H) {
            flip_h = Affine::new([-1.0, 0.0, 0.0, 1.0, w, 0.0]);
        }
        if orientation.contains(Orientation::FLIP_V) {
            flip_v = Affine::new([1.0, 0.0, 0.0, -1.0, 0.0, h]);
        }
        if orientation.contains(Orientation::ROT_90) {
            let original_w = h;
            rot = Affine::new([0.0, 1.0, -1.0, 0.0, original_w, 0.0]);
        }
        Self::from_affine(flip_h * flip_v * rot)
    }

    /// Returns the underlying affine transform.
    #[inline]
    #[must_use]
    pub const fn affine(&self) -> Affine {
        self.affine
    }

    /// Returns the operation classification.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> TransformType {
        self.kind
    }

    /// Returns the rotation/flip component.
    #[inline]
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns `true` if axis-aligned rectangles stay axis-aligned rectangles.
    #[inline]
    #[must_use]
    pub const fn preserves_rects(&self) -> bool {
        !self.orientation.contains(Orientation::ROT_INVALID)
    }

    /// Horizontal translation.
    #[inline]
    #[must_use]
    pub fn tx(&self) -> f64 {
        self.affine.as_coeffs()[4]
    }

    /// Vertical translation.
    #[inline]
    #[must_use]
    pub fn ty(&self) -> f64 {
        self.affine.as_coeffs()[5]
    }

    /// Returns a copy with the translation replaced and the linear part kept.
    #[must_use]
    pub fn with_translation(&self, x: f64, y: f64) -> Self {
        let [a, b, c, d, _, _] = self.affine.as_coeffs();
        Self::from_affine(Affine::new([a, b, c, d, x, y]))
    }

    /// Returns a copy with the linear part replaced and the translation kept.
    #[must_use]
    pub fn with_matrix(&self, m: Matrix22) -> Self {
        let [.., e, f] = self.affine.as_coeffs();
        Self::from_affine(Affine::new([
            f64::from(m.dsdx),
            f64::from(m.dtdx),
            f64::from(m.dsdy),
            f64::from(m.dtdy),
            e,
            f,
        ]))
    }

    /// Returns the inverse transform.
    ///
    /// A singular transform has no inverse; the identity is returned so
    /// that downstream clamps still see finite geometry.
    #[must_use]
    pub fn inverse(&self) -> Self {
        if self.affine.determinant() == 0.0 {
            return Self::IDENTITY;
        }
        Self::from_affine(self.affine.inverse())
    }

    /// Maps a point.
    #[inline]
    #[must_use]
    pub fn transform_point(&self, p: Point) -> Point {
        self.affine * p
    }

    /// Maps a rectangle and returns the pixel-rounded bounding box of the
    /// four transformed corners.
    ///
    /// Translation-only transforms move the edges as they are, so an empty
    /// or inverted rectangle stays empty.
    #[must_use]
    pub fn transform_rect(&self, r: &Rect) -> Rect {
        if self.kind.bits() <= TransformType::TRANSLATE.bits() {
            return r.offset_by(round_to_pixel(self.tx()), round_to_pixel(self.ty()));
        }
        let (l, t) = (f64::from(r.left), f64::from(r.top));
        let (rr, b) = (f64::from(r.right), f64::from(r.bottom));
        let corners = [
            self.transform_point(Point::new(l, t)),
            self.transform_point(Point::new(rr, t)),
            self.transform_point(Point::new(l, b)),
            self.transform_point(Point::new(rr, b)),
        ];
        let mut min = corners[0];
        let mut max = corners[0];
        for c in &corners[1..] {
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }
        Rect::new(
            round_to_pixel(min.x),
            round_to_pixel(min.y),
            round_to_pixel(max.x),
            round_to_pixel(max.y),
        )
    }

    /// Maps a region.
    ///
    /// Translation-only transforms shift every rectangle by the rounded
    /// offset; rect-preserving transforms map each rectangle; anything else
    /// collapses to the transformed bounds.
    #[must_use]
    pub fn transform_region(&self, region: &Region) -> Region {
        if self.kind.bits() <= TransformType::TRANSLATE.bits() {
            return region.translate(round_to_pixel(self.tx()), round_to_pixel(self.ty()));
        }
        if self.preserves_rects() {
            let mut out = Region::new();
            for r in region.rects() {
                out.or_rect(self.transform_rect(r));
            }
            out
        } else {
            Region::from_rect(self.transform_rect(&region.bounds()))
        }
    }
}

impl Default for Transform {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::from_affine(self.affine * rhs.affine)
    }
}

/// Rounds half-up to the nearest integer pixel, saturating.
#[expect(
    clippy::cast_possible_truncation,
    reason = "pixel coordinates saturate at the i32 range"
)]
fn round_to_pixel(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

fn is_zero(v: f64) -> bool {
    v == 0.0
}

fn abs_is_one(v: f64) -> bool {
    is_zero(v.abs() - 1.0)
}

fn classify(affine: Affine) -> (TransformType, Orientation) {
    // x' = a·x + c·y + e, y' = b·x + d·y + f
    let [a, b, c, d, e, f] = affine.as_coeffs();

    let mut scale = false;
    let mut orientation = Orientation::empty();
    if is_zero(b) && is_zero(c) {
        if a < 0.0 {
            orientation |= Orientation::FLIP_H;
        }
        if d < 0.0 {
            orientation |= Orientation::FLIP_V;
        }
        scale = !abs_is_one(a) || !abs_is_one(d);
    } else if is_zero(a) && is_zero(d) {
        orientation |= Orientation::ROT_90;
        if c > 0.0 {
            orientation |= Orientation::FLIP_V;
        }
        if b < 0.0 {
            orientation |= Orientation::FLIP_H;
        }
        scale = !abs_is_one(b) || !abs_is_one(c);
    } else {
        orientation = Orientation::ROT_INVALID;
    }

    let mut kind = TransformType::empty();
    if orientation.contains(Orientation::ROT_INVALID) {
        kind |= TransformType::UNKNOWN;
    } else {
        if orientation.contains(Orientation::ROT_90)
            || orientation.contains(Orientation::ROT_180)
        {
            kind |= TransformType::ROTATE;
        } else if orientation.intersects(Orientation::ROT_180) {
            // A single-axis flip is a negative scale.
            kind |= TransformType::SCALE;
        }
        if scale {
            kind |= TransformType::SCALE;
        }
    }
    if !is_zero(e) || !is_zero(f) {
        kind |= TransformType::TRANSLATE;
    }
    (kind, orientation)
}
