// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry derived from the committed state for one display.
//!
//! Everything here reads `drawing` only. The hardware path receives an
//! integer source crop in buffer space, while the shader path samples with
//! float texture coordinates; [`compute_crop`] rounds each inset up so the
//! hardware never samples outside the requested content, at the cost of
//! disagreeing with [`Layer::compute_texture_coords`] by up to one buffer
//! pixel per unit of content scale.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

use super::base::Layer;
use super::state::LayerState;
use crate::content::Content;
use crate::display::Display;
use crate::hwc::{Blending, HwcLayer};
use crate::rect::Rect;
#[cfg(feature = "trace-rich")]
use crate::trace::GeometryEvent;
use crate::trace::Tracer;
use crate::transform::Orientation;

/// Whether the hardware path can show a layer as configured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeometryOutcome {
    /// The descriptor is complete.
    Hardware,
    /// The layer transform is not a combination of flips and 90° rotations;
    /// the descriptor carries an identity transform and the layer must be
    /// composited by the client path.
    Fallback,
}

impl GeometryOutcome {
    /// Returns `true` for [`GeometryOutcome::Fallback`].
    #[inline]
    #[must_use]
    pub fn is_fallback(self) -> bool {
        self == Self::Fallback
    }
}

/// The window rect `[0, 0, w, h]`, clipped to the window crop if one is set.
#[must_use]
pub fn compute_bounds(state: &LayerState) -> Rect {
    let window = state.size.to_rect();
    match state.window_crop() {
        Some(crop) => window.intersect(&crop),
        None => window,
    }
}

/// Computes the buffer-space source crop for the hardware path.
///
/// The window crop (the whole window when none is set) is clipped to
/// `viewport` in layer-stack space, mapped back into the window, oriented
/// like the buffer and then used to shrink `content_crop` proportionally.
/// If nothing of the window survives the clip, `content_crop` is returned
/// unchanged.
#[must_use]
pub fn compute_crop(
    state: &LayerState,
    content_crop: Rect,
    content_transform: Orientation,
    viewport: &Rect,
) -> Rect {
    let window = state.size.to_rect();
    let window_crop = state.window_crop().unwrap_or(window);

    let on_screen = state.transform.transform_rect(&window_crop).intersect(viewport);
    if on_screen.is_empty() {
        return content_crop;
    }
    let active = state
        .transform
        .inverse()
        .transform_rect(&on_screen)
        .intersect(&window);
    if active.is_empty() {
        return content_crop;
    }

    // Reading the buffer undoes its transform: a 90° rotation swaps the
    // window axes and reverses which edges the flips apply to.
    let mut inverse = content_transform;
    let (mut win_w, mut win_h) = (window.width(), window.height());
    if inverse.contains(Orientation::ROT_90) {
        inverse ^= Orientation::FLIP_H | Orientation::FLIP_V;
        core::mem::swap(&mut win_w, &mut win_h);
    }
    let win_crop = active.apply_orientation(inverse, window.width(), window.height());

    let (x_scale, y_scale) = (
        content_crop.width() as f32 / win_w as f32,
        content_crop.height() as f32 / win_h as f32,
    );

    let mut crop = Rect::new(
        content_crop.left + ceil_inset(win_crop.left, x_scale),
        content_crop.top + ceil_inset(win_crop.top, y_scale),
        content_crop.right - ceil_inset(win_w - win_crop.right, x_scale),
        content_crop.bottom - ceil_inset(win_h - win_crop.bottom, y_scale),
    );
    crop.right = crop.right.max(crop.left);
    crop.bottom = crop.bottom.max(crop.top);
    crop
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "insets are bounded by the content crop"
)]
fn ceil_inset(offset: i32, scale: f32) -> i32 {
    (offset as f32 * scale).ceil() as i32
}

impl<C> Layer<C> {
    /// The committed window bounds; see [`compute_bounds`].
    #[must_use]
    pub fn compute_bounds(&self) -> Rect {
        compute_bounds(&self.drawing)
    }

    /// The four corners of the bounds in display space, in the order
    /// top-left, bottom-left, bottom-right, top-right, with `y` measured
    /// upward from the bottom of the display.
    #[must_use]
    pub fn compute_mesh<D: Display + ?Sized>(&self, display: &D) -> [Point; 4] {
        let t = display.transform() * self.drawing.transform;
        let win = self.compute_bounds();
        let (l, top) = (f64::from(win.left), f64::from(win.top));
        let (r, b) = (f64::from(win.right), f64::from(win.bottom));
        let height = f64::from(display.height());
        [
            Point::new(l, top),
            Point::new(l, b),
            Point::new(r, b),
            Point::new(r, top),
        ]
        .map(|p| {
            let p = t.transform_point(p);
            Point::new(p.x, height - p.y)
        })
    }

    /// Texture coordinates of the mesh vertices for the shader path.
    ///
    /// The bounds are normalized by the window size and `v` is flipped so
    /// that it grows upward, matching [`compute_mesh`](Self::compute_mesh).
    #[must_use]
    pub fn compute_texture_coords(&self) -> [Point; 4] {
        let win = self.compute_bounds();
        let w = f64::from(self.drawing.size.width);
        let h = f64::from(self.drawing.size.height);
        let (l, t) = (f64::from(win.left) / w, f64::from(win.top) / h);
        let (r, b) = (f64::from(win.right) / w, f64::from(win.bottom) / h);
        [
            Point::new(l, 1.0 - t),
            Point::new(l, 1.0 - b),
            Point::new(r, 1.0 - b),
            Point::new(r, 1.0 - t),
        ]
    }
}

impl<C: Content> Layer<C> {
    /// The buffer-space area that is scaled onto the window.
    #[must_use]
    pub fn compute_content_crop(&self) -> Rect {
        self.content.content_crop(&self.drawing)
    }

    /// The buffer orientation.
    #[must_use]
    pub fn compute_content_transform(&self) -> Orientation {
        self.content.content_transform()
    }

    /// The hardware source crop on `display`; see [`compute_crop`].
    #[must_use]
    pub fn compute_crop<D: Display + ?Sized>(&self, display: &D) -> Rect {
        compute_crop(
            &self.drawing,
            self.compute_content_crop(),
            self.compute_content_transform(),
            &display.viewport(),
        )
    }

    /// Writes the geometry part of a hardware descriptor.
    ///
    /// Call once per geometry change. On
    /// [`GeometryOutcome::Fallback`] the caller should route the layer to
    /// client composition, typically with [`HwcLayer::set_skip`].
    pub fn set_geometry<D, H>(&self, display: &D, hwc: &mut H) -> GeometryOutcome
    where
        D: Display + ?Sized,
        H: HwcLayer + ?Sized,
    {
        self.set_geometry_traced(display, hwc, &mut Tracer::none())
    }

    /// [`set_geometry`](Self::set_geometry) with instrumentation.
    pub fn set_geometry_traced<D, H>(
        &self,
        display: &D,
        hwc: &mut H,
        tracer: &mut Tracer<'_>,
    ) -> GeometryOutcome
    where
        D: Display + ?Sized,
        H: HwcLayer + ?Sized,
    {
        hwc.set_default_state();

        let s = &self.drawing;
        let orientation = s.transform.orientation();
        let outcome = if orientation.contains(Orientation::ROT_INVALID) {
            hwc.set_transform(Orientation::empty());
            GeometryOutcome::Fallback
        } else {
            hwc.set_transform(orientation);
            GeometryOutcome::Hardware
        };

        let blending = if !self.content.is_opaque() || s.alpha != 0xFF {
            let blending = if self.premultiplied_alpha {
                Blending::Premultiplied
            } else {
                Blending::Coverage
            };
            hwc.set_blending(blending);
            blending
        } else {
            Blending::None
        };

        let frame = s
            .transform
            .transform_rect(&compute_bounds(s))
            .intersect(&display.viewport());
        let frame = if frame.is_empty() {
            Rect::EMPTY
        } else {
            display.transform().transform_rect(&frame)
        };
        hwc.set_frame(frame);
        let crop = self.compute_crop(display);
        hwc.set_crop(crop);

        #[cfg(feature = "trace-rich")]
        tracer.geometry(&GeometryEvent {
            layer: self.id,
            output: display.id(),
            frame,
            crop,
            orientation,
            blending,
            fallback: outcome.is_fallback(),
        });
        #[cfg(not(feature = "trace-rich"))]
        {
            _ = (tracer, blending);
        }
        outcome
    }

    /// Writes the per-frame part of a hardware descriptor: the visible
    /// region clipped to the viewport, in display space.
    pub fn set_per_frame_data<D, H>(&self, display: &D, hwc: &mut H)
    where
        D: Display + ?Sized,
        H: HwcLayer + ?Sized,
    {
        let visible = self
            .visibility
            .visible_region
            .intersect_rect(&display.viewport());
        hwc.set_visible_region_screen(&display.transform().transform_region(&visible));
    }

    /// Hands the active frame's acquire fence to the descriptor.
    pub fn set_acquire_fence<D, H>(&self, _display: &D, hwc: &mut H)
    where
        D: Display + ?Sized,
        H: HwcLayer + ?Sized,
    {
        hwc.set_acquire_fence_fd(self.content.acquire_fence());
    }

    /// Notifies the descriptor, if any, that its frame is on screen.
    pub fn on_layer_displayed<D, H>(&self, _display: &D, hwc: Option<&mut H>)
    where
        D: Display + ?Sized,
        H: HwcLayer + ?Sized,
    {
        if let Some(hwc) = hwc {
            hwc.on_displayed();
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::content::{BufferContent, Frame, PlainContent, ScalingMode};
    use crate::display::{DisplayState, OutputId};
    use crate::layer::CreationFlags;
    use crate::region::Region;
    use crate::transaction::TransactionBits;
    use crate::transform::{Matrix22, Transform};

    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        skip: bool,
        transform: Orientation,
        blending: Blending,
        frame: Rect,
        crop: Rect,
        visible: Region,
        fence: i32,
        displayed: u32,
    }

    impl HwcLayer for Recorder {
        fn set_default_state(&mut self) {
            self.calls.push("default");
            self.blending = Blending::None;
            self.transform = Orientation::empty();
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
            self.visible = region.clone();
        }
        fn set_acquire_fence_fd(&mut self, fd: i32) {
            self.fence = fd;
        }
        fn on_displayed(&mut self) {
            self.displayed += 1;
        }
    }

    fn state(w: u32, h: u32, crop: Rect) -> LayerState {
        let mut s = LayerState::new(w, h, CreationFlags::empty());
        s.crop = crop;
        s
    }

    fn display(w: u32, h: u32) -> DisplayState {
        DisplayState::new(OutputId(0), w, h)
    }

    fn committed(layer: &mut Layer<impl Content>) {
        let _ = layer.do_transaction(TransactionBits::empty());
    }

    #[test]
    fn bounds_without_crop_is_window() {
        assert_eq!(
            compute_bounds(&state(40, 30, Rect::INVALID)),
            Rect::from_size(40, 30)
        );
    }

    #[test]
    fn bounds_clip_crop_to_window() {
        assert_eq!(
            compute_bounds(&state(40, 30, Rect::new(-5, 10, 20, 50))),
            Rect::new(0, 10, 20, 30)
        );
    }

    #[test]
    fn crop_narrows_content_proportionally() {
        let s = state(200, 100, Rect::new(10, 10, 190, 90));
        let content = Rect::from_size(200, 100);
        let crop = compute_crop(&s, content, Orientation::empty(), &Rect::from_size(200, 100));
        assert_eq!(crop, Rect::new(10, 10, 190, 90));
        assert!(content.contains(&crop), "crop must stay inside the content");
        assert_ne!(crop, content);
    }

    #[test]
    fn crop_scales_insets_with_content() {
        let s = state(200, 100, Rect::new(10, 10, 190, 90));
        let crop = compute_crop(
            &s,
            Rect::from_size(400, 200),
            Orientation::empty(),
            &Rect::from_size(200, 100),
        );
        assert_eq!(crop, Rect::new(20, 20, 380, 180));
    }

    #[test]
    fn crop_off_viewport_returns_content() {
        let s = state(200, 100, Rect::new(10, 10, 190, 90));
        let content = Rect::from_size(200, 100);
        let crop = compute_crop(
            &s,
            content,
            Orientation::empty(),
            &Rect::new(300, 300, 400, 400),
        );
        assert_eq!(crop, content);
    }

    #[test]
    fn viewport_clips_window_without_crop() {
        let mut s = state(200, 100, Rect::INVALID);
        s.transform = Transform::from_translation(-50.0, 0.0);
        let crop = compute_crop(
            &s,
            Rect::from_size(200, 100),
            Orientation::empty(),
            &Rect::from_size(1000, 1000),
        );
        assert_eq!(crop, Rect::new(50, 0, 200, 100));
    }

    #[test]
    fn rotated_content_swaps_axes() {
        // A 100×50 window showing a 50×100 buffer rotated by 90°. The top
        // half of the window is the left half of the buffer.
        let s = state(100, 50, Rect::new(0, 0, 100, 25));
        let crop = compute_crop(
            &s,
            Rect::from_size(50, 100),
            Orientation::ROT_90,
            &Rect::from_size(100, 50),
        );
        assert_eq!(crop, Rect::new(0, 0, 25, 100));

        // The left half of the window is the bottom half of the buffer.
        let s = state(100, 50, Rect::new(0, 0, 50, 50));
        let crop = compute_crop(
            &s,
            Rect::from_size(50, 100),
            Orientation::ROT_90,
            &Rect::from_size(100, 50),
        );
        assert_eq!(crop, Rect::new(0, 50, 50, 100));
    }

    #[test]
    fn flipped_content_mirrors_insets() {
        let s = state(100, 50, Rect::new(0, 0, 30, 50));
        let crop = compute_crop(
            &s,
            Rect::from_size(100, 50),
            Orientation::FLIP_H,
            &Rect::from_size(100, 50),
        );
        assert_eq!(crop, Rect::new(70, 0, 100, 50));
    }

    #[test]
    fn mesh_winding_on_unit_window() {
        let mut layer = Layer::new(1, 1, CreationFlags::empty());
        committed(&mut layer);
        let mesh = layer.compute_mesh(&display(1, 1));
        assert_eq!(
            mesh,
            [
                Point::new(0.0, 1.0),
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
            ]
        );

        let mesh = layer.compute_mesh(&display(10, 10));
        assert_eq!(mesh[0], Point::new(0.0, 10.0), "flip applies once");
        assert_eq!(mesh[2], Point::new(1.0, 9.0), "flip applies once");
    }

    #[test]
    fn mesh_applies_display_after_layer() {
        let mut layer = Layer::new(10, 10, CreationFlags::empty());
        layer.set_position(5.0, 0.0);
        committed(&mut layer);
        let d = display(100, 100).with_transform(Transform::from_matrix(Matrix22 {
            dsdx: 2.0,
            dtdx: 0.0,
            dsdy: 0.0,
            dtdy: 2.0,
        }));
        let mesh = layer.compute_mesh(&d);
        assert_eq!(mesh[0], Point::new(10.0, 100.0));
        assert_eq!(mesh[2], Point::new(30.0, 80.0));
    }

    #[test]
    fn texture_coords_diverge_from_hardware_crop() {
        let mut content = BufferContent::new(false, ScalingMode::ScaleToWindow);
        content.queue_frame(Frame {
            scaling_mode: ScalingMode::ScaleToWindow,
            ..Frame::new(100, 100)
        });
        let mut layer = Layer::with_content(content, 3, 3, CreationFlags::empty());
        let _ = layer.latch_buffer();
        layer.set_crop(Rect::new(1, 1, 3, 3));
        committed(&mut layer);

        let crop = layer.compute_crop(&display(3, 3));
        assert_eq!(crop, Rect::new(34, 34, 100, 100));

        let tex = layer.compute_texture_coords();
        let u_left = tex[0].x * 100.0;
        assert!(u_left > 33.0 && u_left < 34.0, "shader samples from {u_left}");
        assert!(f64::from(crop.left) > u_left, "hardware crop rounds inward");
    }

    #[test]
    fn texture_coords_flip_v() {
        let mut layer = Layer::new(4, 4, CreationFlags::empty());
        committed(&mut layer);
        let tex = layer.compute_texture_coords();
        assert_eq!(tex[0], Point::new(0.0, 1.0));
        assert_eq!(tex[1], Point::new(0.0, 0.0));
        assert_eq!(tex[2], Point::new(1.0, 0.0));
        assert_eq!(tex[3], Point::new(1.0, 1.0));
    }

    #[test]
    fn geometry_for_translated_layer() {
        let mut layer = Layer::new(100, 50, CreationFlags::empty());
        layer.set_position(10.0, 20.0);
        committed(&mut layer);
        let d = display(80, 80);
        let mut hwc = Recorder::default();

        let outcome = layer.set_geometry(&d, &mut hwc);
        assert_eq!(outcome, GeometryOutcome::Hardware);
        assert_eq!(hwc.calls, ["default"]);
        assert_eq!(hwc.transform, Orientation::empty());
        assert_eq!(hwc.blending, Blending::Premultiplied);
        assert_eq!(hwc.frame, Rect::new(10, 20, 80, 70));
        assert_eq!(hwc.crop, Rect::new(0, 0, 70, 50));
    }

    #[test]
    fn layer_below_display_gets_empty_frame() {
        let mut layer = Layer::new(100, 100, CreationFlags::empty());
        layer.set_position(50.0, 200.0);
        committed(&mut layer);

        for d in [
            display(100, 100),
            display(100, 100).with_transform(Transform::from_matrix(Matrix22 {
                dsdx: 0.0,
                dtdx: 1.0,
                dsdy: -1.0,
                dtdy: 0.0,
            })),
        ] {
            let mut hwc = Recorder::default();
            let _ = layer.set_geometry(&d, &mut hwc);
            assert!(hwc.frame.is_empty(), "frame {:?}", hwc.frame);
        }
    }

    #[test]
    fn opaque_full_alpha_does_not_blend() {
        let mut layer = Layer::with_content(
            PlainContent { opaque: true },
            10,
            10,
            CreationFlags::empty(),
        );
        committed(&mut layer);
        let mut hwc = Recorder::default();
        let _ = layer.set_geometry(&display(10, 10), &mut hwc);
        assert_eq!(hwc.blending, Blending::None);

        layer.set_alpha(200);
        committed(&mut layer);
        let _ = layer.set_geometry(&display(10, 10), &mut hwc);
        assert_eq!(hwc.blending, Blending::Premultiplied);
    }

    #[test]
    fn non_premultiplied_uses_coverage() {
        let mut layer = Layer::new(10, 10, CreationFlags::NON_PREMULTIPLIED);
        committed(&mut layer);
        let mut hwc = Recorder::default();
        let _ = layer.set_geometry(&display(10, 10), &mut hwc);
        assert_eq!(hwc.blending, Blending::Coverage);
    }

    #[test]
    fn rotated_layer_passes_orientation() {
        let mut layer = Layer::new(10, 10, CreationFlags::empty());
        layer.set_matrix(Matrix22 {
            dsdx: 0.0,
            dtdx: 1.0,
            dsdy: -1.0,
            dtdy: 0.0,
        });
        committed(&mut layer);
        let mut hwc = Recorder::default();
        let outcome = layer.set_geometry(&display(100, 100), &mut hwc);
        assert_eq!(outcome, GeometryOutcome::Hardware);
        assert!(hwc.transform.contains(Orientation::ROT_90));
    }

    #[test]
    fn skew_falls_back_with_identity_transform() {
        let mut layer = Layer::new(10, 10, CreationFlags::empty());
        layer.set_matrix(Matrix22 {
            dsdx: 1.0,
            dtdx: 0.5,
            dsdy: 0.0,
            dtdy: 1.0,
        });
        committed(&mut layer);
        let mut hwc = Recorder::default();
        let outcome = layer.set_geometry(&display(100, 100), &mut hwc);
        assert!(outcome.is_fallback());
        assert_eq!(hwc.transform, Orientation::empty());
        assert!(!hwc.skip, "skipping is the caller's decision");
    }

    #[test]
    fn per_frame_data_clips_and_projects() {
        let mut layer = Layer::new(100, 100, CreationFlags::empty());
        committed(&mut layer);
        layer.set_visible_region(Region::from_rect(Rect::new(0, 0, 50, 50)));
        let d = display(40, 40).with_transform(Transform::from_translation(5.0, 5.0));
        let mut hwc = Recorder::default();
        layer.set_per_frame_data(&d, &mut hwc);
        assert_eq!(hwc.visible.rects(), &[Rect::new(5, 5, 45, 45)]);
    }

    #[test]
    fn fence_comes_from_content() {
        let d = display(10, 10);
        let mut hwc = Recorder::default();

        let plain = Layer::new(10, 10, CreationFlags::empty());
        plain.set_acquire_fence(&d, &mut hwc);
        assert_eq!(hwc.fence, -1);

        let mut content = BufferContent::default();
        content.queue_frame(Frame {
            fence: 7,
            ..Frame::new(10, 10)
        });
        let mut buffered = Layer::with_content(content, 10, 10, CreationFlags::empty());
        let _ = buffered.latch_buffer();
        buffered.set_acquire_fence(&d, &mut hwc);
        assert_eq!(hwc.fence, 7);
    }

    #[test]
    fn displayed_is_forwarded_when_present() {
        let layer = Layer::new(10, 10, CreationFlags::empty());
        let d = display(10, 10);
        let mut hwc = Recorder::default();
        layer.on_layer_displayed(&d, Some(&mut hwc));
        layer.on_layer_displayed::<_, Recorder>(&d, None);
        assert_eq!(hwc.displayed, 1);
    }
}
