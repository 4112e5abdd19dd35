//! Compositing primitives for isolated groups.
//!
//! All buffers hold premultiplied RGBA8 pixels, so opacity and mask
//! application scale every channel alike.

use tiny_skia::{IntSize, Mask, MaskType, Pixmap, PixmapPaint, Transform};

/// Luminance of an sRGB-ish color, with BT.601 weights in 1/10000 fixed point.
pub fn rgba_to_alpha(r: u8, g: u8, b: u8) -> u8 {
    let luma = 2989 * r as u32 + 5870 * g as u32 + 1141 * b as u32;
    (luma / 10000) as u8
}

/// Single-channel alpha buffer derived from a rendered image.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaMask {
    mask: Mask,
}

impl AlphaMask {
    /// Wrap raw alpha values, one byte per pixel in row-major order.
    ///
    /// # Panics
    /// If `data` does not hold exactly `width * height` bytes, or a dimension is zero.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        let len = data.len();
        match IntSize::from_wh(width, height).and_then(|size| Mask::from_vec(data, size)) {
            Some(mask) => Self { mask },
            None => panic!("alpha mask data of {} bytes does not match {}x{}", len, width, height),
        }
    }

    /// Interpret a rendered buffer as a luminance mask.
    ///
    /// The stored (premultiplied) channels are used, so transparent areas
    /// become fully masked out.
    pub fn from_pixmap(pixmap: &Pixmap) -> Self {
        let mut mask = Mask::from_pixmap(pixmap.as_ref(), MaskType::Alpha);
        for (m, p) in mask.data_mut().iter_mut().zip(pixmap.pixels()) {
            *m = rgba_to_alpha(p.red(), p.green(), p.blue());
        }
        Self { mask }
    }

    pub fn width(&self) -> u32 {
        self.mask.width()
    }

    pub fn height(&self) -> u32 {
        self.mask.height()
    }

    pub fn data(&self) -> &[u8] {
        self.mask.data()
    }

    /// The underlying tiny-skia mask.
    pub fn as_mask(&self) -> &Mask {
        &self.mask
    }

    /// Alpha value at `(x, y)`, or `None` outside the mask.
    pub fn alpha(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.data().get((y * self.width() + x) as usize).copied()
    }
}

/// Scale every channel of every pixel by `opacity` (clamped to [0, 1]).
///
/// Scaling all four premultiplied channels is the same as scaling the true
/// alpha. Results are truncated.
pub fn apply_opacity(pixmap: &mut Pixmap, opacity: f32) {
    let opacity = crate::color::clamp_unit(opacity);
    if opacity >= 1.0 {
        return;
    }
    for byte in pixmap.data_mut() {
        *byte = (*byte as f32 * opacity) as u8;
    }
}

/// Multiply `pixmap` by `mask`, replacing its content in place.
///
/// # Panics
/// If the mask and the buffer differ in size; callers must guarantee matching bounds.
pub fn apply_alpha_mask(pixmap: &mut Pixmap, mask: &AlphaMask) {
    assert!(
        pixmap.width() == mask.width() && pixmap.height() == mask.height(),
        "alpha mask is {}x{} but target is {}x{}",
        mask.width(),
        mask.height(),
        pixmap.width(),
        pixmap.height()
    );
    pixmap.apply_mask(&mask.mask);
}

/// Composite `src` over `dst` with its top-left corner at `(x, y)`.
///
/// Parts of `src` falling outside `dst` are clipped.
pub fn draw_over(dst: &mut Pixmap, src: &Pixmap, x: i32, y: i32) {
    let fully_outside = x >= dst.width() as i32
        || y >= dst.height() as i32
        || x.saturating_add(src.width() as i32) <= 0
        || y.saturating_add(src.height() as i32) <= 0;
    if fully_outside {
        return;
    }
    dst.draw_pixmap(
        x,
        y,
        src.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tiny_skia::PremultipliedColorU8;

    /// Opaque gradient-ish image, the same shape as a rendered group.
    fn sample_image(size: u32) -> Pixmap {
        let mut pixmap = Pixmap::new(size, size).unwrap();
        for y in 0..size {
            for x in 0..size {
                let color = PremultipliedColorU8::from_rgba(
                    (size / 10 * x) as u8,
                    y as u8,
                    (x + y) as u8,
                    255,
                )
                .unwrap();
                pixmap.pixels_mut()[(y * size + x) as usize] = color;
            }
        }
        pixmap
    }

    fn filled(width: u32, height: u32, r: u8, g: u8, b: u8, a: u8) -> Pixmap {
        let mut pixmap = Pixmap::new(width, height).unwrap();
        let color = PremultipliedColorU8::from_rgba(r, g, b, a).unwrap();
        pixmap.pixels_mut().fill(color);
        pixmap
    }

    #[rstest]
    #[case(0, 0, 0, 0)]
    #[case(255, 255, 255, 255)]
    #[case(120, 120, 120, 120)]
    #[case(60, 60, 60, 60)]
    #[case(255, 0, 0, 76)]
    #[case(0, 255, 0, 149)]
    #[case(0, 0, 255, 29)]
    fn test_rgba_to_alpha(#[case] r: u8, #[case] g: u8, #[case] b: u8, #[case] expected: u8) {
        assert_eq!(rgba_to_alpha(r, g, b), expected);
    }

    #[test]
    fn test_apply_opacity_matches_per_channel_scaling() {
        let mut fast = sample_image(50);
        let original = fast.clone();
        apply_opacity(&mut fast, 0.5);
        for (scaled, orig) in fast.pixels().iter().zip(original.pixels()) {
            assert_eq!(scaled.red(), (orig.red() as f32 * 0.5) as u8);
            assert_eq!(scaled.green(), (orig.green() as f32 * 0.5) as u8);
            assert_eq!(scaled.blue(), (orig.blue() as f32 * 0.5) as u8);
            assert_eq!(scaled.alpha(), 127);
        }
    }

    #[rstest]
    #[case(0.5, 0.5)]
    #[case(0.8, 0.3)]
    #[case(0.1, 0.9)]
    #[case(1.0, 0.25)]
    fn test_apply_opacity_composes(#[case] o1: f32, #[case] o2: f32) {
        let mut twice = sample_image(40);
        let mut once = twice.clone();
        apply_opacity(&mut twice, o1);
        apply_opacity(&mut twice, o2);
        apply_opacity(&mut once, o1 * o2);
        for (a, b) in twice.data().iter().zip(once.data()) {
            assert!((*a as i32 - *b as i32).abs() <= 2, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_apply_opacity_clamps() {
        let mut pixmap = filled(4, 4, 200, 100, 50, 255);
        let original = pixmap.clone();
        apply_opacity(&mut pixmap, 3.0);
        assert_eq!(pixmap, original);
        apply_opacity(&mut pixmap, -1.0);
        assert!(pixmap.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_mask_from_pixmap() {
        let mask = AlphaMask::from_pixmap(&filled(3, 2, 120, 120, 120, 255));
        assert_eq!(mask.width(), 3);
        assert_eq!(mask.height(), 2);
        assert!(mask.data().iter().all(|&a| a == 120));
        assert_eq!(mask.alpha(2, 1), Some(120));
        assert_eq!(mask.alpha(3, 0), None);

        // Transparent pixels mask everything out
        let empty = AlphaMask::from_pixmap(&Pixmap::new(2, 2).unwrap());
        assert!(empty.data().iter().all(|&a| a == 0));
    }

    #[test]
    fn test_white_mask_is_identity() {
        let mut image = sample_image(20);
        let original = image.clone();
        let mask = AlphaMask::from_pixmap(&filled(20, 20, 255, 255, 255, 255));
        apply_alpha_mask(&mut image, &mask);
        assert_eq!(image, original);
    }

    #[test]
    fn test_black_mask_zeroes() {
        let mut image = sample_image(20);
        let mask = AlphaMask::from_pixmap(&filled(20, 20, 0, 0, 0, 255));
        apply_alpha_mask(&mut image, &mask);
        assert!(image.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_gray_mask_scales() {
        let mut image = filled(2, 2, 200, 100, 0, 255);
        let mask = AlphaMask::new(2, 2, vec![128; 4]);
        apply_alpha_mask(&mut image, &mask);
        let p = image.pixel(0, 0).unwrap();
        assert_eq!((p.red(), p.green(), p.blue(), p.alpha()), (100, 50, 0, 128));
    }

    #[test]
    #[should_panic(expected = "alpha mask is")]
    fn test_mask_dimension_mismatch_panics() {
        let mut image = sample_image(20);
        let mask = AlphaMask::from_pixmap(&sample_image(10));
        apply_alpha_mask(&mut image, &mask);
    }

    #[test]
    #[should_panic]
    fn test_mask_data_length_checked() {
        AlphaMask::new(2, 2, vec![0; 3]);
    }

    #[test]
    fn test_draw_over_opaque_replaces() {
        let mut dst = filled(10, 10, 0, 0, 255, 255);
        let src = filled(4, 4, 255, 0, 0, 255);
        draw_over(&mut dst, &src, 0, 0);
        let inside = dst.pixel(3, 3).unwrap();
        assert_eq!((inside.red(), inside.blue()), (255, 0));
        let outside = dst.pixel(4, 4).unwrap();
        assert_eq!((outside.red(), outside.blue()), (0, 255));
    }

    #[test]
    fn test_draw_over_transparent_keeps_destination() {
        let mut dst = sample_image(10);
        let original = dst.clone();
        draw_over(&mut dst, &Pixmap::new(10, 10).unwrap(), 0, 0);
        assert_eq!(dst, original);
    }

    #[test]
    fn test_draw_over_half_alpha() {
        let mut dst = Pixmap::new(4, 4).unwrap();
        let src = filled(4, 4, 127, 127, 127, 127);
        draw_over(&mut dst, &src, 0, 0);
        let p = dst.pixel(1, 1).unwrap();
        assert!((p.alpha() as i32 - 127).abs() <= 1);
    }

    #[rstest]
    #[case(10, 0)]
    #[case(0, 10)]
    #[case(-5, 0)]
    #[case(0, -5)]
    #[case(100, -100)]
    fn test_draw_over_fully_outside_is_noop(#[case] x: i32, #[case] y: i32) {
        let mut dst = sample_image(10);
        let original = dst.clone();
        draw_over(&mut dst, &filled(5, 5, 255, 255, 255, 255), x, y);
        assert_eq!(dst, original);
    }

    #[test]
    fn test_draw_over_partially_outside_is_clipped() {
        let mut dst = Pixmap::new(10, 10).unwrap();
        draw_over(&mut dst, &filled(5, 5, 255, 255, 255, 255), 7, 7);
        assert_eq!(dst.pixel(9, 9).unwrap().alpha(), 255);
        assert_eq!(dst.pixel(6, 6).unwrap().alpha(), 0);
    }
}
