//! Rasterizer backends turning device-space paths into pixels.

use crate::color::PaintColor;
use crate::path::Path;
use crate::style::{FillRule, StrokeOptions};
use tiny_skia::{Mask, Pixmap, PixmapPaint, Transform};

/// Backend that rasterizes device-space paths onto a pixel buffer.
///
/// Stroke parameters are held by the backend between calls; the canvas pushes
/// them with [`Rasterizer::set_stroke`] whenever they change, including after a
/// state restore.
pub trait Rasterizer {
    /// Configure the stroke used by subsequent [`Rasterizer::stroke`] calls.
    fn set_stroke(&mut self, options: &StrokeOptions);

    /// Fill `path` onto `target` with the given winding rule.
    fn fill(
        &mut self,
        target: &mut Pixmap,
        path: &Path,
        paint: &PaintColor,
        rule: FillRule,
        clip: Option<&Mask>,
    );

    /// Stroke `path` onto `target` with the configured stroke.
    fn stroke(
        &mut self,
        target: &mut Pixmap,
        path: &Path,
        paint: &PaintColor,
        clip: Option<&Mask>,
    );
}

/// The default rasterizer, built on tiny-skia.
#[derive(Debug, Clone)]
pub struct SkiaRasterizer {
    anti_alias: bool,
    stroke: tiny_skia::Stroke,
}

impl Default for SkiaRasterizer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SkiaRasterizer {
    pub fn new(anti_alias: bool) -> Self {
        Self {
            anti_alias,
            stroke: StrokeOptions::default().to_skia_stroke(),
        }
    }

    /// The stroke currently configured.
    pub fn stroke_config(&self) -> &tiny_skia::Stroke {
        &self.stroke
    }

    fn solid_paint(&self, color: tiny_skia::Color) -> tiny_skia::Paint<'static> {
        let mut paint = tiny_skia::Paint {
            anti_alias: self.anti_alias,
            ..Default::default()
        };
        paint.set_color(color);
        paint
    }

    /// Fill `path` with a per-pixel color function.
    ///
    /// The color function is evaluated at every covered pixel into a source
    /// buffer, which is then drawn source-over through the coverage mask.
    fn fill_procedural(
        &self,
        target: &mut Pixmap,
        path: &tiny_skia::Path,
        paint: &PaintColor,
        rule: FillRule,
        clip: Option<&Mask>,
    ) {
        let (width, height) = (target.width(), target.height());
        let Some(coverage) = coverage_mask(width, height, Some(path), rule, self.anti_alias, clip)
        else {
            return;
        };
        let Some(mut source) = Pixmap::new(width, height) else {
            return;
        };

        for (i, (pixel, &cov)) in source
            .pixels_mut()
            .iter_mut()
            .zip(coverage.data())
            .enumerate()
        {
            if cov == 0 {
                continue;
            }
            let x = (i as u32 % width) as i32;
            let y = (i as u32 / width) as i32;
            *pixel = paint.color_at(x, y).premultiply().to_color_u8();
        }

        target.draw_pixmap(
            0,
            0,
            source.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            Some(&coverage),
        );
    }
}

/// Coverage of `path` over a `width` x `height` buffer, intersected with `clip`.
///
/// A missing path covers nothing. Returns `None` when the clip does not match
/// the buffer size.
pub(crate) fn coverage_mask(
    width: u32,
    height: u32,
    path: Option<&tiny_skia::Path>,
    rule: FillRule,
    anti_alias: bool,
    clip: Option<&Mask>,
) -> Option<Mask> {
    match clip {
        Some(clip) => {
            if clip.width() != width || clip.height() != height {
                log::warn!(
                    target: "raster",
                    "clip mask is {}x{} but target is {}x{}",
                    clip.width(),
                    clip.height(),
                    width,
                    height
                );
                return None;
            }
            let mut mask = clip.clone();
            match path {
                Some(path) => {
                    mask.intersect_path(path, rule.into(), anti_alias, Transform::identity())
                }
                None => mask.clear(),
            }
            Some(mask)
        }
        None => {
            let mut mask = Mask::new(width, height)?;
            if let Some(path) = path {
                mask.fill_path(path, rule.into(), anti_alias, Transform::identity());
            }
            Some(mask)
        }
    }
}

impl Rasterizer for SkiaRasterizer {
    fn set_stroke(&mut self, options: &StrokeOptions) {
        self.stroke = options.to_skia_stroke();
    }

    fn fill(
        &mut self,
        target: &mut Pixmap,
        path: &Path,
        paint: &PaintColor,
        rule: FillRule,
        clip: Option<&Mask>,
    ) {
        let Some(path) = path.to_skia_path() else {
            return;
        };
        match paint {
            PaintColor::Solid(color) => {
                let paint = self.solid_paint((*color).into());
                target.fill_path(&path, &paint, rule.into(), Transform::identity(), clip);
            }
            PaintColor::Procedural(_) => self.fill_procedural(target, &path, paint, rule, clip),
        }
    }

    fn stroke(
        &mut self,
        target: &mut Pixmap,
        path: &Path,
        paint: &PaintColor,
        clip: Option<&Mask>,
    ) {
        // Zero width means no stroke, not a hairline
        if self.stroke.width <= 0.0 {
            return;
        }
        let Some(path) = path.to_skia_path() else {
            return;
        };
        match paint {
            PaintColor::Solid(color) => {
                let paint = self.solid_paint((*color).into());
                target.stroke_path(&path, &paint, &self.stroke, Transform::identity(), clip);
            }
            PaintColor::Procedural(_) => {
                if let Some(outline) = path.stroke(&self.stroke, 1.0) {
                    self.fill_procedural(target, &outline, paint, FillRule::NonZero, clip);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ColorFn, Rgba};
    use crate::geometry::FixedPoint;
    use std::sync::Arc;

    fn square(x0: f32, y0: f32, x1: f32, y1: f32) -> Path {
        let mut path = Path::new();
        path.move_to(FixedPoint::from_f32(x0, y0));
        path.line_to(FixedPoint::from_f32(x1, y0));
        path.line_to(FixedPoint::from_f32(x1, y1));
        path.line_to(FixedPoint::from_f32(x0, y1));
        path.close();
        path
    }

    fn half_split() -> PaintColor {
        let f: ColorFn = Arc::new(|x: i32, _: i32| -> tiny_skia::Color {
            if x < 10 {
                tiny_skia::Color::from_rgba8(255, 0, 0, 255)
            } else {
                tiny_skia::Color::from_rgba8(0, 0, 255, 255)
            }
        });
        PaintColor::Procedural(f)
    }

    #[test]
    fn test_solid_fill() {
        let mut target = Pixmap::new(20, 20).unwrap();
        let mut rasterizer = SkiaRasterizer::default();
        rasterizer.fill(
            &mut target,
            &square(5.0, 5.0, 15.0, 15.0),
            &PaintColor::solid(Rgba::new(0.0, 1.0, 0.0, 1.0)),
            FillRule::NonZero,
            None,
        );
        let inside = target.pixel(10, 10).unwrap();
        assert_eq!((inside.green(), inside.alpha()), (255, 255));
        assert_eq!(target.pixel(2, 2).unwrap().alpha(), 0);
    }

    #[test]
    fn test_procedural_fill_evaluates_per_pixel() {
        let mut target = Pixmap::new(20, 20).unwrap();
        let mut rasterizer = SkiaRasterizer::default();
        rasterizer.fill(
            &mut target,
            &square(0.0, 0.0, 20.0, 20.0),
            &half_split(),
            FillRule::NonZero,
            None,
        );
        let left = target.pixel(3, 3).unwrap();
        let right = target.pixel(15, 3).unwrap();
        assert_eq!((left.red(), left.blue(), left.alpha()), (255, 0, 255));
        assert_eq!((right.red(), right.blue(), right.alpha()), (0, 255, 255));
    }

    #[test]
    fn test_procedural_fill_respects_clip() {
        let mut target = Pixmap::new(20, 20).unwrap();
        let mut clip = Mask::new(20, 20).unwrap();
        let clip_path = square(0.0, 0.0, 10.0, 20.0).to_skia_path().unwrap();
        clip.fill_path(&clip_path, tiny_skia::FillRule::Winding, false, Transform::identity());

        let mut rasterizer = SkiaRasterizer::default();
        rasterizer.fill(
            &mut target,
            &square(0.0, 0.0, 20.0, 20.0),
            &half_split(),
            FillRule::NonZero,
            Some(&clip),
        );
        assert_eq!(target.pixel(5, 5).unwrap().alpha(), 255);
        assert_eq!(target.pixel(15, 5).unwrap().alpha(), 0);
    }

    #[test]
    fn test_even_odd_leaves_hole() {
        let mut path = square(0.0, 0.0, 20.0, 20.0);
        path.move_to(FixedPoint::from_f32(5.0, 5.0));
        path.line_to(FixedPoint::from_f32(15.0, 5.0));
        path.line_to(FixedPoint::from_f32(15.0, 15.0));
        path.line_to(FixedPoint::from_f32(5.0, 15.0));
        path.close();

        let mut rasterizer = SkiaRasterizer::default();
        for (rule, hole_alpha) in [(FillRule::EvenOdd, 0), (FillRule::NonZero, 255)] {
            let mut target = Pixmap::new(20, 20).unwrap();
            rasterizer.fill(&mut target, &path, &half_split(), rule, None);
            assert_eq!(target.pixel(10, 10).unwrap().alpha(), hole_alpha);
            assert_eq!(target.pixel(2, 2).unwrap().alpha(), 255);
        }
    }

    #[test]
    fn test_stroke_uses_configured_width() {
        let mut rasterizer = SkiaRasterizer::default();
        rasterizer.set_stroke(&StrokeOptions {
            width: 4.0,
            ..Default::default()
        });
        assert_eq!(rasterizer.stroke_config().width, 4.0);

        let mut target = Pixmap::new(40, 40).unwrap();
        let black = PaintColor::default();
        rasterizer.stroke(&mut target, &square(10.0, 10.0, 30.0, 30.0), &black, None);
        assert_eq!(target.pixel(10, 20).unwrap().alpha(), 255);
        assert_eq!(target.pixel(20, 20).unwrap().alpha(), 0);
    }

    #[test]
    fn test_procedural_stroke() {
        let mut rasterizer = SkiaRasterizer::default();
        rasterizer.set_stroke(&StrokeOptions {
            width: 4.0,
            ..Default::default()
        });
        let mut target = Pixmap::new(20, 20).unwrap();
        rasterizer.stroke(&mut target, &square(4.0, 4.0, 16.0, 16.0), &half_split(), None);
        let left_edge = target.pixel(4, 10).unwrap();
        let right_edge = target.pixel(15, 10).unwrap();
        assert_eq!((left_edge.red(), left_edge.alpha()), (255, 255));
        assert_eq!((right_edge.blue(), right_edge.alpha()), (255, 255));
        assert_eq!(target.pixel(10, 10).unwrap().alpha(), 0);
    }

    #[test]
    fn test_zero_width_stroke_draws_nothing() {
        let mut rasterizer = SkiaRasterizer::default();
        rasterizer.set_stroke(&StrokeOptions {
            width: 0.0,
            ..Default::default()
        });
        let mut target = Pixmap::new(20, 20).unwrap();
        let path = square(4.0, 4.0, 16.0, 16.0);
        rasterizer.stroke(&mut target, &path, &PaintColor::default(), None);
        assert!(target.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_empty_path_draws_nothing() {
        let mut rasterizer = SkiaRasterizer::default();
        let mut target = Pixmap::new(8, 8).unwrap();
        rasterizer.fill(&mut target, &Path::new(), &half_split(), FillRule::NonZero, None);
        rasterizer.stroke(&mut target, &Path::new(), &PaintColor::default(), None);
        assert!(target.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_procedural_fill_blends_over_destination() {
        let mut target = Pixmap::new(20, 20).unwrap();
        target.fill(tiny_skia::Color::from_rgba8(0, 0, 255, 255));
        let half_red: ColorFn = Arc::new(|_: i32, _: i32| -> tiny_skia::Color {
            tiny_skia::Color::from_rgba8(255, 0, 0, 128)
        });

        let mut rasterizer = SkiaRasterizer::default();
        rasterizer.fill(
            &mut target,
            &square(0.0, 0.0, 10.0, 20.0),
            &PaintColor::Procedural(half_red),
            FillRule::NonZero,
            None,
        );
        let blended = target.pixel(5, 5).unwrap();
        assert!((blended.red() as i32 - 128).abs() <= 2);
        assert!((blended.blue() as i32 - 127).abs() <= 2);
        assert_eq!(blended.alpha(), 255);
        // Uncovered pixels keep the destination
        let untouched = target.pixel(15, 5).unwrap();
        assert_eq!((untouched.red(), untouched.blue()), (0, 255));
    }

    #[test]
    fn test_coverage_mask_intersects_clip() {
        let mut clip = Mask::new(20, 20).unwrap();
        let left = square(0.0, 0.0, 10.0, 20.0).to_skia_path().unwrap();
        clip.fill_path(&left, tiny_skia::FillRule::Winding, false, Transform::identity());

        let top = square(0.0, 0.0, 20.0, 10.0).to_skia_path().unwrap();
        let mask =
            coverage_mask(20, 20, Some(&top), FillRule::NonZero, false, Some(&clip)).unwrap();
        assert_eq!(mask.data()[5 * 20 + 5], 255);
        assert_eq!(mask.data()[5 * 20 + 15], 0);
        assert_eq!(mask.data()[15 * 20 + 5], 0);

        let cleared = coverage_mask(20, 20, None, FillRule::NonZero, false, Some(&clip)).unwrap();
        assert!(cleared.data().iter().all(|&m| m == 0));

        let wrong_size = Mask::new(10, 10).unwrap();
        let mismatched =
            coverage_mask(20, 20, Some(&top), FillRule::NonZero, false, Some(&wrong_size));
        assert!(mismatched.is_none());
    }
}
