//! Paint, gradient, clip and image operations for Canvas.

use super::Canvas;
use crate::color::PaintColor;
use crate::error::RasterResult;
use crate::gradient::GradientLayout;
use crate::path::Path;
use crate::rasterizer::{coverage_mask, Rasterizer};
use crate::style::{FillRule, PaintOp};
use std::sync::Arc;
use tiny_skia::Pixmap;

impl<R: Rasterizer> Canvas<R> {
    /// Show the current path, stroking and/or filling it according to `op`.
    ///
    /// The stroke is drawn first, then the fill. The path is cleared in every
    /// case, including when `op` is empty.
    pub fn paint(&mut self, op: PaintOp) {
        log::debug!(target: "raster", "paint {:?}", op);
        if self.has_path {
            let clip = self.state.clip.as_deref();
            if op.contains(PaintOp::STROKE) {
                self.rasterizer
                    .stroke(&mut self.target, &self.path, &self.state.stroke_color, clip);
            }
            if let Some(rule) = op.fill_rule() {
                self.state.fill_rule = rule;
                self.rasterizer.fill(
                    &mut self.target,
                    &self.path,
                    &self.state.fill_color,
                    rule,
                    clip,
                );
            }
        }
        self.clear_path();
    }

    pub(crate) fn clear_path(&mut self) {
        self.path.clear();
        self.has_path = false;
    }

    /// Fill the rectangle `(0, 0, width, height)` in user space with `layout`.
    ///
    /// The fill uses the fill rule of the last paint and the current clip. The
    /// current path is discarded whether or not the gradient is valid.
    pub fn draw_gradient(
        &mut self,
        layout: &GradientLayout,
        width: f32,
        height: f32,
    ) -> RasterResult<()> {
        log::debug!(target: "raster", "draw_gradient {:?} {} {}", layout.kind, width, height);
        let color_fn = match layout.color_function(
            self.state.transform,
            self.target.width(),
            self.target.height(),
        ) {
            Ok(color_fn) => color_fn,
            Err(err) => {
                self.clear_path();
                return Err(err);
            }
        };

        let mut area = Path::new();
        area.move_to(self.transform_point(0.0, 0.0));
        area.line_to(self.transform_point(width, 0.0));
        area.line_to(self.transform_point(width, height));
        area.line_to(self.transform_point(0.0, height));
        area.close();

        self.rasterizer.fill(
            &mut self.target,
            &area,
            &PaintColor::Procedural(color_fn),
            self.state.fill_rule,
            self.state.clip.as_deref(),
        );
        self.clear_path();
        Ok(())
    }

    /// Intersect the clip region with the current path, then clear the path.
    ///
    /// Clipping with an empty path leaves nothing drawable. The clip belongs
    /// to the graphic state, so it is undone when the enclosing scope closes.
    pub fn clip(&mut self, rule: FillRule) {
        log::debug!(target: "raster", "clip {:?}", rule);
        let path = self.path.to_skia_path();
        let Some(mask) = coverage_mask(
            self.target.width(),
            self.target.height(),
            path.as_ref(),
            rule,
            self.config.anti_alias,
            self.state.clip.as_deref(),
        ) else {
            log::warn!(target: "raster", "cannot build clip mask");
            return;
        };
        self.state.clip = Some(Arc::new(mask));
        self.clear_path();
    }

    /// Nested raster images are not supported; the request is logged and ignored.
    pub fn draw_raster_image(&mut self, image: &Pixmap, width: f32, height: f32) {
        log::warn!(
            target: "raster",
            "nested raster images not supported, skipping {}x{} image drawn at {}x{}",
            image.width(),
            image.height(),
            width,
            height
        );
    }
}
