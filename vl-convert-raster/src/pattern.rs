//! Pattern paints sampled from a rendered group buffer.
//!
//! Only the sampling contract is provided: a device pixel is mapped through the
//! inverse of the pattern matrix and looked up in the pattern buffer. Pixels
//! outside the buffer are transparent; tiling the content at fixed intervals is
//! not performed.

use crate::color::ColorFn;
use std::sync::Arc;
use tiny_skia::{Pixmap, Transform};

/// A snapshot of a rendered pattern cell.
#[derive(Debug, Clone)]
pub struct PatternSource {
    /// Rendered pattern content (premultiplied).
    pixmap: Arc<Pixmap>,
    /// Size of the pattern content, in pattern space.
    content_width: f32,
    content_height: f32,
    /// Maps pattern space to the space it is painted in.
    transform: Transform,
}

impl PatternSource {
    pub fn new(
        pixmap: Arc<Pixmap>,
        content_width: f32,
        content_height: f32,
        transform: Transform,
    ) -> Self {
        Self {
            pixmap,
            content_width,
            content_height,
            transform,
        }
    }

    /// Size of the pattern content, in pattern space.
    pub fn content_size(&self) -> (f32, f32) {
        (self.content_width, self.content_height)
    }

    /// Build the per-pixel color function for this pattern.
    pub fn color_function(&self) -> ColorFn {
        let inverse = self.transform.invert().unwrap_or_else(|| {
            log::warn!(target: "raster", "singular pattern matrix {:?}, sampling untransformed", self.transform);
            Transform::identity()
        });
        let pixmap = Arc::clone(&self.pixmap);

        Arc::new(move |x: i32, y: i32| -> tiny_skia::Color {
            let mut p = tiny_skia::Point::from_xy(x as f32 + 0.5, y as f32 + 0.5);
            inverse.map_point(&mut p);
            if !p.x.is_finite() || !p.y.is_finite() || p.x < 0.0 || p.y < 0.0 {
                return tiny_skia::Color::TRANSPARENT;
            }
            pixmap
                .pixel(p.x as u32, p.y as u32)
                .map(|px| {
                    let c = px.demultiply();
                    tiny_skia::Color::from_rgba8(c.red(), c.green(), c.blue(), c.alpha())
                })
                .unwrap_or(tiny_skia::Color::TRANSPARENT)
        })
    }
}
