//! Path building operations for Canvas.

use super::Canvas;
use crate::geometry::FixedPoint;
use crate::rasterizer::Rasterizer;

impl<R: Rasterizer> Canvas<R> {
    /// Map a user-space point to device space with the current transform.
    ///
    /// Points are transformed when they are added to the path, so changing the
    /// transform afterwards does not move them.
    pub fn transform_point(&self, x: f32, y: f32) -> FixedPoint {
        let mut p = tiny_skia::Point::from_xy(x, y);
        self.state.transform.map_point(&mut p);
        FixedPoint::from_f32(p.x, p.y)
    }

    /// Start a new subpath at `(x, y)`.
    pub fn move_to(&mut self, x: f32, y: f32) {
        log::debug!(target: "raster", "move_to {} {}", x, y);
        let p = self.transform_point(x, y);
        self.path.move_to(p);
        self.has_path = true;
    }

    /// Add a straight line to `(x, y)`.
    pub fn line_to(&mut self, x: f32, y: f32) {
        log::debug!(target: "raster", "line_to {} {}", x, y);
        let p = self.transform_point(x, y);
        self.path.line_to(p);
        self.has_path = true;
    }

    /// Add a cubic Bézier curve with control points `(x1, y1)` and `(x2, y2)`.
    pub fn cubic_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        log::debug!(target: "raster", "cubic_to {} {} {} {} {} {}", x1, y1, x2, y2, x3, y3);
        let p1 = self.transform_point(x1, y1);
        let p2 = self.transform_point(x2, y2);
        let p3 = self.transform_point(x3, y3);
        self.path.cube_to(p1, p2, p3);
        self.has_path = true;
    }

    /// Add a quadratic Bézier curve with control point `(x1, y1)`.
    pub fn quad_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        log::debug!(target: "raster", "quad_to {} {} {} {}", x1, y1, x2, y2);
        let p1 = self.transform_point(x1, y1);
        let p2 = self.transform_point(x2, y2);
        self.path.quad_to(p1, p2);
        self.has_path = true;
    }

    /// Close the current subpath.
    pub fn close_path(&mut self) {
        log::debug!(target: "raster", "close_path");
        self.path.close();
    }

    /// Add a closed rectangle with top-left corner `(x, y)`.
    pub fn rectangle(&mut self, x: f32, y: f32, width: f32, height: f32) {
        log::debug!(target: "raster", "rectangle {} {} {} {}", x, y, width, height);
        self.move_to(x, y);
        self.line_to(x + width, y);
        self.line_to(x + width, y + height);
        self.line_to(x, y + height);
        self.close_path();
    }
}
