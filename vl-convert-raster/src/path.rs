//! Device-space path recorded between two paint operations.

use crate::geometry::FixedPoint;

/// One element of a [`Path`], with points already in device space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Start a new subpath.
    MoveTo(FixedPoint),
    /// Straight line to the point.
    LineTo(FixedPoint),
    /// Quadratic bezier with one control point.
    QuadTo(FixedPoint, FixedPoint),
    /// Cubic bezier with two control points.
    CubeTo(FixedPoint, FixedPoint, FixedPoint),
    /// Close the current subpath.
    Close,
}

/// The current path of a canvas: an ordered list of segments.
///
/// A non-empty path always starts with [`Segment::MoveTo`]. Drawing segments
/// appended to an empty path start the path at their end point instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Create an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether no segment has been recorded.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of recorded segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Drop every segment.
    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn move_to(&mut self, p: FixedPoint) {
        self.segments.push(Segment::MoveTo(p));
    }

    pub fn line_to(&mut self, p: FixedPoint) {
        if self.start_if_empty(p) {
            return;
        }
        self.segments.push(Segment::LineTo(p));
    }

    pub fn quad_to(&mut self, p1: FixedPoint, p2: FixedPoint) {
        if self.start_if_empty(p2) {
            return;
        }
        self.segments.push(Segment::QuadTo(p1, p2));
    }

    pub fn cube_to(&mut self, p1: FixedPoint, p2: FixedPoint, p3: FixedPoint) {
        if self.start_if_empty(p3) {
            return;
        }
        self.segments.push(Segment::CubeTo(p1, p2, p3));
    }

    /// Close the current subpath. Closing an empty path is a no-op.
    pub fn close(&mut self) {
        if !self.segments.is_empty() {
            self.segments.push(Segment::Close);
        }
    }

    fn start_if_empty(&mut self, p: FixedPoint) -> bool {
        if self.segments.is_empty() {
            log::debug!(target: "raster", "segment without current point, starting path at {:?}", p);
            self.segments.push(Segment::MoveTo(p));
            true
        } else {
            false
        }
    }

    /// Convert to a tiny-skia path for rasterization.
    ///
    /// Returns `None` for an empty or degenerate path.
    pub fn to_skia_path(&self) -> Option<tiny_skia::Path> {
        let mut pb =
            tiny_skia::PathBuilder::with_capacity(self.segments.len(), self.segments.len() * 3);
        for segment in &self.segments {
            match *segment {
                Segment::MoveTo(p) => {
                    let (x, y) = p.to_f32();
                    pb.move_to(x, y);
                }
                Segment::LineTo(p) => {
                    let (x, y) = p.to_f32();
                    pb.line_to(x, y);
                }
                Segment::QuadTo(p1, p2) => {
                    let (x1, y1) = p1.to_f32();
                    let (x2, y2) = p2.to_f32();
                    pb.quad_to(x1, y1, x2, y2);
                }
                Segment::CubeTo(p1, p2, p3) => {
                    let (x1, y1) = p1.to_f32();
                    let (x2, y2) = p2.to_f32();
                    let (x3, y3) = p3.to_f32();
                    pb.cubic_to(x1, y1, x2, y2, x3, y3);
                }
                Segment::Close => pb.close(),
            }
        }
        pb.finish()
    }
}
