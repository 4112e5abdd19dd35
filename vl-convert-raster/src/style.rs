//! Stroke parameters, winding rules and paint operations.

use bitflags::bitflags;

/// Line cap style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// Flat edge at the endpoint.
    #[default]
    Butt,
    /// Square edge extending past the endpoint.
    Square,
    /// Rounded edge extending past the endpoint.
    Round,
}

impl From<LineCap> for tiny_skia::LineCap {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Square => tiny_skia::LineCap::Square,
            LineCap::Round => tiny_skia::LineCap::Round,
        }
    }
}

/// Line join style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    /// Rounded corner.
    Round,
    /// Beveled corner.
    Bevel,
    /// Sharp corner.
    #[default]
    Miter,
}

impl From<LineJoin> for tiny_skia::LineJoin {
    fn from(join: LineJoin) -> Self {
        match join {
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
        }
    }
}

/// Winding rule used to decide which points are inside a filled path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// Non-zero winding rule (default).
    #[default]
    NonZero,
    /// Even-odd rule.
    EvenOdd,
}

impl From<FillRule> for tiny_skia::FillRule {
    fn from(rule: FillRule) -> Self {
        match rule {
            FillRule::NonZero => tiny_skia::FillRule::Winding,
            FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
        }
    }
}

bitflags! {
    /// Set of paint operations requested by [`Canvas::paint`](crate::Canvas::paint).
    #[derive(Default)]
    pub struct PaintOp: u8 {
        const STROKE = 1;
        const FILL_EVEN_ODD = 1 << 1;
        const FILL_NON_ZERO = 1 << 2;
    }
}

impl PaintOp {
    /// Paint nothing; only discards the current path.
    pub const NONE: PaintOp = PaintOp::empty();

    /// Winding rule of the requested fill, if any. Non-zero wins over even-odd.
    pub fn fill_rule(self) -> Option<FillRule> {
        if self.contains(PaintOp::FILL_NON_ZERO) {
            Some(FillRule::NonZero)
        } else if self.contains(PaintOp::FILL_EVEN_ODD) {
            Some(FillRule::EvenOdd)
        } else {
            None
        }
    }
}

/// Stroke parameters, in device units.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeOptions {
    /// Line width, already scaled by the transform in effect when it was set.
    pub width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
    /// Alternating on/off lengths; empty disables dashing.
    pub dashes: Vec<f32>,
    pub dash_offset: f32,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self {
            width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: 4.0,
            dashes: Vec::new(),
            dash_offset: 0.0,
        }
    }
}

impl StrokeOptions {
    /// The dash pattern to hand to a rasterizer, or `None` when dashing is off.
    ///
    /// Odd-length arrays are repeated to even length, so a single value gives
    /// equal on and off lengths. Arrays with negative or non-finite entries, or
    /// with a zero total length, disable dashing.
    pub fn dash_pattern(&self) -> Option<Vec<f32>> {
        if self.dashes.is_empty() {
            return None;
        }
        if self.dashes.iter().any(|d| !d.is_finite() || *d < 0.0) {
            log::warn!(target: "raster", "invalid dash array {:?}, dashing disabled", self.dashes);
            return None;
        }
        if self.dashes.iter().sum::<f32>() <= 0.0 {
            return None;
        }
        let mut pattern = self.dashes.clone();
        if pattern.len() % 2 == 1 {
            pattern.extend_from_slice(&self.dashes);
        }
        Some(pattern)
    }

    /// Convert to a tiny-skia stroke description.
    pub fn to_skia_stroke(&self) -> tiny_skia::Stroke {
        tiny_skia::Stroke {
            width: self.width,
            miter_limit: self.miter_limit,
            line_cap: self.line_cap.into(),
            line_join: self.line_join.into(),
            dash: self
                .dash_pattern()
                .and_then(|pattern| tiny_skia::StrokeDash::new(pattern, self.dash_offset)),
        }
    }
}
