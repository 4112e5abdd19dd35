//! Paint colors: plain RGBA or a procedural per-pixel color function.

use std::fmt;
use std::sync::Arc;

/// Procedural color source evaluated at device pixel `(x, y)`.
///
/// Returns a non-premultiplied color.
pub type ColorFn = Arc<dyn Fn(i32, i32) -> tiny_skia::Color + Send + Sync>;

/// A non-premultiplied RGBA color with 0..1 channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Clamp every channel to [0, 1]; NaN becomes 0.
    pub fn clamped(self) -> Self {
        Self {
            r: clamp_unit(self.r),
            g: clamp_unit(self.g),
            b: clamp_unit(self.b),
            a: clamp_unit(self.a),
        }
    }
}

pub(crate) fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

impl From<Rgba> for tiny_skia::Color {
    fn from(c: Rgba) -> Self {
        let c = c.clamped();
        tiny_skia::Color::from_rgba(c.r, c.g, c.b, c.a).unwrap_or(tiny_skia::Color::TRANSPARENT)
    }
}

/// How a fill or a stroke is colored.
#[derive(Clone)]
pub enum PaintColor {
    /// A single color, already clamped.
    Solid(Rgba),
    /// A color computed per device pixel (gradients, patterns).
    Procedural(ColorFn),
}

impl Default for PaintColor {
    fn default() -> Self {
        // Default is opaque black
        PaintColor::Solid(Rgba::BLACK)
    }
}

impl PaintColor {
    /// Solid paint from `color`, clamping out-of-range channels.
    pub fn solid(color: Rgba) -> Self {
        PaintColor::Solid(color.clamped())
    }

    /// Color at device pixel `(x, y)`.
    pub fn color_at(&self, x: i32, y: i32) -> tiny_skia::Color {
        match self {
            PaintColor::Solid(c) => (*c).into(),
            PaintColor::Procedural(f) => f(x, y),
        }
    }
}

impl fmt::Debug for PaintColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaintColor::Solid(c) => f.debug_tuple("Solid").field(c).finish(),
            PaintColor::Procedural(func) => {
                write!(f, "Procedural({:p})", Arc::as_ptr(func) as *const ())
            }
        }
    }
}

/// Procedural paints compare by identity, since functions have no structural equality.
impl PartialEq for PaintColor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PaintColor::Solid(a), PaintColor::Solid(b)) => a == b,
            (PaintColor::Procedural(a), PaintColor::Procedural(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
