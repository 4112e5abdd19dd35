//! Device-space fixed-point coordinates.
//!
//! Path points are converted to 26.6 fixed point (1/64 pixel) once, when they
//! are appended to the current path, so later state changes never move them.

/// Number of fractional bits in a [`Fixed`] value.
const FRACTION_BITS: u32 = 6;

/// Fixed-point units per device pixel.
const ONE: f32 = (1 << FRACTION_BITS) as f32;

/// A signed 26.6 fixed-point number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed(pub i32);

impl Fixed {
    /// Convert from floating point, truncating toward zero.
    pub fn from_f32(value: f32) -> Self {
        Fixed((value * ONE) as i32)
    }

    /// Convert back to floating point.
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / ONE
    }
}

/// A point in device space, in 26.6 fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FixedPoint {
    pub x: Fixed,
    pub y: Fixed,
}

impl FixedPoint {
    /// Create a fixed-point device coordinate from floating point components.
    pub fn from_f32(x: f32, y: f32) -> Self {
        Self {
            x: Fixed::from_f32(x),
            y: Fixed::from_f32(y),
        }
    }

    /// Floating point components of this point.
    pub fn to_f32(self) -> (f32, f32) {
        (self.x.to_f32(), self.y.to_f32())
    }
}

impl From<FixedPoint> for tiny_skia::Point {
    fn from(p: FixedPoint) -> Self {
        let (x, y) = p.to_f32();
        tiny_skia::Point::from_xy(x, y)
    }
}
