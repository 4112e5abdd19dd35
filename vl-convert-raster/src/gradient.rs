//! Linear and radial gradients resolved into per-pixel color functions.

use crate::color::{ColorFn, Rgba};
use crate::error::{RasterError, RasterResult};
use crate::pattern::PatternSource;
use std::sync::Arc;
use tiny_skia::{GradientStop, Paint, Pixmap, Point, Rect, Shader, SpreadMode, Transform};

/// Focal points are pulled slightly inside the end circle so the two-point
/// conical gradient stays well-behaved.
const FOCAL_INSET: f32 = 0.999;

/// Gradient geometry, in user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientKind {
    /// Linear gradient from (x1, y1) to (x2, y2).
    Linear { x1: f32, y1: f32, x2: f32, y2: f32 },
    /// Radial gradient with focal circle (fx, fy, fr) and end circle (cx, cy, r).
    ///
    /// The focal radius is accepted but not rendered: the gradient starts at the
    /// focal point.
    Radial {
        fx: f32,
        fy: f32,
        fr: f32,
        cx: f32,
        cy: f32,
        r: f32,
    },
}

/// A gradient as emitted by the upstream driver, with resolved stops.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientLayout {
    /// Gradient geometry.
    pub kind: GradientKind,
    /// Stop offsets, in [0, 1] and parallel to `colors`.
    pub positions: Vec<f32>,
    /// Stop colors.
    pub colors: Vec<Rgba>,
    /// Vertical stretch applied to the gradient space (1 for none).
    pub scale_y: f32,
}

impl GradientLayout {
    /// Create a linear gradient layout.
    pub fn linear(
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        positions: Vec<f32>,
        colors: Vec<Rgba>,
    ) -> Self {
        Self {
            kind: GradientKind::Linear { x1, y1, x2, y2 },
            positions,
            colors,
            scale_y: 1.0,
        }
    }

    /// Create a radial gradient layout, `coords` being `[fx, fy, fr, cx, cy, r]`.
    pub fn radial(coords: [f32; 6], positions: Vec<f32>, colors: Vec<Rgba>) -> Self {
        let [fx, fy, fr, cx, cy, r] = coords;
        Self {
            kind: GradientKind::Radial {
                fx,
                fy,
                fr,
                cx,
                cy,
                r,
            },
            positions,
            colors,
            scale_y: 1.0,
        }
    }

    fn stops(&self) -> RasterResult<Vec<GradientStop>> {
        if self.positions.len() != self.colors.len() {
            return Err(RasterError::InvalidGradient(format!(
                "{} positions for {} colors",
                self.positions.len(),
                self.colors.len()
            )));
        }
        if self.colors.is_empty() {
            return Err(RasterError::InvalidGradient("no color stops".to_string()));
        }

        // tiny-skia clamps the offsets and makes them non-decreasing
        Ok(self
            .positions
            .iter()
            .zip(&self.colors)
            .map(|(&offset, &color)| GradientStop::new(offset, color.clamped().into()))
            .collect())
    }

    /// Map from gradient space to device space.
    fn device_transform(&self, ctm: Transform) -> RasterResult<Transform> {
        if !self.scale_y.is_finite() || self.scale_y == 0.0 {
            return Err(RasterError::InvalidGradient(format!(
                "degenerate vertical scale {}",
                self.scale_y
            )));
        }
        let to_device = ctm.pre_concat(Transform::from_scale(1.0, self.scale_y));
        let invertible =
            is_finite(&to_device) && to_device.invert().is_some_and(|t| is_finite(&t));
        if !invertible {
            return Err(RasterError::InvalidGradient(format!(
                "non-invertible gradient transform {:?}",
                to_device
            )));
        }
        Ok(to_device)
    }

    /// Build the pad-spread tiny-skia shader painting this gradient in device space.
    pub fn shader(&self, ctm: Transform) -> RasterResult<Shader<'static>> {
        let stops = self.stops()?;
        let to_device = self.device_transform(ctm)?;

        match self.kind {
            GradientKind::Linear { x1, y1, x2, y2 } => tiny_skia::LinearGradient::new(
                Point::from_xy(x1, y1),
                Point::from_xy(x2, y2),
                stops,
                SpreadMode::Pad,
                to_device,
            )
            .ok_or_else(|| {
                RasterError::InvalidGradient(format!(
                    "non-finite gradient vector {:?}",
                    self.kind
                ))
            }),
            GradientKind::Radial {
                fx, fy, cx, cy, r, ..
            } => {
                let center = Point::from_xy(cx, cy);
                let focal = clamp_focal(Point::from_xy(fx, fy), center, r);
                let shader = tiny_skia::RadialGradient::new(
                    focal,
                    center,
                    r,
                    stops,
                    SpreadMode::Pad,
                    to_device,
                );
                match shader {
                    Some(shader) => Ok(shader),
                    // A collapsed end circle pads to the last stop everywhere
                    None => self
                        .colors
                        .last()
                        .map(|color| Shader::SolidColor(color.clamped().into()))
                        .ok_or_else(|| {
                            RasterError::InvalidGradient(format!("degenerate radius {}", r))
                        }),
                }
            }
        }
    }

    /// Resolve the gradient into a color function over a `width` x `height` device buffer.
    ///
    /// `ctm` maps the gradient's user space to device space. The gradient is
    /// rendered once into a buffer of that size; pixels outside it are
    /// transparent. Spread is "pad".
    pub fn color_function(
        &self,
        ctm: Transform,
        width: u32,
        height: u32,
    ) -> RasterResult<ColorFn> {
        let shader = self.shader(ctm)?;
        let mut ramp =
            Pixmap::new(width, height).ok_or(RasterError::InvalidDimensions { width, height })?;
        let paint = Paint {
            shader,
            anti_alias: false,
            ..Default::default()
        };
        if let Some(rect) = Rect::from_xywh(0.0, 0.0, width as f32, height as f32) {
            ramp.fill_rect(rect, &paint, Transform::identity(), None);
        }

        let source = PatternSource::new(
            Arc::new(ramp),
            width as f32,
            height as f32,
            Transform::identity(),
        );
        Ok(source.color_function())
    }
}

/// Pull the focal point slightly inside the end circle.
fn clamp_focal(focal: Point, center: Point, r: f32) -> Point {
    let (wx, wy) = (focal.x - center.x, focal.y - center.y);
    let dist = (wx * wx + wy * wy).sqrt();
    let max_dist = r * FOCAL_INSET;
    if dist > max_dist && dist > 0.0 {
        Point::from_xy(
            center.x + wx * max_dist / dist,
            center.y + wy * max_dist / dist,
        )
    } else {
        focal
    }
}

fn is_finite(ts: &Transform) -> bool {
    [ts.sx, ts.kx, ts.ky, ts.sy, ts.tx, ts.ty]
        .iter()
        .all(|v| v.is_finite())
}
