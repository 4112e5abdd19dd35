//! Graphic state and compositing engine for rasterizing vector drawing commands.
//!
//! This crate receives the drawing calls of an upstream document renderer
//! (paths, paints, gradients, nested state scopes, opacity groups and masks)
//! and renders them onto a premultiplied RGBA buffer. It uses:
//! - `tiny-skia` for pixel buffers, coverage masks and path rasterization
//! - `log` for tracing every drawing call under the `raster` target
//!
//! # Example
//!
//! ```rust
//! use vl_convert_raster::{Canvas, PaintOp, Rgba};
//!
//! let mut canvas = Canvas::new(400, 300)?;
//! canvas.set_color_rgba(Rgba::new(1.0, 0.0, 0.0, 1.0), false);
//! canvas.rectangle(10.0, 10.0, 100.0, 50.0);
//! canvas.paint(PaintOp::FILL_NON_ZERO);
//!
//! // Draw a half-transparent group on top
//! let mut group = canvas.new_group(0.0, 0.0, 400.0, 300.0)?;
//! group.rectangle(50.0, 20.0, 100.0, 50.0);
//! group.paint(PaintOp::FILL_NON_ZERO);
//! canvas.draw_with_opacity(0.5, group);
//!
//! let pixmap = canvas.into_pixmap();
//! assert_eq!(pixmap.width(), 400);
//! # Ok::<(), vl_convert_raster::RasterError>(())
//! ```

mod canvas;
mod color;
mod composite;
mod config;
mod error;
mod geometry;
mod gradient;
mod matrix;
mod path;
mod pattern;
mod rasterizer;
mod state;
mod style;

// Re-export public API
pub use canvas::{Canvas, CanvasBuilder};
pub use color::{ColorFn, PaintColor, Rgba};
pub use composite::{apply_alpha_mask, apply_opacity, draw_over, rgba_to_alpha, AlphaMask};
pub use config::{CanvasConfig, MAX_DIMENSION};
pub use error::{RasterError, RasterResult};
pub use geometry::{Fixed, FixedPoint};
pub use gradient::{GradientKind, GradientLayout};
pub use matrix::Matrix;
pub use path::{Path, Segment};
pub use pattern::PatternSource;
pub use rasterizer::{Rasterizer, SkiaRasterizer};
pub use state::GraphicState;
pub use style::{FillRule, LineCap, LineJoin, PaintOp, StrokeOptions};

/// Re-export of the tiny-skia version the buffers are built on.
pub use tiny_skia;
