//! The drawing canvas: graphic state stack, current path and layer buffers.

mod drawing;
mod group;
mod path_ops;
mod transform;

use crate::color::{PaintColor, Rgba};
use crate::config::CanvasConfig;
use crate::error::{RasterError, RasterResult};
use crate::matrix::Matrix;
use crate::path::Path;
use crate::pattern::PatternSource;
use crate::rasterizer::{Rasterizer, SkiaRasterizer};
use crate::state::GraphicState;
use crate::style::{LineCap, LineJoin};
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Builder for [`Canvas`].
#[derive(Debug, Clone)]
pub struct CanvasBuilder {
    width: u32,
    height: u32,
    origin: (f32, f32),
    config: CanvasConfig,
}

impl CanvasBuilder {
    /// Create a new builder with specified dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            origin: (0.0, 0.0),
            config: CanvasConfig::default(),
        }
    }

    /// Enable or disable anti-aliasing of fills, strokes and clips.
    pub fn anti_alias(mut self, anti_alias: bool) -> Self {
        self.config.anti_alias = anti_alias;
        self
    }

    /// Set the largest accepted width or height.
    pub fn max_dimension(mut self, max_dimension: u32) -> Self {
        self.config.max_dimension = max_dimension;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: CanvasConfig) -> Self {
        self.config = config;
        self
    }

    /// Position of the canvas's top-left corner in its parent's user space,
    /// as reported by [`Canvas::get_rectangle`].
    pub fn origin(mut self, x: f32, y: f32) -> Self {
        self.origin = (x, y);
        self
    }

    /// Build a canvas backed by the default tiny-skia rasterizer.
    pub fn build(self) -> RasterResult<Canvas> {
        let rasterizer = SkiaRasterizer::new(self.config.anti_alias);
        self.build_with(rasterizer)
    }

    /// Build a canvas backed by a custom rasterizer.
    pub fn build_with<R: Rasterizer>(self, rasterizer: R) -> RasterResult<Canvas<R>> {
        let (x, y) = self.origin;
        let rectangle = [x, y, x + self.width as f32, y + self.height as f32];
        Canvas::new_internal(
            self.width,
            self.height,
            rectangle,
            self.config,
            GraphicState::default(),
            rasterizer,
        )
    }
}

/// A saved graphic state together with the buffer it was drawing into.
#[derive(Debug)]
pub(crate) struct Layer {
    pub(crate) state: GraphicState,
    pub(crate) target: Pixmap,
}

/// Drawing target receiving the commands of an upstream driver.
///
/// All coordinates passed to path operations are in user space and are
/// mapped to device space with the current transform as soon as they are
/// recorded.
pub struct Canvas<R: Rasterizer = SkiaRasterizer> {
    /// Width of the buffer in pixels.
    pub(crate) width: u32,
    /// Height of the buffer in pixels.
    pub(crate) height: u32,
    /// Left, top, right, bottom in the parent's user space.
    pub(crate) rectangle: [f32; 4],
    pub(crate) config: CanvasConfig,
    /// Current graphic state.
    pub(crate) state: GraphicState,
    /// Buffer that drawing operations currently write to.
    pub(crate) target: Pixmap,
    /// Saved states and buffers of enclosing scopes, innermost last.
    pub(crate) layers: Vec<Layer>,
    /// Current path, in device space.
    pub(crate) path: Path,
    /// Whether the current path has something to rasterize.
    pub(crate) has_path: bool,
    pub(crate) rasterizer: R,
}

impl Canvas {
    /// Create a canvas with the default configuration and rasterizer.
    pub fn new(width: u32, height: u32) -> RasterResult<Self> {
        CanvasBuilder::new(width, height).build()
    }

    /// Create a builder for a canvas with specified dimensions.
    pub fn builder(width: u32, height: u32) -> CanvasBuilder {
        CanvasBuilder::new(width, height)
    }
}

impl<R: Rasterizer> Canvas<R> {
    /// Create a canvas drawing through `rasterizer`.
    pub fn with_rasterizer(
        width: u32,
        height: u32,
        config: CanvasConfig,
        rasterizer: R,
    ) -> RasterResult<Self> {
        CanvasBuilder::new(width, height)
            .config(config)
            .build_with(rasterizer)
    }

    pub(crate) fn new_internal(
        width: u32,
        height: u32,
        rectangle: [f32; 4],
        config: CanvasConfig,
        state: GraphicState,
        mut rasterizer: R,
    ) -> RasterResult<Self> {
        config.check_dimensions(width, height)?;
        let target =
            Pixmap::new(width, height).ok_or(RasterError::InvalidDimensions { width, height })?;

        rasterizer.set_stroke(&state.stroke);

        Ok(Self {
            width,
            height,
            rectangle,
            config,
            state,
            target,
            layers: Vec::new(),
            path: Path::new(),
            has_path: false,
            rasterizer,
        })
    }

    /// Get buffer width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get buffer height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The canvas rectangle as (left, top, right, bottom), in the user space
    /// of the canvas that created it.
    pub fn get_rectangle(&self) -> (f32, f32, f32, f32) {
        let [left, top, right, bottom] = self.rectangle;
        (left, top, right, bottom)
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Current graphic state.
    pub fn state(&self) -> &GraphicState {
        &self.state
    }

    /// Number of scopes currently open.
    pub fn stack_depth(&self) -> usize {
        self.layers.len()
    }

    /// The current path, in device space.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a path is pending for the next paint.
    pub fn has_path(&self) -> bool {
        self.has_path
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// The buffer drawing operations currently write to.
    ///
    /// Inside an open scope this is the scope's own buffer, not the root one.
    pub fn pixmap(&self) -> &Pixmap {
        &self.target
    }

    /// Close every open scope and return the root buffer.
    pub fn into_pixmap(mut self) -> Pixmap {
        while !self.layers.is_empty() {
            self.pop_stack();
        }
        self.target
    }

    /// Premultiplied pixel of the current buffer, or `None` outside it.
    pub fn pixel(&self, x: u32, y: u32) -> Option<tiny_skia::PremultipliedColorU8> {
        self.target.pixel(x, y)
    }

    // --- Paint setters ---

    /// Set the fill or stroke color. Channels are clamped to [0, 1].
    pub fn set_color_rgba(&mut self, color: Rgba, stroke: bool) {
        log::debug!(target: "raster", "set_color_rgba {:?} stroke={}", color, stroke);
        let paint = PaintColor::solid(color);
        if stroke {
            self.state.stroke_color = paint;
        } else {
            self.state.fill_color = paint;
        }
    }

    /// Use the content of `pattern` as fill or stroke paint.
    ///
    /// `content_width` x `content_height` is the size of the pattern cell and
    /// `mat` maps pattern space to device space. The pattern's current buffer
    /// is snapshotted; later drawing on `pattern` has no effect on this paint.
    pub fn set_color_pattern<P: Rasterizer>(
        &mut self,
        pattern: &Canvas<P>,
        content_width: f32,
        content_height: f32,
        mat: Matrix,
        stroke: bool,
    ) {
        log::debug!(
            target: "raster",
            "set_color_pattern {}x{} {:?} stroke={}",
            content_width,
            content_height,
            mat,
            stroke
        );
        let source = PatternSource::new(
            Arc::new(pattern.pixmap().clone()),
            content_width,
            content_height,
            mat.into(),
        );
        let paint = PaintColor::Procedural(source.color_function());
        if stroke {
            self.state.stroke_color = paint;
        } else {
            self.state.fill_color = paint;
        }
    }

    /// Blend modes are not supported; drawing always composites source-over.
    pub fn set_blending_mode(&mut self, mode: &str) {
        log::warn!(target: "raster", "blend mode {:?} not supported, using normal", mode);
    }

    // --- Stroke setters ---

    /// Set the stroke width in user units.
    ///
    /// The width is converted to device units with the norm of the current
    /// transform, `sqrt(a² + b² + c² + d²)`. Negative widths are treated as 0;
    /// non-finite widths are ignored.
    pub fn set_line_width(&mut self, width: f32) {
        log::debug!(target: "raster", "set_line_width {}", width);
        if !width.is_finite() {
            return;
        }
        let norm = Matrix::from(self.state.transform).norm();
        self.state.stroke.width = width.max(0.0) * norm;
        self.rasterizer.set_stroke(&self.state.stroke);
    }

    /// Set the dash pattern, in device units. An empty slice disables dashing.
    pub fn set_dash(&mut self, dashes: &[f32], offset: f32) {
        log::debug!(target: "raster", "set_dash {:?} {}", dashes, offset);
        self.state.stroke.dashes = dashes.to_vec();
        self.state.stroke.dash_offset = offset;
        self.rasterizer.set_stroke(&self.state.stroke);
    }

    /// Set line cap, line join and miter limit.
    pub fn set_stroke_options(
        &mut self,
        line_cap: LineCap,
        line_join: LineJoin,
        miter_limit: f32,
    ) {
        log::debug!(
            target: "raster",
            "set_stroke_options {:?} {:?} {}",
            line_cap,
            line_join,
            miter_limit
        );
        self.state.stroke.line_cap = line_cap;
        self.state.stroke.line_join = line_join;
        if miter_limit.is_finite() && miter_limit > 0.0 {
            self.state.stroke.miter_limit = miter_limit;
        }
        self.rasterizer.set_stroke(&self.state.stroke);
    }
}

impl<R: Rasterizer> std::fmt::Debug for Canvas<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rectangle", &self.rectangle)
            .field("stack_depth", &self.layers.len())
            .field("segments", &self.path.len())
            .finish()
    }
}
