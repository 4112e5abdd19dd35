//! State scopes and isolated groups for Canvas.

use super::{Canvas, Layer};
use crate::composite::{apply_alpha_mask, apply_opacity, draw_over, AlphaMask};
use crate::error::RasterResult;
use crate::rasterizer::Rasterizer;
use std::sync::Arc;

impl<R: Rasterizer> Canvas<R> {
    /// Save the current state and start drawing into a fresh transparent
    /// buffer of the same size.
    ///
    /// The new scope inherits every state field except the alpha mask.
    pub fn push_stack(&mut self) {
        log::debug!(target: "raster", "push_stack depth={}", self.layers.len());
        let mut scope_target = self.target.clone();
        scope_target.fill(tiny_skia::Color::TRANSPARENT);

        let nested = self.state.nested();
        self.layers.push(Layer {
            state: std::mem::replace(&mut self.state, nested),
            target: std::mem::replace(&mut self.target, scope_target),
        });
    }

    /// Close the innermost scope: mask its buffer with the scope's alpha mask
    /// (if any), merge it over the parent buffer and restore the saved state.
    ///
    /// # Panics
    /// If no scope is open.
    pub fn pop_stack(&mut self) {
        log::debug!(target: "raster", "pop_stack depth={}", self.layers.len());
        let Some(layer) = self.layers.pop() else {
            panic!("pop_stack called with an empty state stack");
        };

        let mut scope_target = std::mem::replace(&mut self.target, layer.target);
        if let Some(mask) = &self.state.alpha_mask {
            apply_alpha_mask(&mut scope_target, mask);
        }
        draw_over(&mut self.target, &scope_target, 0, 0);

        self.state = layer.state;
        // The rasterizer holds stroke settings outside the saved state
        self.rasterizer.set_stroke(&self.state.stroke);
    }

    /// Run `f` in a nested scope, restoring the state afterwards.
    ///
    /// Whatever `f` changes in the graphic state is undone when it returns,
    /// and what it draws is merged into the enclosing buffer. The return value
    /// of `f` is passed through.
    pub fn on_new_stack<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.push_stack();
        let out = f(self);
        self.pop_stack();
        out
    }

    /// Record the luminance of `mask`'s current buffer as the alpha mask of
    /// the current scope. It is applied when the scope closes.
    pub fn set_alpha_mask<M: Rasterizer>(&mut self, mask: &Canvas<M>) {
        log::debug!(
            target: "raster",
            "set_alpha_mask {}x{}",
            mask.pixmap().width(),
            mask.pixmap().height()
        );
        self.state.alpha_mask = Some(Arc::new(AlphaMask::from_pixmap(mask.pixmap())));
    }

    /// Composite `group` over the current buffer at `opacity` (clamped to [0, 1]).
    ///
    /// Open scopes of `group` are closed first. The group is consumed.
    pub fn draw_with_opacity<G: Rasterizer>(&mut self, opacity: f32, group: Canvas<G>) {
        log::debug!(
            target: "raster",
            "draw_with_opacity {} {}x{}",
            opacity,
            group.width(),
            group.height()
        );
        let mut group_target = group.into_pixmap();
        apply_opacity(&mut group_target, opacity);
        draw_over(&mut self.target, &group_target, 0, 0);
    }
}

impl<R: Rasterizer + Clone> Canvas<R> {
    /// Create an isolated group with its own transparent `width` x `height`
    /// buffer, for opacity groups, masks and patterns.
    ///
    /// The group starts from the current graphic state (transform included),
    /// without the alpha mask and the clip, and uses the same configuration
    /// and rasterizer. Fractional sizes are truncated.
    pub fn new_group(&self, x: f32, y: f32, width: f32, height: f32) -> RasterResult<Canvas<R>> {
        log::debug!(target: "raster", "new_group {} {} {} {}", x, y, width, height);
        let mut state = self.state.nested();
        state.clip = None;
        Canvas::new_internal(
            width as u32,
            height as u32,
            [x, y, x + width, y + height],
            self.config,
            state,
            self.rasterizer.clone(),
        )
    }
}
