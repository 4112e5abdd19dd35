//! Transform operations for Canvas.

use super::Canvas;
use crate::matrix::Matrix;
use crate::rasterizer::Rasterizer;

impl<R: Rasterizer> Canvas<R> {
    /// Apply `mt` as an additional transformation.
    ///
    /// `mt` is prepended: it maps user coordinates first, then the previous
    /// transform maps the result to device space.
    pub fn transform(&mut self, mt: Matrix) {
        log::debug!(target: "raster", "transform {:?}", mt);
        self.state.transform = self.state.transform.pre_concat(mt.into());
    }

    /// Get the current transformation matrix.
    pub fn get_transform(&self) -> Matrix {
        self.state.transform.into()
    }

    /// Replace the current transformation matrix.
    pub fn set_transform(&mut self, mt: Matrix) {
        log::debug!(target: "raster", "set_transform {:?}", mt);
        self.state.transform = mt.into();
    }
}
