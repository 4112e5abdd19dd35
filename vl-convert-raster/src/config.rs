//! Rendering configuration passed explicitly to every canvas.

use crate::error::{RasterError, RasterResult};

/// Maximum buffer dimension (same as Chrome's canvas limit).
pub const MAX_DIMENSION: u32 = 32767;

/// Options shared by a canvas and every group created beneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasConfig {
    /// Whether fills, strokes and clips are anti-aliased.
    pub anti_alias: bool,
    /// Largest accepted width or height, in pixels.
    pub max_dimension: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            anti_alias: true,
            max_dimension: MAX_DIMENSION,
        }
    }
}

impl CanvasConfig {
    /// Check that a `width` x `height` buffer may be allocated under this config.
    pub(crate) fn check_dimensions(&self, width: u32, height: u32) -> RasterResult<()> {
        if width == 0 || height == 0 || width > self.max_dimension || height > self.max_dimension
        {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        Ok(())
    }
}
