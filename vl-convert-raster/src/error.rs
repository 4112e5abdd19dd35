//! Error types for vl-convert-raster.

use thiserror::Error;

/// Result type alias using RasterError.
pub type RasterResult<T> = Result<T, RasterError>;

/// Recoverable errors raised by the raster engine.
///
/// Caller bugs (mismatched mask dimensions, popping an empty state stack)
/// are not represented here: they panic.
#[derive(Debug, Error)]
pub enum RasterError {
    /// Invalid buffer dimensions (must be positive and within limits).
    #[error("Invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Gradient layout that cannot be resolved into a color function.
    #[error("Invalid gradient: {0}")]
    InvalidGradient(String),
}
