//! Graphic state that is saved and restored around nested scopes.

use crate::color::PaintColor;
use crate::composite::AlphaMask;
use crate::style::{FillRule, StrokeOptions};
use std::sync::Arc;
use tiny_skia::Transform;

/// Graphic state that can be saved and restored.
///
/// Copied by value on every push. The masks are shared behind `Arc` because
/// they are never mutated once built.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicState {
    /// Current transform matrix (user space to device space).
    pub transform: Transform,
    /// Current fill paint.
    pub fill_color: PaintColor,
    /// Current stroke paint.
    pub stroke_color: PaintColor,
    /// Current stroke parameters, including the dash pattern.
    pub stroke: StrokeOptions,
    /// Winding rule of the last fill, also used by gradient fills.
    pub fill_rule: FillRule,
    /// Luminance mask applied to this scope's buffer when the scope closes.
    pub alpha_mask: Option<Arc<AlphaMask>>,
    /// Coverage that every drawing operation is clipped to, in device space.
    pub clip: Option<Arc<tiny_skia::Mask>>,
}

impl Default for GraphicState {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            fill_color: PaintColor::default(),
            stroke_color: PaintColor::default(),
            stroke: StrokeOptions::default(),
            fill_rule: FillRule::default(),
            alpha_mask: None,
            clip: None,
        }
    }
}

impl GraphicState {
    /// State for a nested scope or group: everything is inherited except the
    /// alpha mask, which belongs to the scope that set it.
    pub(crate) fn nested(&self) -> Self {
        Self {
            alpha_mask: None,
            ..self.clone()
        }
    }
}
