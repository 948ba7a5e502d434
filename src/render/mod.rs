mod layer_stack;
mod null_renderer;
mod primitives;
mod scene;
mod svg_renderer;

pub use layer_stack::{CanvasLayerKind, CanvasLayerStack};
pub use null_renderer::NullRenderer;
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive,
};
pub use scene::{NodeId, NodeKind, Scene, SceneNode};
pub use svg_renderer::SvgRenderer;

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive the chart's retained scene after layout has settled,
/// so drawing code stays isolated from track lifecycle and layout logic.
pub trait Renderer {
    fn render(&mut self, scene: &Scene) -> ChartResult<()>;
}
