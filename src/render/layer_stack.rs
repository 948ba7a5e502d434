use serde::{Deserialize, Serialize};

/// Drawing layers of one canvas, bottom first.
///
/// SVG has no z-index, so the canvas children are created in this order
/// and later content is inserted into its layer group rather than appended
/// to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanvasLayerKind {
    Defs,
    Grid,
    Content,
    Axis,
    TrackLabels,
    Dateline,
}

impl CanvasLayerKind {
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Defs => "tracks-defs",
            Self::Grid => "tracks-grid",
            Self::Content => "tracks-content-container",
            Self::Axis => "tracks-axis",
            Self::TrackLabels => "tracks-track-labels",
            Self::Dateline => "tracks-dateline-group",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasLayerStack {
    pub layers: Vec<CanvasLayerKind>,
}

impl CanvasLayerStack {
    #[must_use]
    pub fn gantt() -> Self {
        Self {
            layers: vec![
                CanvasLayerKind::Defs,
                CanvasLayerKind::Grid,
                CanvasLayerKind::Content,
                CanvasLayerKind::Axis,
                CanvasLayerKind::TrackLabels,
                CanvasLayerKind::Dateline,
            ],
        }
    }

    #[must_use]
    pub fn timeline() -> Self {
        Self {
            layers: vec![
                CanvasLayerKind::Defs,
                CanvasLayerKind::Axis,
                CanvasLayerKind::Content,
            ],
        }
    }

    #[must_use]
    pub fn position(&self, layer: CanvasLayerKind) -> Option<usize> {
        self.layers.iter().position(|candidate| *candidate == layer)
    }
}
