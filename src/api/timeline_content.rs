use smallvec::SmallVec;

use crate::error::{ChartError, ChartResult};
use crate::render::{
    CirclePrimitive, Color, NodeId, NodeKind, Scene, TextHAlign, TextPrimitive,
};

use super::TimelineContent;
use super::canvas::CanvasHandles;
use super::config::ChartConfig;
use super::layout::{Scales, TICK_LABEL_FONT_PX, x_axis_offset};

pub const TIMELINE_CONTENT_CLASS: &str = "tracks-timeline-content";
pub const TIMELINE_POINT_CLASS: &str = "tracks-timeline-point";
pub const TIMELINE_LABEL_CLASS: &str = "tracks-timeline-label";

const POINT_RADIUS_PX: f64 = 6.0;
const LABEL_GAP_PX: f64 = 4.0;

/// Controller for one loaded timeline item: a group of points on the axis,
/// with its label above the earliest point.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineContentController {
    content: TimelineContent,
    group: Option<NodeId>,
    points: SmallVec<[NodeId; 8]>,
    label: Option<NodeId>,
}

impl TimelineContentController {
    pub fn new(content: TimelineContent) -> ChartResult<Self> {
        if content.key.trim().is_empty() {
            return Err(ChartError::InvalidContent(
                "timeline content requires a non-empty key".to_owned(),
            ));
        }
        Ok(Self {
            content,
            group: None,
            points: SmallVec::new(),
            label: None,
        })
    }

    #[must_use]
    pub fn content(&self) -> &TimelineContent {
        &self.content
    }

    #[must_use]
    pub fn group(&self) -> Option<NodeId> {
        self.group
    }

    #[must_use]
    pub fn label(&self) -> Option<NodeId> {
        self.label
    }

    fn label_text(&self) -> &str {
        self.content
            .label
            .as_ref()
            .map_or("", |label| label.display.as_str())
    }

    pub fn load(&mut self, scene: &mut Scene, handles: &CanvasHandles) -> ChartResult<()> {
        let group = scene.append(handles.content, NodeKind::Group, TIMELINE_CONTENT_CLASS)?;
        for _ in &self.content.values {
            let point = scene.append(
                group,
                NodeKind::Circle(CirclePrimitive::new(0.0, 0.0, POINT_RADIUS_PX, Color::TASK)),
                TIMELINE_POINT_CLASS,
            )?;
            self.points.push(point);
        }
        if !self.label_text().is_empty() {
            self.label = Some(scene.append(
                group,
                NodeKind::Text(TextPrimitive::new(
                    self.label_text(),
                    0.0,
                    0.0,
                    TICK_LABEL_FONT_PX,
                    Color::AXIS,
                    TextHAlign::Left,
                )),
                TIMELINE_LABEL_CLASS,
            )?);
        }
        self.group = Some(group);
        Ok(())
    }

    pub fn resize(&self, scene: &mut Scene, config: &ChartConfig, scales: &Scales) -> ChartResult<()> {
        let baseline = x_axis_offset(config);
        for (value, point) in self.content.values.iter().zip(&self.points) {
            let cx = scales.x.time_to_pixel(value.x)?;
            if let NodeKind::Circle(circle) = &mut scene.node_mut(*point)?.kind {
                circle.cx = cx;
                circle.cy = baseline;
            }
        }

        if let Some(label) = self.label {
            let x = match self.content.values.iter().map(|value| value.x).min() {
                Some(earliest) => scales.x.time_to_pixel(earliest)?,
                None => scales.x.range().0,
            };
            scene.set_visible(label, config.show_label)?;
            if let NodeKind::Text(text) = &mut scene.node_mut(label)?.kind {
                text.x = x;
                text.y = baseline - POINT_RADIUS_PX - LABEL_GAP_PX;
            }
        }
        Ok(())
    }

    pub fn set_visible(&self, scene: &mut Scene, visible: bool) -> ChartResult<()> {
        match self.group {
            Some(group) => scene.set_visible(group, visible),
            None => Ok(()),
        }
    }

    pub fn unload(&mut self, scene: &mut Scene) -> ChartResult<()> {
        if let Some(group) = self.group.take() {
            if scene.contains(group) {
                scene.remove(group)?;
            }
        }
        self.points.clear();
        self.label = None;
        Ok(())
    }
}
