use indexmap::IndexSet;
use smallvec::SmallVec;

use crate::core::BandScale;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CirclePrimitive, Color, NodeId, NodeKind, RectPrimitive, Scene, TextHAlign, TextPrimitive,
};

use super::canvas::CanvasHandles;
use super::config::ChartConfig;
use super::layout::{Scales, TICK_LABEL_FONT_PX};
use super::{GanttContent, TaskInput};

pub const TRACK_CLASS: &str = "tracks-track";
pub const TRACK_LABEL_CLASS: &str = "tracks-track-label";
pub const TASK_CLASS: &str = "tracks-task";
pub const TASK_PROGRESS_CLASS: &str = "tracks-task-progress";
pub const ACTION_CLASS: &str = "tracks-action";

const TASK_BAR_TOP_RATIO: f64 = 0.25;
const TASK_BAR_HEIGHT_RATIO: f64 = 0.5;
const ACTION_RADIUS_PX: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct TaskNodes {
    bar: NodeId,
    progress: Option<NodeId>,
}

/// Controller for one Gantt row: owns the row's content and the scene
/// nodes drawn inside its track group.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackController {
    content: GanttContent,
    label: Option<NodeId>,
    tasks: SmallVec<[TaskNodes; 4]>,
    actions: SmallVec<[(usize, usize, NodeId); 8]>,
    drawn: bool,
}

impl TrackController {
    pub fn new(content: GanttContent) -> ChartResult<Self> {
        if content.key.trim().is_empty() {
            return Err(ChartError::InvalidContent(
                "track content requires a non-empty key".to_owned(),
            ));
        }
        for task in &content.tasks {
            validate_task(&content.key, task)?;
        }
        for action in &content.actions {
            if action.key.trim().is_empty() {
                return Err(ChartError::InvalidContent(format!(
                    "action on track `{}` requires a legend key",
                    content.key
                )));
            }
        }
        Ok(Self {
            content,
            label: None,
            tasks: SmallVec::new(),
            actions: SmallVec::new(),
            drawn: false,
        })
    }

    #[must_use]
    pub fn content(&self) -> &GanttContent {
        &self.content
    }

    #[must_use]
    pub fn label_text(&self) -> &str {
        &self.content.track_label.display
    }

    /// Creates the row's track group (and label) at `index` in the scene.
    pub fn load(
        &mut self,
        scene: &mut Scene,
        handles: &CanvasHandles,
        index: usize,
    ) -> ChartResult<NodeId> {
        let group = scene.insert(handles.content, index, NodeKind::Group, TRACK_CLASS)?;
        if let Some(labels) = handles.track_labels {
            if !self.label_text().is_empty() {
                self.label = Some(scene.insert(
                    labels,
                    index,
                    NodeKind::Text(TextPrimitive::new(
                        self.label_text(),
                        0.0,
                        0.0,
                        TICK_LABEL_FONT_PX,
                        Color::AXIS,
                        TextHAlign::Left,
                    )),
                    TRACK_LABEL_CLASS,
                )?);
            }
        }
        Ok(group)
    }

    /// Draws the row's tasks and actions on the first pass, then positions
    /// them. Later passes only move the existing nodes.
    pub fn redraw(
        &mut self,
        scene: &mut Scene,
        group: NodeId,
        index: usize,
        config: &ChartConfig,
        scales: &Scales,
    ) -> ChartResult<()> {
        if !self.drawn {
            self.draw(scene, group)?;
        }
        self.resize(scene, group, index, config, scales)?;
        self.apply_shown_targets(scene, &config.shown_targets, config.show_action_legend)
    }

    fn draw(&mut self, scene: &mut Scene, group: NodeId) -> ChartResult<()> {
        scene.clear_children(group)?;
        self.tasks.clear();
        self.actions.clear();

        for task in &self.content.tasks {
            let bar = scene.append(
                group,
                NodeKind::Rect(RectPrimitive::new(0.0, 0.0, 0.0, 0.0, Color::TASK)),
                TASK_CLASS,
            )?;
            let progress = match task.percentage {
                Some(_) => Some(scene.append(
                    group,
                    NodeKind::Rect(RectPrimitive::new(
                        0.0,
                        0.0,
                        0.0,
                        0.0,
                        Color::rgba(0.08, 0.3, 0.5, 0.9),
                    )),
                    TASK_PROGRESS_CLASS,
                )?),
                None => None,
            };
            self.tasks.push(TaskNodes { bar, progress });
        }
        for (action_index, action) in self.content.actions.iter().enumerate() {
            for value_index in 0..action.values.len() {
                let node = scene.append(
                    group,
                    NodeKind::Circle(CirclePrimitive::new(0.0, 0.0, ACTION_RADIUS_PX, Color::ACTION)),
                    ACTION_CLASS,
                )?;
                self.actions.push((action_index, value_index, node));
            }
        }
        self.drawn = true;
        Ok(())
    }

    /// Moves the row to its band and re-projects every node against the
    /// current X scale.
    pub fn resize(
        &self,
        scene: &mut Scene,
        group: NodeId,
        index: usize,
        config: &ChartConfig,
        scales: &Scales,
    ) -> ChartResult<()> {
        let band = band_scale(scales)?;
        let band_height = band.band_height();
        scene.set_translate(group, 0.0, band.band_top(index))?;

        for (task, nodes) in self.content.tasks.iter().zip(&self.tasks) {
            let start = scales.x.time_to_pixel(task.start_date)?;
            let end = scales.x.time_to_pixel(task.end_date)?;
            let width = (end - start).max(0.0);
            let top = band_height * TASK_BAR_TOP_RATIO;
            let height = band_height * TASK_BAR_HEIGHT_RATIO;
            set_rect(scene, nodes.bar, start, top, width, height)?;
            if let (Some(progress), Some(percentage)) = (nodes.progress, task.percentage) {
                set_rect(scene, progress, start, top, width * percentage / 100.0, height)?;
            }
        }

        for (action_index, value_index, node) in &self.actions {
            let value = self.content.actions[*action_index].values[*value_index];
            let cx = scales.x.time_to_pixel(value)?;
            if let NodeKind::Circle(circle) = &mut scene.node_mut(*node)?.kind {
                circle.cx = cx;
                circle.cy = band_height / 2.0;
            }
        }

        if let Some(label) = self.label {
            scene.set_visible(label, config.show_label)?;
            if let NodeKind::Text(text) = &mut scene.node_mut(label)?.kind {
                text.x = config.padding.left;
                text.y = band.band_center(index) + TICK_LABEL_FONT_PX / 3.0;
            }
        }
        Ok(())
    }

    /// Shows only the actions whose legend key is currently shown.
    pub fn apply_shown_targets(
        &self,
        scene: &mut Scene,
        shown: &IndexSet<String>,
        legend_active: bool,
    ) -> ChartResult<()> {
        for (action_index, _, node) in &self.actions {
            let key = &self.content.actions[*action_index].key;
            scene.set_visible(*node, !legend_active || shown.contains(key))?;
        }
        Ok(())
    }

    /// Detaches the row's label and track group from the scene.
    pub fn unload(&mut self, scene: &mut Scene, group: NodeId) -> ChartResult<()> {
        if let Some(label) = self.label.take() {
            if scene.contains(label) {
                scene.remove(label)?;
            }
        }
        if scene.contains(group) {
            scene.remove(group)?;
        }
        self.tasks.clear();
        self.actions.clear();
        self.drawn = false;
        Ok(())
    }
}

fn validate_task(track_key: &str, task: &TaskInput) -> ChartResult<()> {
    if task.end_date < task.start_date {
        return Err(ChartError::InvalidContent(format!(
            "task `{}` on track `{track_key}` ends before it starts",
            task.key
        )));
    }
    if let Some(percentage) = task.percentage {
        if !percentage.is_finite() || !(0.0..=100.0).contains(&percentage) {
            return Err(ChartError::InvalidContent(format!(
                "task `{}` on track `{track_key}` has percentage outside 0..=100",
                task.key
            )));
        }
    }
    Ok(())
}

fn band_scale(scales: &Scales) -> ChartResult<BandScale> {
    scales.y.ok_or_else(|| {
        ChartError::InvalidData("gantt tracks require a band scale".to_owned())
    })
}

fn set_rect(
    scene: &mut Scene,
    node: NodeId,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> ChartResult<()> {
    if let NodeKind::Rect(rect) = &mut scene.node_mut(node)?.kind {
        rect.x = x;
        rect.y = y;
        rect.width = width;
        rect.height = height;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::TrackController;
    use crate::api::{GanttContent, TaskInput};
    use crate::error::ChartError;
    use chrono::{TimeZone, Utc};

    #[test]
    fn task_ending_before_start_is_rejected() {
        let content = GanttContent::new("t1", "Track 1").with_task(TaskInput::new(
            "task",
            Utc.with_ymd_and_hms(2023, 1, 10, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2023, 1, 5, 0, 0, 0).unwrap(),
        ));
        assert!(matches!(
            TrackController::new(content),
            Err(ChartError::InvalidContent(_))
        ));
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(TrackController::new(GanttContent::new(" ", "Track")).is_err());
    }

    #[test]
    fn out_of_range_percentage_is_rejected() {
        let content = GanttContent::new("t1", "Track 1").with_task(
            TaskInput::new(
                "task",
                Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2023, 1, 5, 0, 0, 0).unwrap(),
            )
            .with_percentage(140.0),
        );
        assert!(TrackController::new(content).is_err());
    }
}
