use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::{
    CanvasLayerKind, CanvasLayerStack, Color, LinePrimitive, NodeId, NodeKind, Scene, TextHAlign,
    TextPrimitive,
};

use super::config::ChartConfig;
use super::dateline::translate_datelines;
use super::layout::{
    Scales, TICK_LABEL_FONT_PX, TICK_SIZE_PX, axis_ticks, x_axis_offset, x_range,
};

pub const CONTAINER_CLASS: &str = "tracks-container";
pub const CANVAS_CLASS: &str = "tracks-canvas";
pub const AXIS_LINE_CLASS: &str = "tracks-axis-line";
pub const AXIS_TICK_CLASS: &str = "tracks-axis-tick";
pub const AXIS_TICK_MARK_CLASS: &str = "tracks-axis-tick-mark";
pub const AXIS_TICK_LABEL_CLASS: &str = "tracks-axis-tick-label";
pub const GRID_LINE_CLASS: &str = "tracks-grid-line";

/// Scene nodes created once per chart and repositioned on every resize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasHandles {
    pub container: NodeId,
    pub canvas: NodeId,
    pub clip_path: NodeId,
    pub grid: Option<NodeId>,
    pub content: NodeId,
    pub axis: NodeId,
    pub track_labels: Option<NodeId>,
    pub dateline: Option<NodeId>,
}

/// Creates container, canvas and one group per layer, bottom first.
pub fn create_canvas(
    scene: &mut Scene,
    config: &ChartConfig,
    stack: &CanvasLayerStack,
) -> ChartResult<CanvasHandles> {
    let container = scene.append_root(NodeKind::Container, CONTAINER_CLASS)?;
    let canvas = scene.append(
        container,
        NodeKind::Canvas {
            width: config.svg_width(),
            height: config.canvas_height,
        },
        CANVAS_CLASS,
    )?;

    let mut clip_path = None;
    let mut grid = None;
    let mut content = None;
    let mut axis = None;
    let mut track_labels = None;
    let mut dateline = None;
    for layer in &stack.layers {
        let group = scene.append(canvas, NodeKind::Group, layer.class_name())?;
        match layer {
            CanvasLayerKind::Defs => {
                let (x, width, y, height) = clip_bounds(config);
                clip_path = Some(scene.append(
                    group,
                    NodeKind::ClipPath {
                        id: config.clip_path_id.clone(),
                        x,
                        y,
                        width,
                        height,
                    },
                    "tracks-clip-path",
                )?);
            }
            CanvasLayerKind::Grid => grid = Some(group),
            CanvasLayerKind::Content => {
                scene.node_mut(group)?.clip_path = Some(config.clip_path_id.clone());
                content = Some(group);
            }
            CanvasLayerKind::Axis => axis = Some(group),
            CanvasLayerKind::TrackLabels => track_labels = Some(group),
            CanvasLayerKind::Dateline => {
                scene.node_mut(group)?.clip_path = Some(config.clip_path_id.clone());
                dateline = Some(group);
            }
        }
    }

    let (Some(clip_path), Some(content), Some(axis)) = (clip_path, content, axis) else {
        return Err(ChartError::InvalidData(
            "canvas layer stack must contain defs, content and axis layers".to_owned(),
        ));
    };
    Ok(CanvasHandles {
        container,
        canvas,
        clip_path,
        grid,
        content,
        axis,
        track_labels,
        dateline,
    })
}

/// Drawable region as `(x, width, y, height)`: the plot's horizontal extent
/// over the full canvas height.
fn clip_bounds(config: &ChartConfig) -> (f64, f64, f64, f64) {
    let (start, end) = x_range(config);
    (start, end - start, 0.0, config.canvas_height.max(0.0))
}

/// Repositions canvas-level furniture after a layout pass.
pub fn translate_canvas(
    scene: &mut Scene,
    handles: &CanvasHandles,
    config: &ChartConfig,
    scales: &Scales,
) -> ChartResult<()> {
    if let NodeKind::Canvas { width, height } = &mut scene.node_mut(handles.canvas)?.kind {
        *width = config.svg_width();
        *height = config.canvas_height;
    }
    let (clip_x, clip_width, clip_y, clip_height) = clip_bounds(config);
    if let NodeKind::ClipPath {
        x,
        y,
        width,
        height,
        ..
    } = &mut scene.node_mut(handles.clip_path)?.kind
    {
        *x = clip_x;
        *y = clip_y;
        *width = clip_width;
        *height = clip_height;
    }
    translate_axis(scene, handles.axis, config, scales)?;
    if let Some(grid) = handles.grid {
        translate_grid(scene, grid, config, scales)?;
    }
    if let Some(dateline) = handles.dateline {
        translate_datelines(scene, dateline, config, scales)?;
    }
    Ok(())
}

fn translate_axis(
    scene: &mut Scene,
    axis: NodeId,
    config: &ChartConfig,
    scales: &Scales,
) -> ChartResult<()> {
    scene.set_translate(axis, 0.0, x_axis_offset(config))?;
    scene.set_visible(axis, config.x_axis.show)?;
    let ticks = axis_ticks(config, scales)?;
    scene.truncate_children(axis, ticks.len() + 1)?;

    let (start, end) = scales.x.range();
    scene.set_child(
        axis,
        0,
        NodeKind::Line(LinePrimitive::new(start, 0.0, end, 0.0, 1.0, Color::AXIS)),
        AXIS_LINE_CLASS,
    )?;
    for (index, tick) in ticks.into_iter().enumerate() {
        let x = scales.x.time_to_pixel(tick.time)?;
        let group = scene.set_child(axis, index + 1, NodeKind::Group, AXIS_TICK_CLASS)?;
        scene.set_translate(group, x, 0.0)?;
        let has_label = !tick.label.is_empty();
        scene.truncate_children(group, 1 + usize::from(has_label))?;
        scene.set_child(
            group,
            0,
            NodeKind::Line(LinePrimitive::new(0.0, 0.0, 0.0, TICK_SIZE_PX, 1.0, Color::AXIS)),
            AXIS_TICK_MARK_CLASS,
        )?;
        if has_label {
            scene.set_child(
                group,
                1,
                NodeKind::Text(TextPrimitive::new(
                    tick.label,
                    0.0,
                    TICK_SIZE_PX + TICK_LABEL_FONT_PX,
                    TICK_LABEL_FONT_PX,
                    Color::AXIS,
                    TextHAlign::Center,
                )),
                AXIS_TICK_LABEL_CLASS,
            )?;
        }
    }
    Ok(())
}

fn translate_grid(
    scene: &mut Scene,
    grid: NodeId,
    config: &ChartConfig,
    scales: &Scales,
) -> ChartResult<()> {
    let top = config.padding.top;
    let bottom = x_axis_offset(config);
    if bottom <= top {
        return scene.clear_children(grid);
    }

    let (start, end) = scales.x.range();
    let mut lines = Vec::new();
    for tick in axis_ticks(config, scales)? {
        let x = scales.x.time_to_pixel(tick.time)?;
        lines.push(LinePrimitive::new(x, top, x, bottom, 1.0, Color::GRID));
    }
    if let Some(y) = scales.y {
        for index in 1..y.band_count() {
            let row = y.band_top(index);
            lines.push(LinePrimitive::new(start, row, end, row, 1.0, Color::GRID));
        }
    }

    scene.truncate_children(grid, lines.len())?;
    for (index, line) in lines.into_iter().enumerate() {
        scene.set_child(grid, index, NodeKind::Line(line), GRID_LINE_CLASS)?;
    }
    Ok(())
}

/// Removes the canvas and the outer container from the scene.
pub fn remove_canvas(scene: &mut Scene, handles: &CanvasHandles) -> ChartResult<()> {
    if scene.contains(handles.canvas) {
        scene.remove(handles.canvas)?;
    }
    if scene.contains(handles.container) {
        scene.remove(handles.container)?;
    }
    Ok(())
}
