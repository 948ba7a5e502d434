//! Canvas sizing and scale construction.
//!
//! A layout pass must run in this order: canvas width, axis and label
//! sizes, canvas height, scales. Label sizes read the width and the scales
//! read the final height, so any other order leaves stale pixel ranges.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::time_ticks::explicit_time_ticks;
use crate::core::{BandScale, TimeScale, TimeTick, generate_time_ticks};
use crate::error::ChartResult;
use crate::host::HostContainer;

use super::config::{AxisSettings, ChartConfig, ChartKind};

pub const TICK_SIZE_PX: f64 = 6.0;
pub const TICK_LABEL_FONT_PX: f64 = 12.0;
pub const LABEL_CHAR_WIDTH_PX: f64 = 7.0;
pub const TRACK_LABEL_GAP_PX: f64 = 10.0;
/// Track label column never takes more than this share of the canvas.
pub const MAX_TRACK_LABEL_RATIO: f64 = 0.25;

/// Scales of one chart after a layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scales {
    pub x: TimeScale,
    /// Track rows; `None` for timelines.
    pub y: Option<BandScale>,
    pub settings: AxisSettings,
}

/// Layout inputs that live outside the configuration.
#[derive(Debug, Clone, Copy)]
pub struct LayoutInputs<'a> {
    pub track_count: usize,
    pub track_labels: &'a [&'a str],
}

pub fn set_canvas_width(container: &dyn HostContainer, config: &mut ChartConfig) {
    config.canvas_width = container.content_width();
}

pub fn calculate_axes_size(config: &mut ChartConfig) {
    config.axis_sizes.x_axis_height = if config.x_axis.show {
        TICK_SIZE_PX + TICK_LABEL_FONT_PX
    } else {
        0.0
    };
}

pub fn calculate_axes_label_size(config: &mut ChartConfig, track_labels: &[&str]) {
    if config.kind == ChartKind::Timeline || !config.show_label || track_labels.is_empty() {
        config.axis_sizes.track_label_width = 0.0;
        return;
    }
    let longest = track_labels
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0);
    let natural = longest as f64 * LABEL_CHAR_WIDTH_PX + TRACK_LABEL_GAP_PX;
    config.axis_sizes.track_label_width = natural.min(config.svg_width() * MAX_TRACK_LABEL_RATIO);
}

/// Rebuilds the Y axis domain from the loaded track keys.
///
/// The X domain stays fixed at the configured limits.
pub fn update_axes_domain<'a>(config: &mut ChartConfig, keys: impl IntoIterator<Item = &'a str>) {
    config.track_domain = keys.into_iter().map(str::to_owned).collect();
}

/// Height of the Y axis band for the current track count.
#[must_use]
pub fn determine_height(config: &ChartConfig, track_count: usize) -> f64 {
    match config.kind {
        ChartKind::Gantt => config.track_height * track_count as f64,
        ChartKind::Timeline => 0.0,
    }
}

pub fn set_canvas_height(config: &mut ChartConfig) {
    config.canvas_height = config.height + (config.padding.top + config.padding.bottom) * 2.0;
}

/// Horizontal pixel extent of the plot area.
#[must_use]
pub fn x_range(config: &ChartConfig) -> (f64, f64) {
    let start = config.padding.left + config.axis_sizes.track_label_width;
    let end = (config.svg_width() - config.padding.right).max(start);
    (start, end)
}

/// Y coordinate of the X axis line.
#[must_use]
pub fn x_axis_offset(config: &ChartConfig) -> f64 {
    config.padding.top + config.height
}

pub fn scale_graph(config: &ChartConfig, track_count: usize) -> ChartResult<Scales> {
    let (start, end) = x_range(config);
    let x = TimeScale::new(
        config.x_axis.domain,
        start,
        end,
        config.settings.should_clamp,
        config.x_axis.range_rounding,
    )?;
    let y = match config.kind {
        ChartKind::Gantt => Some(BandScale::new(
            config.padding.top,
            config.track_height,
            track_count,
        )?),
        ChartKind::Timeline => None,
    };
    Ok(Scales {
        x,
        y,
        settings: config.settings,
    })
}

/// Runs a full layout pass in the required order.
pub fn compute_layout(
    container: &dyn HostContainer,
    config: &mut ChartConfig,
    inputs: LayoutInputs<'_>,
) -> ChartResult<Scales> {
    set_canvas_width(container, config);
    calculate_axes_size(config);
    calculate_axes_label_size(config, inputs.track_labels);
    set_canvas_height(config);
    let scales = scale_graph(config, inputs.track_count)?;
    trace!(
        canvas_width = config.canvas_width,
        canvas_height = config.canvas_height,
        track_label_width = config.axis_sizes.track_label_width,
        "layout pass"
    );
    Ok(scales)
}

/// Ticks for the X axis at the current scale.
pub fn axis_ticks(config: &ChartConfig, scales: &Scales) -> ChartResult<Vec<TimeTick>> {
    let format = config.x_axis.ticks.format.as_deref();
    if !config.x_axis.ticks.values.is_empty() {
        return explicit_time_ticks(
            &config.x_axis.ticks.values,
            config.x_axis.domain,
            format,
            &config.locale,
        );
    }
    let (start, end) = scales.x.range();
    generate_time_ticks(config.x_axis.domain, end - start, format, &config.locale)
}
