use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::locale::validate_date_pattern;
use crate::core::{AxisDomain, AxisType, Locale, Padding};
use crate::error::{ChartError, ChartResult};

use super::legend::initial_shown_targets;
use super::validation::validate;
use super::{ChartInput, DatelineInput, LegendItemInput, LocaleInput, PaddingInput};

/// Width reserved on the right of the canvas when no custom padding is given.
pub const BASE_CANVAS_WIDTH_PADDING: f64 = 50.0;
pub const DEFAULT_RESIZE_THROTTLE: Duration = Duration::from_millis(400);
pub const DEFAULT_TRACK_HEIGHT: f64 = 40.0;
pub const TRANSITION_DURATION: Duration = Duration::from_millis(250);

static NEXT_CLIP_PATH_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique id scoping the drawable region of one chart.
#[must_use]
pub fn generate_clip_path_id() -> String {
    let id = NEXT_CLIP_PATH_ID.fetch_add(1, Ordering::Relaxed);
    format!("tracks-clip-{id}")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    #[default]
    Gantt,
    Timeline,
}

/// Scale behavior derived from the panning mode.
///
/// Panned charts keep out-of-range content unclamped (the clip path hides
/// it) and move without animated transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSettings {
    pub should_clamp: bool,
    pub transition: Option<Duration>,
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self::for_panning(false)
    }
}

impl AxisSettings {
    #[must_use]
    pub fn for_panning(pan_enabled: bool) -> Self {
        if pan_enabled {
            Self {
                should_clamp: false,
                transition: None,
            }
        } else {
            Self {
                should_clamp: true,
                transition: Some(TRANSITION_DURATION),
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicksConfig {
    pub values: Vec<DateTime<Utc>>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XAxisConfig {
    pub axis_type: AxisType,
    pub show: bool,
    pub lower_limit: DateTime<Utc>,
    pub upper_limit: DateTime<Utc>,
    pub ticks: TicksConfig,
    pub domain: AxisDomain,
    pub range_rounding: bool,
}

impl Default for XAxisConfig {
    fn default() -> Self {
        Self {
            axis_type: AxisType::TimeSeries,
            show: true,
            lower_limit: DateTime::<Utc>::default(),
            upper_limit: DateTime::<Utc>::default(),
            ticks: TicksConfig::default(),
            domain: AxisDomain {
                lower: 0.0,
                upper: 0.0,
            },
            range_rounding: true,
        }
    }
}

/// Pixel sizes of axis furniture, recomputed on every layout pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisSizes {
    pub x_axis_height: f64,
    pub track_label_width: f64,
}

/// Canonical chart configuration.
///
/// Built only by `normalize`; it owns copies of everything taken from the
/// consumer input, so later changes to that input never reach the chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub bind_to: String,
    pub bind_legend_to: Option<String>,
    pub clip_path_id: String,
    pub padding: Padding,
    pub locale: Locale,
    pub throttle: Duration,
    pub settings: AxisSettings,
    pub pan_enabled: bool,
    pub show_label: bool,
    pub show_legend: bool,
    pub show_action_legend: bool,
    pub x_axis: XAxisConfig,
    pub action_legend: Vec<LegendItemInput>,
    pub dateline: Vec<DatelineInput>,
    pub track_height: f64,
    /// Legend keys currently shown. Gantt charts seed it from the action
    /// legend; timelines hold the keys of their loaded content.
    pub shown_targets: IndexSet<String>,
    /// Ordered track keys forming the Y axis domain.
    pub track_domain: Vec<String>,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Height of the Y axis band (track rows); zero for timelines.
    pub height: f64,
    pub axis_sizes: AxisSizes,
}

impl ChartConfig {
    /// Width of the `<svg>` element inside the container.
    #[must_use]
    pub fn svg_width(&self) -> f64 {
        if self.padding.has_custom_padding {
            self.canvas_width
        } else {
            (self.canvas_width - BASE_CANVAS_WIDTH_PADDING).max(0.0)
        }
    }
}

/// Validates and normalizes consumer input for one chart kind.
///
/// Normalization is all-or-nothing: any failure returns an error and no
/// partially filled configuration escapes.
pub fn normalize(kind: ChartKind, input: &ChartInput) -> ChartResult<ChartConfig> {
    let input = validate(Some(input))?;
    let x_input = input
        .axis
        .as_ref()
        .and_then(|axis| axis.x.as_ref())
        .ok_or(ChartError::NoAxisInfo)?;

    let domain = AxisDomain::resolve(
        AxisType::TimeSeries,
        x_input.lower_limit.as_ref(),
        x_input.upper_limit.as_ref(),
        &[],
    )?;
    if domain.lower >= domain.upper {
        return Err(ChartError::InvalidData(
            "axis lowerLimit must be earlier than upperLimit".to_owned(),
        ));
    }
    let (lower_limit, upper_limit) = match (
        x_input.lower_limit.as_ref().and_then(|v| v.as_date()),
        x_input.upper_limit.as_ref().and_then(|v| v.as_date()),
    ) {
        (Some(lower), Some(upper)) => (lower, upper),
        _ => return Err(ChartError::InvalidAxisTypeValues),
    };

    let ticks = x_input.ticks.clone().unwrap_or_default();
    if let Some(format) = ticks.format.as_deref() {
        validate_date_pattern(format)?;
    }

    let track_height = input.track_height.unwrap_or(DEFAULT_TRACK_HEIGHT);
    if !track_height.is_finite() || track_height <= 0.0 {
        return Err(ChartError::InvalidData(
            "trackHeight must be finite and > 0".to_owned(),
        ));
    }

    let pan_enabled = input.pan.is_some_and(|pan| pan.enabled);
    let show_action_legend = input
        .show_action_legend
        .unwrap_or(!input.action_legend.is_empty());
    let shown_targets = if kind == ChartKind::Gantt && show_action_legend {
        initial_shown_targets(&input.action_legend)
    } else {
        IndexSet::new()
    };

    let config = ChartConfig {
        kind,
        bind_to: input.bind_to.clone().unwrap_or_default(),
        bind_legend_to: input.bind_legend_to.clone(),
        clip_path_id: generate_clip_path_id(),
        padding: resolve_padding(input.padding)?,
        locale: resolve_locale(input.locale.as_ref())?,
        throttle: input
            .throttle
            .map_or(DEFAULT_RESIZE_THROTTLE, Duration::from_millis),
        settings: AxisSettings::for_panning(pan_enabled),
        pan_enabled,
        show_label: input.show_label.unwrap_or(true),
        show_legend: input.show_legend.unwrap_or(true),
        show_action_legend,
        x_axis: XAxisConfig {
            axis_type: AxisType::TimeSeries,
            show: true,
            lower_limit,
            upper_limit,
            ticks: TicksConfig {
                values: ticks.values,
                format: ticks.format,
            },
            domain,
            range_rounding: x_input.range_rounding.unwrap_or(true),
        },
        action_legend: input.action_legend.clone(),
        dateline: input.dateline.clone(),
        track_height,
        shown_targets,
        track_domain: Vec::new(),
        canvas_width: 0.0,
        canvas_height: 0.0,
        height: 0.0,
        axis_sizes: AxisSizes::default(),
    };
    debug!(
        kind = ?config.kind,
        clip_path_id = %config.clip_path_id,
        pan_enabled,
        "normalized chart config"
    );
    Ok(config)
}

fn resolve_padding(input: Option<PaddingInput>) -> ChartResult<Padding> {
    let Some(input) = input else {
        return Ok(Padding::DEFAULT);
    };
    Padding {
        top: input.top.unwrap_or(Padding::DEFAULT.top),
        bottom: input.bottom.unwrap_or(Padding::DEFAULT.bottom),
        left: input.left.unwrap_or(Padding::DEFAULT.left),
        right: input.right.unwrap_or(Padding::DEFAULT.right),
        has_custom_padding: true,
    }
    .validate()
}

fn resolve_locale(input: Option<&LocaleInput>) -> ChartResult<Locale> {
    let mut locale = Locale::default();
    let Some(input) = input else {
        return Ok(locale);
    };
    if let Some(name) = &input.name {
        locale.name.clone_from(name);
    }
    if let Some(months) = &input.months {
        locale.months.clone_from(months);
    }
    if let Some(short_months) = &input.short_months {
        locale.short_months.clone_from(short_months);
    }
    locale.validate()
}

#[cfg(test)]
mod tests {
    use super::{
        AxisSettings, BASE_CANVAS_WIDTH_PADDING, ChartKind, DEFAULT_RESIZE_THROTTLE,
        TRANSITION_DURATION, normalize,
    };
    use crate::api::{ChartInput, LegendItemInput, LocaleInput, PaddingInput, TicksInput};
    use crate::core::Padding;
    use crate::error::ChartError;
    use chrono::{TimeZone, Utc};

    fn input() -> ChartInput {
        ChartInput::time_series(
            "#chart",
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2023, 1, 31, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn defaults_are_applied() {
        let config = normalize(ChartKind::Gantt, &input()).unwrap();
        assert_eq!(config.padding, Padding::DEFAULT);
        assert_eq!(config.throttle, DEFAULT_RESIZE_THROTTLE);
        assert_eq!(config.locale.name, "en-US");
        assert!(config.show_label && config.show_legend);
        assert!(!config.show_action_legend);
        assert!(config.x_axis.range_rounding);
        assert!(config.shown_targets.is_empty());
        assert_eq!(config.settings, AxisSettings::for_panning(false));
        assert_eq!(config.settings.transition, Some(TRANSITION_DURATION));
    }

    #[test]
    fn partial_custom_padding_is_filled_and_flagged() {
        let input = input().with_padding(PaddingInput {
            top: Some(0.0),
            ..PaddingInput::default()
        });
        let config = normalize(ChartKind::Gantt, &input).unwrap();
        assert!(config.padding.has_custom_padding);
        assert_eq!(config.padding.top, 0.0);
        assert_eq!(config.padding.right, Padding::DEFAULT.right);
    }

    #[test]
    fn svg_width_reserves_base_padding_only_without_custom_padding() {
        let mut config = normalize(ChartKind::Gantt, &input()).unwrap();
        config.canvas_width = 800.0;
        assert_eq!(config.svg_width(), 800.0 - BASE_CANVAS_WIDTH_PADDING);
        config.padding.has_custom_padding = true;
        assert_eq!(config.svg_width(), 800.0);
    }

    #[test]
    fn panning_disables_clamp_and_transition() {
        let config = normalize(ChartKind::Timeline, &input().with_pan_enabled(true)).unwrap();
        assert!(!config.settings.should_clamp);
        assert_eq!(config.settings.transition, None);
    }

    #[test]
    fn clip_path_ids_are_unique_per_instance() {
        let a = normalize(ChartKind::Gantt, &input()).unwrap();
        let b = normalize(ChartKind::Gantt, &input()).unwrap();
        assert_ne!(a.clip_path_id, b.clip_path_id);
    }

    #[test]
    fn action_legend_seeds_shown_targets_in_order() {
        let input = input().with_action_legend(vec![
            LegendItemInput::new("b", "Bravo"),
            LegendItemInput::new("a", "Alpha"),
        ]);
        let config = normalize(ChartKind::Gantt, &input).unwrap();
        assert!(config.show_action_legend);
        let keys: Vec<_> = config.shown_targets.iter().cloned().collect();
        assert_eq!(keys, vec!["b".to_owned(), "a".to_owned()]);

        let timeline = normalize(ChartKind::Timeline, &input).unwrap();
        assert!(timeline.shown_targets.is_empty());
    }

    #[test]
    fn config_is_independent_of_input() {
        let mut input = input().with_action_legend(vec![LegendItemInput::new("a", "Alpha")]);
        let config = normalize(ChartKind::Gantt, &input).unwrap();
        input.action_legend[0].label.display = "changed".to_owned();
        input.bind_to = Some("#other".to_owned());
        assert_eq!(config.action_legend[0].label.display, "Alpha");
        assert_eq!(config.bind_to, "#chart");
    }

    #[test]
    fn inverted_limits_are_rejected() {
        let input = ChartInput::time_series(
            "#chart",
            Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        );
        assert!(matches!(
            normalize(ChartKind::Gantt, &input),
            Err(ChartError::InvalidData(_))
        ));
    }

    #[test]
    fn bad_tick_format_and_track_height_are_rejected() {
        let mut bad_ticks = input();
        if let Some(x) = bad_ticks.axis.as_mut().and_then(|axis| axis.x.as_mut()) {
            x.ticks = Some(TicksInput {
                values: Vec::new(),
                format: Some("%Q".to_owned()),
            });
        }
        assert!(normalize(ChartKind::Gantt, &bad_ticks).is_err());
        assert!(normalize(ChartKind::Gantt, &input().with_track_height(0.0)).is_err());
    }

    #[test]
    fn locale_overrides_are_validated() {
        let short = LocaleInput {
            name: Some("xx".to_owned()),
            short_months: Some(vec!["a".to_owned()]),
            ..LocaleInput::default()
        };
        assert!(normalize(ChartKind::Gantt, &input().with_locale(short)).is_err());
    }

    #[test]
    fn validation_failure_aborts_normalization() {
        let mut input = input();
        input.bind_to = None;
        assert_eq!(
            normalize(ChartKind::Gantt, &input).unwrap_err(),
            ChartError::NoBindTarget
        );
    }
}
