use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::AxisValue;

/// Consumer-supplied chart description, shared by Gantt and Timeline.
///
/// Every field is optional at this level; `validation::validate` decides
/// which ones are required before normalization runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartInput {
    pub bind_to: Option<String>,
    pub bind_legend_to: Option<String>,
    pub axis: Option<AxisInput>,
    pub padding: Option<PaddingInput>,
    pub locale: Option<LocaleInput>,
    /// Resize throttle interval in milliseconds.
    pub throttle: Option<u64>,
    pub show_label: Option<bool>,
    pub show_legend: Option<bool>,
    pub show_action_legend: Option<bool>,
    #[serde(default)]
    pub action_legend: Vec<LegendItemInput>,
    #[serde(default)]
    pub dateline: Vec<DatelineInput>,
    pub pan: Option<PanInput>,
    pub track_height: Option<f64>,
}

impl ChartInput {
    /// Minimal input for a time-series chart bound to `bind_to`.
    #[must_use]
    pub fn time_series(
        bind_to: impl Into<String>,
        lower_limit: DateTime<Utc>,
        upper_limit: DateTime<Utc>,
    ) -> Self {
        Self {
            bind_to: Some(bind_to.into()),
            axis: Some(AxisInput {
                x: Some(XAxisInput::new(lower_limit, upper_limit)),
            }),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    #[must_use]
    pub fn with_padding(mut self, padding: PaddingInput) -> Self {
        self.padding = Some(padding);
        self
    }

    #[must_use]
    pub fn with_throttle_ms(mut self, throttle: u64) -> Self {
        self.throttle = Some(throttle);
        self
    }

    #[must_use]
    pub fn with_pan_enabled(mut self, enabled: bool) -> Self {
        self.pan = Some(PanInput { enabled });
        self
    }

    #[must_use]
    pub fn with_action_legend(mut self, items: Vec<LegendItemInput>) -> Self {
        self.action_legend = items;
        self
    }

    #[must_use]
    pub fn with_dateline(mut self, dateline: DatelineInput) -> Self {
        self.dateline.push(dateline);
        self
    }

    #[must_use]
    pub fn with_track_height(mut self, track_height: f64) -> Self {
        self.track_height = Some(track_height);
        self
    }

    #[must_use]
    pub fn with_show_label(mut self, show_label: bool) -> Self {
        self.show_label = Some(show_label);
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: LocaleInput) -> Self {
        self.locale = Some(locale);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisInput {
    pub x: Option<XAxisInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XAxisInput {
    pub lower_limit: Option<AxisValue>,
    pub upper_limit: Option<AxisValue>,
    pub ticks: Option<TicksInput>,
    pub range_rounding: Option<bool>,
}

impl XAxisInput {
    #[must_use]
    pub fn new(lower_limit: DateTime<Utc>, upper_limit: DateTime<Utc>) -> Self {
        Self {
            lower_limit: Some(AxisValue::Date(lower_limit)),
            upper_limit: Some(AxisValue::Date(upper_limit)),
            ticks: None,
            range_rounding: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicksInput {
    #[serde(default)]
    pub values: Vec<DateTime<Utc>>,
    /// strftime pattern; `%b`/`%B` use the locale's month names.
    pub format: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PaddingInput {
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleInput {
    pub name: Option<String>,
    pub months: Option<Vec<String>>,
    pub short_months: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub display: String,
}

impl Label {
    #[must_use]
    pub fn new(display: impl Into<String>) -> Self {
        Self {
            display: display.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendItemInput {
    pub key: String,
    #[serde(default)]
    pub label: Label,
}

impl LegendItemInput {
    #[must_use]
    pub fn new(key: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: Label::new(display),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatelineInput {
    pub value: DateTime<Utc>,
    #[serde(default)]
    pub label: Label,
    #[serde(default = "default_show_dateline")]
    pub show_dateline: bool,
}

impl DatelineInput {
    #[must_use]
    pub fn new(value: DateTime<Utc>, display: impl Into<String>) -> Self {
        Self {
            value,
            label: Label::new(display),
            show_dateline: true,
        }
    }
}

fn default_show_dateline() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanInput {
    #[serde(default)]
    pub enabled: bool,
}

/// Identifier of one loaded content item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentKey(String);

impl ContentKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ContentKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One Gantt track: a labelled row holding tasks and actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttContent {
    pub key: String,
    #[serde(default)]
    pub track_label: Label,
    /// Explicit row position; clamped to the current track count.
    pub load_at_index: Option<usize>,
    #[serde(default)]
    pub tasks: Vec<TaskInput>,
    #[serde(default)]
    pub actions: Vec<ActionInput>,
}

impl GanttContent {
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            track_label: Label::new(label),
            load_at_index: None,
            tasks: Vec::new(),
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn at_index(mut self, index: usize) -> Self {
        self.load_at_index = Some(index);
        self
    }

    #[must_use]
    pub fn with_task(mut self, task: TaskInput) -> Self {
        self.tasks.push(task);
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: ActionInput) -> Self {
        self.actions.push(action);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub key: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Completion in percent, drawn as a progress overlay.
    pub percentage: Option<f64>,
}

impl TaskInput {
    #[must_use]
    pub fn new(key: impl Into<String>, start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            start_date,
            end_date,
            percentage: None,
        }
    }

    #[must_use]
    pub fn with_percentage(mut self, percentage: f64) -> Self {
        self.percentage = Some(percentage);
        self
    }
}

/// Point markers on a track; `key` refers to an action legend item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionInput {
    pub key: String,
    #[serde(default)]
    pub values: Vec<DateTime<Utc>>,
}

impl ActionInput {
    #[must_use]
    pub fn new(key: impl Into<String>, values: Vec<DateTime<Utc>>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineContent {
    pub key: String,
    pub label: Option<Label>,
    #[serde(default)]
    pub values: Vec<TimelineValue>,
}

impl TimelineContent {
    #[must_use]
    pub fn new(key: impl Into<String>, values: Vec<DateTime<Utc>>) -> Self {
        Self {
            key: key.into(),
            label: None,
            values: values.into_iter().map(|x| TimelineValue { x }).collect(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, display: impl Into<String>) -> Self {
        self.label = Some(Label::new(display));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineValue {
    pub x: DateTime<Utc>,
}

/// A single item or a batch, accepted uniformly by load/unload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(value: Vec<T>) -> Self {
        Self::Many(value)
    }
}

impl From<GanttContent> for OneOrMany<GanttContent> {
    fn from(value: GanttContent) -> Self {
        Self::One(value)
    }
}

impl From<TimelineContent> for OneOrMany<TimelineContent> {
    fn from(value: TimelineContent) -> Self {
        Self::One(value)
    }
}

impl From<ContentKey> for OneOrMany<ContentKey> {
    fn from(value: ContentKey) -> Self {
        Self::One(value)
    }
}

impl From<&str> for OneOrMany<ContentKey> {
    fn from(value: &str) -> Self {
        Self::One(ContentKey::from(value))
    }
}

impl From<&GanttContent> for OneOrMany<ContentKey> {
    fn from(value: &GanttContent) -> Self {
        Self::One(ContentKey::new(value.key.clone()))
    }
}

impl From<&TimelineContent> for OneOrMany<ContentKey> {
    fn from(value: &TimelineContent) -> Self {
        Self::One(ContentKey::new(value.key.clone()))
    }
}
