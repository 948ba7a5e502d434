//! Public chart surface: consumer input, configuration, layout and the
//! Gantt and Timeline instances built on top of them.

mod canvas;
mod config;
mod dateline;
mod events;
mod gantt;
mod gantt_track;
mod input;
mod json_contract;
mod layout;
mod legend;
mod registry;
mod throttle;
mod timeline;
mod timeline_content;
mod tracks;
mod validation;

pub use canvas::CanvasHandles;
pub use config::{
    AxisSettings, AxisSizes, BASE_CANVAS_WIDTH_PADDING, ChartConfig, ChartKind,
    DEFAULT_RESIZE_THROTTLE, DEFAULT_TRACK_HEIGHT, TRANSITION_DURATION, TicksConfig, XAxisConfig,
    generate_clip_path_id, normalize,
};
pub use dateline::{DATELINE_CLASS, visible_datelines};
pub use events::EventBinding;
pub use gantt::Gantt;
pub use gantt_track::{ACTION_CLASS, TASK_CLASS, TRACK_CLASS, TRACK_LABEL_CLASS, TrackController};
pub use input::{
    ActionInput, AxisInput, ChartInput, ContentKey, DatelineInput, GanttContent, Label,
    LegendItemInput, LocaleInput, OneOrMany, PaddingInput, PanInput, TaskInput, TicksInput,
    TimelineContent, TimelineValue, XAxisInput,
};
pub use json_contract::{
    CHART_SNAPSHOT_JSON_SCHEMA_V1, ChartSnapshot, ChartSnapshotJsonContractV1, ContentKeyRef,
    parse_content_keys,
};
pub use layout::{
    LayoutInputs, MAX_TRACK_LABEL_RATIO, Scales, compute_layout, determine_height, x_range,
};
pub use legend::{initial_shown_targets, toggle_target};
pub use registry::{ChartId, ChartInstance, ChartRegistry};
pub use throttle::ResizeThrottle;
pub use timeline::Timeline;
pub use timeline_content::{TIMELINE_LABEL_CLASS, TIMELINE_POINT_CLASS, TimelineContentController};
pub use tracks::{TrackCollection, prepare_load_at_index};
pub use validation::validate;
