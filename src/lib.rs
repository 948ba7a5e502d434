//! tracks-rs: Gantt and Timeline charting core.
//!
//! Charts keep a retained scene graph that is laid out against a live host
//! container and exported through a [`render::Renderer`] backend, such as
//! the bundled SVG renderer.

pub mod api;
pub mod core;
pub mod error;
pub mod host;
pub mod render;
pub mod telemetry;

pub use api::{
    ChartConfig, ChartId, ChartInput, ChartKind, ChartRegistry, ContentKey, Gantt, GanttContent,
    Timeline, TimelineContent,
};
pub use error::{ChartError, ChartResult};
pub use host::{FixedContainer, HostContainer};
