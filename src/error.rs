use thiserror::Error;

use crate::api::ChartId;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("no data provided: chart input is missing or empty")]
    NoData,

    #[error("invalid input: `bindTo` must reference a host container")]
    NoBindTarget,

    #[error("invalid input: axis information is missing (`axis` and `axis.x` are required)")]
    NoAxisInfo,

    #[error("invalid input: `axis.x.lowerLimit` and `axis.x.upperLimit` are required")]
    NoAxisLimitInfo,

    #[error("invalid input: axis limits must be date values for a time-series axis")]
    InvalidAxisTypeValues,

    #[error("invalid object provided: no loaded content with key `{key}`")]
    InvalidObjectProvided { key: String },

    #[error("content with key `{key}` is already loaded")]
    DuplicateContentKey { key: String },

    #[error("invalid content: {0}")]
    InvalidContent(String),

    #[error("chart instance has been destroyed")]
    Destroyed,

    #[error("unknown chart instance: {0}")]
    UnknownChart(ChartId),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl ChartError {
    /// Stable, upper-snake identifier for the error condition.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoData => "NO_DATA",
            Self::NoBindTarget => "NO_BIND_TARGET",
            Self::NoAxisInfo => "NO_AXIS_INFO",
            Self::NoAxisLimitInfo => "NO_AXIS_LIMIT_INFO",
            Self::InvalidAxisTypeValues => "INVALID_AXIS_TYPE_VALUES",
            Self::InvalidObjectProvided { .. } => "INVALID_OBJECT_PROVIDED",
            Self::DuplicateContentKey { .. } => "DUPLICATE_CONTENT_KEY",
            Self::InvalidContent(_) => "INVALID_CONTENT",
            Self::Destroyed => "DESTROYED",
            Self::UnknownChart(_) => "UNKNOWN_CHART",
            Self::InvalidData(_) => "INVALID_DATA",
        }
    }
}
