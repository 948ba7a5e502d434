use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::primitives::datetime_to_unix_millis;
use crate::error::{ChartError, ChartResult};

/// Canvas padding in pixels.
///
/// `has_custom_padding` records whether the consumer supplied the values,
/// which changes how the outer SVG width is derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
    pub has_custom_padding: bool,
}

impl Padding {
    pub const DEFAULT: Self = Self {
        top: 10.0,
        bottom: 5.0,
        left: 30.0,
        right: 50.0,
        has_custom_padding: false,
    };

    pub fn validate(self) -> ChartResult<Self> {
        for (name, value) in [
            ("top", self.top),
            ("bottom", self.bottom),
            ("left", self.left),
            ("right", self.right),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "padding `{name}` must be finite and >= 0"
                )));
            }
        }
        Ok(self)
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisType {
    TimeSeries,
    Numeric,
}

/// Raw axis limit as supplied by a consumer.
///
/// Untagged so that JSON input maps naturally: RFC 3339 timestamps become
/// `Date`, numbers become `Number` and every other string stays `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    Date(DateTime<Utc>),
    Number(f64),
    Text(String),
}

impl AxisValue {
    #[must_use]
    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// Blank strings count as absent limits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }

    #[must_use]
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(date) => Some(*date),
            _ => None,
        }
    }

    /// Position of the value on a continuous axis.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Date(date) => Some(datetime_to_unix_millis(*date)),
            Self::Number(value) if value.is_finite() => Some(*value),
            _ => None,
        }
    }
}

impl From<DateTime<Utc>> for AxisValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<f64> for AxisValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for AxisValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Lower/upper data bounds of an axis in continuous units
/// (milliseconds since the epoch for time-series axes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisDomain {
    pub lower: f64,
    pub upper: f64,
}

impl AxisDomain {
    pub fn new(lower: f64, upper: f64) -> ChartResult<Self> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(ChartError::InvalidData(
                "axis domain must be finite".to_owned(),
            ));
        }
        Ok(Self { lower, upper })
    }

    /// Resolves the domain for an axis kind.
    ///
    /// Time-series axes take the limits as provided and require both.
    /// Numeric axes fall back to the data extents for any missing limit.
    pub fn resolve(
        axis_type: AxisType,
        lower: Option<&AxisValue>,
        upper: Option<&AxisValue>,
        extents: &[f64],
    ) -> ChartResult<Self> {
        match axis_type {
            AxisType::TimeSeries => {
                let lower = lower.and_then(AxisValue::as_date);
                let upper = upper.and_then(AxisValue::as_date);
                match (lower, upper) {
                    (Some(lower), Some(upper)) => Self::new(
                        datetime_to_unix_millis(lower),
                        datetime_to_unix_millis(upper),
                    ),
                    _ => Err(ChartError::InvalidAxisTypeValues),
                }
            }
            AxisType::Numeric => {
                let min = extents
                    .iter()
                    .copied()
                    .filter(|value| value.is_finite())
                    .map(ordered_float::OrderedFloat)
                    .min()
                    .map(|value| value.0);
                let max = extents
                    .iter()
                    .copied()
                    .filter(|value| value.is_finite())
                    .map(ordered_float::OrderedFloat)
                    .max()
                    .map(|value| value.0);
                let lower = lower.and_then(AxisValue::as_f64).or(min);
                let upper = upper.and_then(AxisValue::as_f64).or(max);
                match (lower, upper) {
                    (Some(lower), Some(upper)) => Self::new(lower, upper),
                    _ => Err(ChartError::NoAxisLimitInfo),
                }
            }
        }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.upper - self.lower
    }
}
