use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::LinearScale;
use crate::core::primitives::{datetime_to_unix_millis, unix_millis_to_datetime};
use crate::core::types::AxisDomain;
use crate::error::{ChartError, ChartResult};

/// Date axis scale mapping `[lower, upper]` onto a horizontal pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    linear: LinearScale,
}

impl TimeScale {
    /// Builds a scale over `domain`, projected onto `[range_start, range_end]`.
    pub fn new(
        domain: AxisDomain,
        range_start: f64,
        range_end: f64,
        clamp: bool,
        round: bool,
    ) -> ChartResult<Self> {
        if domain.lower > domain.upper {
            return Err(ChartError::InvalidData(
                "time domain lower bound must not exceed upper bound".to_owned(),
            ));
        }
        let linear = LinearScale::new(domain.lower, domain.upper)?
            .with_range(range_start, range_end)?
            .with_clamp(clamp)
            .with_rounding(round);
        Ok(Self { linear })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.linear.domain()
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.linear.range()
    }

    #[must_use]
    pub fn is_clamped(self) -> bool {
        self.linear.is_clamped()
    }

    pub fn time_to_pixel(self, time: DateTime<Utc>) -> ChartResult<f64> {
        self.millis_to_pixel(datetime_to_unix_millis(time))
    }

    pub fn millis_to_pixel(self, millis: f64) -> ChartResult<f64> {
        self.linear.domain_to_pixel(millis)
    }

    pub fn pixel_to_time(self, pixel: f64) -> ChartResult<DateTime<Utc>> {
        unix_millis_to_datetime(self.linear.pixel_to_domain(pixel)?)
    }
}
