use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Continuous domain → pixel range mapping.
///
/// `clamp` pins out-of-domain values to the range edges; panned charts turn
/// it off so content slides past the edges and gets clipped instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
    clamp: bool,
    round: bool,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start: 0.0,
            range_end: 1.0,
            clamp: false,
            round: false,
        })
    }

    pub fn with_range(mut self, range_start: f64, range_end: f64) -> ChartResult<Self> {
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }
        self.range_start = range_start;
        self.range_end = range_end;
        Ok(self)
    }

    #[must_use]
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Rounds projected pixels to whole numbers.
    #[must_use]
    pub fn with_rounding(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn is_clamped(self) -> bool {
        self.clamp
    }

    pub fn domain_to_pixel(self, value: f64) -> ChartResult<f64> {
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        let mut normalized = (value - self.domain_start) / span;
        if self.clamp {
            normalized = normalized.clamp(0.0, 1.0);
        }
        let pixel = self.range_start + normalized * (self.range_end - self.range_start);
        Ok(if self.round { pixel.round() } else { pixel })
    }

    pub fn pixel_to_domain(self, pixel: f64) -> ChartResult<f64> {
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }

        let range_span = self.range_end - self.range_start;
        if range_span == 0.0 {
            return Ok(self.domain_start);
        }
        let mut normalized = (pixel - self.range_start) / range_span;
        if self.clamp {
            normalized = normalized.clamp(0.0, 1.0);
        }
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }
}
