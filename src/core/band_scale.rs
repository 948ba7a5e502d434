use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Row scale for Gantt tracks: track index → top edge of its lane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    origin: f64,
    band_height: f64,
    band_count: usize,
}

impl BandScale {
    pub fn new(origin: f64, band_height: f64, band_count: usize) -> ChartResult<Self> {
        if !origin.is_finite() {
            return Err(ChartError::InvalidData(
                "band origin must be finite".to_owned(),
            ));
        }
        if !band_height.is_finite() || band_height <= 0.0 {
            return Err(ChartError::InvalidData(
                "band height must be finite and > 0".to_owned(),
            ));
        }
        Ok(Self {
            origin,
            band_height,
            band_count,
        })
    }

    #[must_use]
    pub fn band_height(self) -> f64 {
        self.band_height
    }

    #[must_use]
    pub fn band_count(self) -> usize {
        self.band_count
    }

    /// Pixel extent covered by all bands.
    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (
            self.origin,
            self.origin + self.band_height * self.band_count as f64,
        )
    }

    #[must_use]
    pub fn band_top(self, index: usize) -> f64 {
        self.origin + self.band_height * index as f64
    }

    #[must_use]
    pub fn band_center(self, index: usize) -> f64 {
        self.band_top(index) + self.band_height / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::BandScale;

    #[test]
    fn bands_stack_from_origin() {
        let scale = BandScale::new(10.0, 40.0, 3).unwrap();
        assert_eq!(scale.band_top(0), 10.0);
        assert_eq!(scale.band_top(2), 90.0);
        assert_eq!(scale.band_center(1), 70.0);
        assert_eq!(scale.range(), (10.0, 130.0));
    }

    #[test]
    fn zero_height_is_rejected() {
        assert!(BandScale::new(0.0, 0.0, 1).is_err());
    }
}
