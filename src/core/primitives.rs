use chrono::{DateTime, TimeZone, Utc};

use crate::error::{ChartError, ChartResult};

#[must_use]
pub fn datetime_to_unix_millis(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64
}

pub fn unix_millis_to_datetime(millis: f64) -> ChartResult<DateTime<Utc>> {
    if !millis.is_finite() {
        return Err(ChartError::InvalidData(
            "timestamp must be finite".to_owned(),
        ));
    }
    Utc.timestamp_millis_opt(millis.round() as i64)
        .single()
        .ok_or_else(|| ChartError::InvalidData(format!("timestamp {millis} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::{datetime_to_unix_millis, unix_millis_to_datetime};
    use chrono::{TimeZone, Utc};

    #[test]
    fn millis_conversion_is_lossless_for_whole_milliseconds() {
        let time = Utc.with_ymd_and_hms(2023, 1, 31, 12, 30, 0).unwrap();
        let millis = datetime_to_unix_millis(time);
        assert_eq!(unix_millis_to_datetime(millis).unwrap(), time);
    }

    #[test]
    fn non_finite_millis_are_rejected() {
        assert!(unix_millis_to_datetime(f64::NAN).is_err());
    }
}
