use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::core::locale::Locale;
use crate::core::primitives::unix_millis_to_datetime;
use crate::core::types::AxisDomain;
use crate::error::ChartResult;

pub const TIME_TICK_TARGET_SPACING_PX: f64 = 100.0;
const MIN_TICKS: usize = 2;
const MAX_TICKS: usize = 24;

const SECOND: f64 = 1_000.0;
const MINUTE: f64 = 60.0 * SECOND;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;
// Shortest calendar month and year; tick counts are bounded against these.
const MONTH: f64 = 28.0 * DAY;
const YEAR: f64 = 365.0 * DAY;

/// Candidate tick steps, finest first. Months and years follow the
/// calendar rather than a fixed millisecond length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeTickInterval {
    Seconds(u32),
    Minutes(u32),
    Hours(u32),
    Days(u32),
    Months(u32),
    Years(u32),
}

const INTERVALS: [TimeTickInterval; 20] = [
    TimeTickInterval::Seconds(1),
    TimeTickInterval::Seconds(5),
    TimeTickInterval::Seconds(15),
    TimeTickInterval::Seconds(30),
    TimeTickInterval::Minutes(1),
    TimeTickInterval::Minutes(5),
    TimeTickInterval::Minutes(15),
    TimeTickInterval::Minutes(30),
    TimeTickInterval::Hours(1),
    TimeTickInterval::Hours(3),
    TimeTickInterval::Hours(6),
    TimeTickInterval::Hours(12),
    TimeTickInterval::Days(1),
    TimeTickInterval::Days(2),
    TimeTickInterval::Days(7),
    TimeTickInterval::Days(14),
    TimeTickInterval::Months(1),
    TimeTickInterval::Months(3),
    TimeTickInterval::Months(6),
    TimeTickInterval::Years(1),
];

impl TimeTickInterval {
    /// Shortest length of one step in milliseconds.
    #[must_use]
    pub fn millis(self) -> f64 {
        match self {
            Self::Seconds(n) => f64::from(n) * SECOND,
            Self::Minutes(n) => f64::from(n) * MINUTE,
            Self::Hours(n) => f64::from(n) * HOUR,
            Self::Days(n) => f64::from(n) * DAY,
            Self::Months(n) => f64::from(n) * MONTH,
            Self::Years(n) => f64::from(n) * YEAR,
        }
    }

    #[must_use]
    pub fn default_format(self) -> &'static str {
        match self {
            Self::Seconds(_) => "%H:%M:%S",
            Self::Minutes(_) | Self::Hours(_) => "%H:%M",
            Self::Days(_) => "%b %d",
            Self::Months(_) => "%b %Y",
            Self::Years(_) => "%Y",
        }
    }

    /// Finest interval that yields at most `target_count` ticks over
    /// `span_millis`. Spans too long for the table step up through
    /// 1-2-5 multiples of years.
    #[must_use]
    pub fn for_span(span_millis: f64, target_count: usize) -> Self {
        let target = target_count.max(1) as f64;
        let fits = |interval: &TimeTickInterval| span_millis / interval.millis() < target;
        if let Some(interval) = INTERVALS.iter().copied().find(fits) {
            return interval;
        }
        let mut magnitude: u32 = 1;
        loop {
            for multiple in [1, 2, 5] {
                let Some(years) = magnitude.checked_mul(multiple) else {
                    return Self::Years(u32::MAX);
                };
                if fits(&Self::Years(years)) {
                    return Self::Years(years);
                }
            }
            let Some(next) = magnitude.checked_mul(10) else {
                return Self::Years(u32::MAX);
            };
            magnitude = next;
        }
    }

    fn calendar_months(self) -> Option<i64> {
        match self {
            Self::Months(n) => Some(i64::from(n)),
            Self::Years(n) => Some(i64::from(n) * 12),
            Self::Seconds(_) | Self::Minutes(_) | Self::Hours(_) | Self::Days(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeTick {
    pub time: DateTime<Utc>,
    pub label: String,
}

#[must_use]
pub fn tick_target_count(axis_span_px: f64) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return MIN_TICKS;
    }
    let raw = (axis_span_px / TIME_TICK_TARGET_SPACING_PX).floor() as usize + 1;
    raw.clamp(MIN_TICKS, MAX_TICKS)
}

/// Generates ticks aligned to multiples of a "nice" interval.
///
/// The tick count follows the available pixel span, so a narrower canvas
/// yields a coarser interval. It never exceeds the target count for that
/// span.
pub fn generate_time_ticks(
    domain: AxisDomain,
    axis_span_px: f64,
    format: Option<&str>,
    locale: &Locale,
) -> ChartResult<Vec<TimeTick>> {
    let span = domain.span();
    if span <= 0.0 {
        return Ok(Vec::new());
    }
    let interval = TimeTickInterval::for_span(span, tick_target_count(axis_span_px));
    let pattern = format.unwrap_or(interval.default_format());
    let times = match interval.calendar_months() {
        Some(months) => calendar_tick_times(domain, months)?,
        None => fixed_tick_times(domain, interval.millis())?,
    };
    times
        .into_iter()
        .map(|time| {
            Ok(TimeTick {
                time,
                label: locale.format_date(time, pattern)?,
            })
        })
        .collect()
}

fn fixed_tick_times(domain: AxisDomain, step: f64) -> ChartResult<Vec<DateTime<Utc>>> {
    let mut times = Vec::new();
    let mut cursor = (domain.lower / step).ceil() * step;
    while cursor <= domain.upper {
        times.push(unix_millis_to_datetime(cursor)?);
        cursor += step;
    }
    Ok(times)
}

/// First-of-month ticks every `step` months, aligned so yearly steps land
/// on years divisible by the step.
fn calendar_tick_times(domain: AxisDomain, step: i64) -> ChartResult<Vec<DateTime<Utc>>> {
    let lower = unix_millis_to_datetime(domain.lower)?;
    let mut month = i64::from(lower.year()) * 12 + i64::from(lower.month0());
    if month_start(month) != Some(lower) {
        month += 1;
    }
    month = (month + step - 1).div_euclid(step) * step;

    let mut times = Vec::new();
    while let Some(time) = month_start(month) {
        if time.timestamp_millis() as f64 > domain.upper {
            break;
        }
        times.push(time);
        month += step;
    }
    Ok(times)
}

fn month_start(month: i64) -> Option<DateTime<Utc>> {
    let year = i32::try_from(month.div_euclid(12)).ok()?;
    let month0 = u32::try_from(month.rem_euclid(12)).ok()?;
    Utc.with_ymd_and_hms(year, month0 + 1, 1, 0, 0, 0).single()
}

/// Formats consumer-provided tick values, keeping those inside the domain.
pub fn explicit_time_ticks(
    values: &[DateTime<Utc>],
    domain: AxisDomain,
    format: Option<&str>,
    locale: &Locale,
) -> ChartResult<Vec<TimeTick>> {
    let pattern = format.unwrap_or("%b %d");
    values
        .iter()
        .copied()
        .filter(|time| {
            let millis = time.timestamp_millis() as f64;
            millis >= domain.lower && millis <= domain.upper
        })
        .map(|time| {
            Ok(TimeTick {
                time,
                label: locale.format_date(time, pattern)?,
            })
        })
        .collect()
}
