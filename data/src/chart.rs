pub mod kline;

pub use kline::{Kline, Timeframe};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A position in the domain the candle data lives in.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ChartPoint {
    pub time: DateTime<Utc>,
    pub price: f64,
}

impl ChartPoint {
    pub fn new(time: DateTime<Utc>, price: f64) -> Self {
        Self { time, price }
    }

    /// Halfway point in both time and price.
    pub fn midpoint(self, other: ChartPoint) -> ChartPoint {
        ChartPoint {
            time: self.time + (other.time - self.time) / 2,
            price: (self.price + other.price) / 2.0,
        }
    }
}

/// Converts a duration to fractional seconds at microsecond resolution.
pub fn duration_secs(duration: Duration) -> f64 {
    match duration.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => duration.num_milliseconds() as f64 / 1_000.0,
    }
}

/// Builds a duration from fractional seconds, rounded to the microsecond.
///
/// Non-finite input yields a zero duration.
pub fn secs_duration(secs: f64) -> Duration {
    if !secs.is_finite() {
        return Duration::zero();
    }

    let micros = (secs * 1_000_000.0).round();
    if micros.abs() >= i64::MAX as f64 {
        return Duration::zero();
    }

    Duration::microseconds(micros as i64)
}

/// Shifts `time` by `delta`, saturating at the ends of the representable range.
pub fn shift_time(time: DateTime<Utc>, delta: Duration) -> DateTime<Utc> {
    time.checked_add_signed(delta).unwrap_or(if delta < Duration::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

/// `time` plus fractional seconds, see [`shift_time`].
pub fn offset_time(time: DateTime<Utc>, secs: f64) -> DateTime<Utc> {
    shift_time(time, secs_duration(secs))
}

/// Millisecond unix timestamp to UTC time, saturating at the epoch for out of range input.
pub fn millis_to_time(millis: u64) -> DateTime<Utc> {
    i64::try_from(millis)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .unwrap_or_default()
}

pub fn time_to_millis(time: DateTime<Utc>) -> u64 {
    u64::try_from(time.timestamp_millis()).unwrap_or(0)
}
