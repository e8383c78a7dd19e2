//! Tick spacing and label generation for the price, indicator and time axes.

use chrono::{DateTime, Utc};
use data::chart::duration_secs;
use data::util::{abbr_large_numbers, decimals_for_step};

use super::camera::Viewport;
use super::coords::Transform;

const MAX_ITERATIONS: usize = 1000;

/// Labels the value axes aim for.
const TARGET_VALUE_LABELS: f64 = 8.0;
/// Most labels the time axis may show.
const MAX_TIME_LABELS: f64 = 10.0;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

const TIME_STEPS: [i64; 17] = [
    MINUTE,      // 1 min
    5 * MINUTE,  // 5 min
    15 * MINUTE, // 15 min
    30 * MINUTE, // 30 min
    HOUR,        // 1 hour
    2 * HOUR,    // 2 hour
    4 * HOUR,    // 4 hour
    6 * HOUR,    // 6 hour
    12 * HOUR,   // 12 hour
    DAY,         // 1 day
    2 * DAY,     // 2 day
    7 * DAY,     // 1 week
    14 * DAY,    // 2 week
    30 * DAY,    // ~1 month
    90 * DAY,    // ~3 month
    180 * DAY,   // ~6 month
    365 * DAY,   // ~1 year
];

/// Step for a value axis: `range / 8` rounded up to 1, 2, 5 or 10 times a
/// power of ten. `None` for empty or non-finite ranges.
pub fn optimal_value_step(range: f64) -> Option<f64> {
    if !range.is_finite() || range <= 0.0 {
        return None;
    }

    let raw = range / TARGET_VALUE_LABELS;
    let base = 10.0f64.powf(raw.log10().floor());
    let normalized = raw / base;

    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };

    Some(nice * base)
}

/// Smallest step from the bucket list that keeps the label count at or
/// below ten, in seconds. The largest bucket when none does.
pub fn optimal_time_step(range_secs: f64) -> Option<i64> {
    if !range_secs.is_finite() || range_secs <= 0.0 {
        return None;
    }

    let step = TIME_STEPS
        .iter()
        .copied()
        .find(|&step| range_secs / step as f64 <= MAX_TIME_LABELS)
        .unwrap_or(TIME_STEPS[TIME_STEPS.len() - 1]);

    Some(step)
}

/// Multiples of `step` inside `[lowest, highest]`, ascending.
pub fn value_ticks(lowest: f64, highest: f64, step: f64) -> Vec<f64> {
    if !(lowest.is_finite() && highest.is_finite() && step.is_finite()) || step <= 0.0 {
        return Vec::new();
    }

    let first = (lowest / step).ceil();
    let mut ticks = Vec::new();

    for i in 0..MAX_ITERATIONS {
        let value = (first + i as f64) * step;
        if value > highest {
            break;
        }
        ticks.push(value);
    }

    ticks
}

/// Times inside `[earliest, latest]` aligned to `step_secs` from the Unix epoch.
pub fn time_ticks(earliest: DateTime<Utc>, latest: DateTime<Utc>, step_secs: i64) -> Vec<DateTime<Utc>> {
    if step_secs <= 0 || earliest > latest {
        return Vec::new();
    }

    let start = earliest.timestamp().div_euclid(step_secs) * step_secs;
    let start = if start < earliest.timestamp() {
        start + step_secs
    } else {
        start
    };

    (0..MAX_ITERATIONS as i64)
        .map_while(|i| {
            let time = DateTime::<Utc>::from_timestamp(start + i * step_secs, 0)?;
            (time <= latest).then_some(time)
        })
        .collect()
}

pub fn format_value(value: f64, step: f64) -> String {
    if value.abs() >= 100_000.0 {
        abbr_large_numbers(value, Some(2))
    } else {
        let decimals = decimals_for_step(step);
        format!("{value:.decimals$}")
    }
}

pub fn format_time(time: DateTime<Utc>, step_secs: i64) -> String {
    if step_secs < DAY {
        time.format("%H:%M").to_string()
    } else if step_secs < 30 * DAY {
        time.format("%b %d").to_string()
    } else {
        time.format("%Y-%m").to_string()
    }
}

/// A label placed along an axis, `position` in view pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub position: f64,
    pub value: f64,
    pub content: String,
}

pub fn price_labels(viewport: &Viewport, transform: &Transform) -> Vec<AxisLabel> {
    let Some(step) = optimal_value_step(viewport.price_span()) else {
        return Vec::new();
    };

    value_ticks(viewport.min_price, viewport.max_price, step)
        .into_iter()
        .map(|value| AxisLabel {
            position: transform.price_to_y(value),
            value,
            content: format_value(value, step),
        })
        .filter(|label| label.position.is_finite())
        .collect()
}

pub fn indicator_labels(transform: &Transform) -> Vec<AxisLabel> {
    if transform.is_indicator_degenerate() {
        return Vec::new();
    }

    let half = transform.indicator_range / 2.0;
    let lowest = transform.indicator_camera_y - half;
    let highest = transform.indicator_camera_y + half;

    let Some(step) = optimal_value_step(transform.indicator_range) else {
        return Vec::new();
    };

    value_ticks(lowest, highest, step)
        .into_iter()
        .map(|value| AxisLabel {
            position: transform.indicator_value_to_y(value),
            value,
            content: format_value(value, step),
        })
        .collect()
}

pub fn time_labels(viewport: &Viewport, transform: &Transform) -> Vec<(DateTime<Utc>, AxisLabel)> {
    let Some(step) = optimal_time_step(duration_secs(viewport.time_span())) else {
        return Vec::new();
    };

    time_ticks(viewport.min_time, viewport.max_time, step)
        .into_iter()
        .map(|time| {
            let label = AxisLabel {
                position: transform.time_to_x(time),
                value: time.timestamp() as f64,
                content: format_time(time, step),
            };
            (time, label)
        })
        .filter(|(_, label)| label.position.is_finite())
        .collect()
}
