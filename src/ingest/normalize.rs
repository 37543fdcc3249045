use chrono::TimeDelta;
use itertools::Itertools;

use crate::core::{Reading, series::Aggregate};

/// Deltas beyond this many readings do not affect the inferred interval.
const MAX_INTERVAL_SAMPLES: usize = 2000;

/// Sort chronologically and merge readings sharing a timestamp by summing their values.
///
/// Duplicates come from daylight-saving fall-back hours and from exports repeating rows.
#[must_use]
pub fn normalize(mut readings: Vec<Reading>) -> Vec<Reading> {
    readings.sort_by_key(|reading| reading.timestamp);
    readings
        .into_iter()
        .coalesce(|lhs, rhs| {
            if lhs.timestamp == rhs.timestamp {
                Ok(Reading::new(lhs.timestamp, lhs.value + rhs.value))
            } else {
                Err((lhs, rhs))
            }
        })
        .collect()
}

/// Median spacing of the normalized readings, rounded to the nearest minute.
#[must_use]
pub fn infer_interval(readings: &[Reading]) -> Option<TimeDelta> {
    let median_seconds = readings
        .iter()
        .take(MAX_INTERVAL_SAMPLES)
        .tuple_windows()
        .map(|(lhs, rhs)| (rhs.timestamp - lhs.timestamp).as_seconds_f64())
        .median()?;
    #[expect(clippy::cast_possible_truncation)]
    let minutes = (median_seconds / 60.0).round() as i64;
    Some(TimeDelta::minutes(minutes))
}
