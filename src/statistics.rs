use chrono::{NaiveDateTime, TimeDelta};

use crate::{
    core::{Reading, series::Aggregate},
    ingest::normalize::infer_interval,
    quantity::usage::Usage,
};

/// What a reading stream covers, for sanity-checking an export before trusting its costs.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coverage {
    pub first: NaiveDateTime,
    pub last: NaiveDateTime,

    /// From the first reading start to the last reading end.
    pub span: TimeDelta,

    pub interval: Option<TimeDelta>,
    pub n_readings: usize,
    pub total_usage: Usage,

    /// Unknown until the readings cover at least an hour.
    pub average_daily_usage: Option<Usage>,

    /// Average usage per reading by hour of day.
    pub hourly_average: [Option<Usage>; 24],

    pub peak: Reading,
}

impl Coverage {
    /// Summarize chronologically ordered readings, `None` if there are none.
    pub fn from_readings(readings: &[Reading]) -> Option<Self> {
        let (first, last) = (readings.first()?, readings.last()?);
        let interval = infer_interval(readings);
        let span = last.timestamp - first.timestamp + interval.unwrap_or_default();
        let total_usage: Usage = readings.iter().map(|reading| reading.value).sum();
        let average_daily_usage = (span >= TimeDelta::hours(1))
            .then(|| total_usage / (span.as_seconds_f64() / 86400.0));
        let hourly_average =
            readings.iter().map(|reading| (reading.timestamp, reading.value)).average_hourly();
        let peak = readings.iter().copied().max_by_key(|reading| reading.value)?;
        Some(Self {
            first: first.timestamp,
            last: last.timestamp,
            span,
            interval,
            n_readings: readings.len(),
            total_usage,
            average_daily_usage,
            hourly_average,
            peak,
        })
    }
}
