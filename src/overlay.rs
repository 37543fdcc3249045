//! Simulated extra load added on top of measured readings.

use chrono::TimeDelta;

use crate::{
    core::{HourRange, Reading},
    quantity::{power::Kilowatts, usage::Usage},
};

/// Extra usage to add to a reading, for what-if comparisons.
pub trait LoadOverlay {
    fn extra_usage(&self, reading: &Reading) -> Usage;
}

impl<F> LoadOverlay for F
where
    F: Fn(&Reading) -> Usage,
{
    fn extra_usage(&self, reading: &Reading) -> Usage {
        self(reading)
    }
}

/// Copy of the readings with the overlay usage added to each.
#[must_use]
pub fn apply_overlay(readings: &[Reading], overlay: &impl LoadOverlay) -> Vec<Reading> {
    readings
        .iter()
        .map(|reading| Reading::new(reading.timestamp, reading.value + overlay.extra_usage(reading)))
        .collect()
}

/// Constant power draw during the same hours every day, like an electric vehicle charging
/// overnight.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScheduledLoad {
    pub power: Kilowatts,
    pub hours: HourRange,

    /// Duration of each reading.
    pub interval: TimeDelta,
}

impl LoadOverlay for ScheduledLoad {
    fn extra_usage(&self, reading: &Reading) -> Usage {
        if self.hours.contains(reading.hour()) { self.power * self.interval } else { Usage::ZERO }
    }
}
