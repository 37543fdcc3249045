//! Rate structures as utilities publish them.

pub mod gas;

use bon::Builder;
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

pub use self::gas::GasTariff;
use crate::{
    core::{HourRange, MonthKey, Season},
    quantity::{cost::Cost, rate::UnitRate},
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TariffKind {
    /// Single base rate, billed with baseline tiers like [`TariffKind::Tiered`].
    Flat,

    /// Time-of-use.
    Tou,

    Tiered,
}

/// Recurring daily window with its own rate.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Builder)]
#[serde(deny_unknown_fields)]
pub struct TariffPeriod {
    #[builder(into)]
    pub name: String,

    /// Inclusive, `0..=23`.
    pub start_hour: u32,

    /// Inclusive, `0..=23`. Less than [`TariffPeriod::start_hour`] when the window wraps
    /// past midnight.
    pub end_hour: u32,

    pub rate: UnitRate,

    /// Overrides [`TariffPeriod::rate`] from June through September.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summer_rate: Option<UnitRate>,
}

impl TariffPeriod {
    pub fn effective_rate(&self, month: MonthKey) -> UnitRate {
        match (month.season(), self.summer_rate) {
            (Season::Summer, Some(summer_rate)) => summer_rate,
            _ => self.rate,
        }
    }

    pub const fn hours(&self) -> HourRange {
        HourRange::new(self.start_hour, self.end_hour)
    }

    #[must_use]
    pub const fn contains_hour(&self, hour: u32) -> bool {
        self.hours().contains(hour)
    }
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Builder)]
#[serde(deny_unknown_fields)]
pub struct Tariff {
    #[builder(into)]
    pub id: String,

    #[builder(into)]
    pub name: String,

    pub kind: TariffKind,

    /// The first period supplies the base rate for flat and tiered tariffs.
    pub periods: Vec<TariffPeriod>,

    #[serde(default)]
    #[builder(default)]
    pub fixed_monthly_charge: Cost,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub provider: Option<String>,
}

impl Tariff {
    /// Effective rate of the first period, or `None` if there are no periods.
    #[must_use]
    pub fn base_rate(&self, month: MonthKey) -> Option<UnitRate> {
        self.periods.first().map(|period| period.effective_rate(month))
    }

    /// Time-of-use rate: the first period covering the hour, falling back to the base rate.
    #[must_use]
    pub fn rate_at(&self, timestamp: NaiveDateTime) -> Option<UnitRate> {
        let month = MonthKey::of(timestamp.date());
        let hour = timestamp.hour();
        self.periods
            .iter()
            .find(|period| period.contains_hour(hour))
            .map(|period| period.effective_rate(month))
            .or_else(|| self.base_rate(month))
    }
}
