//! Monthly bill reconstruction for a single tariff.

pub mod tiers;

use std::collections::BTreeMap;

use chrono::Datelike;
use itertools::Itertools;
use serde::Serialize;

use crate::{
    billing::tiers::Tiers,
    core::{MonthKey, Reading},
    prelude::*,
    quantity::{cost::Cost, usage::Usage},
    tariff::{Tariff, TariffKind},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BillingError {
    #[error("tariff `{tariff_id}` has no rate periods")]
    NoPeriods { tariff_id: String },

    #[error("current tariff `{tariff_id}` is not in the roster")]
    UnknownTariff { tariff_id: String },
}

/// Usage and cost of one calendar month.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthlyBreakdown {
    pub month: MonthKey,
    pub usage: Usage,

    /// Including the fixed monthly charge.
    pub cost: Cost,
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DetailedCost {
    pub total_usage: Usage,

    /// Usage-dependent part of [`DetailedCost::total_cost`].
    pub energy_cost: Cost,

    /// Energy cost plus one fixed charge per month present.
    pub total_cost: Cost,

    /// Newest month first.
    pub breakdown: Vec<MonthlyBreakdown>,
}

impl DetailedCost {
    #[must_use]
    pub const fn n_months(&self) -> usize {
        self.breakdown.len()
    }
}

/// Running state of the bill while folding over the readings.
#[derive(Default)]
struct Accumulator {
    /// Month of year the tier counter belongs to.
    tier_month: Option<u32>,

    /// Tier counter position within [`Accumulator::tier_month`].
    usage_so_far: Usage,

    months: BTreeMap<MonthKey, (Usage, Cost)>,
}

/// Reconstruct the monthly bills of `tariff`. Readings are billed in chronological order
/// whatever order they come in.
///
/// The tier counter resets whenever the month of year changes, so a gap of exactly a year
/// keeps counting.
#[instrument(skip_all, fields(tariff_id = %tariff.id))]
pub fn calculate_detailed_cost(
    readings: &[Reading],
    tariff: &Tariff,
) -> Result<DetailedCost, BillingError> {
    if tariff.periods.is_empty() {
        return Err(BillingError::NoPeriods { tariff_id: tariff.id.clone() });
    }

    let accumulator = readings.iter().sorted_by_key(|reading| reading.timestamp).fold(
        Accumulator::default(),
        |mut accumulator, reading| {
            let month = reading.month();
            let energy_cost = match tariff.kind {
                TariffKind::Tou => {
                    tariff.rate_at(reading.timestamp).map_or(Cost::ZERO, |rate| reading.value * rate)
                }
                TariffKind::Flat | TariffKind::Tiered => {
                    let month_of_year = reading.timestamp.month();
                    if accumulator.tier_month != Some(month_of_year) {
                        accumulator.tier_month = Some(month_of_year);
                        accumulator.usage_so_far = Usage::ZERO;
                    }
                    let from = accumulator.usage_so_far;
                    accumulator.usage_so_far += reading.value;
                    tariff.base_rate(month).map_or(Cost::ZERO, |base_rate| {
                        Tiers::new(month.season(), base_rate).cost(from, accumulator.usage_so_far)
                    })
                }
            };
            let (usage, cost) = accumulator.months.entry(month).or_default();
            *usage += reading.value;
            *cost += energy_cost;
            accumulator
        },
    );

    let energy_cost: Cost = accumulator.months.values().map(|(_, cost)| *cost).sum();
    let breakdown: Vec<MonthlyBreakdown> = accumulator
        .months
        .into_iter()
        .rev()
        .map(|(month, (usage, energy_cost))| MonthlyBreakdown {
            month,
            usage,
            cost: energy_cost + tariff.fixed_monthly_charge,
        })
        .collect();
    let total_usage: Usage = breakdown.iter().map(|month| month.usage).sum();
    #[expect(clippy::cast_precision_loss)]
    let total_cost = energy_cost + tariff.fixed_monthly_charge * breakdown.len() as f64;

    debug!(n_months = breakdown.len(), ?total_usage, ?total_cost, "calculated");
    Ok(DetailedCost { total_usage, energy_cost, total_cost, breakdown })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::{
        quantity::rate::UnitRate,
        tariff::{TariffKind, TariffPeriod},
    };

    fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    fn reading(timestamp: NaiveDateTime, value: f64) -> Reading {
        Reading::new(timestamp, Usage::new(value))
    }

    fn all_day(rate: f64) -> TariffPeriod {
        TariffPeriod::builder()
            .name("all day")
            .start_hour(0)
            .end_hour(23)
            .rate(UnitRate::new(rate))
            .build()
    }

    fn flat(fixed: f64) -> Tariff {
        Tariff::builder()
            .id("flat")
            .name("Flat")
            .kind(TariffKind::Flat)
            .periods(vec![all_day(0.38)])
            .fixed_monthly_charge(Cost::new(fixed))
            .build()
    }

    fn time_of_use() -> Tariff {
        Tariff::builder()
            .id("tou")
            .name("Time of use")
            .kind(TariffKind::Tou)
            .periods(vec![
                TariffPeriod::builder()
                    .name("peak")
                    .start_hour(16)
                    .end_hour(20)
                    .rate(UnitRate::new(0.50))
                    .build(),
                TariffPeriod::builder()
                    .name("off-peak")
                    .start_hour(21)
                    .end_hour(15)
                    .rate(UnitRate::new(0.25))
                    .build(),
            ])
            .build()
    }

    #[test]
    fn test_flat_within_winter_baseline() {
        let readings = [reading(at(2025, 1, 5, 0), 200.0), reading(at(2025, 1, 20, 0), 70.0)];
        let cost = calculate_detailed_cost(&readings, &flat(0.0)).unwrap();
        assert_abs_diff_eq!(cost.energy_cost.0, 270.0 * 0.38, epsilon = 1e-9);
        assert_abs_diff_eq!(cost.total_usage.0, 270.0);
    }

    #[test]
    fn test_flat_above_summer_baseline() {
        let readings = [reading(at(2025, 7, 5, 0), 300.0), reading(at(2025, 7, 20, 0), 100.0)];
        let cost = calculate_detailed_cost(&readings, &flat(0.0)).unwrap();
        assert_abs_diff_eq!(
            cost.energy_cost.0,
            270.0 * 0.38 + 130.0 * 0.38 * 1.28,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_tier_counter_resets_monthly() {
        let readings = [reading(at(2025, 7, 31, 0), 270.0), reading(at(2025, 8, 1, 0), 270.0)];
        let cost = calculate_detailed_cost(&readings, &flat(0.0)).unwrap();
        assert_abs_diff_eq!(cost.energy_cost.0, 540.0 * 0.38, epsilon = 1e-9);
    }

    #[test]
    fn test_tier_counter_keyed_by_month_of_year() {
        let readings = [reading(at(2024, 7, 31, 0), 270.0), reading(at(2025, 7, 1, 0), 10.0)];
        let cost = calculate_detailed_cost(&readings, &flat(0.0)).unwrap();
        assert_abs_diff_eq!(
            cost.energy_cost.0,
            270.0 * 0.38 + 10.0 * 0.38 * 1.28,
            epsilon = 1e-9
        );
        assert_eq!(cost.n_months(), 2);
    }

    #[test]
    fn test_bills_in_chronological_order() {
        let mut tariff = flat(0.0);
        tariff.kind = TariffKind::Tiered;
        tariff.periods = vec![all_day(1.0)];
        let readings = [
            reading(at(2025, 1, 1, 0), 300.0),
            reading(at(2025, 1, 2, 0), 100.0),
            reading(at(2025, 2, 1, 0), 1.0),
        ];
        let shuffled = [readings[0], readings[2], readings[1]];
        let expected = calculate_detailed_cost(&readings, &tariff).unwrap();
        assert_abs_diff_eq!(expected.energy_cost.0, 350.0 + 50.0 * 1.28 + 1.0, epsilon = 1e-9);
        assert_eq!(calculate_detailed_cost(&shuffled, &tariff).unwrap(), expected);
    }

    #[test]
    fn test_fixed_charge_once_per_month() {
        let readings = [
            reading(at(2025, 1, 1, 0), 1.0),
            reading(at(2025, 1, 2, 0), 1.0),
            reading(at(2025, 2, 1, 0), 1.0),
        ];
        let cost = calculate_detailed_cost(&readings, &flat(10.0)).unwrap();
        assert_abs_diff_eq!(cost.total_cost.0, 3.0 * 0.38 + 2.0 * 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(cost.breakdown[0].cost.0, 0.38 + 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(cost.breakdown[1].cost.0, 2.0 * 0.38 + 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_breakdown_newest_first() {
        let readings = [
            reading(at(2024, 12, 1, 0), 1.0),
            reading(at(2025, 1, 1, 0), 1.0),
            reading(at(2025, 2, 1, 0), 1.0),
        ];
        let cost = calculate_detailed_cost(&readings, &flat(0.0)).unwrap();
        let months: Vec<String> =
            cost.breakdown.iter().map(|month| month.month.to_string()).collect();
        assert_eq!(months, ["2025-02", "2025-01", "2024-12"]);
    }

    #[test]
    fn test_time_of_use() {
        let readings = [
            reading(at(2025, 7, 1, 15), 1.0),
            reading(at(2025, 7, 1, 16), 1.0),
            reading(at(2025, 7, 1, 20), 1.0),
            reading(at(2025, 7, 1, 21), 1.0),
        ];
        let cost = calculate_detailed_cost(&readings, &time_of_use()).unwrap();
        assert_abs_diff_eq!(cost.energy_cost.0, 0.25 + 0.50 + 0.50 + 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_idempotent() {
        let readings = [reading(at(2025, 7, 5, 17), 300.0), reading(at(2025, 8, 20, 3), 100.0)];
        let tariff = flat(12.0);
        assert_eq!(
            calculate_detailed_cost(&readings, &tariff).unwrap(),
            calculate_detailed_cost(&readings, &tariff).unwrap(),
        );
    }

    #[test]
    fn test_no_periods() {
        let mut tariff = flat(0.0);
        tariff.periods.clear();
        assert_eq!(
            calculate_detailed_cost(&[], &tariff),
            Err(BillingError::NoPeriods { tariff_id: "flat".to_string() }),
        );
    }
}
