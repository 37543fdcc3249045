//! Ranking tariffs by their projected monthly cost.

use std::collections::BTreeMap;

use chrono::TimeDelta;
use itertools::{Itertools, MinMaxResult};
use serde::Serialize;

use crate::{
    billing::{BillingError, MonthlyBreakdown, calculate_detailed_cost},
    core::{MonthKey, Reading},
    prelude::*,
    quantity::{cost::Cost, usage::Usage},
    tariff::{GasTariff, Tariff},
};

/// Observation windows shorter than this are stretched to it.
pub const MIN_WINDOW_DAYS: f64 = 0.1;

/// Length of the projected month.
pub const DAYS_PER_MONTH: f64 = 30.0;

#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub tariff_id: String,
    pub total_usage: Usage,
    pub total_cost: Cost,

    /// Energy cost scaled to a 30-day month plus one fixed charge.
    pub estimated_monthly_cost: Cost,

    /// Positive when this tariff is cheaper than the current one.
    pub savings_vs_current: Cost,

    pub breakdown: Vec<MonthlyBreakdown>,
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GasComparisonResult {
    pub tariff_id: String,
    pub total_usage: Usage,
    pub total_cost: Cost,
    pub months: usize,
    pub estimated_monthly_cost: Cost,

    /// Newest month first.
    pub breakdown: Vec<MonthlyBreakdown>,
}

/// Span between the earliest and the latest reading in days, floored at [`MIN_WINDOW_DAYS`].
#[must_use]
pub fn window_days(readings: &[Reading]) -> f64 {
    let span = match readings.iter().map(|reading| reading.timestamp).minmax() {
        MinMaxResult::MinMax(earliest, latest) => latest - earliest,
        MinMaxResult::NoElements | MinMaxResult::OneElement(_) => TimeDelta::zero(),
    };
    (span.as_seconds_f64() / 86400.0).max(MIN_WINDOW_DAYS)
}

/// Cost every tariff over the same readings and rank them by the monthly estimate, cheapest
/// first. Ties keep the roster order.
///
/// Only the energy part is scaled to the projected month, so tariffs with different fixed
/// charges stay comparable however many calendar months the readings touch.
#[instrument(skip_all, fields(current_id = current_id, n_tariffs = roster.len()))]
pub fn compare_tariffs(
    readings: &[Reading],
    current_id: &str,
    roster: &[Tariff],
) -> Result<Vec<ComparisonResult>, BillingError> {
    if !roster.iter().any(|tariff| tariff.id == current_id) {
        return Err(BillingError::UnknownTariff { tariff_id: current_id.to_string() });
    }
    let multiplier = DAYS_PER_MONTH / window_days(readings);

    let mut estimates = Vec::with_capacity(roster.len());
    for tariff in roster {
        let detailed = calculate_detailed_cost(readings, tariff)?;
        let estimated_monthly_cost =
            detailed.energy_cost * multiplier + tariff.fixed_monthly_charge;
        estimates.push((tariff, detailed, estimated_monthly_cost));
    }
    let current_estimate = estimates
        .iter()
        .find(|(tariff, _, _)| tariff.id == current_id)
        .map_or(Cost::ZERO, |(_, _, estimate)| *estimate);

    let mut results: Vec<ComparisonResult> = estimates
        .into_iter()
        .map(|(tariff, detailed, estimated_monthly_cost)| ComparisonResult {
            tariff_id: tariff.id.clone(),
            total_usage: detailed.total_usage,
            total_cost: detailed.total_cost,
            estimated_monthly_cost,
            savings_vs_current: current_estimate - estimated_monthly_cost,
            breakdown: detailed.breakdown,
        })
        .collect();
    results.sort_by_key(|result| result.estimated_monthly_cost);

    if let Some(cheapest) = results.first() {
        info!(
            cheapest = %cheapest.tariff_id,
            estimate = %cheapest.estimated_monthly_cost,
            savings = %cheapest.savings_vs_current,
            "compared",
        );
    }
    Ok(results)
}

/// Bill the gas readings month by month and average the monthly bills.
#[instrument(skip_all, fields(tariff_id = %tariff.id))]
pub fn calculate_gas_comparison(readings: &[Reading], tariff: &GasTariff) -> GasComparisonResult {
    let mut monthly_usage: BTreeMap<MonthKey, Usage> = BTreeMap::new();
    for reading in readings {
        *monthly_usage.entry(reading.month()).or_default() += reading.value;
    }
    let breakdown: Vec<MonthlyBreakdown> = monthly_usage
        .into_iter()
        .rev()
        .map(|(month, usage)| MonthlyBreakdown { month, usage, cost: tariff.monthly_cost(usage) })
        .collect();
    let total_usage: Usage = breakdown.iter().map(|month| month.usage).sum();
    let total_cost: Cost = breakdown.iter().map(|month| month.cost).sum();
    let months = breakdown.len();
    #[expect(clippy::cast_precision_loss)]
    let estimated_monthly_cost =
        if months == 0 { Cost::ZERO } else { total_cost / months as f64 };
    debug!(months, %estimated_monthly_cost, "calculated");
    GasComparisonResult {
        tariff_id: tariff.id.clone(),
        total_usage,
        total_cost,
        months,
        estimated_monthly_cost,
        breakdown,
    }
}
