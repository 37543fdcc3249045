use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::quantity::{cost::Cost, rate::UnitRate, usage::Usage};

/// Two-tier monthly gas structure: usage up to the allowance at the baseline rate, the rest at
/// the excess rate.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Builder)]
#[serde(deny_unknown_fields)]
pub struct GasTariff {
    #[builder(into)]
    pub id: String,

    #[builder(into)]
    pub name: String,

    /// Monthly therms billed at the baseline rate.
    pub baseline_allowance: Usage,

    pub baseline_rate: UnitRate,
    pub excess_rate: UnitRate,

    #[serde(default)]
    #[builder(default)]
    pub fixed_monthly_charge: Cost,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub provider: Option<String>,
}

impl GasTariff {
    /// Bill for one month of usage, including the fixed charge.
    pub fn monthly_cost(&self, usage: Usage) -> Cost {
        let baseline = usage.min(self.baseline_allowance);
        let excess = (usage - self.baseline_allowance).max(Usage::ZERO);
        baseline * self.baseline_rate + excess * self.excess_rate + self.fixed_monthly_charge
    }
}
