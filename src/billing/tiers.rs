//! Baseline-tiered pricing for flat and tiered tariffs.

use crate::{
    core::Season,
    quantity::{cost::Cost, rate::UnitRate, usage::Usage},
};

pub const SUMMER_BASELINE: Usage = Usage::new(270.0);
pub const WINTER_BASELINE: Usage = Usage::new(350.0);

/// The second tier ends at this multiple of the baseline.
pub const SECOND_TIER_END: f64 = 4.0;

pub const SECOND_TIER_MULTIPLIER: f64 = 1.28;
pub const THIRD_TIER_MULTIPLIER: f64 = 1.45;

/// Tier schedule of a single month.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tiers {
    pub baseline: Usage,
    pub base_rate: UnitRate,
}

impl Tiers {
    pub const fn new(season: Season, base_rate: UnitRate) -> Self {
        let baseline = match season {
            Season::Summer => SUMMER_BASELINE,
            Season::Winter => WINTER_BASELINE,
        };
        Self { baseline, base_rate }
    }

    /// Cost of moving the monthly counter from `from` to `to`.
    ///
    /// Each slice is billed at the rate of the tier it falls into, so an interval crossing a
    /// boundary is split exactly there. Moving backwards credits the traversed tiers.
    pub fn cost(self, from: Usage, to: Usage) -> Cost {
        self.cumulative_cost(to) - self.cumulative_cost(from)
    }

    /// Cost of the first `usage` units of the month. Below zero, the base rate applies.
    fn cumulative_cost(self, usage: Usage) -> Cost {
        let second_tier_start = self.baseline;
        let third_tier_start = self.baseline * SECOND_TIER_END;
        let first = usage.min(second_tier_start) * self.base_rate;
        let second = (usage.clamp(second_tier_start, third_tier_start) - second_tier_start)
            * (self.base_rate * SECOND_TIER_MULTIPLIER);
        let third = (usage.max(third_tier_start) - third_tier_start)
            * (self.base_rate * THIRD_TIER_MULTIPLIER);
        first + second + third
    }
}
