use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use chrono::Datelike;
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::prelude::*;

/// Calendar month, rendered as `YYYY-MM`.
#[must_use]
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, SerializeDisplay, DeserializeFromStr,
)]
pub struct MonthKey {
    pub year: i32,

    /// One-based.
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: impl Datelike) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    pub const fn season(self) -> Season {
        Season::of_month0(self.month - 1)
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (year, month) = s.split_once('-').with_context(|| format!("`{s}` is not `YYYY-MM`"))?;
        let year = year.parse().with_context(|| format!("invalid year in `{s}`"))?;
        let month = month.parse().with_context(|| format!("invalid month in `{s}`"))?;
        ensure!((1..=12).contains(&month), "month must be within 1..=12, got {month}");
        Ok(Self { year, month })
    }
}

/// Billing season for seasonal rate overrides and tier baselines.
#[must_use]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Season {
    /// June through September.
    Summer,

    Winter,
}

impl Season {
    /// Zero-indexed months that count as summer.
    pub const SUMMER_MONTHS0: std::ops::RangeInclusive<u32> = 5..=8;

    pub const fn of_month0(month0: u32) -> Self {
        if month0 >= *Self::SUMMER_MONTHS0.start() && month0 <= *Self::SUMMER_MONTHS0.end() {
            Self::Summer
        } else {
            Self::Winter
        }
    }

    pub fn of(date: impl Datelike) -> Self {
        Self::of_month0(date.month0())
    }

    #[must_use]
    pub const fn is_summer(self) -> bool {
        matches!(self, Self::Summer)
    }
}
