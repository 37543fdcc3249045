use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::prelude::*;

/// Inclusive range of hours of day that wraps past midnight when `start > end`.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct HourRange {
    pub start: u32,
    pub end: u32,
}

impl HourRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn contains(self, hour: u32) -> bool {
        if self.start <= self.end {
            self.start <= hour && hour <= self.end
        } else {
            hour >= self.start || hour <= self.end
        }
    }
}

impl Display for HourRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}-{:02}", self.start, self.end)
    }
}

impl FromStr for HourRange {
    type Err = Error;

    /// Parse `start-end`, for example `17-21` or `22-6`.
    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = s.split_once('-').with_context(|| format!("`{s}` is not `start-end`"))?;
        let start: u32 = start.trim().parse().with_context(|| format!("invalid start hour in `{s}`"))?;
        let end: u32 = end.trim().parse().with_context(|| format!("invalid end hour in `{s}`"))?;
        ensure!(start <= 23 && end <= 23, "hours must be within 0..=23, got `{s}`");
        Ok(Self { start, end })
    }
}
