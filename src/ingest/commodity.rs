use std::{
    fmt::{Display, Formatter},
    sync::LazyLock,
};

use chrono::TimeDelta;
use regex::Regex;

static KILOWATT_HOURS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)kwh").unwrap());
static THERMS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)therm").unwrap());

/// What a reading stream measures. Drives every commodity-specific parsing threshold.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Commodity {
    Electricity,
    Gas,
}

impl Display for Commodity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Electricity => write!(f, "electricity"),
            Self::Gas => write!(f, "gas"),
        }
    }
}

impl Commodity {
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Electricity => "kWh",
            Self::Gas => "therms",
        }
    }

    /// Header keyword that identifies a usage column in this commodity's unit.
    #[must_use]
    pub fn unit_pattern(self) -> &'static Regex {
        match self {
            Self::Electricity => &KILOWATT_HOURS,
            Self::Gas => &THERMS,
        }
    }

    /// Minimal header score for a row to be accepted as the header.
    ///
    /// Gas exports are shorter and carry fewer descriptive columns.
    #[must_use]
    pub const fn min_header_score(self) -> u32 {
        match self {
            Self::Electricity => 4,
            Self::Gas => 3,
        }
    }

    /// Interval assumed when only the interval end is known.
    #[must_use]
    pub const fn nominal_interval(self) -> TimeDelta {
        match self {
            Self::Electricity => TimeDelta::minutes(15),
            Self::Gas => TimeDelta::minutes(60),
        }
    }

    /// Data-quality advisory for an atypical inferred interval, if any.
    #[must_use]
    pub fn interval_warning(self, interval: TimeDelta) -> Option<String> {
        #[expect(clippy::cast_possible_truncation)]
        let minutes = (interval.as_seconds_f64() / 60.0).round() as i64;
        match self {
            Self::Electricity => (![15, 30, 60].contains(&minutes)).then(|| {
                format!(
                    "Detected {minutes}-minute intervals; typical electricity exports use 15, 30, or 60 minutes"
                )
            }),
            Self::Gas => {
                #[expect(clippy::cast_possible_truncation)]
                let hours = (interval.as_seconds_f64() / 3600.0).round() as i64;
                (![1, 24].contains(&hours)).then(|| {
                    format!(
                        "Detected {hours}-hour gas intervals; expected hourly or daily readings"
                    )
                })
            }
        }
    }
}
