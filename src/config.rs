//! Tariff roster: the plans to compare, loaded from TOML.

use std::{
    collections::HashSet,
    fmt::{Display, Formatter},
    fs,
    path::Path,
};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    prelude::*,
    quantity::{cost::Cost, rate::UnitRate, usage::Usage},
    tariff::{GasTariff, Tariff},
};

const BUILTIN_ROSTER: &str = include_str!("config/builtin_roster.toml");

#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Roster {
    /// Tariff the household is currently billed on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,

    #[serde(default)]
    pub tariffs: Vec<Tariff>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<GasTariff>,
}

/// Validation problem with the dotted path of the offending field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterIssue {
    pub field: String,
    pub message: String,
}

impl Display for RosterIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "`{}` {}", self.field, self.message)
    }
}

impl Roster {
    /// Roster compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_ROSTER).context("the built-in roster is broken")
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed to load the roster from `{}`", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from the file if given, otherwise fall back to the built-in roster.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let roster = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::builtin()?,
        };
        roster.validated()
    }

    /// Every problem found, empty if the roster is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<RosterIssue> {
        let mut issues = Vec::new();
        let mut issue =
            |field: String, message: String| issues.push(RosterIssue { field, message });

        let mut seen_ids = HashSet::new();
        for (i, tariff) in self.tariffs.iter().enumerate() {
            if !seen_ids.insert(tariff.id.as_str()) {
                issue(format!("tariffs[{i}].id"), format!("duplicates `{}`", tariff.id));
            }
            if tariff.periods.is_empty() {
                issue(format!("tariffs[{i}].periods"), "must not be empty".into());
            }
            if tariff.fixed_monthly_charge < Cost::ZERO {
                issue(format!("tariffs[{i}].fixed_monthly_charge"), "must not be negative".into());
            }
            for (j, period) in tariff.periods.iter().enumerate() {
                let path = format!("tariffs[{i}].periods[{j}]");
                let hours = [("start_hour", period.start_hour), ("end_hour", period.end_hour)];
                for (name, hour) in hours {
                    if hour > 23 {
                        issue(format!("{path}.{name}"), format!("must be within 0..=23, got {hour}"));
                    }
                }
                if period.rate < UnitRate::ZERO {
                    issue(format!("{path}.rate"), "must not be negative".into());
                }
                if period.summer_rate.is_some_and(|rate| rate < UnitRate::ZERO) {
                    issue(format!("{path}.summer_rate"), "must not be negative".into());
                }
            }
        }

        if let Some(current) = &self.current
            && !self.tariffs.iter().any(|tariff| &tariff.id == current)
        {
            issue("current".into(), format!("refers to unknown tariff `{current}`"));
        }

        if let Some(gas) = &self.gas {
            if gas.baseline_allowance < Usage::ZERO {
                issue("gas.baseline_allowance".into(), "must not be negative".into());
            }
            if gas.baseline_rate < UnitRate::ZERO {
                issue("gas.baseline_rate".into(), "must not be negative".into());
            }
            if gas.excess_rate < UnitRate::ZERO {
                issue("gas.excess_rate".into(), "must not be negative".into());
            }
            if gas.fixed_monthly_charge < Cost::ZERO {
                issue("gas.fixed_monthly_charge".into(), "must not be negative".into());
            }
        }

        issues
    }

    /// Fail with every validation problem at once.
    pub fn validated(self) -> Result<Self> {
        let issues = self.validate();
        ensure!(issues.is_empty(), "invalid tariff roster: {}", issues.iter().join("; "));
        Ok(self)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Tariff> {
        self.tariffs.iter().find(|tariff| tariff.id == id)
    }
}
