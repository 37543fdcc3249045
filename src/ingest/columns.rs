use std::sync::LazyLock;

use chrono::{NaiveDateTime, TimeDelta};
use regex::Regex;

use crate::ingest::{
    commodity::Commodity,
    fields::{parse_date, parse_date_time, parse_time},
    header::USAGE_NOUN,
};

static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9$]+").unwrap());

static COST_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"cost|price|rate|charge|dollar|\$").unwrap());

static IMPORT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bimport").unwrap());
static EXPORT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bexport").unwrap());

static START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:start|begin)").unwrap());
static END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bend").unwrap());

static DATE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"datetime|timestamp|date\s*time").unwrap());
static DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"date|\bday\b").unwrap());
static TIME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"time|\bhour\b").unwrap());

/// Lowercase, replace punctuation with spaces (keeping `$`), and collapse whitespace.
#[must_use]
pub fn normalize_header(name: &str) -> String {
    PUNCTUATION.replace_all(&name.to_lowercase(), " ").trim().to_string()
}

#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum UsageColumns {
    Single(usize),

    /// Import minus export, for installations with on-site generation.
    Net { import: usize, export: usize },
}

impl UsageColumns {
    #[must_use]
    pub const fn is_net(self) -> bool {
        matches!(self, Self::Net { .. })
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Boundary {
    Start,
    End,
    Generic,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Component {
    DateTime,
    Date,
    Time,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TimestampSource {
    /// One cell with both date and time.
    Combined(usize),

    Split { date: usize, time: usize },
}

/// One attempt at reading a row's timestamp.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TimestampResolver {
    pub label: &'static str,
    pub source: TimestampSource,

    /// Added to the parsed timestamp; negative for interval-end columns.
    pub shift: TimeDelta,
}

impl TimestampResolver {
    const fn new(label: &'static str, source: TimestampSource) -> Self {
        Self { label, source, shift: TimeDelta::zero() }
    }

    const fn shifted(mut self, shift: TimeDelta) -> Self {
        self.shift = shift;
        self
    }

    #[must_use]
    pub fn resolve(&self, row: &[String]) -> Option<NaiveDateTime> {
        let timestamp = match self.source {
            TimestampSource::Combined(index) => parse_date_time(row.get(index)?)?,
            TimestampSource::Split { date, time } => {
                let date_cell = row.get(date)?;
                let date = parse_date(date_cell)
                    .or_else(|| parse_date_time(date_cell).map(|timestamp| timestamp.date()))?;
                parse_time(row.get(time)?)?.on(date)
            }
        };
        Some(timestamp + self.shift)
    }
}

/// Semantic roles of the header columns.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnLayout {
    pub usage: UsageColumns,

    /// Tried in order, the first success wins.
    pub timestamps: Vec<TimestampResolver>,
}

impl ColumnLayout {
    #[must_use]
    pub fn timestamp(&self, row: &[String]) -> Option<NaiveDateTime> {
        self.timestamps.iter().find_map(|resolver| resolver.resolve(row))
    }
}

/// Map header names onto usage and timestamp roles.
///
/// Returns `None` when no usage column can be found.
#[must_use]
pub fn resolve_columns(names: &[String], commodity: Commodity) -> Option<ColumnLayout> {
    let names: Vec<String> = names.iter().map(|name| normalize_header(name)).collect();
    let usage = resolve_usage(&names, commodity)?;
    let timestamps = resolve_timestamps(&names, usage, commodity.nominal_interval());
    Some(ColumnLayout { usage, timestamps })
}

fn resolve_usage(names: &[String], commodity: Commodity) -> Option<UsageColumns> {
    let unit = commodity.unit_pattern();
    let import = position(names, |name| unit.is_match(name) && IMPORT.is_match(name));
    let export = position(names, |name| unit.is_match(name) && EXPORT.is_match(name));
    if let (Some(import), Some(export)) = (import, export) {
        return Some(UsageColumns::Net { import, export });
    }
    position(names, |name| unit.is_match(name) && USAGE_NOUN.is_match(name))
        .or_else(|| position(names, |name| unit.is_match(name) && !COST_LIKE.is_match(name)))
        .or_else(|| {
            // Some exports carry the unit in a separate column, leaving a bare usage column.
            position(names, |name| USAGE_NOUN.is_match(name) && !COST_LIKE.is_match(name))
        })
        .map(UsageColumns::Single)
}

fn position(names: &[String], predicate: impl Fn(&str) -> bool) -> Option<usize> {
    names.iter().position(|name| predicate(name))
}

fn classify(name: &str) -> Option<(Boundary, Component)> {
    let component = if DATE_TIME.is_match(name) || (DATE.is_match(name) && TIME.is_match(name)) {
        Component::DateTime
    } else if DATE.is_match(name) {
        Component::Date
    } else if TIME.is_match(name) {
        Component::Time
    } else if START.is_match(name) || END.is_match(name) {
        // Bare `Interval Start` or `End` columns hold full timestamps.
        Component::DateTime
    } else {
        return None;
    };
    let boundary = if START.is_match(name) {
        Boundary::Start
    } else if END.is_match(name) {
        Boundary::End
    } else {
        Boundary::Generic
    };
    Some((boundary, component))
}

fn resolve_timestamps(
    names: &[String],
    usage: UsageColumns,
    nominal_interval: TimeDelta,
) -> Vec<TimestampResolver> {
    let is_usage = |index: usize| match usage {
        UsageColumns::Single(column) => column == index,
        UsageColumns::Net { import, export } => import == index || export == index,
    };
    let classified: Vec<(usize, Boundary, Component)> = names
        .iter()
        .enumerate()
        .filter(|(index, _)| !is_usage(*index))
        .filter_map(|(index, name)| classify(name).map(|(boundary, kind)| (index, boundary, kind)))
        .collect();
    let find = |boundary: Boundary, component: Component| {
        classified
            .iter()
            .find(|(_, b, c)| *b == boundary && *c == component)
            .map(|(index, _, _)| *index)
    };
    let has_time_column = classified.iter().any(|(_, _, component)| *component == Component::Time);

    let mut resolvers = Vec::new();
    if let Some(index) = find(Boundary::Start, Component::DateTime) {
        resolvers.push(TimestampResolver::new("start date-time", TimestampSource::Combined(index)));
    }
    if let (Some(date), Some(time)) =
        (find(Boundary::Start, Component::Date), find(Boundary::Start, Component::Time))
    {
        resolvers.push(TimestampResolver::new(
            "start date + start time",
            TimestampSource::Split { date, time },
        ));
    }
    if let (Some(date), Some(time)) =
        (find(Boundary::Generic, Component::Date), find(Boundary::Generic, Component::Time))
    {
        resolvers.push(TimestampResolver::new("date + time", TimestampSource::Split { date, time }));
    }
    if let (Some(date), Some(time)) =
        (find(Boundary::Generic, Component::Date), find(Boundary::Start, Component::Time))
    {
        resolvers.push(TimestampResolver::new(
            "date + start time",
            TimestampSource::Split { date, time },
        ));
    }
    if let Some(index) = find(Boundary::Generic, Component::DateTime) {
        resolvers.push(TimestampResolver::new("timestamp", TimestampSource::Combined(index)));
    }
    if !has_time_column {
        if let Some(index) = find(Boundary::Start, Component::Date) {
            resolvers.push(TimestampResolver::new("start date", TimestampSource::Combined(index)));
        }
        if let Some(index) = find(Boundary::Generic, Component::Date) {
            resolvers.push(TimestampResolver::new("date", TimestampSource::Combined(index)));
        }
    }
    if let Some(index) = find(Boundary::End, Component::DateTime) {
        resolvers.push(
            TimestampResolver::new("end date-time", TimestampSource::Combined(index))
                .shifted(-nominal_interval),
        );
    }
    if let (Some(date), Some(time)) =
        (find(Boundary::End, Component::Date), find(Boundary::End, Component::Time))
    {
        resolvers.push(
            TimestampResolver::new("end date + end time", TimestampSource::Split { date, time })
                .shifted(-nominal_interval),
        );
    }
    if !has_time_column && let Some(index) = find(Boundary::End, Component::Date) {
        resolvers.push(
            TimestampResolver::new("end date", TimestampSource::Combined(index))
                .shifted(-nominal_interval),
        );
    }
    resolvers
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn names(cells: &[&str]) -> Vec<String> {
        cells.iter().map(ToString::to_string).collect()
    }

    fn labels(layout: &ColumnLayout) -> Vec<&'static str> {
        layout.timestamps.iter().map(|resolver| resolver.label).collect()
    }

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day).unwrap().and_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Usage (kWh) "), "usage kwh");
        assert_eq!(normalize_header("COST ($)"), "cost $");
        assert_eq!(normalize_header("Start_Date/Time"), "start date time");
    }

    #[test]
    fn test_resolve_usage_prefers_usage_noun() {
        let layout = resolve_columns(
            &names(&["Date", "Cost per kWh", "Usage (kWh)"]),
            Commodity::Electricity,
        )
        .unwrap();
        assert_eq!(layout.usage, UsageColumns::Single(2));
    }

    #[test]
    fn test_resolve_usage_skips_cost_like() {
        let layout = resolve_columns(
            &names(&["Date", "Rate $/kWh", "Total kWh"]),
            Commodity::Electricity,
        )
        .unwrap();
        assert_eq!(layout.usage, UsageColumns::Single(2));
    }

    #[test]
    fn test_resolve_usage_net() {
        let layout = resolve_columns(
            &names(&["Date", "Start Time", "IMPORT (kWh)", "EXPORT (kWh)"]),
            Commodity::Electricity,
        )
        .unwrap();
        assert_eq!(layout.usage, UsageColumns::Net { import: 2, export: 3 });
        assert!(layout.usage.is_net());
    }

    #[test]
    fn test_resolve_usage_bare_column_for_gas() {
        let layout = resolve_columns(
            &names(&["TYPE", "DATE", "START TIME", "END TIME", "USAGE", "UNITS", "COST"]),
            Commodity::Gas,
        )
        .unwrap();
        assert_eq!(layout.usage, UsageColumns::Single(4));
    }

    #[test]
    fn test_resolve_usage_missing() {
        assert_eq!(resolve_columns(&names(&["Date", "Time", "Cost"]), Commodity::Electricity), None);
    }

    #[test]
    fn test_resolve_timestamps_start_date_start_time() {
        let layout = resolve_columns(
            &names(&["Start Date", "Start Time", "Usage (kWh)"]),
            Commodity::Electricity,
        )
        .unwrap();
        assert_eq!(labels(&layout), ["start date + start time"]);
        let row = names(&["01/18/2025", "00:15", "1.234"]);
        assert_eq!(layout.timestamp(&row), Some(at(2025, 1, 18, 0, 15)));
    }

    #[test]
    fn test_resolve_timestamps_priority() {
        let layout = resolve_columns(
            &names(&["Interval Start", "Interval End", "Date", "Time", "kWh"]),
            Commodity::Electricity,
        )
        .unwrap();
        assert_eq!(labels(&layout), ["start date-time", "date + time", "end date-time"]);
    }

    #[test]
    fn test_resolve_timestamps_generic_date_with_start_time() {
        let layout = resolve_columns(
            &names(&["TYPE", "DATE", "START TIME", "END TIME", "USAGE (kWh)"]),
            Commodity::Electricity,
        )
        .unwrap();
        assert_eq!(labels(&layout), ["date + start time"]);
    }

    #[test]
    fn test_resolve_timestamps_full_timestamp_in_date_column() {
        let layout =
            resolve_columns(&names(&["Date", "Usage (therms)"]), Commodity::Gas).unwrap();
        assert_eq!(labels(&layout), ["date"]);
        let row = names(&["2025-01-18 06:00", "1.5"]);
        assert_eq!(layout.timestamp(&row), Some(at(2025, 1, 18, 6, 0)));
    }

    #[test]
    fn test_resolve_timestamps_full_timestamp_in_start_and_end_date_columns() {
        let layout = resolve_columns(
            &names(&["Start Date", "End Date", "Usage (kWh)"]),
            Commodity::Electricity,
        )
        .unwrap();
        assert_eq!(labels(&layout), ["start date", "end date"]);
        let row = names(&["2025-01-18 00:00:00", "2025-01-18 00:14:59", "1.0"]);
        assert_eq!(layout.timestamp(&row), Some(at(2025, 1, 18, 0, 0)));
        let row = names(&["", "2025-01-18 00:30:00", "1.0"]);
        assert_eq!(layout.timestamp(&row), Some(at(2025, 1, 18, 0, 15)));
    }

    #[test]
    fn test_resolve_timestamps_end_shifted_by_nominal_interval() {
        let layout =
            resolve_columns(&names(&["End Date", "End Time", "Usage (kWh)"]), Commodity::Electricity)
                .unwrap();
        assert_eq!(labels(&layout), ["end date + end time"]);
        let row = names(&["2025-01-18", "00:15", "0.5"]);
        assert_eq!(layout.timestamp(&row), Some(at(2025, 1, 18, 0, 0)));

        let layout =
            resolve_columns(&names(&["Interval End", "Usage (therms)"]), Commodity::Gas).unwrap();
        let row = names(&["2025-01-18T07:00:00", "0.2"]);
        assert_eq!(layout.timestamp(&row), Some(at(2025, 1, 18, 6, 0)));
    }

    #[test]
    fn test_resolve_timestamps_falls_through() {
        let layout = resolve_columns(
            &names(&["Start", "End", "Usage (kWh)"]),
            Commodity::Electricity,
        )
        .unwrap();
        let row = names(&["garbage", "2025-01-18 00:15", "0.5"]);
        assert_eq!(layout.timestamp(&row), Some(at(2025, 1, 18, 0, 0)));
        assert_eq!(layout.timestamp(&names(&["", "", "0.5"])), None);
    }
}
