//! Free-form cell interpreters.
//!
//! Every interpreter returns `None` for unparsable input, so a legitimate zero never gets
//! confused with a missing value.

use std::sync::LazyLock;

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use regex::Regex;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?(?:\d+(?:\.\d*)?|\.\d+)").unwrap());

static TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,2})(?::(\d{1,2}))?(?::(\d{1,2}))?\s*(?:([ap])\.?\s*m\.?)?$").unwrap()
});

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").unwrap());

static US_SLASH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})$").unwrap());

static US_DASH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})-(\d{1,2})-(\d{4})$").unwrap());

/// Date part followed by whitespace and a trailing time token.
static DATE_THEN_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.*\S)\s+(\d{1,2}(?::\d{1,2}){0,2}\s*(?:[ap]\.?\s*m\.?)?)$").unwrap()
});

/// Layouts tried on the full string before splitting it into date and time.
///
/// US layouts are left to the split path: `%Y` accepts a two-digit year as is.
const NATIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Layouts carrying a UTC offset; the offset is dropped and the wall-clock time kept.
const NATIVE_OFFSET_LAYOUTS: &[&str] = &["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M%:z"];

/// Extract the first signed decimal number, ignoring thousands separators,
/// currency symbols, and units.
#[must_use]
pub fn parse_number(cell: &str) -> Option<f64> {
    let cleaned = cell.replace(',', "");
    NUMBER.find(&cleaned)?.as_str().parse().ok()
}

/// Time of day as printed in an export.
///
/// Kept apart from [`NaiveTime`] because exports occasionally print `24:00` for the end of day.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl TimeOfDay {
    #[must_use]
    pub fn since_midnight(self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.hour))
            + TimeDelta::minutes(i64::from(self.minute))
            + TimeDelta::seconds(i64::from(self.second))
    }

    /// Combine with a date, rolling `24:00` over to the next day.
    #[must_use]
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN) + self.since_midnight()
    }
}

/// Parse `H`, `H:MM`, or `H:MM:SS`, optionally followed by `AM` or `PM`.
#[must_use]
pub fn parse_time(cell: &str) -> Option<TimeOfDay> {
    let captures = TIME.captures(cell.trim())?;
    let mut hour: u32 = captures[1].parse().ok()?;
    let minute: u32 = captures.get(2).map_or(Some(0), |m| m.as_str().parse().ok())?;
    let second: u32 = captures.get(3).map_or(Some(0), |m| m.as_str().parse().ok())?;
    if minute > 59 || second > 59 {
        return None;
    }
    match captures.get(4).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(meridiem) => {
            if hour > 12 {
                return None;
            }
            hour = match (meridiem.as_str(), hour) {
                ("a", 12) => 0,
                ("p", 12) => 12,
                ("p", hour) => hour + 12,
                (_, hour) => hour,
            };
        }
        None if hour > 24 => return None,
        None => {}
    }
    Some(TimeOfDay { hour, minute, second })
}

/// Parse an ISO (`YYYY-MM-DD`), US slash (`M/D/YYYY`, `M/D/YY`), or US dash (`M-D-YYYY`) date.
///
/// Only the nominal ranges are checked. A day past the end of its month rolls over into the
/// next month.
#[must_use]
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    let (year, month, day) = if let Some(captures) = ISO_DATE.captures(cell) {
        (captures[1].parse().ok()?, captures[2].parse().ok()?, captures[3].parse().ok()?)
    } else if let Some(captures) = US_SLASH_DATE.captures(cell) {
        let year: i32 = captures[3].parse().ok()?;
        let year = if captures[3].len() == 2 { 2000 + year } else { year };
        (year, captures[1].parse().ok()?, captures[2].parse().ok()?)
    } else if let Some(captures) = US_DASH_DATE.captures(cell) {
        (captures[3].parse().ok()?, captures[1].parse().ok()?, captures[2].parse().ok()?)
    } else {
        return None;
    };
    from_nominal_ymd(year, month, day)
}

fn from_nominal_ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(u64::from(day - 1)))
}

/// Parse a cell holding both date and time.
///
/// Common full-string layouts go first. Otherwise, the cell is split before the trailing time
/// token and both halves are parsed separately. A bare date resolves to midnight.
#[must_use]
pub fn parse_date_time(cell: &str) -> Option<NaiveDateTime> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(cell) {
        return Some(timestamp.naive_local());
    }
    if let Some(timestamp) = NATIVE_OFFSET_LAYOUTS
        .iter()
        .find_map(|layout| DateTime::parse_from_str(cell, layout).ok())
    {
        return Some(timestamp.naive_local());
    }
    if let Some(timestamp) =
        NATIVE_LAYOUTS.iter().find_map(|layout| NaiveDateTime::parse_from_str(cell, layout).ok())
    {
        return Some(timestamp);
    }
    if let Some(captures) = DATE_THEN_TIME.captures(cell)
        && let Some(date) = parse_date(&captures[1])
        && let Some(time) = parse_time(&captures[2])
    {
        return Some(time.on(date));
    }
    parse_date(cell).map(|date| date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day).unwrap().and_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_parse_number() {
        assert_abs_diff_eq!(parse_number("1.234").unwrap(), 1.234);
        assert_abs_diff_eq!(parse_number("$1,234.50").unwrap(), 1234.5);
        assert_abs_diff_eq!(parse_number("-0.75 kWh").unwrap(), -0.75);
        assert_abs_diff_eq!(parse_number(" .5").unwrap(), 0.5);
        assert_abs_diff_eq!(parse_number("0").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_number_none() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number("$"), None);
    }

    #[test]
    fn test_parse_time_24_hour() {
        assert_eq!(parse_time("7"), Some(TimeOfDay { hour: 7, minute: 0, second: 0 }));
        assert_eq!(parse_time("00:15"), Some(TimeOfDay { hour: 0, minute: 15, second: 0 }));
        assert_eq!(parse_time("23:59:59"), Some(TimeOfDay { hour: 23, minute: 59, second: 59 }));
        assert_eq!(parse_time("24:00"), Some(TimeOfDay { hour: 24, minute: 0, second: 0 }));
    }

    #[test]
    fn test_parse_time_12_hour() {
        assert_eq!(parse_time("12 AM").map(|time| time.hour), Some(0));
        assert_eq!(parse_time("12:30 pm").map(|time| time.hour), Some(12));
        assert_eq!(parse_time("1:05 PM").map(|time| (time.hour, time.minute)), Some((13, 5)));
        assert_eq!(parse_time("11:45a.m.").map(|time| time.hour), Some(11));
        assert_eq!(parse_time("0:30 AM"), Some(TimeOfDay { hour: 0, minute: 30, second: 0 }));
        assert_eq!(parse_time("13 PM"), None);
    }

    #[test]
    fn test_parse_time_invalid() {
        assert_eq!(parse_time("25:00"), None);
        assert_eq!(parse_time("13:00 PM"), None);
        assert_eq!(parse_time("10:60"), None);
        assert_eq!(parse_time("10:00:60"), None);
        assert_eq!(parse_time("noon"), None);
        assert_eq!(parse_time(""), None);
    }

    #[test]
    fn test_parse_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 18);
        assert_eq!(parse_date("2025-01-18"), expected);
        assert_eq!(parse_date("1/18/2025"), expected);
        assert_eq!(parse_date("01/18/25"), expected);
        assert_eq!(parse_date("1-18-2025"), expected);
    }

    #[test]
    fn test_parse_date_out_of_range() {
        assert_eq!(parse_date("13/01/2025"), None);
        assert_eq!(parse_date("1/32/2025"), None);
        assert_eq!(parse_date("0/10/2025"), None);
        assert_eq!(parse_date("January 18"), None);
    }

    #[test]
    fn test_parse_date_rolls_over_short_month() {
        assert_eq!(parse_date("2/30/2025"), NaiveDate::from_ymd_opt(2025, 3, 2));
    }

    #[test]
    fn test_parse_date_time_native() {
        assert_eq!(parse_date_time("2025-01-18T00:15:00"), Some(at(2025, 1, 18, 0, 15)));
        assert_eq!(parse_date_time("2025-01-18 00:15"), Some(at(2025, 1, 18, 0, 15)));
        assert_eq!(parse_date_time("2025-01-18T00:15:00-08:00"), Some(at(2025, 1, 18, 0, 15)));
        assert_eq!(parse_date_time("2025-01-18 00:15:00-08:00"), Some(at(2025, 1, 18, 0, 15)));
    }

    #[test]
    fn test_parse_date_time_split() {
        assert_eq!(parse_date_time("1/18/2025 12:15 AM"), Some(at(2025, 1, 18, 0, 15)));
        assert_eq!(parse_date_time("1-18-2025   3 pm"), Some(at(2025, 1, 18, 15, 0)));
        assert_eq!(parse_date_time("01/18/25 24:00"), Some(at(2025, 1, 19, 0, 0)));
    }

    #[test]
    fn test_parse_date_time_two_digit_year() {
        assert_eq!(parse_date_time("1/18/25 00:15"), Some(at(2025, 1, 18, 0, 15)));
        assert_eq!(parse_date_time("01/18/25 12:15 AM"), Some(at(2025, 1, 18, 0, 15)));
        assert_eq!(
            parse_date_time("1/18/2025 00:15:30"),
            Some(at(2025, 1, 18, 0, 15) + TimeDelta::seconds(30)),
        );
    }

    #[test]
    fn test_parse_date_time_bare_date() {
        assert_eq!(parse_date_time("2025-01-18"), Some(at(2025, 1, 18, 0, 0)));
    }

    #[test]
    fn test_parse_date_time_invalid() {
        assert_eq!(parse_date_time(""), None);
        assert_eq!(parse_date_time("Total"), None);
        assert_eq!(parse_date_time("1/18/2025 25:00"), None);
    }
}
