use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use ratehound::{
    billing::MonthlyBreakdown,
    comparison::{ComparisonResult, GasComparisonResult},
    config::Roster,
    core::series::Aggregate,
    ingest::{Commodity, ParsedReadings},
    quantity::{cost::Cost, usage::Usage},
    statistics::Coverage,
    tariff::GasTariff,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

fn savings_color(savings: Cost) -> Color {
    if savings >= Cost::ONE_CENT {
        Color::Green
    } else if savings <= -Cost::ONE_CENT {
        Color::Red
    } else {
        Color::Reset
    }
}

#[must_use]
pub fn build_comparison_table(
    results: &[ComparisonResult],
    roster: &Roster,
    current_id: &str,
) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "#",
        "Tariff",
        "Name",
        "Usage",
        "Total",
        "Months",
        "Per month",
        "Savings",
    ]);
    for (rank, result) in results.iter().enumerate() {
        let is_current = result.tariff_id == current_id;
        let name = roster.get(&result.tariff_id).map_or("", |tariff| tariff.name.as_str());
        let mut id_cell = Cell::new(&result.tariff_id);
        if is_current {
            id_cell = id_cell.add_attribute(Attribute::Bold);
        }
        table.add_row(vec![
            Cell::new(rank + 1).add_attribute(Attribute::Dim),
            id_cell,
            Cell::new(name),
            Cell::new(result.total_usage).set_alignment(CellAlignment::Right),
            Cell::new(result.total_cost.round_to_cents()).set_alignment(CellAlignment::Right),
            Cell::new(result.breakdown.len()).set_alignment(CellAlignment::Right),
            Cell::new(result.estimated_monthly_cost.round_to_cents())
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Bold),
            Cell::new(result.savings_vs_current.round_to_cents())
                .set_alignment(CellAlignment::Right)
                .fg(savings_color(result.savings_vs_current)),
        ]);
    }
    table
}

#[must_use]
pub fn build_breakdown_table(breakdown: &[MonthlyBreakdown], commodity: Commodity) -> Table {
    let median_cost = breakdown.iter().map(|month| month.cost).median().unwrap_or(Cost::ZERO);
    let mut table = new_table();
    table.set_header(vec!["Month".to_string(), commodity.unit().to_string(), "Cost".to_string()]);
    for month in breakdown {
        table.add_row(vec![
            Cell::new(month.month),
            Cell::new(month.usage).set_alignment(CellAlignment::Right),
            Cell::new(month.cost.round_to_cents())
                .set_alignment(CellAlignment::Right)
                .fg(if month.cost > median_cost { Color::Red } else { Color::Green }),
        ]);
    }
    table
}

#[must_use]
pub fn build_gas_table(result: &GasComparisonResult, tariff: &GasTariff) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Tariff", "Name", "Usage", "Total", "Months", "Per month"]);
    table.add_row(vec![
        Cell::new(&result.tariff_id).add_attribute(Attribute::Bold),
        Cell::new(&tariff.name),
        Cell::new(result.total_usage).set_alignment(CellAlignment::Right),
        Cell::new(result.total_cost.round_to_cents()).set_alignment(CellAlignment::Right),
        Cell::new(result.months).set_alignment(CellAlignment::Right),
        Cell::new(result.estimated_monthly_cost.round_to_cents())
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold),
    ]);
    table
}

#[must_use]
pub fn build_coverage_table(
    parsed: &ParsedReadings,
    coverage: &Coverage,
    commodity: Commodity,
) -> Table {
    let unit = commodity.unit();
    let mut table = new_table();
    table.set_header(vec![commodity.to_string(), String::new()]);
    table.add_row(vec![Cell::new("First reading"), Cell::new(coverage.first)]);
    table.add_row(vec![Cell::new("Last reading"), Cell::new(coverage.last)]);
    table.add_row(vec![
        Cell::new("Span"),
        Cell::new(format!("{:.1} days", coverage.span.as_seconds_f64() / 86400.0)),
    ]);
    table.add_row(vec![
        Cell::new("Interval"),
        Cell::new(coverage.interval.map_or_else(
            || "unknown".to_string(),
            |interval| format!("{} min", interval.num_minutes()),
        )),
    ]);
    table.add_row(vec![Cell::new("Readings"), Cell::new(coverage.n_readings)]);
    table.add_row(vec![
        Cell::new("Total usage"),
        Cell::new(format!("{} {unit}", coverage.total_usage)),
    ]);
    table.add_row(vec![
        Cell::new("Daily average"),
        Cell::new(coverage.average_daily_usage.map_or_else(
            || "unknown".to_string(),
            |usage| format!("{usage} {unit}"),
        )),
    ]);
    table.add_row(vec![
        Cell::new("Peak"),
        Cell::new(format!("{} {unit} at {}", coverage.peak.value, coverage.peak.timestamp)),
    ]);
    for warning in &parsed.warnings {
        table.add_row(vec![
            Cell::new("Warning").fg(Color::DarkYellow),
            Cell::new(warning).fg(Color::DarkYellow),
        ]);
    }
    table
}

/// Average usage per reading by hour of day, highlighting hours above the median.
#[must_use]
pub fn build_hourly_profile_table(hourly_average: &[Option<Usage>; 24]) -> Table {
    let median = hourly_average.iter().flatten().copied().median().unwrap_or(Usage::ZERO);
    let mut table = new_table();
    table.set_header(vec!["Hour", "Average"]);
    for (hour, average) in hourly_average.iter().enumerate() {
        let cell = match average {
            Some(average) => Cell::new(average)
                .set_alignment(CellAlignment::Right)
                .fg(if *average > median { Color::Red } else { Color::Green }),
            None => Cell::new("–").set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
        };
        table.add_row(vec![Cell::new(format!("{hour:02}:00")), cell]);
    }
    table
}

#[must_use]
pub fn build_roster_table(roster: &Roster) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Tariff", "Name", "Kind", "Period", "Hours", "Rate", "Summer", "Fixed"]);
    for tariff in &roster.tariffs {
        let is_current = roster.current.as_deref() == Some(tariff.id.as_str());
        for (i, period) in tariff.periods.iter().enumerate() {
            let (id, name, kind, fixed) = if i == 0 {
                (
                    tariff.id.clone(),
                    tariff.name.clone(),
                    format!("{:?}", tariff.kind).to_lowercase(),
                    tariff.fixed_monthly_charge.to_string(),
                )
            } else {
                Default::default()
            };
            let mut id_cell = Cell::new(id);
            if is_current {
                id_cell = id_cell.add_attribute(Attribute::Bold);
            }
            table.add_row(vec![
                id_cell,
                Cell::new(name),
                Cell::new(kind).add_attribute(Attribute::Dim),
                Cell::new(&period.name),
                Cell::new(period.hours()),
                Cell::new(period.rate).set_alignment(CellAlignment::Right),
                Cell::new(period.summer_rate.map_or_else(String::new, |rate| rate.to_string()))
                    .set_alignment(CellAlignment::Right),
                Cell::new(fixed).set_alignment(CellAlignment::Right),
            ]);
        }
    }
    if let Some(gas) = &roster.gas {
        table.add_row(vec![
            Cell::new(&gas.id),
            Cell::new(&gas.name),
            Cell::new("gas").add_attribute(Attribute::Dim),
            Cell::new(format!("first {} therms", gas.baseline_allowance)),
            Cell::new("00-23"),
            Cell::new(gas.baseline_rate).set_alignment(CellAlignment::Right),
            Cell::new(format!("excess {}", gas.excess_rate)).set_alignment(CellAlignment::Right),
            Cell::new(gas.fixed_monthly_charge).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
