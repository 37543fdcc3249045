use std::path::PathBuf;

use clap::Parser;
use ratehound::{
    comparison::{ComparisonResult, GasComparisonResult, calculate_gas_comparison, compare_tariffs},
    core::HourRange,
    ingest::{Commodity, parse_electricity, parse_gas},
    overlay::{ScheduledLoad, apply_overlay},
    prelude::*,
    quantity::power::Kilowatts,
};
use serde::Serialize;

use crate::{
    cli::{OutputFormat, RosterArgs, read_export},
    tables::{build_breakdown_table, build_comparison_table, build_gas_table},
};

#[derive(Parser)]
pub struct CompareArgs {
    /// Electricity interval export (Green Button CSV).
    #[clap(long, env = "ELECTRICITY_CSV")]
    electricity: PathBuf,

    /// Gas interval export, costed under the roster's gas tariff.
    #[clap(long, env = "GAS_CSV")]
    gas: Option<PathBuf>,

    #[clap(flatten)]
    roster: RosterArgs,

    /// Tariff currently billed, overrides the roster's `current`.
    #[clap(long, env = "CURRENT_TARIFF")]
    current: Option<String>,

    #[clap(flatten)]
    extra_load: ExtraLoadArgs,

    #[clap(long, env = "OUTPUT_FORMAT", value_enum, default_value = "table")]
    format: OutputFormat,
}

/// Hypothetical load added on top of the export, for example a new electric vehicle.
#[derive(Parser)]
struct ExtraLoadArgs {
    /// Extra power draw in kilowatts.
    #[clap(long = "extra-load-kw", env = "EXTRA_LOAD_KW", requires = "extra_load_hours")]
    extra_load_power: Option<Kilowatts>,

    /// Inclusive hours of day of the extra load, like `22-5`.
    #[clap(long = "extra-load-hours", env = "EXTRA_LOAD_HOURS", requires = "extra_load_power")]
    extra_load_hours: Option<HourRange>,
}

#[derive(Serialize)]
struct Report<'a> {
    current: &'a str,
    warnings: &'a [String],
    electricity: &'a [ComparisonResult],

    #[serde(skip_serializing_if = "Option::is_none")]
    gas: Option<&'a GasComparisonResult>,
}

impl CompareArgs {
    pub fn run(self) -> Result {
        let roster = self.roster.load()?;
        let current_id = self
            .current
            .clone()
            .or_else(|| roster.current.clone())
            .or_else(|| roster.tariffs.first().map(|tariff| tariff.id.clone()))
            .context("the roster has no tariffs")?;

        let parsed = parse_electricity(&read_export(&self.electricity)?)
            .with_context(|| format!("failed to parse `{}`", self.electricity.display()))?;
        let readings = match (self.extra_load.extra_load_power, self.extra_load.extra_load_hours) {
            (Some(power), Some(hours)) => {
                let interval =
                    parsed.interval.unwrap_or_else(|| Commodity::Electricity.nominal_interval());
                info!(%power, %hours, "adding extra load");
                apply_overlay(&parsed.readings, &ScheduledLoad { power, hours, interval })
            }
            _ => parsed.readings.clone(),
        };
        let results = compare_tariffs(&readings, &current_id, &roster.tariffs)?;

        let gas = match (&self.gas, &roster.gas) {
            (Some(path), Some(tariff)) => {
                let parsed = parse_gas(&read_export(path)?)
                    .with_context(|| format!("failed to parse `{}`", path.display()))?;
                Some((calculate_gas_comparison(&parsed.readings, tariff), tariff))
            }
            (Some(_), None) => bail!("the roster has no gas tariff"),
            (None, _) => None,
        };

        match self.format {
            OutputFormat::Table => {
                println!("{}", build_comparison_table(&results, &roster, &current_id));
                if let Some(cheapest) = results.first() {
                    println!("{}", build_breakdown_table(&cheapest.breakdown, Commodity::Electricity));
                }
                if let Some((result, tariff)) = &gas {
                    println!("{}", build_gas_table(result, tariff));
                    println!("{}", build_breakdown_table(&result.breakdown, Commodity::Gas));
                }
            }
            OutputFormat::Json => {
                let report = Report {
                    current: &current_id,
                    warnings: &parsed.warnings,
                    electricity: &results,
                    gas: gas.as_ref().map(|(result, _)| result),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Ok(())
    }
}
