use std::path::{Path, PathBuf};

use clap::Parser;
use ratehound::{
    ingest::{Commodity, parse},
    prelude::*,
    statistics::Coverage,
};

use crate::{
    cli::read_export,
    tables::{build_coverage_table, build_hourly_profile_table},
};

#[derive(Parser)]
pub struct InspectArgs {
    #[clap(long, env = "ELECTRICITY_CSV", required_unless_present = "gas")]
    electricity: Option<PathBuf>,

    #[clap(long, env = "GAS_CSV")]
    gas: Option<PathBuf>,
}

impl InspectArgs {
    pub fn run(self) -> Result {
        if let Some(path) = &self.electricity {
            inspect(path, Commodity::Electricity)?;
        }
        if let Some(path) = &self.gas {
            inspect(path, Commodity::Gas)?;
        }
        Ok(())
    }
}

fn inspect(path: &Path, commodity: Commodity) -> Result {
    let parsed = parse(&read_export(path)?, commodity)
        .with_context(|| format!("failed to parse `{}`", path.display()))?;
    let coverage = Coverage::from_readings(&parsed.readings).context("no readings")?;
    println!("{}", build_coverage_table(&parsed, &coverage, commodity));
    println!("{}", build_hourly_profile_table(&coverage.hourly_average));
    Ok(())
}
