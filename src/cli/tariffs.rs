use clap::Parser;
use ratehound::prelude::*;

use crate::{cli::RosterArgs, tables::build_roster_table};

#[derive(Parser)]
pub struct TariffsArgs {
    #[clap(flatten)]
    roster: RosterArgs,
}

impl TariffsArgs {
    pub fn run(self) -> Result {
        let roster = self.roster.load()?;
        info!(n_tariffs = roster.tariffs.len(), has_gas = roster.gas.is_some(), "loaded");
        println!("{}", build_roster_table(&roster));
        Ok(())
    }
}
