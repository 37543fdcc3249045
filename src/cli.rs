mod compare;
mod inspect;
mod tariffs;

use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand, ValueEnum};
use ratehound::{config::Roster, prelude::*};

use crate::cli::{compare::CompareArgs, inspect::InspectArgs, tariffs::TariffsArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: cost the electricity export under every tariff and rank them.
    #[clap(name = "compare")]
    Compare(Box<CompareArgs>),

    /// Summarize what an export covers, without costing it.
    #[clap(name = "inspect")]
    Inspect(InspectArgs),

    /// Show the tariff roster after validation.
    #[clap(name = "tariffs")]
    Tariffs(TariffsArgs),
}

impl Command {
    pub fn run(self) -> Result {
        match self {
            Self::Compare(args) => args.run(),
            Self::Inspect(args) => args.run(),
            Self::Tariffs(args) => args.run(),
        }
    }
}

#[derive(Parser)]
pub struct RosterArgs {
    /// Tariff roster in TOML. Defaults to the built-in roster.
    #[clap(long = "roster", env = "TARIFF_ROSTER")]
    pub path: Option<PathBuf>,
}

impl RosterArgs {
    pub fn load(&self) -> Result<Roster> {
        Roster::load(self.path.as_deref())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

fn read_export(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read `{}`", path.display()))
}
