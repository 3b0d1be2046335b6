use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use iu_analysis::dataset::MissingPolicy;

use self::{regress::RegressArg, variability::VariabilityArg};

mod regress;
mod variability;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Analysis to run
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Regress slope on IU, STAI_T and sex (OLS with intercept)
    Regress(#[clap(flatten)] RegressArg),
    /// Compare within-subject variability of beta between IU groups
    Variability(#[clap(flatten)] VariabilityArg),
}

/// Options shared by every analysis
#[derive(Debug, Clone, Args)]
pub(crate) struct InputArg {
    /// Path to the trial data CSV file
    pub data: PathBuf,

    /// Drop rows with missing values in required columns instead of failing
    #[arg(long)]
    pub drop_missing: bool,

    /// Also write the full result as JSON to this path (`-` for stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl InputArg {
    pub fn missing_policy(&self) -> MissingPolicy {
        if self.drop_missing {
            MissingPolicy::Drop
        } else {
            MissingPolicy::Raise
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Regress(arg) => regress::run(&arg)?,
        Mode::Variability(arg) => variability::run(&arg)?,
    }
    Ok(())
}
