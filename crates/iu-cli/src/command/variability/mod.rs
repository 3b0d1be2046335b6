//! Within-subject variability command
//!
//! Groups subjects by IU z-score, computes the SD of `beta` across each
//! subject's blocks, summarizes it per group and compares High vs Low IU.

mod table;

use clap::Args;
use iu_analysis::{
    grouping::IuGroup,
    report::{VariabilityOptions, VariabilityReport},
};
use iu_stats::confidence::DEFAULT_ALPHA;

use crate::{command::InputArg, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct VariabilityArg {
    #[command(flatten)]
    pub input: InputArg,

    /// Significance level for confidence intervals
    #[arg(long, default_value_t = DEFAULT_ALPHA)]
    pub alpha: f64,

    /// Fail on subjects with a single block or groups too small to summarize
    #[arg(long)]
    pub strict: bool,
}

pub(crate) fn run(arg: &VariabilityArg) -> anyhow::Result<()> {
    let dataset = util::read_dataset_file(&arg.input.data)?;
    let options = VariabilityOptions {
        alpha: arg.alpha,
        strict: arg.strict,
        missing: arg.input.missing_policy(),
    };

    eprintln!("Computing IU groups and within-subject SD...");
    let report = VariabilityReport::run(&dataset, &options)?;
    print_progress(&report);

    println!("Within-subject SD (beta across blocks) by IU group");
    table::print_summary_table(&report.summaries);
    println!();

    println!("High vs Low IU: Welch t-test on within-subject SD");
    table::print_comparison(&report.comparison);

    if let Some(path) = &arg.input.output {
        util::Output::save_json(&report, path)?;
    }
    Ok(())
}

fn print_progress(report: &VariabilityReport) {
    if report.dropped_rows > 0 {
        eprintln!("Dropped {} rows with missing values", report.dropped_rows);
    }
    if report.unassigned_rows > 0 {
        eprintln!("Skipped {} rows without an IU group", report.unassigned_rows);
    }
    let counts = IuGroup::ALL
        .iter()
        .map(|g| format!("{g}: {}", report.grouping.count(*g)))
        .collect::<Vec<_>>();
    eprintln!(
        "Grouped {} subjects ({})",
        report.grouping.subjects.len(),
        counts.join(", ")
    );
    let excluded = report.excluded_subjects();
    if excluded > 0 {
        eprintln!("Excluded {excluded} subjects with a single block (within-subject SD undefined)");
    }
}
