//! Text rendering of the variability results

use iu_analysis::{
    comparison::{Field, GroupComparison},
    variability::GroupSummary,
};

use crate::util::fmt_stat;

fn summary_header() -> String {
    format!(
        "  {:<16} {:>10} {:>10} {:>4} {:>10} {:>10} {:>9}",
        "IU_group", "mean", "sd", "n", "ci_low", "ci_high", "excluded"
    )
}

fn summary_row(summary: &GroupSummary) -> String {
    let (ci_low, ci_high) = match summary.ci {
        Some(ci) => (Some(ci.lower), Some(ci.upper)),
        None => (None, None),
    };
    format!(
        "  {:<16} {:>10} {:>10} {:>4} {:>10} {:>10} {:>9}",
        summary.group.label(),
        fmt_stat(summary.mean, 4),
        fmt_stat(summary.sd, 4),
        summary.n,
        fmt_stat(ci_low, 4),
        fmt_stat(ci_high, 4),
        summary.n_undefined,
    )
}

/// Print the per-group summary of within-subject SD
pub(super) fn print_summary_table(summaries: &[GroupSummary]) {
    let header = summary_header();
    println!("{header}");
    println!("  {}", "-".repeat(header.len() - 2));
    for summary in summaries {
        println!("{}", summary_row(summary));
    }
}

fn comparison_line(key: &str, field: Field) -> String {
    match field {
        Field::Float(v) => format!("{key:>12}: {v:.4}"),
        Field::Count(n) => format!("{key:>12}: {n}"),
    }
}

/// Print the Welch test result, one value per line
pub(super) fn print_comparison(comparison: &GroupComparison) {
    for (key, field) in comparison.fields() {
        println!("{}", comparison_line(key, field));
    }
}
