//! Slope regression command
//!
//! Fits `slope ~ IU + STAI_T + sex` and prints a regression summary.

use clap::Args;
use iu_analysis::{
    dataset::Column,
    regression::{PREDICTORS, RESPONSE, SlopeRegression},
};
use iu_stats::ols::OlsFit;

use crate::{command::InputArg, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct RegressArg {
    #[command(flatten)]
    pub input: InputArg,
}

const RULE_WIDTH: usize = 78;

pub(crate) fn run(arg: &RegressArg) -> anyhow::Result<()> {
    let dataset = util::read_dataset_file(&arg.input.data)?;

    eprintln!("Fitting OLS model...");
    let regression = SlopeRegression::run(&dataset, arg.input.missing_policy())?;
    if regression.dropped_rows > 0 {
        eprintln!("Dropped {} rows with missing values", regression.dropped_rows);
    }
    eprintln!("Model fitted on {} observations", regression.fit.n_obs);

    print_summary(&regression.fit);

    if let Some(path) = &arg.input.output {
        util::Output::save_json(&regression, path)?;
    }
    Ok(())
}

fn model_formula() -> String {
    let predictors = PREDICTORS.map(Column::name).join(" + ");
    format!("{RESPONSE} ~ {predictors}")
}

fn print_stat_pair(left: (&str, String), right: (&str, String)) {
    println!(
        "  {:<18} {:>16}    {:<20} {:>16}",
        left.0, left.1, right.0, right.1
    );
}

fn print_summary(fit: &OlsFit) {
    println!("OLS Regression Results: {}", model_formula());
    println!("{}", "=".repeat(RULE_WIDTH));
    print_stat_pair(
        ("No. Observations:", fit.n_obs.to_string()),
        ("R-squared:", format!("{:.4}", fit.r_squared)),
    );
    print_stat_pair(
        ("Df Residuals:", fit.df_resid.to_string()),
        ("Adj. R-squared:", format!("{:.4}", fit.adj_r_squared)),
    );
    print_stat_pair(
        ("Df Model:", fit.df_model.to_string()),
        ("F-statistic:", util::fmt_stat(fit.f_statistic, 4)),
    );
    print_stat_pair(
        ("Log-Likelihood:", format!("{:.4}", fit.log_likelihood)),
        ("Prob (F-statistic):", util::fmt_stat(fit.f_p_value, 4)),
    );
    print_stat_pair(
        ("AIC:", format!("{:.4}", fit.aic)),
        ("BIC:", format!("{:.4}", fit.bic)),
    );
    println!("{}", "=".repeat(RULE_WIDTH));

    let lower = format!("[{:.3}", fit.alpha / 2.0);
    let upper = format!("{:.3}]", 1.0 - fit.alpha / 2.0);
    println!(
        "  {:<10} {:>10} {:>10} {:>9} {:>8} {:>12} {:>12}",
        "", "coef", "std err", "t", "P>|t|", lower, upper
    );
    println!("  {}", "-".repeat(RULE_WIDTH - 2));
    for coef in &fit.coefficients {
        println!(
            "  {:<10} {:>10.4} {:>10.4} {:>9.3} {:>8.3} {:>12.4} {:>12.4}",
            coef.name, coef.estimate, coef.std_error, coef.t, coef.p, coef.ci.lower, coef.ci.upper
        );
    }
    println!("{}", "=".repeat(RULE_WIDTH));
    println!(
        "  Residual std. error: {:.4}    Cond. No.: {:.1}",
        fit.residual_std_error, fit.condition_number
    );
}
