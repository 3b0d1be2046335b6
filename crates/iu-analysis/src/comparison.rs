//! High vs Low IU comparison of within-subject variability

use iu_stats::welch::WelchTest;
use serde::{Deserialize, Serialize};

use crate::{
    AnalysisError,
    grouping::IuGroup,
    variability::{SubjectVariability, within_sd_values},
};

/// Welch t-test of `within_sd` between two IU groups (`first - second`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupComparison {
    pub first: IuGroup,
    pub second: IuGroup,
    pub test: WelchTest,
}

impl GroupComparison {
    /// Compares High IU against Low IU.
    pub fn high_vs_low(records: &[SubjectVariability], alpha: f64) -> Result<Self, AnalysisError> {
        Self::between(records, IuGroup::High, IuGroup::Low, alpha)
    }

    /// Compares two groups using their defined `within_sd` values.
    ///
    /// # Errors
    ///
    /// Each group needs at least two subjects with a defined `within_sd`.
    pub fn between(
        records: &[SubjectVariability],
        first: IuGroup,
        second: IuGroup,
        alpha: f64,
    ) -> Result<Self, AnalysisError> {
        let a = group_values(records, first)?;
        let b = group_values(records, second)?;
        let test = WelchTest::new(&a, &b, alpha)?;
        Ok(Self {
            first,
            second,
            test,
        })
    }

    /// Result scalars in report order.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, Field)> {
        let test = &self.test;
        vec![
            ("t", Field::Float(test.t)),
            ("p", Field::Float(test.p)),
            ("df_welch", Field::Float(test.df)),
            ("mean_diff", Field::Float(test.mean_diff)),
            ("diff_ci_low", Field::Float(test.diff_ci.lower)),
            ("diff_ci_high", Field::Float(test.diff_ci.upper)),
            ("hedges_g", Field::Float(test.hedges_g)),
            ("n_high", Field::Count(test.a.n)),
            ("n_low", Field::Count(test.b.n)),
            ("mean_high", Field::Float(test.a.mean)),
            ("mean_low", Field::Float(test.b.mean)),
        ]
    }
}

/// A scalar of the comparison result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field {
    Float(f64),
    Count(usize),
}

fn group_values(records: &[SubjectVariability], group: IuGroup) -> Result<Vec<f64>, AnalysisError> {
    let values = within_sd_values(records, group);
    if values.len() < 2 {
        return Err(AnalysisError::GroupTooSmall {
            group,
            n: values.len(),
            required: 2,
            purpose: "Welch t-test",
        });
    }
    Ok(values)
}
