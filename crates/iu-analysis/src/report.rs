//! End-to-end variability analysis
//!
//! [`VariabilityReport::run`] chains the steps of the procedure:
//!
//! 1. group subjects by IU z-score, using every row that has an IU value
//! 2. extract `subject` and `beta` from the trial rows
//! 3. attach the group to every extracted row (a left join on `subject`)
//! 4. compute each subject's within-subject SD of `beta`
//! 5. summarize `within_sd` per group
//! 6. compare High and Low IU with Welch's t-test

use iu_stats::confidence::{self, DEFAULT_ALPHA};
use serde::{Deserialize, Serialize};

use crate::{
    AnalysisError,
    comparison::GroupComparison,
    dataset::{Column, Dataset, MissingPolicy},
    grouping::{IuGroup, SubjectGrouping},
    variability::{BetaObservation, GroupSummary, SubjectVariability},
};

/// Columns the variability analysis reads.
pub const VARIABILITY_COLUMNS: [Column; 3] = [Column::Subject, Column::Iu, Column::Beta];

/// Columns every trial row must have; IU is only needed once per subject.
const BETA_COLUMNS: [Column; 2] = [Column::Subject, Column::Beta];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariabilityOptions {
    /// Significance level for the group intervals and the Welch test.
    pub alpha: f64,
    /// Fail instead of excluding subjects with an undefined `within_sd` or
    /// reporting an undefined group statistic.
    pub strict: bool,
    pub missing: MissingPolicy,
}

impl Default for VariabilityOptions {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            strict: false,
            missing: MissingPolicy::Raise,
        }
    }
}

/// Everything the variability analysis produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariabilityReport {
    pub alpha: f64,
    /// Rows dropped for missing values.
    pub dropped_rows: usize,
    /// Rows whose subject received no group.
    pub unassigned_rows: usize,
    pub grouping: SubjectGrouping,
    pub subjects: Vec<SubjectVariability>,
    pub summaries: Vec<GroupSummary>,
    pub comparison: GroupComparison,
}

impl VariabilityReport {
    pub fn run(dataset: &Dataset, options: &VariabilityOptions) -> Result<Self, AnalysisError> {
        confidence::validate_alpha(options.alpha)?;
        dataset.require_columns(&VARIABILITY_COLUMNS)?;

        let grouping = SubjectGrouping::from_dataset(dataset)?;
        let extracted = dataset.extract(&BETA_COLUMNS, options.missing, |_, record| {
            Some(BetaObservation {
                subject: record.subject_id()?.clone(),
                beta: record.value(Column::Beta)?,
            })
        })?;
        let rows = extracted.rows;
        let grouped = grouping.merge(&rows, |r| &r.subject);
        let (subjects, unassigned_rows) = SubjectVariability::from_grouped(&grouped);

        if options.strict
            && let Some(record) = subjects.iter().find(|r| r.within_sd.is_none())
        {
            return Err(AnalysisError::UndefinedWithinSd {
                subject: record.subject.clone(),
                n_blocks: record.n_blocks,
            });
        }

        let summaries = GroupSummary::summarize(&subjects, options.alpha)?;
        if options.strict {
            check_complete(&summaries)?;
        }
        let comparison = GroupComparison::high_vs_low(&subjects, options.alpha)?;

        Ok(Self {
            alpha: options.alpha,
            dropped_rows: extracted.dropped,
            unassigned_rows,
            grouping,
            subjects,
            summaries,
            comparison,
        })
    }

    /// Summary of one group, if any subject belongs to it.
    #[must_use]
    pub fn summary(&self, group: IuGroup) -> Option<&GroupSummary> {
        self.summaries.iter().find(|s| s.group == group)
    }

    /// Number of subjects left out for an undefined `within_sd`.
    #[must_use]
    pub fn excluded_subjects(&self) -> usize {
        self.summaries.iter().map(|s| s.n_undefined).sum()
    }
}

fn check_complete(summaries: &[GroupSummary]) -> Result<(), AnalysisError> {
    match summaries.iter().find(|s| !s.is_complete()) {
        Some(summary) => Err(AnalysisError::GroupTooSmall {
            group: summary.group,
            n: summary.n,
            required: 2,
            purpose: "group summary",
        }),
        None => Ok(()),
    }
}
