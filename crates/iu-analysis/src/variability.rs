//! Within-subject variability of `beta` and its per-group summary
//!
//! For every subject the sample standard deviation of `beta` across blocks is
//! computed (`within_sd`). A subject with a single block has no defined
//! `within_sd`; it is kept as `None` so reports can show it, and it is left
//! out of the group summaries.

use std::collections::BTreeMap;

use iu_stats::{
    confidence::{ConfidenceInterval, MeanConfidenceInterval},
    descriptive,
};
use serde::{Deserialize, Serialize};

use crate::{
    AnalysisError,
    dataset::SubjectId,
    grouping::{Grouped, IuGroup},
};

/// Per-subject variability record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectVariability {
    pub subject: SubjectId,
    #[serde(rename = "IU_group")]
    pub group: IuGroup,
    /// Number of `beta` observations (blocks) of the subject.
    pub n_blocks: usize,
    /// Sample SD of `beta`; `None` with fewer than two blocks.
    pub within_sd: Option<f64>,
}

/// Trial row reduced to what the variability analysis needs.
#[derive(Debug, Clone, PartialEq)]
pub struct BetaObservation {
    pub subject: SubjectId,
    pub beta: f64,
}

impl SubjectVariability {
    /// Computes `within_sd` for every `(subject, group)` pair.
    ///
    /// Rows without a group are skipped; their number is returned alongside
    /// the records, which are ordered by subject.
    #[must_use]
    pub fn from_grouped(rows: &[Grouped<'_, BetaObservation>]) -> (Vec<Self>, usize) {
        let mut betas = BTreeMap::<(&SubjectId, IuGroup), Vec<f64>>::new();
        let mut unassigned = 0;
        for grouped in rows {
            let Some(group) = grouped.group else {
                unassigned += 1;
                continue;
            };
            betas
                .entry((&grouped.row.subject, group))
                .or_default()
                .push(grouped.row.beta);
        }

        let records = betas
            .into_iter()
            .map(|((subject, group), values)| Self {
                subject: subject.clone(),
                group,
                n_blocks: values.len(),
                within_sd: descriptive::sample_std_dev(&values),
            })
            .collect();
        (records, unassigned)
    }
}

/// Summary of `within_sd` within one IU group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    #[serde(rename = "IU_group")]
    pub group: IuGroup,
    /// Subjects with a defined `within_sd`.
    pub n: usize,
    /// Subjects left out because `within_sd` is undefined.
    pub n_undefined: usize,
    pub mean: Option<f64>,
    pub sd: Option<f64>,
    /// Confidence interval of the mean; needs `n >= 2`.
    pub ci: Option<ConfidenceInterval>,
}

impl GroupSummary {
    /// Summarizes every group that has at least one subject, in group order.
    pub fn summarize(records: &[SubjectVariability], alpha: f64) -> Result<Vec<Self>, AnalysisError> {
        let mut groups = BTreeMap::<IuGroup, (Vec<f64>, usize)>::new();
        for record in records {
            let (values, undefined) = groups.entry(record.group).or_default();
            match record.within_sd {
                Some(sd) => values.push(sd),
                None => *undefined += 1,
            }
        }

        groups
            .into_iter()
            .map(|(group, (values, n_undefined))| {
                Self::from_values(group, &values, n_undefined, alpha)
            })
            .collect()
    }

    /// Summary of one group's defined `within_sd` values.
    pub fn from_values(
        group: IuGroup,
        values: &[f64],
        n_undefined: usize,
        alpha: f64,
    ) -> Result<Self, AnalysisError> {
        let n = values.len();
        if n < 2 {
            return Ok(Self {
                group,
                n,
                n_undefined,
                mean: descriptive::mean(values),
                sd: None,
                ci: None,
            });
        }
        let ci = MeanConfidenceInterval::new(values, alpha)?;
        Ok(Self {
            group,
            n,
            n_undefined,
            mean: Some(ci.stats.mean),
            sd: Some(ci.stats.std_dev),
            ci: Some(ci.interval),
        })
    }

    /// Whether every statistic of the summary is defined.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.mean.is_some() && self.sd.is_some() && self.ci.is_some()
    }
}

/// Defined `within_sd` values of one group, in subject order.
#[must_use]
pub fn within_sd_values(records: &[SubjectVariability], group: IuGroup) -> Vec<f64> {
    records
        .iter()
        .filter(|r| r.group == group)
        .filter_map(|r| r.within_sd)
        .collect()
}
