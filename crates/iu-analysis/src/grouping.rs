//! Subject grouping by IU z-score
//!
//! Each subject contributes one IU value: the first non-missing one observed
//! in the table. Rows lacking IU (or other measures) still identify their
//! subject, so IU may be recorded on a single row per subject. The values are standardized against the cross-subject mean and
//! sample standard deviation, and the z-score places the subject in one of
//! three groups:
//!
//! ```text
//! z >= +1.0  → High IU (+1SD)
//! z <= -1.0  → Low IU (-1SD)
//! otherwise  → Mid
//! ```
//!
//! Both boundaries are inclusive. The group label is then attached to every
//! trial row of the subject (a left join on `subject`).

use std::{collections::BTreeMap, fmt};

use iu_stats::descriptive::{self, SampleStats};
use serde::{Deserialize, Serialize};

use crate::{
    AnalysisError,
    dataset::{Column, Dataset, SubjectId},
};

/// Absolute z-score at which a subject leaves the Mid group.
pub const Z_THRESHOLD: f64 = 1.0;

/// IU group of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IuGroup {
    #[serde(rename = "High IU (+1SD)")]
    High,
    #[serde(rename = "Low IU (-1SD)")]
    Low,
    #[serde(rename = "Mid")]
    Mid,
}

impl fmt::Display for IuGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.label(), f)
    }
}

impl IuGroup {
    pub const ALL: [Self; 3] = [Self::High, Self::Low, Self::Mid];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High IU (+1SD)",
            Self::Low => "Low IU (-1SD)",
            Self::Mid => "Mid",
        }
    }

    /// Classifies a z-score with inclusive `±1 SD` boundaries.
    ///
    /// # Examples
    ///
    /// ```
    /// # use iu_analysis::grouping::IuGroup;
    /// assert_eq!(IuGroup::from_z_score(1.0), IuGroup::High);
    /// assert_eq!(IuGroup::from_z_score(-1.0), IuGroup::Low);
    /// assert_eq!(IuGroup::from_z_score(0.99), IuGroup::Mid);
    /// ```
    #[must_use]
    pub fn from_z_score(z: f64) -> Self {
        if z >= Z_THRESHOLD {
            Self::High
        } else if z <= -Z_THRESHOLD {
            Self::Low
        } else {
            Self::Mid
        }
    }
}

/// Subject-level IU value and its derived group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectIu {
    pub subject: SubjectId,
    #[serde(rename = "IU")]
    pub iu: f64,
    pub z_score: f64,
    #[serde(rename = "IU_group")]
    pub group: IuGroup,
}

/// Group assignment for every subject, ordered by subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectGrouping {
    /// Cross-subject statistics of IU the z-scores were computed from.
    pub iu_stats: SampleStats,
    pub subjects: Vec<SubjectIu>,
}

impl SubjectGrouping {
    /// Groups every subject of the dataset that has an IU value.
    ///
    /// Rows without a subject or without IU are skipped; no other column is
    /// consulted, so missing values elsewhere never change the grouping.
    ///
    /// # Errors
    ///
    /// Fails when the `subject` or `IU` column is absent, or when the IU
    /// values cannot be standardized.
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, AnalysisError> {
        dataset.require_columns(&[Column::Subject, Column::Iu])?;
        Self::from_observations(
            dataset
                .records()
                .iter()
                .filter_map(|r| Some((r.subject_id()?, r.value(Column::Iu)?))),
        )
    }

    /// Groups subjects from `(subject, IU)` pairs.
    ///
    /// # Arguments
    ///
    /// * `observations` - `(subject, IU)` pairs in table order
    ///
    /// # Returns
    ///
    /// One entry per distinct subject, using the first IU value seen for it,
    /// ordered by subject
    ///
    /// # Errors
    ///
    /// Fails with fewer than two subjects or when every subject has the same
    /// IU value, since z-scores are then undefined.
    pub fn from_observations<'a, I>(observations: I) -> Result<Self, AnalysisError>
    where
        I: IntoIterator<Item = (&'a SubjectId, f64)>,
    {
        let mut first_iu = BTreeMap::<&SubjectId, f64>::new();
        for (subject, iu) in observations {
            first_iu.entry(subject).or_insert(iu);
        }

        let values = first_iu.values().copied().collect::<Vec<_>>();
        let iu_stats =
            SampleStats::from_slice(&values).map_err(|source| AnalysisError::Grouping { source })?;
        let z_scores =
            descriptive::z_scores(&values).map_err(|source| AnalysisError::Grouping { source })?;

        let subjects = first_iu
            .into_iter()
            .zip(z_scores)
            .map(|((subject, iu), z_score)| SubjectIu {
                subject: subject.clone(),
                iu,
                z_score,
                group: IuGroup::from_z_score(z_score),
            })
            .collect();
        Ok(Self { iu_stats, subjects })
    }

    /// Group of a subject, or `None` for an unknown subject.
    #[must_use]
    pub fn group_of(&self, subject: &SubjectId) -> Option<IuGroup> {
        self.subjects
            .binary_search_by(|s| s.subject.cmp(subject))
            .ok()
            .map(|i| self.subjects[i].group)
    }

    /// Number of subjects in a group.
    #[must_use]
    pub fn count(&self, group: IuGroup) -> usize {
        self.subjects.iter().filter(|s| s.group == group).count()
    }

    /// Attaches each row's subject group, leaving unknown subjects unassigned.
    pub fn merge<'a, T, F>(&self, rows: &'a [T], subject_of: F) -> Vec<Grouped<'a, T>>
    where
        F: Fn(&T) -> &SubjectId,
    {
        rows.iter()
            .map(|row| Grouped {
                group: self.group_of(subject_of(row)),
                row,
            })
            .collect()
    }
}

/// A row paired with the group of its subject.
#[derive(Debug, Clone, Copy)]
pub struct Grouped<'a, T> {
    pub group: Option<IuGroup>,
    pub row: &'a T,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouping(values: &[(&str, f64)]) -> SubjectGrouping {
        let ids = values
            .iter()
            .map(|(id, iu)| (SubjectId::from(*id), *iu))
            .collect::<Vec<_>>();
        SubjectGrouping::from_observations(ids.iter().map(|(id, iu)| (id, *iu))).unwrap()
    }

    #[test]
    fn test_threshold_rule() {
        assert_eq!(IuGroup::from_z_score(1.1), IuGroup::High);
        assert_eq!(IuGroup::from_z_score(-1.1), IuGroup::Low);
        assert_eq!(IuGroup::from_z_score(0.0), IuGroup::Mid);
        assert_eq!(IuGroup::from_z_score(1.0), IuGroup::High);
        assert_eq!(IuGroup::from_z_score(-1.0), IuGroup::Low);
        assert_eq!(IuGroup::from_z_score(-0.999), IuGroup::Mid);
    }

    #[test]
    fn test_grouping_with_mean_50_sd_10() {
        // Mean 50 and sample SD 10 for these five values.
        let spread = 79.0_f64.sqrt();
        let groups = grouping(&[
            ("1", 61.0),
            ("2", 39.0),
            ("3", 50.0),
            ("4", 50.0 - spread),
            ("5", 50.0 + spread),
        ]);
        assert!((groups.iu_stats.mean - 50.0).abs() < 1e-9);
        assert!((groups.iu_stats.std_dev - 10.0).abs() < 1e-9);

        assert!((groups.subjects[0].z_score - 1.1).abs() < 1e-9);
        assert_eq!(groups.group_of(&"1".into()), Some(IuGroup::High));
        assert_eq!(groups.group_of(&"2".into()), Some(IuGroup::Low));
        assert_eq!(groups.group_of(&"3".into()), Some(IuGroup::Mid));
        assert_eq!(groups.group_of(&"4".into()), Some(IuGroup::Mid));
        assert_eq!(groups.group_of(&"5".into()), Some(IuGroup::Mid));
        assert_eq!(groups.group_of(&"99".into()), None);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        // Mean 50 and SD 10: the outer values sit exactly at ±1 SD.
        let groups = grouping(&[("a", 40.0), ("b", 50.0), ("c", 60.0)]);
        assert_eq!(groups.subjects[2].z_score, 1.0);
        assert_eq!(groups.group_of(&"a".into()), Some(IuGroup::Low));
        assert_eq!(groups.group_of(&"b".into()), Some(IuGroup::Mid));
        assert_eq!(groups.group_of(&"c".into()), Some(IuGroup::High));

        // Two values are only 1/sqrt(2) SD away from their mean.
        let groups = grouping(&[("a", -1.0), ("b", 1.0)]);
        assert_eq!(groups.count(IuGroup::Mid), 2);
    }

    #[test]
    fn test_groups_partition_subjects() {
        let values = (0..25)
            .map(|i| (i.to_string(), f64::from(i * i % 17)))
            .collect::<Vec<_>>();
        let ids = values
            .iter()
            .map(|(id, iu)| (SubjectId::new(id.as_str()), *iu))
            .collect::<Vec<_>>();
        let groups =
            SubjectGrouping::from_observations(ids.iter().map(|(id, iu)| (id, *iu))).unwrap();
        let total = IuGroup::ALL.iter().map(|g| groups.count(*g)).sum::<usize>();
        assert_eq!(total, 25);
        assert_eq!(groups.subjects.len(), 25);
    }

    #[test]
    fn test_first_observed_iu_is_used() {
        let ids = [
            (SubjectId::from("1"), 10.0),
            (SubjectId::from("1"), 99.0),
            (SubjectId::from("2"), 20.0),
            (SubjectId::from("3"), 30.0),
        ];
        let groups =
            SubjectGrouping::from_observations(ids.iter().map(|(id, iu)| (id, *iu))).unwrap();
        assert_eq!(groups.subjects.len(), 3);
        assert_eq!(groups.subjects[0].iu, 10.0);
        assert!((groups.iu_stats.mean - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_dataset_grouping_ignores_other_columns() {
        // Subject 9 has no usable beta but still counts toward the IU
        // mean (58.33) and SD (22.29).
        let csv = "subject,IU,beta\n\
                   1,60,0.1\n1,60,0.3\n\
                   2,60,0.2\n2,60,0.6\n\
                   3,40,0.4\n3,40,0.5\n\
                   4,40,0.3\n4,40,0.1\n\
                   5,50,0.2\n5,50,0.9\n\
                   9,100,\n";
        let dataset = Dataset::from_csv_reader(csv.as_bytes()).unwrap();
        let groups = SubjectGrouping::from_dataset(&dataset).unwrap();
        assert_eq!(groups.subjects.len(), 6);
        assert!((groups.iu_stats.mean - 350.0 / 6.0).abs() < 1e-9);
        assert_eq!(groups.group_of(&"9".into()), Some(IuGroup::High));
        assert_eq!(groups.group_of(&"1".into()), Some(IuGroup::Mid));
        assert_eq!(groups.group_of(&"2".into()), Some(IuGroup::Mid));
        assert_eq!(groups.count(IuGroup::High), 1);
        assert_eq!(groups.count(IuGroup::Low), 0);
    }

    #[test]
    fn test_dataset_grouping_uses_first_present_iu() {
        let csv = "subject,IU\n\
                   1,\n1,40\n1,99\n\
                   2,50\n2,\n\
                   3,60\n\
                   ,10\n\
                   4,\n";
        let dataset = Dataset::from_csv_reader(csv.as_bytes()).unwrap();
        let groups = SubjectGrouping::from_dataset(&dataset).unwrap();
        let ius = groups
            .subjects
            .iter()
            .map(|s| (s.subject.as_str(), s.iu))
            .collect::<Vec<_>>();
        assert_eq!(ius, [("1", 40.0), ("2", 50.0), ("3", 60.0)]);
        assert_eq!(groups.group_of(&"4".into()), None);
    }

    #[test]
    fn test_dataset_grouping_requires_iu_column() {
        let dataset = Dataset::from_csv_reader("subject,beta\n1,0.2\n".as_bytes()).unwrap();
        assert!(matches!(
            SubjectGrouping::from_dataset(&dataset),
            Err(AnalysisError::MissingColumn {
                column: Column::Iu,
                ..
            })
        ));
    }

    #[test]
    fn test_degenerate_iu() {
        let one = [(SubjectId::from("1"), 50.0)];
        assert!(matches!(
            SubjectGrouping::from_observations(one.iter().map(|(id, iu)| (id, *iu))),
            Err(AnalysisError::Grouping { .. })
        ));
        let same = [(SubjectId::from("1"), 50.0), (SubjectId::from("2"), 50.0)];
        assert!(matches!(
            SubjectGrouping::from_observations(same.iter().map(|(id, iu)| (id, *iu))),
            Err(AnalysisError::Grouping { .. })
        ));
    }

    #[test]
    fn test_merge_attaches_groups() {
        let groups = grouping(&[("1", 40.0), ("2", 50.0), ("3", 60.0)]);
        let rows = [
            (SubjectId::from("3"), 0.1),
            (SubjectId::from("1"), 0.2),
            (SubjectId::from("7"), 0.3),
        ];
        let merged = groups.merge(&rows, |(id, _)| id);
        let labels = merged.iter().map(|g| g.group).collect::<Vec<_>>();
        assert_eq!(labels, [Some(IuGroup::High), Some(IuGroup::Low), None]);
        assert_eq!(merged[1].row.1, 0.2);
    }

    #[test]
    fn test_labels() {
        assert_eq!(IuGroup::High.to_string(), "High IU (+1SD)");
        assert_eq!(
            serde_json::to_string(&IuGroup::Low).unwrap(),
            "\"Low IU (-1SD)\""
        );
        let mut groups = vec![IuGroup::Mid, IuGroup::Low, IuGroup::High];
        groups.sort();
        assert_eq!(groups, IuGroup::ALL);
    }
}
