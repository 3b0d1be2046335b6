//! Regression of `slope` on IU, trait anxiety and sex
//!
//! ```text
//! slope = b0 + b1·IU + b2·STAI_T + b3·sex + ε
//! ```
//!
//! The input holds one row per subject. `sex` is a 0/1 code and enters the
//! model as-is.

use iu_stats::{
    confidence::DEFAULT_ALPHA,
    ols::{DesignMatrix, OlsFit},
};
use serde::{Deserialize, Serialize};

use crate::{
    AnalysisError,
    dataset::{Column, Dataset, MissingPolicy, TrialRecord},
};

/// Predictor columns in model order (after the intercept).
pub const PREDICTORS: [Column; 3] = [Column::Iu, Column::StaiT, Column::Sex];

pub const RESPONSE: Column = Column::Slope;

#[derive(Debug, Clone, Copy)]
struct SlopeRow {
    line: usize,
    iu: f64,
    stai_t: f64,
    sex: f64,
    slope: f64,
}

impl SlopeRow {
    fn from_record(line: usize, record: &TrialRecord) -> Option<Self> {
        Some(Self {
            line,
            iu: record.value(Column::Iu)?,
            stai_t: record.value(Column::StaiT)?,
            sex: record.value(Column::Sex)?,
            slope: record.value(Column::Slope)?,
        })
    }
}

/// Fitted slope model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlopeRegression {
    /// Rows dropped for missing values.
    pub dropped_rows: usize,
    pub fit: OlsFit,
}

impl SlopeRegression {
    /// Fits the model with 95% coefficient intervals.
    pub fn run(dataset: &Dataset, missing: MissingPolicy) -> Result<Self, AnalysisError> {
        Self::with_alpha(dataset, missing, DEFAULT_ALPHA)
    }

    pub fn with_alpha(
        dataset: &Dataset,
        missing: MissingPolicy,
        alpha: f64,
    ) -> Result<Self, AnalysisError> {
        let mut columns = PREDICTORS.to_vec();
        columns.push(RESPONSE);
        let extracted = dataset.extract(&columns, missing, SlopeRow::from_record)?;
        let rows = extracted.rows;

        if let Some(row) = rows.iter().find(|r| r.sex != 0.0 && r.sex != 1.0) {
            return Err(AnalysisError::InvalidSex {
                line: row.line,
                value: row.sex,
            });
        }

        let column = |f: fn(&SlopeRow) -> f64| rows.iter().map(f).collect::<Vec<_>>();
        let fit = DesignMatrix::with_intercept(rows.len())
            .column(Column::Iu.name(), &column(|r: &SlopeRow| r.iu))
            .and_then(|d| d.column(Column::StaiT.name(), &column(|r: &SlopeRow| r.stai_t)))
            .and_then(|d| d.column(Column::Sex.name(), &column(|r: &SlopeRow| r.sex)))
            .and_then(|design| OlsFit::new(&design, &column(|r: &SlopeRow| r.slope), alpha))
            .map_err(|source| AnalysisError::Regression { source })?;

        Ok(Self {
            dropped_rows: extracted.dropped,
            fit,
        })
    }
}

#[cfg(test)]
mod tests {
    use iu_stats::StatsError;

    use super::*;

    fn subject(id: usize, iu: f64, stai_t: f64, sex: f64) -> TrialRecord {
        TrialRecord {
            subject: Some(id.to_string().as_str().into()),
            iu: Some(iu),
            stai_t: Some(stai_t),
            sex: Some(sex),
            slope: Some(0.5 + 0.02 * iu - 0.01 * stai_t + 0.3 * sex),
            beta: None,
        }
    }

    fn planted() -> Vec<TrialRecord> {
        [
            (62.0, 48.0, 0.0),
            (41.0, 35.0, 1.0),
            (55.0, 52.0, 1.0),
            (70.0, 44.0, 0.0),
            (38.0, 39.0, 0.0),
            (66.0, 58.0, 1.0),
            (49.0, 41.0, 1.0),
            (58.0, 37.0, 0.0),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (iu, stai_t, sex))| subject(i + 1, iu, stai_t, sex))
        .collect()
    }

    #[test]
    fn test_recovers_planted_coefficients() {
        let dataset = Dataset::from_records(planted());
        let regression = SlopeRegression::run(&dataset, MissingPolicy::Raise).unwrap();
        let fit = &regression.fit;

        let names = fit.coefficients.iter().map(|c| c.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["const", "IU", "STAI_T", "sex"]);
        for (name, expected) in [("const", 0.5), ("IU", 0.02), ("STAI_T", -0.01), ("sex", 0.3)] {
            let estimate = fit.coefficient(name).unwrap().estimate;
            assert!((estimate - expected).abs() < 1e-8, "{name}: {estimate}");
        }
        assert!(fit.r_squared > 1.0 - 1e-9);
        assert_eq!(fit.n_obs, 8);
        assert_eq!(fit.df_model, 3);
        assert_eq!(fit.df_resid, 4);
        assert_eq!(regression.dropped_rows, 0);
    }

    #[test]
    fn test_constant_sex_is_rank_deficient() {
        let records = planted()
            .into_iter()
            .map(|mut r| {
                r.sex = Some(1.0);
                r
            })
            .collect();
        let err = SlopeRegression::run(&Dataset::from_records(records), MissingPolicy::Raise)
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Regression {
                source: StatsError::RankDeficient {
                    rank: 3,
                    columns: 4
                }
            }
        ));
    }

    #[test]
    fn test_invalid_sex_code() {
        let mut records = planted();
        records[2].sex = Some(2.0);
        let err = SlopeRegression::run(&Dataset::from_records(records), MissingPolicy::Raise)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidSex { line: 4, value } if value == 2.0));
    }

    #[test]
    fn test_missing_values() {
        let mut records = planted();
        records.push(TrialRecord {
            slope: None,
            ..subject(9, 52.0, 47.0, 1.0)
        });
        let dataset = Dataset::from_records(records);

        let err = SlopeRegression::run(&dataset, MissingPolicy::Raise).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MissingValue {
                line: 10,
                column: Column::Slope
            }
        ));

        let regression = SlopeRegression::run(&dataset, MissingPolicy::Drop).unwrap();
        assert_eq!(regression.dropped_rows, 1);
        assert_eq!(regression.fit.n_obs, 8);
    }

    #[test]
    fn test_missing_column() {
        let csv = "subject,IU,sex,slope\n1,50,0,0.1\n2,60,1,0.2\n";
        let dataset = Dataset::from_csv_reader(csv.as_bytes()).unwrap();
        let err = SlopeRegression::run(&dataset, MissingPolicy::Raise).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MissingColumn {
                column: Column::StaiT,
                ..
            }
        ));
    }

    #[test]
    fn test_too_few_subjects() {
        let records = planted().into_iter().take(4).collect();
        let err = SlopeRegression::run(&Dataset::from_records(records), MissingPolicy::Raise)
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Regression {
                source: StatsError::NoResidualDegreesOfFreedom {
                    observations: 4,
                    parameters: 4
                }
            }
        ));
    }
}
