use iu_stats::StatsError;

use crate::{
    dataset::{Column, SubjectId},
    grouping::IuGroup,
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("failed to read CSV data: {source}")]
    Csv { source: csv::Error },
    #[display("required column `{column}` not found (available: {available})")]
    MissingColumn { column: Column, available: String },
    #[display("line {line}: missing value for column `{column}`")]
    MissingValue { line: usize, column: Column },
    #[display("line {line}: `sex` must be 0 (male) or 1 (female), got {value}")]
    InvalidSex { line: usize, value: f64 },
    #[display("cannot assign IU groups: {source}")]
    Grouping { source: StatsError },
    #[display(
        "subject {subject} has {n_blocks} block(s); within-subject SD needs at least 2"
    )]
    UndefinedWithinSd { subject: SubjectId, n_blocks: usize },
    #[display(
        "{purpose} needs at least {required} subjects with a defined within-subject SD \
         in group \"{group}\", found {n}"
    )]
    GroupTooSmall {
        group: IuGroup,
        n: usize,
        required: usize,
        purpose: &'static str,
    },
    #[display("slope regression failed: {source}")]
    Regression { source: StatsError },
    #[display("{source}")]
    Statistics { source: StatsError },
}

impl From<csv::Error> for AnalysisError {
    fn from(source: csv::Error) -> Self {
        Self::Csv { source }
    }
}

impl From<StatsError> for AnalysisError {
    fn from(source: StatsError) -> Self {
        Self::Statistics { source }
    }
}
