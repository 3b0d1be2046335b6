//! Trial-level dataset loading and validation
//!
//! The input is a table with one row per observation. Columns are matched by
//! exact name; extra columns are ignored and each procedure only asks for the
//! columns it needs:
//!
//! ```text
//! subject,IU,STAI_T,sex,slope,beta
//! 1,62,48,0,-0.12,0.81
//! 1,62,48,0,-0.12,0.64
//! 2,41,35,1,-0.31,0.22
//! ```
//!
//! Empty cells (and `NaN`) are missing values. How rows with missing values
//! are treated is controlled by [`MissingPolicy`].

use std::{cmp::Ordering, fmt, io};

use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// A named column of the input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    #[serde(rename = "subject")]
    Subject,
    #[serde(rename = "IU")]
    Iu,
    #[serde(rename = "STAI_T")]
    StaiT,
    #[serde(rename = "sex")]
    Sex,
    #[serde(rename = "slope")]
    Slope,
    #[serde(rename = "beta")]
    Beta,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.name(), f)
    }
}

impl Column {
    pub const ALL: [Self; 6] = [
        Self::Subject,
        Self::Iu,
        Self::StaiT,
        Self::Sex,
        Self::Slope,
        Self::Beta,
    ];

    /// Header name of the column in the input file.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Iu => "IU",
            Self::StaiT => "STAI_T",
            Self::Sex => "sex",
            Self::Slope => "slope",
            Self::Beta => "beta",
        }
    }
}

/// Subject identifier.
///
/// Identifiers that parse as integers sort numerically and come before
/// non-numeric identifiers, so `"2"` sorts before `"10"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Ord for SubjectId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for SubjectId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One row of the input table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub subject: Option<SubjectId>,
    #[serde(rename = "IU")]
    pub iu: Option<f64>,
    #[serde(rename = "STAI_T")]
    pub stai_t: Option<f64>,
    /// Binary code: 0 = male, 1 = female.
    pub sex: Option<f64>,
    pub slope: Option<f64>,
    pub beta: Option<f64>,
}

impl TrialRecord {
    /// Numeric value of a column, treating `NaN` and infinities as missing.
    ///
    /// Always `None` for [`Column::Subject`].
    #[must_use]
    pub fn value(&self, column: Column) -> Option<f64> {
        let value = match column {
            Column::Subject => None,
            Column::Iu => self.iu,
            Column::StaiT => self.stai_t,
            Column::Sex => self.sex,
            Column::Slope => self.slope,
            Column::Beta => self.beta,
        };
        value.filter(|v| v.is_finite())
    }

    /// Subject identifier, treating a blank cell as missing.
    #[must_use]
    pub fn subject_id(&self) -> Option<&SubjectId> {
        self.subject.as_ref().filter(|s| !s.0.is_empty())
    }

    #[must_use]
    pub fn is_present(&self, column: Column) -> bool {
        match column {
            Column::Subject => self.subject_id().is_some(),
            _ => self.value(column).is_some(),
        }
    }

    /// First of `columns` that has no value in this row.
    #[must_use]
    pub fn first_missing(&self, columns: &[Column]) -> Option<Column> {
        columns.iter().copied().find(|c| !self.is_present(*c))
    }
}

/// What to do with a row lacking a value in a required column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingPolicy {
    /// Abort with an error naming the row and column.
    #[default]
    Raise,
    /// Drop the row (listwise deletion) and count it.
    Drop,
}

/// Rows extracted from a dataset for one procedure.
#[derive(Debug, Clone)]
pub struct Extracted<T> {
    pub rows: Vec<T>,
    /// Rows skipped under [`MissingPolicy::Drop`].
    pub dropped: usize,
}

/// The loaded input table.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<TrialRecord>,
    /// File line each record starts on (the header is line 1).
    lines: Vec<usize>,
}

impl Dataset {
    /// Creates a dataset from a header and its rows.
    ///
    /// Each record is assumed to occupy one line following the header.
    #[must_use]
    pub fn new(columns: Vec<String>, records: Vec<TrialRecord>) -> Self {
        let lines = (0..records.len()).map(|index| index + 2).collect();
        Self {
            columns,
            records,
            lines,
        }
    }

    /// Creates a dataset whose header contains every known column.
    #[must_use]
    pub fn from_records(records: Vec<TrialRecord>) -> Self {
        let columns = Column::ALL.iter().map(|c| c.name().to_owned()).collect();
        Self::new(columns, records)
    }

    /// Reads a CSV table with a header row.
    ///
    /// # Examples
    ///
    /// ```
    /// use iu_analysis::dataset::{Column, Dataset};
    ///
    /// let csv = "subject,IU,beta\n1,62,0.81\n1,62,0.64\n";
    /// let dataset = Dataset::from_csv_reader(csv.as_bytes()).unwrap();
    /// assert_eq!(dataset.len(), 2);
    /// assert!(dataset.has_column(Column::Beta));
    /// assert!(!dataset.has_column(Column::Slope));
    /// ```
    pub fn from_csv_reader<R>(reader: R) -> Result<Self, AnalysisError>
    where
        R: io::Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = reader.headers()?.clone();
        let columns = headers.iter().map(str::to_owned).collect::<Vec<_>>();

        let mut records = vec![];
        let mut lines = vec![];
        for (index, row) in reader.records().enumerate() {
            let row = row?;
            let line = row
                .position()
                .and_then(|pos| usize::try_from(pos.line()).ok())
                .unwrap_or(index + 2);
            records.push(row.deserialize::<TrialRecord>(Some(&headers))?);
            lines.push(line);
        }
        Ok(Self {
            columns,
            records,
            lines,
        })
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.iter().any(|c| c == column.name())
    }

    /// Checks that every column is present in the header.
    pub fn require_columns(&self, columns: &[Column]) -> Result<(), AnalysisError> {
        match columns.iter().find(|c| !self.has_column(**c)) {
            Some(&column) => Err(AnalysisError::MissingColumn {
                column,
                available: self.columns.join(", "),
            }),
            None => Ok(()),
        }
    }

    /// File line of the record at `index`.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<usize> {
        self.lines.get(index).copied()
    }

    /// Extracts typed rows that have a value in every required column.
    ///
    /// # Arguments
    ///
    /// * `columns` - Columns that must be present in the header and in each row
    /// * `policy` - Whether a row with a missing value fails the extraction or is dropped
    /// * `build` - Converts a row, given its file line number and record; only
    ///   called for rows with all `columns` present
    ///
    /// # Returns
    ///
    /// The converted rows and the number of rows dropped (missing values, or
    /// `build` returning `None`)
    pub fn extract<T, F>(
        &self,
        columns: &[Column],
        policy: MissingPolicy,
        mut build: F,
    ) -> Result<Extracted<T>, AnalysisError>
    where
        F: FnMut(usize, &TrialRecord) -> Option<T>,
    {
        self.require_columns(columns)?;
        let mut rows = Vec::with_capacity(self.records.len());
        let mut dropped = 0;
        for (record, &line) in self.records.iter().zip(&self.lines) {
            if let Some(column) = record.first_missing(columns) {
                match policy {
                    MissingPolicy::Raise => {
                        return Err(AnalysisError::MissingValue { line, column });
                    }
                    MissingPolicy::Drop => {
                        dropped += 1;
                        continue;
                    }
                }
            }
            match build(line, record) {
                Some(row) => rows.push(row),
                None => dropped += 1,
            }
        }
        Ok(Extracted { rows, dropped })
    }
}
