//! Analyses of Intolerance of Uncertainty (IU) and task behaviour
//!
//! This crate loads trial-level data and runs the two analyses of the
//! workspace on top of [`iu_stats`].
//!
//! # Overview
//!
//! ## Slope Regression Workflow
//!
//! 1. **Load Data** ([`dataset::Dataset`]): Read the CSV table and check the required columns
//! 2. **Fit** ([`regression::SlopeRegression`]): Regress `slope` on `IU`, `STAI_T` and `sex`
//!    with an intercept
//!
//! ## Variability Workflow
//!
//! 1. **Load Data** ([`dataset::Dataset`]): Read the CSV table
//! 2. **Group Subjects** ([`grouping::SubjectGrouping`]): Label subjects High, Low or Mid IU
//!    from the z-score of their IU
//! 3. **Within-Subject SD** ([`variability::SubjectVariability`]): SD of `beta` across each
//!    subject's blocks
//! 4. **Summarize** ([`variability::GroupSummary`]): Mean, SD, n and CI per group
//! 5. **Compare** ([`comparison::GroupComparison`]): Welch's t-test and Hedges' g, High vs Low
//!
//! [`report::VariabilityReport::run`] performs steps 2 to 5 in one call.
//!
//! # Examples
//!
//! ```
//! use iu_analysis::{
//!     dataset::Dataset,
//!     grouping::IuGroup,
//!     report::{VariabilityOptions, VariabilityReport},
//! };
//!
//! let csv = "\
//! subject,IU,beta
//! 1,63,0.20
//! 1,63,0.80
//! 2,64,0.10
//! 2,64,0.90
//! 3,37,0.40
//! 3,37,0.50
//! 4,36,0.30
//! 4,36,0.35
//! 5,50,0.60
//! 5,50,0.70
//! 6,50,0.50
//! 6,50,0.20
//! ";
//! let dataset = Dataset::from_csv_reader(csv.as_bytes())?;
//! let report = VariabilityReport::run(&dataset, &VariabilityOptions::default())?;
//!
//! assert_eq!(report.grouping.count(IuGroup::High), 2);
//! assert_eq!(report.grouping.count(IuGroup::Low), 2);
//! println!("Hedges' g = {:.4}", report.comparison.test.hedges_g);
//! # Ok::<(), iu_analysis::AnalysisError>(())
//! ```

pub mod comparison;
pub mod dataset;
pub mod grouping;
pub mod regression;
pub mod report;
pub mod variability;

mod error;

pub use self::error::AnalysisError;
