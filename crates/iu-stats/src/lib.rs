//! Statistical routines for the IU analysis workspace.
//!
//! This crate provides the numerical building blocks used by the analyses:
//!
//! - **Descriptive statistics**: Sample mean, unbiased variance and standard deviation, z-scores
//! - **Confidence intervals**: Student-t critical values and intervals for a mean
//! - **Welch's t-test**: Unequal-variance comparison of two samples with Hedges' g
//! - **Least squares**: OLS regression with a full coefficient summary
//!
//! All dispersion measures use the unbiased `n - 1` divisor. Whenever a
//! statistic is undefined for its input (too few observations, zero spread,
//! a rank-deficient design) a [`StatsError`] says why.
//!
//! # Modules
//!
//! - [`descriptive`]: Sample statistics and standardization
//! - [`confidence`]: t-based confidence intervals and p-values
//! - [`welch`]: Welch's t-test and effect sizes
//! - [`ols`]: Ordinary least squares regression
//!
//! # Examples
//!
//! ## Summarizing a sample
//!
//! ```
//! use iu_stats::confidence::MeanConfidenceInterval;
//!
//! let ci = MeanConfidenceInterval::new(&[2.0, 3.0, 4.0, 5.0], 0.05).unwrap();
//! assert_eq!(ci.stats.n, 4);
//! assert!(ci.interval.lower < 3.5 && 3.5 < ci.interval.upper);
//! ```
//!
//! ## Comparing two groups
//!
//! ```
//! use iu_stats::welch::WelchTest;
//!
//! let high = [0.42, 0.51, 0.47, 0.62];
//! let low = [0.21, 0.33, 0.27];
//! let test = WelchTest::new(&high, &low, 0.05).unwrap();
//! println!("t = {:.4}, p = {:.4}, g = {:.4}", test.t, test.p, test.hedges_g);
//! ```

pub mod confidence;
pub mod descriptive;
pub mod ols;
pub mod welch;

mod error;

pub use self::error::StatsError;
