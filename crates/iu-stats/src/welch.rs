//! Welch's unequal-variance t-test with Hedges' g
//!
//! The test compares the means of two independent samples without assuming
//! equal variances:
//!
//! ```text
//! se   = sqrt(s1²/n1 + s2²/n2)
//! t    = (m1 - m2) / se
//! df   = (s1²/n1 + s2²/n2)² / [ (s1²/n1)²/(n1-1) + (s2²/n2)²/(n2-1) ]
//! ```
//!
//! The effect size uses the pooled standard deviation and the small-sample
//! correction `J = 1 - 3 / (4(n1 + n2) - 9)`.

use serde::{Deserialize, Serialize};

use crate::{
    StatsError,
    confidence::{self, ConfidenceInterval},
    descriptive::SampleStats,
};

/// Result of comparing sample `a` against sample `b`.
///
/// Differences are always `a - b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WelchTest {
    /// Welch t statistic.
    pub t: f64,
    /// Two-sided p-value.
    pub p: f64,
    /// Welch–Satterthwaite degrees of freedom.
    pub df: f64,
    /// Difference of means `mean_a - mean_b`.
    pub mean_diff: f64,
    /// Standard error of the difference.
    pub se_diff: f64,
    /// Confidence interval of the difference at the Welch degrees of freedom.
    pub diff_ci: ConfidenceInterval,
    /// Standardized difference using the pooled standard deviation.
    pub cohens_d: f64,
    /// Small-sample correction factor applied to Cohen's d.
    pub correction: f64,
    /// Bias-corrected effect size, `cohens_d * correction`.
    pub hedges_g: f64,
    pub a: SampleStats,
    pub b: SampleStats,
}

impl WelchTest {
    /// Runs the test on two samples.
    ///
    /// # Errors
    ///
    /// Both samples need at least two observations, at least one of them must
    /// have non-zero variance, and `alpha` must lie in `(0, 1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use iu_stats::welch::WelchTest;
    /// let a = [5.0, 6.0, 7.0, 8.0];
    /// let b = [1.0, 2.0, 3.0];
    /// let test = WelchTest::new(&a, &b, 0.05).unwrap();
    /// assert_eq!(test.mean_diff, 4.5);
    /// assert!(test.t > 0.0);
    /// assert!(test.p < 0.05);
    /// ```
    pub fn new(a: &[f64], b: &[f64], alpha: f64) -> Result<Self, StatsError> {
        confidence::validate_alpha(alpha)?;
        let a = sample_stats(a)?;
        let b = sample_stats(b)?;
        Self::from_stats(a, b, alpha)
    }

    /// Runs the test from precomputed sample statistics.
    ///
    /// # Arguments
    ///
    /// * `a` - Statistics of the first sample
    /// * `b` - Statistics of the second sample
    /// * `alpha` - Significance level of the difference interval
    ///
    /// # Returns
    ///
    /// The test of `a - b`, with Cohen's d and Hedges' g on the pooled SD
    #[expect(clippy::cast_precision_loss)]
    pub fn from_stats(a: SampleStats, b: SampleStats, alpha: f64) -> Result<Self, StatsError> {
        let (n1, n2) = (a.n as f64, b.n as f64);
        let v1 = a.variance / n1;
        let v2 = b.variance / n2;
        let se_diff = (v1 + v2).sqrt();
        if se_diff == 0.0 {
            return Err(StatsError::ZeroVariance {
                statistic: "Welch t statistic",
            });
        }

        let df = (v1 + v2).powi(2) / (v1.powi(2) / (n1 - 1.0) + v2.powi(2) / (n2 - 1.0));
        let mean_diff = a.mean - b.mean;
        let t = mean_diff / se_diff;
        let p = confidence::two_sided_p_value(t, df)?;
        let t_critical = confidence::t_critical(alpha, df)?;
        let diff_ci = ConfidenceInterval::symmetric(mean_diff, t_critical * se_diff);

        let pooled_sd = pooled_std_dev(&a, &b);
        let cohens_d = mean_diff / pooled_sd;
        let correction = hedges_correction(a.n + b.n);

        Ok(Self {
            t,
            p,
            df,
            mean_diff,
            se_diff,
            diff_ci,
            cohens_d,
            correction,
            hedges_g: cohens_d * correction,
            a,
            b,
        })
    }
}

fn sample_stats(values: &[f64]) -> Result<SampleStats, StatsError> {
    if values.len() < 2 {
        return Err(StatsError::InsufficientSamples {
            statistic: "Welch t-test",
            required: 2,
            actual: values.len(),
        });
    }
    SampleStats::from_slice(values)
}

/// Pooled standard deviation `sqrt(((n1-1)s1² + (n2-1)s2²) / (n1+n2-2))`.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn pooled_std_dev(a: &SampleStats, b: &SampleStats) -> f64 {
    let (n1, n2) = (a.n as f64, b.n as f64);
    (((n1 - 1.0) * a.variance + (n2 - 1.0) * b.variance) / (n1 + n2 - 2.0)).sqrt()
}

/// Hedges' small-sample correction `J = 1 - 3 / (4N - 9)` for `N` total observations.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn hedges_correction(total: usize) -> f64 {
    1.0 - 3.0 / (4.0 * total as f64 - 9.0)
}
