//! Student-t confidence intervals
//!
//! Intervals take the form `estimate ± t_(1 - alpha/2, df) * se`, where the
//! critical value comes from the Student t distribution with `df` degrees of
//! freedom. `df` may be fractional, which the Welch interval relies on.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF as _, StudentsT};

use crate::{StatsError, descriptive::SampleStats};

/// Significance level used by the reports: 95% two-sided intervals.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// A closed interval `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    /// Interval centered on `estimate` with half-width `margin`.
    #[must_use]
    pub fn symmetric(estimate: f64, margin: f64) -> Self {
        Self {
            lower: estimate - margin,
            upper: estimate + margin,
        }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Checks that a significance level lies strictly between 0 and 1.
pub fn validate_alpha(alpha: f64) -> Result<(), StatsError> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(StatsError::InvalidAlpha { alpha })
    }
}

pub(crate) fn students_t(df: f64) -> Result<StudentsT, StatsError> {
    if !(df.is_finite() && df > 0.0) {
        return Err(StatsError::InvalidDegreesOfFreedom { df });
    }
    StudentsT::new(0.0, 1.0, df).map_err(|_| StatsError::InvalidDegreesOfFreedom { df })
}

/// Two-sided critical value `t_(1 - alpha/2, df)`.
///
/// # Examples
///
/// ```
/// # use iu_stats::confidence::t_critical;
/// let t = t_critical(0.05, 3.0).unwrap();
/// assert!((t - 3.182_446).abs() < 1e-4);
/// ```
pub fn t_critical(alpha: f64, df: f64) -> Result<f64, StatsError> {
    validate_alpha(alpha)?;
    let dist = students_t(df)?;
    Ok(dist.inverse_cdf(1.0 - alpha / 2.0))
}

/// Two-sided p-value of a t statistic with `df` degrees of freedom.
pub fn two_sided_p_value(t: f64, df: f64) -> Result<f64, StatsError> {
    let dist = students_t(df)?;
    Ok(2.0 * dist.cdf(-t.abs()))
}

/// Confidence interval for the mean of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanConfidenceInterval {
    /// Sample statistics the interval was built from.
    pub stats: SampleStats,
    /// Significance level; the interval covers `1 - alpha`.
    pub alpha: f64,
    /// Critical value at `n - 1` degrees of freedom.
    pub t_critical: f64,
    pub interval: ConfidenceInterval,
}

impl MeanConfidenceInterval {
    /// Builds `mean ± t_(1 - alpha/2, n - 1) * sd / sqrt(n)`.
    ///
    /// # Errors
    ///
    /// Needs at least two observations (one degree of freedom) and a valid
    /// `alpha`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use iu_stats::confidence::MeanConfidenceInterval;
    /// let ci = MeanConfidenceInterval::new(&[2.0, 3.0, 4.0, 5.0], 0.05).unwrap();
    /// assert_eq!(ci.stats.mean, 3.5);
    /// assert!((ci.interval.lower - 1.4457).abs() < 1e-4);
    /// assert!((ci.interval.upper - 5.5543).abs() < 1e-4);
    /// ```
    pub fn new(values: &[f64], alpha: f64) -> Result<Self, StatsError> {
        validate_alpha(alpha)?;
        let stats = SampleStats::from_slice(values)?;
        Self::from_stats(stats, alpha)
    }

    /// Builds the interval from precomputed sample statistics.
    #[expect(clippy::cast_precision_loss)]
    pub fn from_stats(stats: SampleStats, alpha: f64) -> Result<Self, StatsError> {
        let df = stats.n as f64 - 1.0;
        let t_critical = t_critical(alpha, df)?;
        let interval = ConfidenceInterval::symmetric(stats.mean, t_critical * stats.std_error());
        Ok(Self {
            stats,
            alpha,
            t_critical,
            interval,
        })
    }
}
