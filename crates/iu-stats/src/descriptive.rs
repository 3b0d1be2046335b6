use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics as _;

use crate::StatsError;

/// Sample statistics summarizing a dataset.
///
/// Dispersion uses the unbiased (`n - 1`) divisor, so at least two
/// observations are required.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleStats {
    /// Number of observations.
    pub n: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample variance (`n - 1` divisor).
    pub variance: f64,
    /// Sample standard deviation (`n - 1` divisor).
    pub std_dev: f64,
}

impl SampleStats {
    /// Computes sample statistics from a set of observations.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InsufficientSamples`] when fewer than two values
    /// are given, since the sample variance is undefined.
    ///
    /// # Examples
    ///
    /// ```
    /// # use iu_stats::descriptive::SampleStats;
    /// let stats = SampleStats::new([1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(stats.n, 3);
    /// assert_eq!(stats.mean, 2.0);
    /// assert_eq!(stats.std_dev, 1.0);
    /// ```
    pub fn new<I>(values: I) -> Result<Self, StatsError>
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values.into_iter().collect::<Vec<_>>();
        Self::from_slice(&values)
    }

    /// Computes sample statistics without copying the observations.
    pub fn from_slice(values: &[f64]) -> Result<Self, StatsError> {
        let n = values.len();
        if n < 2 {
            return Err(StatsError::InsufficientSamples {
                statistic: "sample standard deviation",
                required: 2,
                actual: n,
            });
        }
        let mean = values.mean();
        let variance = values.variance();
        Ok(Self {
            n,
            mean,
            variance,
            std_dev: variance.sqrt(),
        })
    }

    /// Standard error of the mean, `std_dev / sqrt(n)`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn std_error(&self) -> f64 {
        self.std_dev / (self.n as f64).sqrt()
    }
}

/// Arithmetic mean, or `None` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.mean())
}

/// Sample standard deviation (`n - 1` divisor), or `None` for fewer than two values.
#[must_use]
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    (values.len() >= 2).then(|| values.std_dev())
}

/// Standardizes values against their own mean and sample standard deviation.
///
/// # Errors
///
/// Fails with fewer than two values or when every value is identical, since
/// the scores would be undefined.
///
/// # Examples
///
/// ```
/// # use iu_stats::descriptive::z_scores;
/// let z = z_scores(&[1.0, 2.0, 3.0]).unwrap();
/// assert_eq!(z, vec![-1.0, 0.0, 1.0]);
/// ```
pub fn z_scores(values: &[f64]) -> Result<Vec<f64>, StatsError> {
    let stats = SampleStats::from_slice(values)?;
    if stats.std_dev == 0.0 {
        return Err(StatsError::ConstantValues {
            count: values.len(),
        });
    }
    Ok(values
        .iter()
        .map(|v| (v - stats.mean) / stats.std_dev)
        .collect())
}
