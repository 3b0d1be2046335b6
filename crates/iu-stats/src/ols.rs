//! Ordinary least squares regression
//!
//! The model `y = Xβ + ε` is solved through the singular value decomposition
//! of the design matrix. The same decomposition gives the numerical rank, so a
//! rank-deficient design (constant or collinear predictors) is rejected before
//! any estimate is reported.
//!
//! # Examples
//!
//! ```
//! use iu_stats::ols::{DesignMatrix, OlsFit};
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let y = [3.0, 5.0, 7.0, 9.0, 11.0];
//! let design = DesignMatrix::with_intercept(x.len()).column("x", &x).unwrap();
//! let fit = OlsFit::new(&design, &y, 0.05).unwrap();
//!
//! assert!((fit.coefficient("const").unwrap().estimate - 1.0).abs() < 1e-9);
//! assert!((fit.coefficient("x").unwrap().estimate - 2.0).abs() < 1e-9);
//! ```

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF as _, FisherSnedecor};

use crate::{
    StatsError,
    confidence::{self, ConfidenceInterval},
};

/// Name given to the intercept column.
pub const INTERCEPT: &str = "const";

/// Singular values below `RANK_TOLERANCE * σ_max` count as zero.
pub const RANK_TOLERANCE: f64 = 1e-10;

/// Column-wise description of a regression design.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    rows: usize,
    has_intercept: bool,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl DesignMatrix {
    /// Empty design with `rows` observations and no intercept.
    #[must_use]
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            has_intercept: false,
            names: vec![],
            columns: vec![],
        }
    }

    /// Design with `rows` observations whose first column is the constant 1.
    #[must_use]
    pub fn with_intercept(rows: usize) -> Self {
        Self {
            rows,
            has_intercept: true,
            names: vec![INTERCEPT.to_owned()],
            columns: vec![vec![1.0; rows]],
        }
    }

    /// Appends a predictor column.
    ///
    /// # Errors
    ///
    /// Fails when the column length differs from the number of rows.
    pub fn column(mut self, name: &str, values: &[f64]) -> Result<Self, StatsError> {
        if values.len() != self.rows {
            return Err(StatsError::DimensionMismatch {
                rows: self.rows,
                outcome: values.len(),
            });
        }
        self.names.push(name.to_owned());
        self.columns.push(values.to_vec());
        Ok(self)
    }

    fn to_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.rows, self.columns.len(), |i, j| self.columns[j][i])
    }
}

/// Inference for a single regression coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t: f64,
    /// Two-sided p-value at the residual degrees of freedom.
    pub p: f64,
    pub ci: ConfidenceInterval,
}

/// A fitted least squares model with the usual summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OlsFit {
    pub coefficients: Vec<Coefficient>,
    /// Significance level of the coefficient intervals.
    pub alpha: f64,
    pub n_obs: usize,
    /// Number of predictors, excluding the intercept.
    pub df_model: usize,
    pub df_resid: usize,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    /// Overall F statistic; `None` when the model has no predictors.
    pub f_statistic: Option<f64>,
    pub f_p_value: Option<f64>,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    /// Square root of the residual mean square.
    pub residual_std_error: f64,
    /// Ratio of the largest to the smallest singular value of the design.
    pub condition_number: f64,
}

impl OlsFit {
    /// Fits `y` on the design by least squares.
    ///
    /// # Arguments
    ///
    /// * `design` - Predictor columns, including the intercept when present
    /// * `y` - Response, one value per design row
    /// * `alpha` - Significance level of the coefficient intervals
    ///
    /// # Returns
    ///
    /// Coefficients in design column order with their standard errors,
    /// t statistics, p-values and intervals, plus the model summary
    ///
    /// # Errors
    ///
    /// - [`StatsError::DimensionMismatch`] if `y` and the design disagree in length
    /// - [`StatsError::NoResidualDegreesOfFreedom`] with too few observations
    /// - [`StatsError::RankDeficient`] for constant or collinear predictors
    #[expect(clippy::cast_precision_loss)]
    pub fn new(design: &DesignMatrix, y: &[f64], alpha: f64) -> Result<Self, StatsError> {
        confidence::validate_alpha(alpha)?;
        let n = design.rows;
        let k = design.columns.len();
        if y.len() != n {
            return Err(StatsError::DimensionMismatch {
                rows: n,
                outcome: y.len(),
            });
        }
        if k == 0 {
            return Err(StatsError::Solver {
                reason: "design matrix has no columns",
            });
        }
        if n <= k {
            return Err(StatsError::NoResidualDegreesOfFreedom {
                observations: n,
                parameters: k,
            });
        }

        let x = design.to_matrix();
        let y = DVector::from_column_slice(y);
        let svd = x.clone().svd(true, true);
        let max_singular = svd.singular_values.max();
        let min_singular = svd.singular_values.min();
        let tolerance = RANK_TOLERANCE * max_singular;
        let rank = svd.rank(tolerance);
        if rank < k {
            return Err(StatsError::RankDeficient { rank, columns: k });
        }

        let beta = svd
            .solve(&y, tolerance)
            .map_err(|reason| StatsError::Solver { reason })?;
        let v_t = svd.v_t.as_ref().ok_or(StatsError::Solver {
            reason: "right singular vectors were not computed",
        })?;
        // (XᵀX)⁻¹ = V Σ⁻² Vᵀ
        let scaled = DMatrix::from_fn(k, k, |i, j| {
            v_t[(i, j)] / svd.singular_values[i].powi(2)
        });
        let unscaled_cov = v_t.transpose() * scaled;

        let residuals = &y - &x * &beta;
        let ssr = residuals.norm_squared();
        let df_resid = n - k;
        let sigma2 = ssr / df_resid as f64;
        let t_critical = confidence::t_critical(alpha, df_resid as f64)?;

        let coefficients = design
            .names
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let estimate = beta[j];
                let std_error = (sigma2 * unscaled_cov[(j, j)]).sqrt();
                let t = estimate / std_error;
                Ok(Coefficient {
                    name: name.clone(),
                    estimate,
                    std_error,
                    t,
                    p: t_p_value(t, df_resid as f64)?,
                    ci: ConfidenceInterval::symmetric(estimate, t_critical * std_error),
                })
            })
            .collect::<Result<Vec<_>, StatsError>>()?;

        let n_f = n as f64;
        let y_mean = y.mean();
        let tss = if design.has_intercept {
            y.iter().map(|v| (v - y_mean).powi(2)).sum::<f64>()
        } else {
            y.norm_squared()
        };
        let df_model = if design.has_intercept { k - 1 } else { k };
        let r_squared = 1.0 - ssr / tss;
        let k_constant = if design.has_intercept { 1.0 } else { 0.0 };
        let adj_r_squared = 1.0 - (n_f - k_constant) / df_resid as f64 * (1.0 - r_squared);

        let (f_statistic, f_p_value) = if df_model == 0 {
            (None, None)
        } else {
            let f = ((tss - ssr) / df_model as f64) / sigma2;
            (Some(f), Some(f_test_p_value(f, df_model as f64, df_resid as f64)?))
        };

        let log_likelihood = -n_f / 2.0 * ((2.0 * PI).ln() + (ssr / n_f).ln() + 1.0);
        let k_f = k as f64;

        Ok(Self {
            coefficients,
            alpha,
            n_obs: n,
            df_model,
            df_resid,
            r_squared,
            adj_r_squared,
            f_statistic,
            f_p_value,
            log_likelihood,
            aic: -2.0 * log_likelihood + 2.0 * k_f,
            bic: -2.0 * log_likelihood + k_f * n_f.ln(),
            residual_std_error: sigma2.sqrt(),
            condition_number: max_singular / min_singular,
        })
    }

    /// Looks up a coefficient by column name.
    #[must_use]
    pub fn coefficient(&self, name: &str) -> Option<&Coefficient> {
        self.coefficients.iter().find(|c| c.name == name)
    }
}

// An exact fit leaves zero residual variance, so t is infinite.
fn t_p_value(t: f64, df: f64) -> Result<f64, StatsError> {
    if t.is_nan() {
        Ok(f64::NAN)
    } else if t.is_infinite() {
        Ok(0.0)
    } else {
        confidence::two_sided_p_value(t, df)
    }
}

fn f_test_p_value(f: f64, df_model: f64, df_resid: f64) -> Result<f64, StatsError> {
    if f.is_nan() {
        return Ok(f64::NAN);
    }
    if f.is_infinite() {
        return Ok(0.0);
    }
    let dist = FisherSnedecor::new(df_model, df_resid)
        .map_err(|_| StatsError::InvalidDegreesOfFreedom { df: df_model })?;
    Ok(dist.sf(f.max(0.0)))
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_simple_regression_summary() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.2, 4.1, 6.1, 7.9, 10.2];
        let design = DesignMatrix::with_intercept(5).column("x", &x).unwrap();
        let fit = OlsFit::new(&design, &y, 0.05).unwrap();

        let intercept = fit.coefficient(INTERCEPT).unwrap();
        let slope = fit.coefficient("x").unwrap();
        assert!((intercept.estimate - 0.16).abs() < 1e-9);
        assert!((slope.estimate - 1.98).abs() < 1e-9);
        assert!((intercept.std_error - 0.143_294_568).abs() < 1e-6);
        assert!((slope.std_error - 0.043_204_938).abs() < 1e-6);
        assert!((intercept.t - 1.116_581).abs() < 1e-5);
        assert!((intercept.p - 0.3455).abs() < 1e-3);
        assert!(slope.p < 1e-4);
        assert!(intercept.ci.contains(0.0));
        assert!(!slope.ci.contains(0.0));

        assert_eq!(fit.n_obs, 5);
        assert_eq!(fit.df_model, 1);
        assert_eq!(fit.df_resid, 3);
        assert!((fit.r_squared - 0.998_573_612).abs() < 1e-8);
        assert!((fit.adj_r_squared - 0.998_098_149).abs() < 1e-8);
        assert!((fit.f_statistic.unwrap() - 2100.214_285_7).abs() < 1e-4);
        assert!(fit.f_p_value.unwrap() < 1e-4);
        assert!((fit.log_likelihood - 4.134_911_086).abs() < 1e-8);
        assert!((fit.aic - (-4.269_822_171)).abs() < 1e-8);
        assert!((fit.bic - (-5.050_946_346)).abs() < 1e-8);
    }

    #[test]
    fn test_planted_coefficients_are_recovered() {
        let mut rng = Pcg32::seed_from_u64(42);
        let n = 40;
        let iu = (0..n)
            .map(|_| rng.random_range(27.0..135.0))
            .collect::<Vec<f64>>();
        let anxiety = (0..n)
            .map(|_| rng.random_range(20.0..80.0))
            .collect::<Vec<f64>>();
        let sex = (0..n)
            .map(|_| if rng.random_bool(0.5) { 1.0 } else { 0.0 })
            .collect::<Vec<f64>>();
        let y = (0..n)
            .map(|i| 0.75 + 0.02 * iu[i] - 0.035 * anxiety[i] + 0.4 * sex[i])
            .collect::<Vec<f64>>();

        let design = DesignMatrix::with_intercept(n)
            .column("IU", &iu)
            .unwrap()
            .column("STAI_T", &anxiety)
            .unwrap()
            .column("sex", &sex)
            .unwrap();
        let fit = OlsFit::new(&design, &y, 0.05).unwrap();

        let expected = [(INTERCEPT, 0.75), ("IU", 0.02), ("STAI_T", -0.035), ("sex", 0.4)];
        for (name, value) in expected {
            let estimate = fit.coefficient(name).unwrap().estimate;
            assert!((estimate - value).abs() < 1e-8, "{name}: {estimate} != {value}");
        }
        assert!((fit.r_squared - 1.0).abs() < 1e-10);
        assert_eq!(fit.df_model, 3);
        assert_eq!(fit.df_resid, n - 4);
    }

    #[test]
    fn test_constant_predictor_is_rank_deficient() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let sex = [1.0; 5];
        let y = [1.0, 3.0, 2.0, 5.0, 4.0];
        let design = DesignMatrix::with_intercept(5)
            .column("x", &x)
            .unwrap()
            .column("sex", &sex)
            .unwrap();
        let err = OlsFit::new(&design, &y, 0.05).unwrap_err();
        assert_eq!(err, StatsError::RankDeficient { rank: 2, columns: 3 });
    }

    #[test]
    fn test_collinear_predictors_are_rank_deficient() {
        let a = [52.0, 61.0, 47.0, 70.0, 38.0, 55.0];
        let b = a.map(|v| 2.0 * v + 3.0);
        let y = [0.1, 0.4, 0.2, 0.9, 0.0, 0.3];
        let design = DesignMatrix::with_intercept(6)
            .column("a", &a)
            .unwrap()
            .column("b", &b)
            .unwrap();
        assert!(matches!(
            OlsFit::new(&design, &y, 0.05),
            Err(StatsError::RankDeficient { columns: 3, .. })
        ));
    }

    #[test]
    fn test_mismatched_lengths() {
        assert_eq!(
            DesignMatrix::with_intercept(3)
                .column("x", &[1.0, 2.0])
                .unwrap_err(),
            StatsError::DimensionMismatch {
                rows: 3,
                outcome: 2
            }
        );
        let design = DesignMatrix::with_intercept(3)
            .column("x", &[1.0, 2.0, 4.0])
            .unwrap();
        assert_eq!(
            OlsFit::new(&design, &[1.0, 2.0], 0.05).unwrap_err(),
            StatsError::DimensionMismatch {
                rows: 3,
                outcome: 2
            }
        );
    }

    #[test]
    fn test_too_few_observations() {
        let design = DesignMatrix::with_intercept(2)
            .column("x", &[1.0, 2.0])
            .unwrap();
        assert_eq!(
            OlsFit::new(&design, &[1.0, 2.0], 0.05).unwrap_err(),
            StatsError::NoResidualDegreesOfFreedom {
                observations: 2,
                parameters: 2
            }
        );
    }

    #[test]
    fn test_intercept_only_model() {
        let y = [2.0, 3.0, 4.0, 5.0];
        let fit = OlsFit::new(&DesignMatrix::with_intercept(4), &y, 0.05).unwrap();
        assert_eq!(fit.df_model, 0);
        assert_eq!(fit.f_statistic, None);
        let intercept = &fit.coefficients[0];
        assert!((intercept.estimate - 3.5).abs() < 1e-12);
        // Matches the one-sample mean interval.
        assert!((intercept.ci.lower - 1.445_739).abs() < 1e-4);
        assert!((intercept.ci.upper - 5.554_261).abs() < 1e-4);
    }

    #[test]
    fn test_regression_through_origin() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.1, 3.9, 6.0, 8.1];
        let design = DesignMatrix::new(4).column("x", &x).unwrap();
        let fit = OlsFit::new(&design, &y, 0.05).unwrap();
        assert_eq!(fit.coefficients.len(), 1);
        assert_eq!(fit.df_model, 1);
        assert_eq!(fit.df_resid, 3);
        // sum(xy) / sum(x²)
        assert!((fit.coefficients[0].estimate - 60.3 / 30.0).abs() < 1e-9);
        assert!(fit.r_squared > 0.99);

        let empty = DesignMatrix::new(4);
        assert!(matches!(
            OlsFit::new(&empty, &y, 0.05),
            Err(StatsError::Solver { .. })
        ));
    }
}
