/// Errors raised when a statistic is undefined for the given input.
///
/// Every variant describes why the computation could not produce a value,
/// so callers can surface the reason instead of reporting a silent `NaN`.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum StatsError {
    #[display("{statistic} requires at least {required} observations, got {actual}")]
    InsufficientSamples {
        statistic: &'static str,
        required: usize,
        actual: usize,
    },
    #[display("significance level must lie in (0, 1), got {alpha}")]
    InvalidAlpha { alpha: f64 },
    #[display("degrees of freedom must be positive and finite, got {df}")]
    InvalidDegreesOfFreedom { df: f64 },
    #[display("{statistic} is undefined because every observation has zero variance")]
    ZeroVariance { statistic: &'static str },
    #[display("z-scores are undefined because all {count} values are identical")]
    ConstantValues { count: usize },
    #[display("design matrix has {rows} rows but {outcome} values were given")]
    DimensionMismatch { rows: usize, outcome: usize },
    #[display(
        "design matrix is rank deficient (rank {rank} < {columns} columns); \
         check for constant or collinear predictors"
    )]
    RankDeficient { rank: usize, columns: usize },
    #[display(
        "least squares needs more observations than parameters \
         ({observations} observations, {parameters} parameters)"
    )]
    NoResidualDegreesOfFreedom {
        observations: usize,
        parameters: usize,
    },
    #[display("least squares solver failed: {reason}")]
    Solver { reason: &'static str },
}
