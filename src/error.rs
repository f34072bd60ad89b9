use thiserror::Error;

/// Why a portfolio row (or the whole file) was rejected at the boundary.
#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("portfolio is empty")]
    Empty,
    #[error("portfolio is missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("portfolio row {row}: {reason}")]
    Row { row: usize, reason: String },
    #[error("failed to read portfolio: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse portfolio: {0}")]
    Csv(#[from] csv::Error),
}

/// Everything the engine can refuse to do.
///
/// Bad input fails fast, before any sampling; there is nothing to retry.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A parameter outside its documented domain. Never silently clamped.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("invalid portfolio: {0}")]
    InvalidPortfolio(#[from] PortfolioError),
    /// Post-validation sampling failure. Fatal; aborts the run.
    #[error("sampling failure: {0}")]
    Sampling(String),
    /// The caller's cancel flag was raised mid-run. No partial result is
    /// returned — a truncated sample must not masquerade as a full one.
    #[error("simulation cancelled after {completed} of {total} years")]
    Cancelled { completed: usize, total: usize },
}

impl ModelError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        ModelError::InvalidParameter { name, value, reason }
    }
}
