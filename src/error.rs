use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("{0}")]
    InvalidAmount(String),

    #[error("{0}")]
    InvalidTerm(String),

    #[error("{0}")]
    InvalidRate(String),

    /// Degenerate math, e.g. a rate too small for the annuity denominator.
    #[error("calculation error: {0}")]
    Domain(String),
}

impl CalcError {
    pub fn invalid_amount() -> Self {
        CalcError::InvalidAmount("amount must be a positive number".into())
    }

    pub fn invalid_term() -> Self {
        CalcError::InvalidTerm("term must be a positive integer".into())
    }

    pub fn invalid_rate() -> Self {
        CalcError::InvalidRate("interest rate must be a positive number".into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CalcError::InvalidAmount(_) => "invalid amount",
            CalcError::InvalidTerm(_) => "invalid term",
            CalcError::InvalidRate(_) => "invalid rate",
            CalcError::Domain(_) => "domain error",
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
