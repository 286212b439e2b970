// src/error.rs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BacktestError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacktestError {
    #[error("input series are empty")]
    EmptySeries,

    #[error("‘{name}’ length {len} != expected {expected}")]
    LengthMismatch {
        name:     &'static str,
        len:      usize,
        expected: usize,
    },

    #[error("timestamps must be strictly increasing (violated at index {index})")]
    NonIncreasingTimestamps { index: usize },

    #[error("‘{name}’ has non-positive or non-finite price {value} at index {index}")]
    InvalidPrice {
        name:  &'static str,
        index: usize,
        value: f64,
    },

    #[error("stop loss must lie in (0, 1), got {0}")]
    InvalidStopLoss(f64),

    #[error("degrees of freedom must be positive")]
    InvalidDegreesOfFreedom,

    #[error("rolling window must be positive")]
    InvalidWindow,

    #[error("unknown index family ‘{0}’")]
    UnknownIndex(String),

    /// A realized daily return, or the running portfolio value, came out
    /// non-positive or non-finite.
    #[error("degenerate return or portfolio value {value} at index {index}")]
    NumericDegenerate { index: usize, value: f64 },
}

impl BacktestError {
    /// Everything except a degenerate return is a caller configuration problem.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, BacktestError::NumericDegenerate { .. })
    }
}
