// src/config.rs

use std::fmt;
use std::str::FromStr;

use crate::engine::prepare_inputs::validate_stop_loss;
use crate::engine::stop_loss::DEFAULT_DEGREES_OF_FREEDOM;
use crate::error::{BacktestError, Result};

/// Stop-loss levels the rotation strategy is usually compared across.
pub const REFERENCE_STOP_LOSSES: [Option<f64>; 5] =
    [Some(0.01), Some(0.02), Some(0.05), Some(0.10), None];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BacktestConfig {
    pub ideal_stop_loss:    Option<f64>, // None disables the stop entirely
    pub degrees_of_freedom: u32,         // t-distribution shape for stop sampling
    pub seed:               u64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            ideal_stop_loss:    None,
            degrees_of_freedom: DEFAULT_DEGREES_OF_FREEDOM,
            seed:               0,
        }
    }
}

impl BacktestConfig {
    pub fn with_stop_loss(mut self, stop_loss: Option<f64>) -> Self {
        self.ideal_stop_loss = stop_loss;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_stop_loss(self.ideal_stop_loss)?;
        if self.degrees_of_freedom == 0 {
            return Err(BacktestError::InvalidDegreesOfFreedom);
        }
        Ok(())
    }
}

/// A benchmark index together with the leveraged long and inverse ETFs
/// that track it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IndexFamily {
    Nasdaq,
    Sp500,
    Djia,
    Russell2000,
}

impl IndexFamily {
    pub const ALL: [IndexFamily; 4] = [
        IndexFamily::Nasdaq,
        IndexFamily::Sp500,
        IndexFamily::Djia,
        IndexFamily::Russell2000,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IndexFamily::Nasdaq      => "NASDAQ",
            IndexFamily::Sp500       => "SP500",
            IndexFamily::Djia        => "DJIA",
            IndexFamily::Russell2000 => "RUSSELL2000",
        }
    }

    pub fn benchmark(&self) -> &'static str {
        self.tickers().0
    }

    pub fn long_ticker(&self) -> &'static str {
        self.tickers().1
    }

    pub fn inverse_ticker(&self) -> &'static str {
        self.tickers().2
    }

    /// (benchmark, leveraged long, leveraged inverse)
    pub fn tickers(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            IndexFamily::Nasdaq      => ("^NDX", "TQQQ", "SQQQ"),
            IndexFamily::Sp500       => ("^GSPC", "UPRO", "SPXU"),
            IndexFamily::Djia        => ("^DJI", "UDOW", "SDOW"),
            IndexFamily::Russell2000 => ("^RUT", "URTY", "SRTY"),
        }
    }
}

impl fmt::Display for IndexFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndexFamily {
    type Err = BacktestError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_uppercase().replace(['&', ' ', '-', '_'], "");
        IndexFamily::ALL
            .into_iter()
            .find(|family| family.name() == wanted || family.benchmark() == wanted)
            .ok_or_else(|| BacktestError::UnknownIndex(s.to_string()))
    }
}
