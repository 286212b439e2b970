// src/engine/prepare_inputs.rs

use crate::error::{BacktestError, Result};

/// Check that every named array has the same non-zero length. Returns it.
pub fn prepare_inputs(arrays: &[(&'static str, &[f64])]) -> Result<usize> {
    let len = arrays.first().map_or(0, |(_, arr)| arr.len());
    if len == 0 {
        return Err(BacktestError::EmptySeries);
    }
    for &(name, arr) in arrays {
        if arr.len() != len {
            return Err(BacktestError::LengthMismatch { name, len: arr.len(), expected: len });
        }
    }
    Ok(len)
}

pub fn validate_timestamps(timestamps: &[f64]) -> Result<()> {
    match timestamps.windows(2).position(|w| !(w[1] > w[0])) {
        Some(i) => Err(BacktestError::NonIncreasingTimestamps { index: i + 1 }),
        None    => Ok(()),
    }
}

/// Prices must be finite and strictly positive (NaN included).
pub fn validate_prices(name: &'static str, prices: &[f64]) -> Result<()> {
    match prices.iter().position(|&p| !(p.is_finite() && p > 0.0)) {
        Some(index) => Err(BacktestError::InvalidPrice { name, index, value: prices[index] }),
        None        => Ok(()),
    }
}

pub fn validate_stop_loss(stop_loss: Option<f64>) -> Result<()> {
    match stop_loss {
        Some(sl) if !(sl > 0.0 && sl < 1.0) => Err(BacktestError::InvalidStopLoss(sl)),
        _ => Ok(()),
    }
}
