// src/hurst.rs
//
// Input plumbing for a rolling Hurst-exponent study. The estimator itself is
// supplied by the caller.

use rayon::prelude::*;

use crate::error::{BacktestError, Result};

/// Trailing window, in trading days, the exponent is usually rolled over.
pub const DEFAULT_HURST_WINDOW: usize = 100;

/// Maps one window of a series to an exponent.
pub trait HurstEstimator: Sync {
    fn estimate(&self, window: &[f64]) -> f64;
}

impl<F> HurstEstimator for F
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    fn estimate(&self, window: &[f64]) -> f64 {
        self(window)
    }
}

/// `closes[i] / closes[i-1]` for every `i >= 1`; one shorter than the input.
pub fn price_relatives(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|w| w[1] / w[0]).collect()
}

/// Apply `estimator` to every full trailing window of `values`.
///
/// Output `k` covers `values[k..k + window]`, so there are
/// `values.len() - window + 1` outputs and none when the series is shorter
/// than the window.
pub fn rolling_apply<E: HurstEstimator + ?Sized>(
    values:    &[f64],
    window:    usize,
    estimator: &E,
) -> Result<Vec<f64>> {
    if window == 0 {
        return Err(BacktestError::InvalidWindow);
    }
    if values.len() < window {
        return Ok(Vec::new());
    }
    Ok(values
        .par_windows(window)
        .map(|w| estimator.estimate(w))
        .collect())
}
