// src/engine/sweep.rs

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::debug;

use crate::engine::{run_backtest, BacktestInputs, BacktestResult};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct SweepResult {
    pub stop_losses: Vec<Option<f64>>,
    pub portfolios:  Array2<f64>,        // one row per stop-loss level, one column per day
    pub runs:        Vec<BacktestResult>,
}

/// Level `k` of a sweep draws from its own stream. Level 0 reuses `base_seed`
/// so it matches a standalone run with the same seed.
pub fn level_seed(base_seed: u64, level: usize) -> u64 {
    base_seed ^ (level as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Backtest every stop-loss level over the same inputs, in parallel.
pub fn sweep_stop_losses(
    inputs:             &BacktestInputs<'_>,
    stop_losses:        &[Option<f64>],
    degrees_of_freedom: u32,
    base_seed:          u64,
) -> Result<SweepResult> {
    let n = inputs.validate()?;

    let runs = stop_losses
        .par_iter()
        .enumerate()
        .map(|(k, &sl)| {
            let mut rng = StdRng::seed_from_u64(level_seed(base_seed, k));
            run_backtest(inputs, sl, degrees_of_freedom, &mut rng)
        })
        .collect::<Result<Vec<_>>>()?;

    let portfolios = Array2::from_shape_fn((runs.len(), n), |(row, day)| runs[row].portfolio[day]);

    debug!(levels = runs.len(), days = n, "stop-loss sweep finished");

    Ok(SweepResult {
        stop_losses: stop_losses.to_vec(),
        portfolios,
        runs,
    })
}
