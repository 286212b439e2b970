// src/engine/stop_loss.rs

use rand::Rng;
use rand_distr::{Distribution, StudentT};

use crate::error::{BacktestError, Result};

/// Heavy tails: occasional large tightening events.
pub const DEFAULT_DEGREES_OF_FREEDOM: u32 = 3;

/// Scale applied to each t-deviate before it perturbs the ideal stop.
pub const STOP_LOSS_SCALE: f64 = 0.01;

/// Randomizes the ideal stop-loss around its target. The realized stop is
/// never looser than the ideal, only tightened.
#[derive(Clone, Debug)]
pub struct StopLossSampler {
    ideal: f64,
    dist:  StudentT<f64>,
}

impl StopLossSampler {
    pub fn new(ideal: f64, degrees_of_freedom: u32) -> Result<Self> {
        if degrees_of_freedom == 0 {
            return Err(BacktestError::InvalidDegreesOfFreedom);
        }
        let dist = StudentT::new(f64::from(degrees_of_freedom))
            .map_err(|_| BacktestError::InvalidDegreesOfFreedom)?;
        Ok(Self { ideal, dist })
    }

    pub fn ideal(&self) -> f64 {
        self.ideal
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let t = self.dist.sample(rng);
        self.ideal.max(self.ideal + STOP_LOSS_SCALE * t)
    }
}

/// One-shot form of [`StopLossSampler::sample`].
pub fn sample_stop_loss<R: Rng + ?Sized>(
    ideal: f64,
    degrees_of_freedom: u32,
    rng: &mut R,
) -> Result<f64> {
    Ok(StopLossSampler::new(ideal, degrees_of_freedom)?.sample(rng))
}
