// src/engine/mod.rs

pub mod position;
pub mod prepare_inputs;
pub mod rotation;
pub mod daily_return;
pub mod stop_loss;
pub mod metrics;
pub mod sweep;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace, warn};

use crate::config::BacktestConfig;
use crate::engine::{
    daily_return::realize_day,
    position::{DayRecord, Position, Side},
    prepare_inputs::{prepare_inputs, validate_prices, validate_stop_loss, validate_timestamps},
    rotation::next_position,
    stop_loss::StopLossSampler,
};
use crate::error::{BacktestError, Result};

/// Open and close prices of one traded ETF.
#[derive(Clone, Copy, Debug)]
pub struct Instrument<'a> {
    pub open:  &'a [f64],
    pub close: &'a [f64],
}

/// Three series on one shared date index.
#[derive(Clone, Copy, Debug)]
pub struct BacktestInputs<'a> {
    pub timestamps:  &'a [f64],
    pub index_close: &'a [f64],
    pub long:        Instrument<'a>,
    pub short:       Instrument<'a>,
}

impl<'a> BacktestInputs<'a> {
    pub fn instrument(&self, side: Side) -> &Instrument<'a> {
        match side {
            Side::Long  => &self.long,
            Side::Short => &self.short,
        }
    }

    /// Checks alignment and prices; returns the number of days.
    pub fn validate(&self) -> Result<usize> {
        let n = prepare_inputs(&[
            ("timestamp",   self.timestamps),
            ("index_close", self.index_close),
            ("long_open",   self.long.open),
            ("long_close",  self.long.close),
            ("short_open",  self.short.open),
            ("short_close", self.short.close),
        ])?;
        validate_timestamps(self.timestamps)?;
        validate_prices("index_close", self.index_close)?;
        validate_prices("long_open",   self.long.open)?;
        validate_prices("long_close",  self.long.close)?;
        validate_prices("short_open",  self.short.open)?;
        validate_prices("short_close", self.short.close)?;
        Ok(n)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BacktestResult {
    pub timestamps: Vec<f64>,
    pub portfolio:  Vec<f64>,       // starts at 1.0, one value per input day
    pub days:       Vec<DayRecord>,
}

impl BacktestResult {
    pub fn final_value(&self) -> f64 {
        self.portfolio.last().copied().unwrap_or(1.0)
    }
}

/// Run the daily rotation over `inputs`.
///
/// Day 0 only initializes: the portfolio is 1.0 and nothing is held. On each
/// later day the position chosen at the previous close is realized (through
/// the sampled stop when `stop_loss` is set) and closed, then tomorrow's side
/// is chosen from the index's move. The side picked on the final day is
/// never realized.
pub fn run_backtest<R: Rng + ?Sized>(
    inputs:             &BacktestInputs<'_>,
    stop_loss:          Option<f64>,
    degrees_of_freedom: u32,
    rng:                &mut R,
) -> Result<BacktestResult> {
    let n = inputs.validate()?;
    validate_stop_loss(stop_loss)?;
    let sampler = stop_loss
        .map(|sl| StopLossSampler::new(sl, degrees_of_freedom))
        .transpose()?;

    let _span = tracing::debug_span!("backtest", days = n, stop_loss = ?stop_loss).entered();

    let ts = inputs.timestamps;
    let mut portfolio = Vec::with_capacity(n);
    let mut days      = Vec::with_capacity(n);
    let mut value     = 1.0_f64;
    let mut position  = Position::NoPosition;

    portfolio.push(value);
    days.push(DayRecord::flat(ts[0], value));

    for i in 1..n {
        // 1) Realize and close whatever was bought at yesterday's close
        let record = match position {
            Position::HasPosition(side) => {
                let inst = inputs.instrument(side);
                let sl   = sampler.as_ref().map(|s| s.sample(&mut *rng));
                let (r, exit) = realize_day(inst.close[i - 1], inst.open[i], inst.close[i], sl);

                if !(r.is_finite() && r > 0.0) {
                    warn!(index = i, side = side.as_str(), value = r, "degenerate daily return");
                    return Err(BacktestError::NumericDegenerate { index: i, value: r });
                }

                value *= r;
                if !(value.is_finite() && value > 0.0) {
                    warn!(index = i, side = side.as_str(), value, "portfolio value left the positive reals");
                    return Err(BacktestError::NumericDegenerate { index: i, value });
                }
                trace!(index = i, side = side.as_str(), daily_return = r, exit = exit.as_str(), value);

                DayRecord {
                    timestamp:    ts[i],
                    side:         Some(side),
                    daily_return: r,
                    stop_loss:    sl,
                    exit:         Some(exit),
                    portfolio:    value,
                }
            }
            Position::NoPosition => DayRecord::flat(ts[i], value),
        };

        // 2) Buy tomorrow's side at today's close
        position = Position::HasPosition(next_position(inputs.index_close[i], inputs.index_close[i - 1]));

        // 3) Record
        portfolio.push(value);
        days.push(record);
    }

    debug!(days = n, final_value = value, "backtest finished");

    Ok(BacktestResult {
        timestamps: ts.to_vec(),
        portfolio,
        days,
    })
}

/// [`run_backtest`] with a fresh `StdRng` seeded from `config.seed`.
pub fn run_backtest_with_config(
    inputs: &BacktestInputs<'_>,
    config: &BacktestConfig,
) -> Result<BacktestResult> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    run_backtest(inputs, config.ideal_stop_loss, config.degrees_of_freedom, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::position::ExitKind;

    fn inputs<'a>(
        ts: &'a [f64],
        index: &'a [f64],
        long: (&'a [f64], &'a [f64]),
        short: (&'a [f64], &'a [f64]),
    ) -> BacktestInputs<'a> {
        BacktestInputs {
            timestamps:  ts,
            index_close: index,
            long:        Instrument { open: long.0, close: long.1 },
            short:       Instrument { open: short.0, close: short.1 },
        }
    }

    #[test]
    fn single_day_is_just_the_starting_value() {
        let ts = [1.0];
        let px = [100.0];
        let inp = inputs(&ts, &px, (&px, &px), (&px, &px));
        let res = run_backtest_with_config(&inp, &BacktestConfig::default()).unwrap();
        assert_eq!(res.portfolio, vec![1.0]);
        assert_eq!(res.days.len(), 1);
        assert_eq!(res.days[0].side, None);
    }

    #[test]
    fn first_realized_day_uses_the_side_chosen_at_day_one() {
        // day 1: index rises → long held on day 2
        let ts    = [1.0, 2.0, 3.0];
        let index = [100.0, 101.0, 102.0];
        let l_o   = [10.0, 10.0, 11.0];
        let l_c   = [10.0, 10.0, 12.0];
        let s_o   = [20.0, 20.0, 19.0];
        let s_c   = [20.0, 20.0, 18.0];
        let inp = inputs(&ts, &index, (&l_o, &l_c), (&s_o, &s_c));
        let res = run_backtest_with_config(&inp, &BacktestConfig::default()).unwrap();

        assert_eq!(res.portfolio, vec![1.0, 1.0, 1.2]);
        assert_eq!(res.days[1].side, None);
        assert_eq!(res.days[2].side, Some(Side::Long));
        assert_eq!(res.days[2].exit, Some(ExitKind::Close));
    }

    #[test]
    fn misaligned_series_fail_before_the_loop() {
        let ts    = [1.0, 2.0, 3.0];
        let index = [100.0, 101.0];
        let px    = [10.0, 10.0, 10.0];
        let inp = inputs(&ts, &index, (&px, &px), (&px, &px));
        let err = run_backtest_with_config(&inp, &BacktestConfig::default()).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(err, BacktestError::LengthMismatch { name: "index_close", len: 2, expected: 3 });
    }

    #[test]
    fn invalid_stop_loss_is_rejected() {
        let ts = [1.0, 2.0];
        let px = [10.0, 10.0];
        let inp = inputs(&ts, &px, (&px, &px), (&px, &px));
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            run_backtest(&inp, Some(1.0), 3, &mut rng).unwrap_err(),
            BacktestError::InvalidStopLoss(1.0)
        );
    }

    #[test]
    fn overflowing_daily_return_aborts_the_run() {
        // 1e300 / 1e-300 is inf although every price is finite and positive
        let ts    = [1.0, 2.0, 3.0];
        let index = [100.0, 101.0, 102.0];
        let l     = [1.0, 1e-300, 1e300];
        let s     = [20.0, 20.0, 20.0];
        let inp = inputs(&ts, &index, (&l, &l), (&s, &s));
        let mut rng = StdRng::seed_from_u64(0);

        match run_backtest(&inp, None, 3, &mut rng) {
            Err(err @ BacktestError::NumericDegenerate { index: 2, value }) => {
                assert!(value.is_infinite());
                assert!(!err.is_configuration());
            }
            other => panic!("expected a degenerate return on day 2, got {:?}", other),
        }
    }

    #[test]
    fn overflowing_portfolio_value_aborts_the_run() {
        // two held days of 1e200 each push the running value past f64::MAX
        let ts    = [1.0, 2.0, 3.0, 4.0];
        let index = [100.0, 101.0, 102.0, 103.0];
        let l     = [1e-300, 1e-300, 1e-100, 1e100];
        let s     = [20.0, 20.0, 20.0, 20.0];
        let inp = inputs(&ts, &index, (&l, &l), (&s, &s));
        let mut rng = StdRng::seed_from_u64(0);

        match run_backtest(&inp, None, 3, &mut rng) {
            Err(BacktestError::NumericDegenerate { index: 3, value }) => {
                assert!(value.is_infinite());
            }
            other => panic!("expected an overflowing value on day 3, got {:?}", other),
        }
    }

    #[test]
    fn stop_loss_sampling_is_seed_reproducible() {
        let ts    = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let index = [100.0, 99.0, 101.0, 100.0, 100.0, 98.0];
        let l_o   = [10.0, 9.8, 9.0, 10.4, 10.1, 9.9];
        let l_c   = [10.0, 9.7, 10.2, 10.0, 10.1, 9.5];
        let s_o   = [20.0, 20.2, 20.9, 19.6, 19.8, 20.0];
        let s_c   = [20.0, 20.3, 19.5, 20.0, 19.9, 20.5];
        let inp = inputs(&ts, &index, (&l_o, &l_c), (&s_o, &s_c));
        let config = BacktestConfig::default().with_stop_loss(Some(0.02)).with_seed(11);

        let a = run_backtest_with_config(&inp, &config).unwrap();
        let b = run_backtest_with_config(&inp, &config).unwrap();
        assert_eq!(a, b);
        for day in a.days.iter().filter(|d| d.side.is_some()) {
            assert!(day.stop_loss.unwrap() >= 0.02);
        }
    }
}
