// src/lib.rs

pub mod config;
pub mod engine;
pub mod error;
pub mod hurst;
pub mod logging;

#[cfg(feature = "python")]
mod python;

pub use config::{BacktestConfig, IndexFamily, REFERENCE_STOP_LOSSES};
pub use engine::{
    daily_return::daily_return,
    metrics::{compute_summary_metrics, SummaryMetrics},
    position::{DayRecord, ExitKind, Position, Side},
    rotation::next_position,
    run_backtest, run_backtest_with_config,
    stop_loss::{sample_stop_loss, StopLossSampler},
    sweep::{sweep_stop_losses, SweepResult},
    BacktestInputs, BacktestResult, Instrument,
};
pub use error::{BacktestError, Result};

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn rotation_backtester(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(python::run_backtest, m)?)?;
    m.add_function(wrap_pyfunction!(python::sweep_stop_losses, m)?)?;
    m.add_function(wrap_pyfunction!(python::price_relatives, m)?)?;
    m.add_function(wrap_pyfunction!(python::index_tickers, m)?)?;
    m.add_function(wrap_pyfunction!(python::init_logging, m)?)?;
    Ok(())
}
