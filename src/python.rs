// src/python.rs

use ndarray::Array2;
use numpy::{IntoPyArray, PyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::config::{IndexFamily, REFERENCE_STOP_LOSSES};
use crate::engine::{
    self,
    metrics::{compute_summary_metrics, SideMetrics, TimeSeriesMetrics},
    stop_loss::DEFAULT_DEGREES_OF_FREEDOM,
    sweep, BacktestInputs, BacktestResult, Instrument,
};
use crate::error::BacktestError;
use crate::hurst;

impl From<BacktestError> for PyErr {
    fn from(err: BacktestError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Owned copies of the numpy inputs, so the GIL can be released while the
/// engine runs.
struct OwnedInputs {
    ts:  Vec<f64>,
    idx: Vec<f64>,
    l_o: Vec<f64>,
    l_c: Vec<f64>,
    s_o: Vec<f64>,
    s_c: Vec<f64>,
}

impl OwnedInputs {
    fn from_arrays(
        timestamp:   &PyArray1<f64>,
        index_close: &PyArray1<f64>,
        long_open:   &PyArray1<f64>,
        long_close:  &PyArray1<f64>,
        short_open:  &PyArray1<f64>,
        short_close: &PyArray1<f64>,
    ) -> PyResult<Self> {
        Ok(Self {
            ts:  unsafe { timestamp.as_slice()? }.to_vec(),
            idx: unsafe { index_close.as_slice()? }.to_vec(),
            l_o: unsafe { long_open.as_slice()? }.to_vec(),
            l_c: unsafe { long_close.as_slice()? }.to_vec(),
            s_o: unsafe { short_open.as_slice()? }.to_vec(),
            s_c: unsafe { short_close.as_slice()? }.to_vec(),
        })
    }

    fn view(&self) -> BacktestInputs<'_> {
        BacktestInputs {
            timestamps:  &self.ts,
            index_close: &self.idx,
            long:        Instrument { open: &self.l_o, close: &self.l_c },
            short:       Instrument { open: &self.s_o, close: &self.s_c },
        }
    }
}

fn side_metrics_to_py<'py>(py: Python<'py>, sm: &SideMetrics) -> PyResult<&'py PyDict> {
    let d = PyDict::new(py);
    d.set_item("days_held",      sm.days_held)?;
    d.set_item("winning_days",   sm.winning_days)?;
    d.set_item("losing_days",    sm.losing_days)?;
    d.set_item("stop_fills",     sm.stop_fills)?;
    d.set_item("gap_fills",      sm.gap_fills)?;
    d.set_item("win_rate",       sm.win_rate)?;
    d.set_item("average_return", sm.average_return)?;
    d.set_item("total_return",   sm.total_return)?;
    Ok(d)
}

fn time_metrics_to_py<'py>(py: Python<'py>, tsm: &TimeSeriesMetrics) -> PyResult<&'py PyDict> {
    let d = PyDict::new(py);
    d.set_item("returns",           PyArray1::from_slice(py, &tsm.returns))?;
    d.set_item("mean_return",       tsm.mean_return)?;
    d.set_item("volatility",        tsm.volatility)?;
    d.set_item("sharpe_ratio",      tsm.sharpe_ratio)?;
    d.set_item("cumulative_return", tsm.cumulative_return)?;
    d.set_item("max_drawdown",      tsm.max_drawdown)?;
    Ok(d)
}

fn result_to_py<'py>(py: Python<'py>, res: &BacktestResult) -> PyResult<&'py PyDict> {
    let out = PyDict::new(py);
    out.set_item("timestamp", PyArray1::from_slice(py, &res.timestamps))?;
    out.set_item("portfolio", PyArray1::from_slice(py, &res.portfolio))?;

    let daily: Vec<f64> = res.days.iter().map(|d| d.daily_return).collect();
    out.set_item("daily_return", daily.into_pyarray(py))?;
    out.set_item("side", PyList::new(py, res.days.iter().map(|d| d.side.map(|s| s.as_str()))))?;
    out.set_item("exit", PyList::new(py, res.days.iter().map(|d| d.exit.map(|e| e.as_str()))))?;
    out.set_item("stop_loss", PyList::new(py, res.days.iter().map(|d| d.stop_loss)))?;

    let summary = compute_summary_metrics(res);
    let pm = PyDict::new(py);
    pm.set_item("overall", time_metrics_to_py(py, &summary.overall)?)?;
    pm.set_item("long",    side_metrics_to_py(py, &summary.longs)?)?;
    pm.set_item("short",   side_metrics_to_py(py, &summary.shorts)?)?;
    out.set_item("metrics", pm)?;
    Ok(out)
}

#[pyfunction]
#[pyo3(signature=(
    timestamp, index_close,
    long_open, long_close,
    short_open, short_close,
    stop_loss=None,
    degrees_of_freedom=DEFAULT_DEGREES_OF_FREEDOM,
    seed=0
))]
pub fn run_backtest(
    py:                 Python<'_>,
    timestamp:          &PyArray1<f64>,
    index_close:        &PyArray1<f64>,
    long_open:          &PyArray1<f64>,
    long_close:         &PyArray1<f64>,
    short_open:         &PyArray1<f64>,
    short_close:        &PyArray1<f64>,
    stop_loss:          Option<f64>,
    degrees_of_freedom: u32,
    seed:               u64,
) -> PyResult<PyObject> {
    let owned = OwnedInputs::from_arrays(
        timestamp, index_close, long_open, long_close, short_open, short_close,
    )?;
    let config = crate::config::BacktestConfig {
        ideal_stop_loss: stop_loss,
        degrees_of_freedom,
        seed,
    };

    let res = py.allow_threads(|| engine::run_backtest_with_config(&owned.view(), &config))?;
    Ok(result_to_py(py, &res)?.into())
}

#[pyfunction]
#[pyo3(signature=(
    timestamp, index_close,
    long_open, long_close,
    short_open, short_close,
    stop_losses=None,
    degrees_of_freedom=DEFAULT_DEGREES_OF_FREEDOM,
    seed=0
))]
pub fn sweep_stop_losses(
    py:                 Python<'_>,
    timestamp:          &PyArray1<f64>,
    index_close:        &PyArray1<f64>,
    long_open:          &PyArray1<f64>,
    long_close:         &PyArray1<f64>,
    short_open:         &PyArray1<f64>,
    short_close:        &PyArray1<f64>,
    stop_losses:        Option<Vec<Option<f64>>>,
    degrees_of_freedom: u32,
    seed:               u64,
) -> PyResult<PyObject> {
    let owned = OwnedInputs::from_arrays(
        timestamp, index_close, long_open, long_close, short_open, short_close,
    )?;
    let levels = stop_losses.unwrap_or_else(|| REFERENCE_STOP_LOSSES.to_vec());

    let swept = py.allow_threads(|| {
        sweep::sweep_stop_losses(&owned.view(), &levels, degrees_of_freedom, seed)
    })?;

    let out = PyDict::new(py);
    out.set_item("stop_losses", PyList::new(py, &swept.stop_losses))?;
    out.set_item("timestamp", PyArray1::from_slice(py, &owned.ts))?;
    let portfolios: Array2<f64> = swept.portfolios;
    out.set_item("portfolio", portfolios.into_pyarray(py))?;

    let runs = PyList::empty(py);
    for run in &swept.runs {
        runs.append(result_to_py(py, run)?)?;
    }
    out.set_item("runs", runs)?;
    Ok(out.into())
}

#[pyfunction]
pub fn price_relatives(py: Python<'_>, closes: &PyArray1<f64>) -> PyResult<PyObject> {
    let closes = unsafe { closes.as_slice()? };
    Ok(hurst::price_relatives(closes).into_pyarray(py).into())
}

/// (benchmark, leveraged long, leveraged inverse) tickers for an index name.
#[pyfunction]
pub fn index_tickers(name: &str) -> PyResult<(&'static str, &'static str, &'static str)> {
    let family: IndexFamily = name.parse()?;
    Ok(family.tickers())
}

#[pyfunction]
#[pyo3(signature=(log_level="info", log_format="pretty"))]
pub fn init_logging(log_level: &str, log_format: &str) {
    crate::logging::init_logging(log_level, log_format);
}
