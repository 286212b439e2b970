// src/engine/metrics.rs

use crate::engine::position::{DayRecord, ExitKind, Side};
use crate::engine::BacktestResult;

/// Counts over the days one side was held.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideMetrics {
    pub days_held:      usize,
    pub winning_days:   usize,
    pub losing_days:    usize,
    pub stop_fills:     usize,
    pub gap_fills:      usize,
    pub win_rate:       f64,
    pub average_return: f64,  // mean of (daily_return - 1)
    pub total_return:   f64,  // product of daily_return - 1
}

/// Day-by-day portfolio metrics
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesMetrics {
    pub returns:           Vec<f64>, // R_t per day
    pub mean_return:       f64,
    pub volatility:        f64,
    pub sharpe_ratio:      f64,
    pub cumulative_return: f64,
    pub max_drawdown:      f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMetrics {
    pub overall: TimeSeriesMetrics,
    pub longs:   SideMetrics,
    pub shorts:  SideMetrics,
}

fn compute_side_metrics(days: &[DayRecord], side: Side) -> SideMetrics {
    let held: Vec<&DayRecord> = days.iter().filter(|d| d.side == Some(side)).collect();

    let n = held.len();
    let mut m = SideMetrics { days_held: n, ..SideMetrics::default() };
    if n == 0 {
        return m;
    }

    let mut growth = 1.0;
    let mut sum_r  = 0.0;
    for day in &held {
        let r = day.daily_return - 1.0;
        if r > 0.0 {
            m.winning_days += 1;
        } else if r < 0.0 {
            m.losing_days += 1;
        }
        match day.exit {
            Some(ExitKind::StopFilled) => m.stop_fills += 1,
            Some(ExitKind::GapOpen)    => m.gap_fills += 1,
            _ => {}
        }
        sum_r  += r;
        growth *= day.daily_return;
    }

    m.win_rate       = m.winning_days as f64 / n as f64;
    m.average_return = sum_r / n as f64;
    m.total_return   = growth - 1.0;
    m
}

/// Day-by-day metrics from the ledger. Day 0 carries no return; flat days
/// contribute a zero return.
pub fn compute_time_metrics(days: &[DayRecord]) -> TimeSeriesMetrics {
    let returns: Vec<f64> = days.iter().skip(1).map(|d| d.daily_return - 1.0).collect();

    let count = returns.len();
    let mean_return = if count > 0 { returns.iter().sum::<f64>() / count as f64 } else { 0.0 };
    let volatility = if count > 1 {
        let ss: f64 = returns.iter().map(|r| (r - mean_return).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    } else {
        0.0
    };
    let sharpe_ratio = if volatility > 0.0 { mean_return / volatility } else { 0.0 };

    let cumulative_return = match (days.first(), days.last()) {
        (Some(first), Some(last)) => last.portfolio / first.portfolio - 1.0,
        _ => 0.0,
    };

    // portfolio values are strictly positive, so the running peak is too
    let (_, max_drawdown) = days.iter().fold((0.0_f64, 0.0_f64), |(peak, worst), d| {
        let peak = peak.max(d.portfolio);
        (peak, worst.max(1.0 - d.portfolio / peak))
    });

    TimeSeriesMetrics {
        returns,
        mean_return,
        volatility,
        sharpe_ratio,
        cumulative_return,
        max_drawdown,
    }
}

pub fn compute_summary_metrics(result: &BacktestResult) -> SummaryMetrics {
    SummaryMetrics {
        overall: compute_time_metrics(&result.days),
        longs:   compute_side_metrics(&result.days, Side::Long),
        shorts:  compute_side_metrics(&result.days, Side::Short),
    }
}
