// src/engine/daily_return.rs

use crate::engine::position::ExitKind;

/// Realized multiplier for one held day.
///
/// Checks run gap → stop → close: a day that opens through the stop fills at
/// the open even when the close also breaches it.
pub fn realize_day(
    prev_close: f64,
    open:       f64,
    close:      f64,
    stop_loss:  Option<f64>,
) -> (f64, ExitKind) {
    let raw = close / prev_close;
    let Some(sl) = stop_loss else {
        return (raw, ExitKind::Close);
    };

    let threshold = 1.0 - sl;
    if open < prev_close * threshold {
        (open / prev_close, ExitKind::GapOpen)
    } else if raw < threshold {
        (threshold, ExitKind::StopFilled)
    } else {
        (raw, ExitKind::Close)
    }
}

pub fn daily_return(prev_close: f64, open: f64, close: f64, stop_loss: Option<f64>) -> f64 {
    realize_day(prev_close, open, close, stop_loss).0
}
