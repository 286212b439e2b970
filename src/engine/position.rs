// src/engine/position.rs

/// Which leveraged instrument is held for a day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Long,   // leveraged long ETF
    Short,  // leveraged inverse ETF
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Long  => "long",
            Side::Short => "short",
        }
    }
}

/// Holding state between two closes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    NoPosition,
    HasPosition(Side),
}

/// How a held day was closed out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitKind {
    Close,       // held to the close, stop never touched
    StopFilled,  // breached intraday, filled exactly at the stop
    GapOpen,     // opened through the stop, filled at the open
}

impl ExitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitKind::Close      => "close",
            ExitKind::StopFilled => "stop",
            ExitKind::GapOpen    => "gap",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DayRecord {
    pub timestamp:    f64,
    pub side:         Option<Side>,     // instrument realized today, None on flat days
    pub daily_return: f64,              // multiplier applied to the portfolio (1.0 when flat)
    pub stop_loss:    Option<f64>,      // sampled stop actually used
    pub exit:         Option<ExitKind>, // None on flat days
    pub portfolio:    f64,              // value after today's return
}

impl DayRecord {
    pub fn flat(timestamp: f64, portfolio: f64) -> Self {
        Self {
            timestamp,
            side:         None,
            daily_return: 1.0,
            stop_loss:    None,
            exit:         None,
            portfolio,
        }
    }
}
