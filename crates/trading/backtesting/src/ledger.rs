//! Trade ledger records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One round trip of the strategy, open until an exit is recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub entry_index: usize,
    pub exit_index: Option<usize>,
    pub entry_date: NaiveDate,
    pub exit_date: Option<NaiveDate>,
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    /// Units bought with the whole cash balance at entry
    pub position_size: f64,
    /// Cash held immediately before entry
    pub entry_cash: f64,
    /// Net of both transaction costs; `None` while open
    pub realized_pnl: Option<f64>,
}

impl TradeEvent {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.exit_index.is_none()
    }
}

/// Outcome of one backtest run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub initial_balance: f64,
    /// Cash plus the open position marked at the final close
    ///
    /// Both the entry and the exit fee of every round trip are booked, so this
    /// is `2 * transaction_cost` below the entry balance on a flat round trip.
    pub final_balance: f64,
    pub total_profit: f64,
    /// Sum of realized P&L over closed trades
    pub realized_profit: f64,
    /// Mark-to-market P&L of the open position, zero when flat
    pub unrealized_profit: f64,
    pub sharpe_ratio: f64,
    pub trade_log: Vec<TradeEvent>,
    pub closed_trades: usize,
    pub open_trades: usize,
    /// Marked balance at every bar
    pub equity_curve: Vec<f64>,
}

impl BacktestResult {
    /// Trades with a recorded exit
    pub fn closed(&self) -> impl Iterator<Item = &TradeEvent> {
        self.trade_log.iter().filter(|t| !t.is_open())
    }

    /// The position still held at the end of the series, if any
    #[must_use]
    pub fn open_position(&self) -> Option<&TradeEvent> {
        self.trade_log.last().filter(|t| t.is_open())
    }
}
