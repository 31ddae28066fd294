//! Backtesting for QuantScope
//!
//! Replays a long-only moving-average crossover strategy over a daily
//! series and reports the trade ledger, P&L and Sharpe ratio.

pub mod ledger;
pub mod simulator;

pub use ledger::{BacktestResult, TradeEvent};
pub use simulator::{BacktestConfig, BacktestSimulator, PositionState};
