//! Crossover state machine

use crate::ledger::{BacktestResult, TradeEvent};
use common::constants::{
    DEFAULT_INITIAL_BALANCE, DEFAULT_MA_LONG, DEFAULT_MA_SHORT, DEFAULT_RISK_FREE_RATE,
    DEFAULT_TRANSACTION_COST,
};
use common::{AnalyticsError, Bar, Result, TimeSeries};
use indicators::{IndicatorSeries, keys};
use risk::{RiskCalculator, RiskConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Configuration for backtesting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    pub initial_balance: f64,
    /// Flat fee charged on every entry and every exit
    pub transaction_cost: f64,
    /// Window of the fast moving average, read from `MA{short_window}`
    pub short_window: usize,
    /// Window of the slow moving average, read from `MA{long_window}`
    pub long_window: usize,
    /// Annual rate for the Sharpe ratio
    pub annual_risk_free_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_balance: DEFAULT_INITIAL_BALANCE,
            transaction_cost: DEFAULT_TRANSACTION_COST,
            short_window: DEFAULT_MA_SHORT,
            long_window: DEFAULT_MA_LONG,
            annual_risk_free_rate: DEFAULT_RISK_FREE_RATE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionState {
    Flat,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cross {
    Up,
    Down,
}

/// Sign change of `short - long` between bars `i - 1` and `i`
///
/// A bar where both averages are equal is never a cross on its own.
fn detect_cross(short: &[Option<f64>], long: &[Option<f64>], i: usize) -> Option<Cross> {
    let prev = i.checked_sub(1)?;
    let (s_prev, l_prev) = ((*short.get(prev)?)?, (*long.get(prev)?)?);
    let (s_now, l_now) = ((*short.get(i)?)?, (*long.get(i)?)?);

    if s_now > l_now && s_prev <= l_prev {
        Some(Cross::Up)
    } else if s_now < l_now && s_prev >= l_prev {
        Some(Cross::Down)
    } else {
        None
    }
}

/// Mutable ledger of one run
#[derive(Debug)]
struct Account {
    cash: f64,
    state: PositionState,
    trades: Vec<TradeEvent>,
}

impl Account {
    fn new(initial_balance: f64) -> Self {
        Self {
            cash: initial_balance,
            state: PositionState::Flat,
            trades: Vec::new(),
        }
    }

    fn open_trade(&self) -> Option<&TradeEvent> {
        match self.state {
            PositionState::Long => self.trades.last(),
            PositionState::Flat => None,
        }
    }

    fn equity(&self, close: f64) -> f64 {
        self.open_trade()
            .map_or(self.cash, |trade| self.cash + trade.position_size * close)
    }

    /// Spend the whole balance on the close, then pay the fee
    fn enter(&mut self, index: usize, bar: &Bar, cost: f64) {
        let position_size = self.cash / bar.close;
        let entry_cash = self.cash;
        self.cash = -cost;
        self.state = PositionState::Long;
        self.trades.push(TradeEvent {
            entry_index: index,
            exit_index: None,
            entry_date: bar.date,
            exit_date: None,
            entry_price: bar.close,
            exit_price: None,
            position_size,
            entry_cash,
            realized_pnl: None,
        });
        debug!("Entered long at index {} @ {:.4}, size {:.6}", index, bar.close, position_size);
    }

    /// Sell the position at the close and pay the fee
    fn exit(&mut self, index: usize, bar: &Bar, cost: f64) {
        let Some(trade) = self.trades.last_mut() else {
            return;
        };
        let proceeds = trade.position_size * bar.close - cost;
        self.cash += proceeds;
        trade.exit_index = Some(index);
        trade.exit_date = Some(bar.date);
        trade.exit_price = Some(bar.close);
        trade.realized_pnl = Some(self.cash - trade.entry_cash);
        self.state = PositionState::Flat;
        debug!(
            "Exited at index {} @ {:.4}, pnl {:.4}",
            index,
            bar.close,
            self.cash - trade.entry_cash
        );
    }
}

/// Replays the moving-average crossover strategy
#[derive(Debug, Clone, Default)]
pub struct BacktestSimulator {
    config: BacktestConfig,
}

impl BacktestSimulator {
    #[must_use]
    pub fn new(config: BacktestConfig) -> Self {
        Self { config }
    }

    /// Replace the Sharpe ratio rate with an externally supplied one
    #[must_use]
    pub fn with_risk_free_rate(mut self, annual_rate: Option<f64>) -> Self {
        if let Some(rate) = annual_rate {
            self.config.annual_risk_free_rate = rate;
        }
        self
    }

    #[must_use]
    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    fn moving_average<'a>(
        &self,
        indicators: &'a IndicatorSeries,
        window: usize,
    ) -> Result<&'a [Option<f64>]> {
        let name = keys::moving_average(window);
        match indicators.get(&name) {
            Some(values) if values.iter().any(Option::is_some) => Ok(values),
            Some(_) => Err(AnalyticsError::MissingIndicator(format!(
                "{name} has no defined values"
            ))),
            None => Err(AnalyticsError::MissingIndicator(name)),
        }
    }

    /// Run the strategy over `series` using its precomputed moving averages
    ///
    /// An open position at the end is marked to the final close and left
    /// open in the ledger.
    pub fn run(&self, series: &TimeSeries, indicators: &IndicatorSeries) -> Result<BacktestResult> {
        let short = self.moving_average(indicators, self.config.short_window)?;
        let long = self.moving_average(indicators, self.config.long_window)?;
        if indicators.len() != series.len()
            || short.len() != series.len()
            || long.len() != series.len()
        {
            return Err(AnalyticsError::MalformedSeries(format!(
                "indicators cover {} bars ({} short, {} long), series has {}",
                indicators.len(),
                short.len(),
                long.len(),
                series.len()
            )));
        }

        let cost = self.config.transaction_cost;
        let bars = series.bars();
        let mut account = Account::new(self.config.initial_balance);
        let mut equity_curve = Vec::with_capacity(bars.len());
        equity_curve.push(account.equity(series.first().close));

        for (i, bar) in bars.iter().enumerate().skip(1) {
            match (account.state, detect_cross(short, long, i)) {
                (PositionState::Flat, Some(Cross::Up)) => account.enter(i, bar, cost),
                (PositionState::Long, Some(Cross::Down)) => account.exit(i, bar, cost),
                _ => {}
            }
            equity_curve.push(account.equity(bar.close));
        }

        let final_close = series.last().close;
        let final_balance = account.equity(final_close);
        let unrealized_profit = account
            .open_trade()
            .map_or(0.0, |trade| final_balance - trade.entry_cash);
        let realized_profit: f64 = account.trades.iter().filter_map(|t| t.realized_pnl).sum();
        let open_trades = usize::from(account.state == PositionState::Long);

        let sharpe_ratio = RiskCalculator::new(RiskConfig {
            annual_risk_free_rate: self.config.annual_risk_free_rate,
            ..RiskConfig::default()
        })
        .sharpe_ratio(series)?;

        let result = BacktestResult {
            initial_balance: self.config.initial_balance,
            final_balance,
            total_profit: final_balance - self.config.initial_balance,
            realized_profit,
            unrealized_profit,
            sharpe_ratio,
            closed_trades: account.trades.len() - open_trades,
            open_trades,
            trade_log: account.trades,
            equity_curve,
        };

        info!(
            "Backtest complete - Profit: {:.2}, Trades: {} closed / {} open, Sharpe: {:.2}",
            result.total_profit, result.closed_trades, result.open_trades, result.sharpe_ratio
        );

        Ok(result)
    }
}
