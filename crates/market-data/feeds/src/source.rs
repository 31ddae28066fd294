//! Source traits consumed by the pipeline

use crate::error::FeedResult;
use crate::period::Period;
use chrono::NaiveDate;
use common::{OptionChain, TimeSeries};

/// Supplies daily history for a symbol
pub trait PriceSource {
    fn fetch(&self, symbol: &str, period: Period) -> FeedResult<TimeSeries>;
}

/// Supplies the option chain for a symbol, nearest expirations first
pub trait OptionChainSource {
    fn fetch_chain(&self, symbol: &str, as_of: NaiveDate) -> FeedResult<OptionChain>;
}

/// Supplies an annual risk-free rate; `None` leaves each component's default
pub trait RateSource {
    fn annual_rate(&self) -> Option<f64>;
}

/// Fixed rate, or none
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StaticRateSource(pub Option<f64>);

impl RateSource for StaticRateSource {
    fn annual_rate(&self) -> Option<f64> {
        self.0
    }
}
