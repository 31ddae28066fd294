//! Technical indicator engine
//!
//! Computes moving averages, RSI, MACD and Bollinger Bands from a
//! [`TimeSeries`](common::TimeSeries). Every output column is aligned to the
//! bar index; a value is `None` wherever its window lacks history.

pub mod config;
pub mod engine;
pub mod rolling;
pub mod series;

pub use config::IndicatorConfig;
pub use engine::{Indicator, IndicatorEngine};
pub use series::{IndicatorSeries, IndicatorSnapshot, keys};
