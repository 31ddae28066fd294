//! Indicator engine configuration

use common::constants::{
    DEFAULT_BOLLINGER_K, DEFAULT_BOLLINGER_WINDOW, DEFAULT_MA_LONG, DEFAULT_MA_SHORT,
    DEFAULT_MACD_FAST, DEFAULT_MACD_SIGNAL, DEFAULT_MACD_SLOW, DEFAULT_RSI_PERIOD,
};
use serde::{Deserialize, Serialize};

/// Window lengths for every indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Simple moving average windows, one `MA{n}` column each
    pub ma_windows: Vec<usize>,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_window: usize,
    /// Standard deviation multiplier of the bands
    pub bollinger_k: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ma_windows: vec![DEFAULT_MA_SHORT, DEFAULT_MA_LONG],
            rsi_period: DEFAULT_RSI_PERIOD,
            macd_fast: DEFAULT_MACD_FAST,
            macd_slow: DEFAULT_MACD_SLOW,
            macd_signal: DEFAULT_MACD_SIGNAL,
            bollinger_window: DEFAULT_BOLLINGER_WINDOW,
            bollinger_k: DEFAULT_BOLLINGER_K,
        }
    }
}
