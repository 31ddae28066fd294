//! Indicator engine

use crate::config::IndicatorConfig;
use crate::rolling;
use crate::series::{IndicatorSeries, keys};
use common::{AnalyticsError, Result, TimeSeries};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Indicator families the engine can compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    /// One `MA{n}` column per configured window
    MovingAverages,
    Rsi,
    /// `MACD` and `SignalLine`
    Macd,
    /// `BBUpper`, `BBMiddle` and `BBLower`
    BollingerBands,
}

impl Indicator {
    pub const ALL: [Self; 4] = [
        Self::MovingAverages,
        Self::Rsi,
        Self::Macd,
        Self::BollingerBands,
    ];
}

/// Computes derived series from a time series
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

impl IndicatorEngine {
    #[must_use]
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Minimum number of bars for `indicator` to produce any value
    ///
    /// EMA-based series need a single bar.
    #[must_use]
    pub fn required_len(&self, indicator: Indicator) -> usize {
        let len = match indicator {
            Indicator::MovingAverages => self.config.ma_windows.iter().copied().max().unwrap_or(1),
            Indicator::Rsi => self.config.rsi_period,
            Indicator::Macd => 1,
            Indicator::BollingerBands => self.config.bollinger_window,
        };
        len.max(1)
    }

    /// Compute every indicator family
    pub fn compute_all(&self, series: &TimeSeries) -> Result<IndicatorSeries> {
        self.compute(series, &Indicator::ALL)
    }

    /// Compute the requested indicator families
    ///
    /// Fails with `InsufficientData` when the series is shorter than the
    /// longest window among the requested indicators.
    pub fn compute(&self, series: &TimeSeries, requested: &[Indicator]) -> Result<IndicatorSeries> {
        let required = requested
            .iter()
            .map(|&indicator| self.required_len(indicator))
            .max()
            .unwrap_or(1);
        if series.len() < required {
            return Err(AnalyticsError::insufficient(required, series.len()));
        }

        let closes = series.closes();
        let mut out = IndicatorSeries::new(closes.len());

        for &indicator in requested {
            debug!("Computing {:?} over {} bars", indicator, closes.len());
            match indicator {
                Indicator::MovingAverages => {
                    for &window in &self.config.ma_windows {
                        out.insert(
                            keys::moving_average(window),
                            rolling::simple_moving_average(&closes, window),
                        )?;
                    }
                }
                Indicator::Rsi => {
                    out.insert(
                        keys::RSI,
                        rolling::relative_strength_index(&closes, self.config.rsi_period),
                    )?;
                }
                Indicator::Macd => {
                    let (line, signal) = rolling::macd(
                        &closes,
                        self.config.macd_fast,
                        self.config.macd_slow,
                        self.config.macd_signal,
                    );
                    out.insert(keys::MACD, line.into_iter().map(Some).collect())?;
                    out.insert(keys::SIGNAL_LINE, signal.into_iter().map(Some).collect())?;
                }
                Indicator::BollingerBands => {
                    let bands = rolling::bollinger_bands(
                        &closes,
                        self.config.bollinger_window,
                        self.config.bollinger_k,
                    );
                    out.insert(keys::BB_UPPER, bands.upper)?;
                    out.insert(keys::BB_MIDDLE, bands.middle)?;
                    out.insert(keys::BB_LOWER, bands.lower)?;
                }
            }
        }

        Ok(out)
    }
}
