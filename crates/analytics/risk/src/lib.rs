//! Risk metrics for a single instrument
//!
//! Value-at-Risk (parametric, one day) and the annualized Sharpe ratio, both
//! computed from the bar-to-bar simple return stream of a [`TimeSeries`].

#![allow(clippy::cast_precision_loss)]

use common::constants::{DEFAULT_RISK_FREE_RATE, DEFAULT_VAR_CONFIDENCE, TRADING_DAYS_PER_YEAR};
use common::{AnalyticsError, Result, TimeSeries};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;
use tracing::debug;

/// Risk calculator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// One-tailed VaR confidence level, in (0, 1)
    pub confidence: f64,
    /// Annual risk-free rate; the daily rate is this divided by `trading_days`
    pub annual_risk_free_rate: f64,
    pub trading_days: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            confidence: DEFAULT_VAR_CONFIDENCE,
            annual_risk_free_rate: DEFAULT_RISK_FREE_RATE,
            trading_days: TRADING_DAYS_PER_YEAR,
        }
    }
}

/// Risk metrics of one return stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Return-scale loss threshold; negative values indicate expected loss
    pub value_at_risk: f64,
    pub sharpe_ratio: f64,
    pub mean_daily_return: f64,
    /// Sample standard deviation of daily returns
    pub daily_std_dev: f64,
    pub annualized_volatility: f64,
    /// Largest peak-to-trough decline of the close, as a fraction of the peak
    pub max_drawdown: f64,
}

/// Daily simple returns `close[t] / close[t-1] - 1` for `t = 1..n-1`
pub fn daily_returns(series: &TimeSeries) -> Result<Vec<f64>> {
    if series.len() < 2 {
        return Err(AnalyticsError::insufficient(2, series.len()));
    }

    Ok(series
        .bars()
        .windows(2)
        .map(|w| w[1].close / w[0].close - 1.0)
        .collect())
}

/// Mean and sample standard deviation, rejecting a zero or undefined spread
fn return_moments(returns: &[f64]) -> Result<(f64, f64)> {
    let mean = (&returns[..]).mean();
    let std_dev = (&returns[..]).std_dev();

    if !std_dev.is_finite() || std_dev == 0.0 {
        return Err(AnalyticsError::DegenerateSeries(format!(
            "return standard deviation is {std_dev} over {} returns",
            returns.len()
        )));
    }

    Ok((mean, std_dev))
}

/// Largest fractional decline from a running peak
#[must_use]
pub fn max_drawdown(closes: &[f64]) -> f64 {
    let mut max_drawdown = 0.0;
    let mut peak = f64::MIN;

    for &value in closes {
        if value > peak {
            peak = value;
        }
        let drawdown = (peak - value) / peak;
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
        }
    }

    max_drawdown
}

/// Computes risk metrics from a time series
#[derive(Debug, Clone, Default)]
pub struct RiskCalculator {
    config: RiskConfig,
}

impl RiskCalculator {
    #[must_use]
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Replace the annual risk-free rate with an externally supplied one
    #[must_use]
    pub fn with_risk_free_rate(mut self, annual_rate: Option<f64>) -> Self {
        if let Some(rate) = annual_rate {
            self.config.annual_risk_free_rate = rate;
        }
        self
    }

    #[must_use]
    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    fn daily_risk_free(&self) -> f64 {
        self.config.annual_risk_free_rate / self.config.trading_days
    }

    /// Annualized Sharpe ratio of the daily return stream
    pub fn sharpe_ratio(&self, series: &TimeSeries) -> Result<f64> {
        let returns = daily_returns(series)?;
        let (mean, std_dev) = return_moments(&returns)?;
        Ok(self.annualized_sharpe(mean, std_dev))
    }

    fn annualized_sharpe(&self, mean: f64, std_dev: f64) -> f64 {
        (mean - self.daily_risk_free()) / std_dev * self.config.trading_days.sqrt()
    }

    /// One-tailed standard normal quantile of the configured confidence
    fn z_score(&self) -> Result<f64> {
        let confidence = self.config.confidence;
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(AnalyticsError::InvalidConfig(format!(
                "VaR confidence must lie in (0, 1), got {confidence}"
            )));
        }
        let normal =
            Normal::new(0.0, 1.0).map_err(|e| AnalyticsError::InvalidConfig(e.to_string()))?;
        Ok(normal.inverse_cdf(confidence))
    }

    /// Value-at-Risk, Sharpe ratio and supporting statistics
    pub fn compute(&self, series: &TimeSeries) -> Result<RiskMetrics> {
        let z = self.z_score()?;
        let returns = daily_returns(series)?;
        let (mean, std_dev) = return_moments(&returns)?;

        let value_at_risk = mean - z * std_dev;
        let sharpe_ratio = self.annualized_sharpe(mean, std_dev);

        debug!(
            "Risk over {} returns - mean: {:.6}, std: {:.6}, z: {:.4}",
            returns.len(),
            mean,
            std_dev,
            z
        );

        Ok(RiskMetrics {
            value_at_risk,
            sharpe_ratio,
            mean_daily_return: mean,
            daily_std_dev: std_dev,
            annualized_volatility: std_dev * self.config.trading_days.sqrt(),
            max_drawdown: max_drawdown(&series.closes()),
        })
    }
}
