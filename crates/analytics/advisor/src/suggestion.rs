//! Suggestion rule table

use crate::trend::TrendReading;
use chrono::NaiveDate;
use common::constants::{
    DEFAULT_MA_LONG, DEFAULT_MA_SHORT, HIGH_IV_THRESHOLD, LOW_IV_THRESHOLD, RSI_OVERBOUGHT,
    RSI_OVERSOLD,
};
use indicators::IndicatorSnapshot;
use options_engine::ExpirationSummary;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Advisor thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Average IV strictly above this favors selling premium
    pub high_iv_threshold: f64,
    /// Average IV strictly below this favors buying premium
    pub low_iv_threshold: f64,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    /// Moving-average windows compared for the trend regime
    pub trend_short_window: usize,
    pub trend_long_window: usize,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            high_iv_threshold: HIGH_IV_THRESHOLD,
            low_iv_threshold: LOW_IV_THRESHOLD,
            rsi_overbought: RSI_OVERBOUGHT,
            rsi_oversold: RSI_OVERSOLD,
            trend_short_window: DEFAULT_MA_SHORT,
            trend_long_window: DEFAULT_MA_LONG,
        }
    }
}

/// One recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Suggestion {
    HighIv {
        expiration_date: NaiveDate,
        average_iv: f64,
    },
    LowIv {
        expiration_date: NaiveDate,
        average_iv: f64,
    },
    Overbought {
        rsi: f64,
    },
    Oversold {
        rsi: f64,
    },
}

impl Suggestion {
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::HighIv { .. } => "high IV: favor premium-selling strategies",
            Self::LowIv { .. } => "low IV: favor premium-buying strategies",
            Self::Overbought { .. } => "overbought: RSI signals a stretched advance",
            Self::Oversold { .. } => "oversold: RSI signals a stretched decline",
        }
    }

    /// Strategies matching the volatility regime; empty for RSI notes
    #[must_use]
    pub const fn candidate_strategies(&self) -> &'static [&'static str] {
        match self {
            Self::HighIv { .. } => &["iron condor", "covered call", "short strangle"],
            Self::LowIv { .. } => &["long call", "long put", "long straddle"],
            Self::Overbought { .. } | Self::Oversold { .. } => &[],
        }
    }

    #[must_use]
    pub const fn expiration_date(&self) -> Option<NaiveDate> {
        match self {
            Self::HighIv {
                expiration_date, ..
            }
            | Self::LowIv {
                expiration_date, ..
            } => Some(*expiration_date),
            Self::Overbought { .. } | Self::Oversold { .. } => None,
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Maps IV summaries and indicator readings to suggestions
#[derive(Debug, Clone, Default)]
pub struct SuggestionEngine {
    config: AdvisorConfig,
}

impl SuggestionEngine {
    #[must_use]
    pub fn new(config: AdvisorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// IV suggestion for one expiration, `None` inside the neutral band
    #[must_use]
    pub fn classify_expiration(&self, summary: &ExpirationSummary) -> Option<Suggestion> {
        let average_iv = summary.average_implied_volatility;
        let expiration_date = summary.expiration_date;

        if average_iv > self.config.high_iv_threshold {
            Some(Suggestion::HighIv {
                expiration_date,
                average_iv,
            })
        } else if average_iv < self.config.low_iv_threshold {
            Some(Suggestion::LowIv {
                expiration_date,
                average_iv,
            })
        } else {
            None
        }
    }

    /// RSI note for the final-bar reading, if any
    #[must_use]
    pub fn classify_rsi(&self, rsi: Option<f64>) -> Option<Suggestion> {
        let rsi = rsi?;
        if rsi > self.config.rsi_overbought {
            Some(Suggestion::Overbought { rsi })
        } else if rsi < self.config.rsi_oversold {
            Some(Suggestion::Oversold { rsi })
        } else {
            None
        }
    }

    /// IV suggestions in expiration order, followed by the RSI note
    #[must_use]
    pub fn suggest(
        &self,
        summaries: &[ExpirationSummary],
        snapshot: &IndicatorSnapshot,
    ) -> Vec<Suggestion> {
        let mut out: Vec<Suggestion> = summaries
            .iter()
            .filter_map(|summary| self.classify_expiration(summary))
            .collect();
        out.extend(self.classify_rsi(snapshot.rsi()));

        debug!(
            "{} suggestions from {} expirations",
            out.len(),
            summaries.len()
        );
        out
    }

    /// Trend regime of the final bar
    #[must_use]
    pub fn trend(&self, snapshot: &IndicatorSnapshot) -> TrendReading {
        TrendReading::from_snapshot(snapshot, &self.config)
    }
}
