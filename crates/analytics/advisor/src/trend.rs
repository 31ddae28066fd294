//! Trend classification of the latest indicator readings

use crate::suggestion::AdvisorConfig;
use indicators::{IndicatorSnapshot, keys};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaRegime {
    /// Short average above the long one
    GoldenCross,
    DeathCross,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MacdBias {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

/// Trend view of the final bar; a field is `None` when its inputs are absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrendReading {
    pub ma_regime: Option<MaRegime>,
    pub macd_bias: Option<MacdBias>,
    pub rsi_zone: Option<RsiZone>,
}

impl TrendReading {
    #[must_use]
    pub fn from_snapshot(snapshot: &IndicatorSnapshot, config: &AdvisorConfig) -> Self {
        let ma_regime = snapshot
            .moving_average(config.trend_short_window)
            .zip(snapshot.moving_average(config.trend_long_window))
            .map(|(short, long)| {
                if short > long {
                    MaRegime::GoldenCross
                } else {
                    MaRegime::DeathCross
                }
            });

        let macd_bias = snapshot
            .get(keys::MACD)
            .zip(snapshot.get(keys::SIGNAL_LINE))
            .map(|(line, signal)| {
                if line > signal {
                    MacdBias::Bullish
                } else {
                    MacdBias::Bearish
                }
            });

        let rsi_zone = snapshot.rsi().map(|rsi| {
            if rsi > config.rsi_overbought {
                RsiZone::Overbought
            } else if rsi < config.rsi_oversold {
                RsiZone::Oversold
            } else {
                RsiZone::Neutral
            }
        });

        Self {
            ma_regime,
            macd_bias,
            rsi_zone,
        }
    }
}
