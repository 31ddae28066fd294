//! Core market data types for the analytics pipeline

use crate::errors::{AnalyticsError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// One trading day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Create a bar where open, high, low and close are all `price`
    #[must_use]
    pub const fn flat(date: NaiveDate, price: f64, volume: f64) -> Self {
        Self {
            date,
            open: price,
            high: price,
            low: price,
            close: price,
            volume,
        }
    }
}

/// Ordered, immutable sequence of daily bars
///
/// Holds at least one bar, with strictly increasing dates and positive,
/// finite closes. Cloning shares the underlying storage, so the same series
/// can be handed to several components without copying or aliasing it
/// mutably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Bar>", into = "Vec<Bar>")]
pub struct TimeSeries {
    bars: Arc<[Bar]>,
}

impl TimeSeries {
    /// Validate and freeze a bar sequence
    pub fn new(bars: Vec<Bar>) -> Result<Self> {
        if bars.is_empty() {
            return Err(AnalyticsError::insufficient(1, 0));
        }

        for (i, bar) in bars.iter().enumerate() {
            if !bar.close.is_finite() || bar.close <= 0.0 {
                return Err(AnalyticsError::MalformedSeries(format!(
                    "close {} on {} is not a positive finite price",
                    bar.close, bar.date
                )));
            }
            if i > 0 && bars[i - 1].date >= bar.date {
                return Err(AnalyticsError::MalformedSeries(format!(
                    "date {} does not follow {}",
                    bar.date,
                    bars[i - 1].date
                )));
            }
        }

        Ok(Self { bars: bars.into() })
    }

    /// Number of bars
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false: a series holds at least one bar
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Closing prices aligned by index
    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    #[must_use]
    pub fn first(&self) -> &Bar {
        &self.bars[0]
    }

    #[must_use]
    pub fn last(&self) -> &Bar {
        &self.bars[self.bars.len() - 1]
    }

    /// The trailing `count` bars (the whole series when it is shorter)
    #[must_use]
    pub fn tail(&self, count: usize) -> Self {
        let count = count.clamp(1, self.bars.len());
        Self {
            bars: self.bars[self.bars.len() - count..].into(),
        }
    }
}

impl TryFrom<Vec<Bar>> for TimeSeries {
    type Error = AnalyticsError;

    fn try_from(bars: Vec<Bar>) -> Result<Self> {
        Self::new(bars)
    }
}

impl From<TimeSeries> for Vec<Bar> {
    fn from(series: TimeSeries) -> Self {
        series.bars.to_vec()
    }
}

/// Option type for derivatives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Call option - right to buy the underlying at strike price
    Call,
    /// Put option - right to sell the underlying at strike price
    Put,
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" | "ce" => Ok(Self::Call),
            "put" | "p" | "pe" => Ok(Self::Put),
            other => Err(AnalyticsError::MalformedQuote(format!(
                "unknown option type '{other}'"
            ))),
        }
    }
}

/// One row of an option chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    pub strike: f64,
    pub expiration_date: NaiveDate,
    pub last_price: f64,
    pub implied_volatility: f64,
    pub option_type: OptionType,
}

/// All quotes sharing one expiration date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpirationSlice {
    pub expiration_date: NaiveDate,
    pub quotes: Vec<OptionQuote>,
}

impl ExpirationSlice {
    pub fn calls(&self) -> impl Iterator<Item = &OptionQuote> {
        self.quotes
            .iter()
            .filter(|q| q.option_type == OptionType::Call)
    }

    pub fn puts(&self) -> impl Iterator<Item = &OptionQuote> {
        self.quotes
            .iter()
            .filter(|q| q.option_type == OptionType::Put)
    }
}

/// Option chain of one underlying, ordered by expiration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionChain {
    pub expirations: Vec<ExpirationSlice>,
}

impl OptionChain {
    /// Group loose quotes by expiration date, nearest first
    #[must_use]
    pub fn from_quotes(quotes: impl IntoIterator<Item = OptionQuote>) -> Self {
        let mut grouped: BTreeMap<NaiveDate, Vec<OptionQuote>> = BTreeMap::new();
        for quote in quotes {
            grouped.entry(quote.expiration_date).or_default().push(quote);
        }

        Self {
            expirations: grouped
                .into_iter()
                .map(|(expiration_date, quotes)| ExpirationSlice {
                    expiration_date,
                    quotes,
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expirations.is_empty()
    }

    /// Keep only the `count` nearest expirations on or after `as_of`
    #[must_use]
    pub fn nearest(mut self, as_of: NaiveDate, count: usize) -> Self {
        self.expirations.retain(|slice| slice.expiration_date >= as_of);
        self.expirations.sort_by_key(|slice| slice.expiration_date);
        self.expirations.truncate(count);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap_or_default()
    }

    #[test]
    fn test_time_series_rejects_empty() {
        assert_eq!(
            TimeSeries::new(vec![]),
            Err(AnalyticsError::insufficient(1, 0))
        );
    }

    #[test]
    fn test_time_series_rejects_duplicate_dates() {
        let bars = vec![Bar::flat(day(2), 10.0, 1.0), Bar::flat(day(2), 11.0, 1.0)];
        assert!(matches!(
            TimeSeries::new(bars),
            Err(AnalyticsError::MalformedSeries(_))
        ));
    }

    #[test]
    fn test_time_series_rejects_non_positive_close() {
        let bars = vec![Bar::flat(day(2), 10.0, 1.0), Bar::flat(day(3), 0.0, 1.0)];
        assert!(matches!(
            TimeSeries::new(bars),
            Err(AnalyticsError::MalformedSeries(_))
        ));
    }

    #[test]
    fn test_tail_keeps_trailing_bars() -> Result<()> {
        let bars = (1..=5).map(|d| Bar::flat(day(d), f64::from(d), 1.0)).collect();
        let series = TimeSeries::new(bars)?;
        let tail = series.tail(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail.first().date, day(4));
        assert_eq!(series.tail(99).len(), 5);
        Ok(())
    }

    #[test]
    fn test_option_type_parsing() {
        assert_eq!("CALL".parse::<OptionType>(), Ok(OptionType::Call));
        assert_eq!("p".parse::<OptionType>(), Ok(OptionType::Put));
        assert!("straddle".parse::<OptionType>().is_err());
    }
}
