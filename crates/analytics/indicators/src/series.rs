//! Named indicator columns aligned to a time series

use common::{AnalyticsError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column names produced by the engine
pub mod keys {
    pub const RSI: &str = "RSI";
    pub const MACD: &str = "MACD";
    pub const SIGNAL_LINE: &str = "SignalLine";
    pub const BB_UPPER: &str = "BBUpper";
    pub const BB_MIDDLE: &str = "BBMiddle";
    pub const BB_LOWER: &str = "BBLower";

    /// Column name of the simple moving average over `window` bars
    #[must_use]
    pub fn moving_average(window: usize) -> String {
        format!("MA{window}")
    }
}

/// Indicator name -> one optional value per bar index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawIndicatorSeries")]
pub struct IndicatorSeries {
    len: usize,
    columns: FxHashMap<String, Vec<Option<f64>>>,
}

/// Unchecked wire form; columns are realigned through [`IndicatorSeries::insert`]
#[derive(Deserialize)]
struct RawIndicatorSeries {
    len: usize,
    columns: FxHashMap<String, Vec<Option<f64>>>,
}

impl TryFrom<RawIndicatorSeries> for IndicatorSeries {
    type Error = AnalyticsError;

    fn try_from(raw: RawIndicatorSeries) -> Result<Self> {
        let mut series = Self::new(raw.len);
        for (name, values) in raw.columns {
            series.insert(name, values)?;
        }
        Ok(series)
    }
}

impl IndicatorSeries {
    /// Empty set of columns for a series of `len` bars
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len,
            columns: FxHashMap::default(),
        }
    }

    /// Add or replace a column; its length must match the series
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> Result<()> {
        let name = name.into();
        if values.len() != self.len {
            return Err(AnalyticsError::MalformedSeries(format!(
                "column {name} has {} values for {} bars",
                values.len(),
                self.len
            )));
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Number of bars every column is aligned to
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Value of `name` at bar `index`
    #[must_use]
    pub fn value(&self, name: &str, index: usize) -> Option<f64> {
        self.columns.get(name)?.get(index).copied().flatten()
    }

    /// Value of `name` at the final bar
    #[must_use]
    pub fn latest(&self, name: &str) -> Option<f64> {
        self.value(name, self.len.checked_sub(1)?)
    }

    /// Column names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.columns.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Readings of every column at the final bar
    #[must_use]
    pub fn snapshot(&self) -> IndicatorSnapshot {
        IndicatorSnapshot {
            values: self
                .columns
                .keys()
                .map(|name| (name.clone(), self.latest(name)))
                .collect(),
        }
    }
}

/// Latest reading of each indicator column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub values: BTreeMap<String, Option<f64>>,
}

impl IndicatorSnapshot {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied().flatten()
    }

    #[must_use]
    pub fn rsi(&self) -> Option<f64> {
        self.get(keys::RSI)
    }

    #[must_use]
    pub fn moving_average(&self, window: usize) -> Option<f64> {
        self.get(&keys::moving_average(window))
    }
}
