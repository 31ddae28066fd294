//! CSV file sources
//!
//! Prices: `<dir>/<SYMBOL>.csv` with header `date,open,high,low,close,volume`.
//! Options: `<dir>/<SYMBOL>_options.csv` with header
//! `expiration_date,option_type,strike,last_price,implied_volatility`.

use crate::error::{FeedError, FeedResult};
use crate::period::Period;
use crate::source::{OptionChainSource, PriceSource};
use chrono::NaiveDate;
use common::constants::DEFAULT_MAX_EXPIRATIONS;
use common::{Bar, OptionChain, OptionQuote, TimeSeries};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

fn open_reader(symbol: &str, path: &Path) -> FeedResult<csv::Reader<std::fs::File>> {
    if !path.is_file() {
        return Err(FeedError::NotFound {
            symbol: symbol.to_string(),
            path: path.to_path_buf(),
        });
    }
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| FeedError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

/// Daily bars from one CSV file per symbol
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    dir: PathBuf,
}

impl CsvPriceSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol.to_uppercase()))
    }
}

impl PriceSource for CsvPriceSource {
    fn fetch(&self, symbol: &str, period: Period) -> FeedResult<TimeSeries> {
        let path = self.path_for(symbol);
        let mut reader = open_reader(symbol, &path)?;

        let bars = reader
            .deserialize::<Bar>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| FeedError::Csv {
                path: path.clone(),
                source,
            })?;
        info!("Loaded {} bars for {} from {}", bars.len(), symbol, path.display());

        let series = TimeSeries::new(bars)?;
        Ok(series.tail(period.trading_days()))
    }
}

#[derive(Debug, Deserialize)]
struct OptionRow {
    expiration_date: NaiveDate,
    option_type: String,
    strike: f64,
    last_price: f64,
    implied_volatility: f64,
}

impl OptionRow {
    fn into_quote(self) -> FeedResult<OptionQuote> {
        Ok(OptionQuote {
            strike: self.strike,
            expiration_date: self.expiration_date,
            last_price: self.last_price,
            implied_volatility: self.implied_volatility,
            option_type: self.option_type.parse()?,
        })
    }
}

/// Option chain from one CSV file per symbol
#[derive(Debug, Clone)]
pub struct CsvOptionChainSource {
    dir: PathBuf,
    max_expirations: usize,
}

impl CsvOptionChainSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_expirations: DEFAULT_MAX_EXPIRATIONS,
        }
    }

    #[must_use]
    pub fn with_max_expirations(mut self, max_expirations: usize) -> Self {
        self.max_expirations = max_expirations;
        self
    }

    #[must_use]
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir
            .join(format!("{}_options.csv", symbol.to_uppercase()))
    }
}

impl OptionChainSource for CsvOptionChainSource {
    fn fetch_chain(&self, symbol: &str, as_of: NaiveDate) -> FeedResult<OptionChain> {
        let path = self.path_for(symbol);
        let mut reader = open_reader(symbol, &path)?;

        let mut quotes = Vec::new();
        for row in reader.deserialize::<OptionRow>() {
            let row = row.map_err(|source| FeedError::Csv {
                path: path.clone(),
                source,
            })?;
            quotes.push(row.into_quote()?);
        }

        let chain = OptionChain::from_quotes(quotes).nearest(as_of, self.max_expirations);
        debug!(
            "Option chain for {} as of {}: {} expirations",
            symbol,
            as_of,
            chain.expirations.len()
        );
        Ok(chain)
    }
}
