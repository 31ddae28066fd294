//! Feed error types

use common::AnalyticsError;
use std::path::PathBuf;
use thiserror::Error;

pub type FeedResult<T> = Result<T, FeedError>;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("No data for {symbol} at {path}")]
    NotFound { symbol: String, path: PathBuf },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid period '{0}', expected one of 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y")]
    InvalidPeriod(String),

    #[error("Cache capacity must be non-zero")]
    ZeroCapacity,

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}
