//! Data collaborators for the analytics pipeline
//!
//! Organized structure:
//! - source: price, option chain and rate source traits
//! - csv_source: CSV files on local disk
//! - cache: caller-owned LRU cache over any price source
//! - period: lookback periods

pub mod cache;
pub mod config;
pub mod csv_source;
pub mod error;
pub mod period;
pub mod source;

pub use cache::CachedPriceSource;
pub use config::FeedConfig;
pub use csv_source::{CsvOptionChainSource, CsvPriceSource};
pub use error::{FeedError, FeedResult};
pub use period::Period;
pub use source::{OptionChainSource, PriceSource, RateSource, StaticRateSource};
