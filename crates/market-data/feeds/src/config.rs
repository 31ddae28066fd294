//! Feed configuration

use common::constants::{DEFAULT_CACHE_CAPACITY, DEFAULT_MAX_EXPIRATIONS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Directory holding `<SYMBOL>.csv` and `<SYMBOL>_options.csv`
    pub data_dir: PathBuf,
    /// Entries kept by the price cache
    pub cache_capacity: usize,
    /// Nearest expirations kept from the option chain
    pub max_expirations: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_expirations: DEFAULT_MAX_EXPIRATIONS,
        }
    }
}
