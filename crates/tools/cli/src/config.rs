//! Layered configuration

use advisor::AdvisorConfig;
use anyhow::{Context, Result};
use backtesting::BacktestConfig;
use feeds::FeedConfig;
use indicators::IndicatorConfig;
use options_engine::OptionsConfig;
use risk::RiskConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix, e.g. `QUANTSCOPE__BACKTEST__INITIAL_BALANCE`
pub const ENV_PREFIX: &str = "QUANTSCOPE";

/// Keys read from the environment as comma-separated lists
const ENV_LIST_KEYS: [&str; 1] = ["indicators.ma_windows"];

/// Configuration of every pipeline component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub indicators: IndicatorConfig,
    pub backtest: BacktestConfig,
    pub risk: RiskConfig,
    pub options: OptionsConfig,
    pub advisor: AdvisorConfig,
    pub feeds: FeedConfig,
    /// Macro annual rate applied to every component when set
    pub risk_free_rate: Option<f64>,
}

impl AnalyticsConfig {
    /// Defaults, then the optional file, then `QUANTSCOPE__*` variables
    ///
    /// `QUANTSCOPE__INDICATORS__MA_WINDOWS` takes a comma-separated list of
    /// at least two windows; a single window can only be set from the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`Self::load`], reading variables from `env` instead of the process
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let mut environment = config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .list_separator(",")
            .try_parsing(true)
            .source(env);
        for key in ENV_LIST_KEYS {
            environment = environment.with_list_parse_key(key);
        }

        let settings = builder
            .add_source(environment)
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Indicator windows extended with every window the other components read
    #[must_use]
    pub fn effective_indicators(&self) -> IndicatorConfig {
        let mut indicators = self.indicators.clone();
        let required = [
            self.backtest.short_window,
            self.backtest.long_window,
            self.advisor.trend_short_window,
            self.advisor.trend_long_window,
        ];
        for window in required {
            if !indicators.ma_windows.contains(&window) {
                indicators.ma_windows.push(window);
            }
        }
        indicators
    }
}
