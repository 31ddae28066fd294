//! One analytics run over a series and its option chain

use crate::config::AnalyticsConfig;
use advisor::{Suggestion, SuggestionEngine, TrendReading};
use backtesting::{BacktestResult, BacktestSimulator};
use chrono::NaiveDate;
use common::{AnalyticsError, OptionChain, Result, TimeSeries};
use indicators::{IndicatorEngine, IndicatorSeries, IndicatorSnapshot};
use options_engine::{ChainAnalysis, ExpirationSummary, OptionsAnalytics};
use risk::{RiskCalculator, RiskMetrics};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Options part of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OptionsSection {
    Available(ChainAnalysis),
    Unavailable { reason: String },
}

impl OptionsSection {
    /// Summaries of every successfully analysed expiration
    #[must_use]
    pub fn summaries(&self) -> Vec<ExpirationSummary> {
        match self {
            Self::Available(analysis) => analysis.summaries(),
            Self::Unavailable { .. } => Vec::new(),
        }
    }
}

/// Everything one run produces, handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub valuation_date: NaiveDate,
    pub last_close: f64,
    pub indicators: IndicatorSeries,
    pub snapshot: IndicatorSnapshot,
    pub trend: TrendReading,
    pub backtest: BacktestResult,
    pub risk: RiskMetrics,
    pub options: OptionsSection,
    pub suggestions: Vec<Suggestion>,
}

/// Runs every component over one series
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: AnalyticsConfig,
}

impl Pipeline {
    #[must_use]
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Run the pipeline
    ///
    /// `rate` overrides the configured macro rate. Indicator, backtest and
    /// risk failures abort the run; an absent or empty chain only empties
    /// the options section.
    pub fn run(
        &self,
        series: &TimeSeries,
        chain: Option<&OptionChain>,
        rate: Option<f64>,
    ) -> Result<PipelineReport> {
        let rate = rate.or(self.config.risk_free_rate);
        let last = series.last();
        info!(
            "Running pipeline over {} bars ending {} (rate: {:?})",
            series.len(),
            last.date,
            rate
        );

        let engine = IndicatorEngine::new(self.config.effective_indicators());
        let indicators = engine.compute_all(series)?;
        let snapshot = indicators.snapshot();

        let backtest = BacktestSimulator::new(self.config.backtest.clone())
            .with_risk_free_rate(rate)
            .run(series, &indicators)?;

        let risk = RiskCalculator::new(self.config.risk.clone())
            .with_risk_free_rate(rate)
            .compute(series)?;

        let options = self.options_section(chain, last.close, last.date, rate);

        let advisor = SuggestionEngine::new(self.config.advisor.clone());
        let suggestions = advisor.suggest(&options.summaries(), &snapshot);
        let trend = advisor.trend(&snapshot);

        info!(
            "Pipeline complete - {} trades, VaR {:.4}, {} suggestions",
            backtest.trade_log.len(),
            risk.value_at_risk,
            suggestions.len()
        );

        Ok(PipelineReport {
            valuation_date: last.date,
            last_close: last.close,
            indicators,
            snapshot,
            trend,
            backtest,
            risk,
            options,
            suggestions,
        })
    }

    fn options_section(
        &self,
        chain: Option<&OptionChain>,
        spot: f64,
        valuation_date: NaiveDate,
        rate: Option<f64>,
    ) -> OptionsSection {
        let analytics =
            OptionsAnalytics::new(self.config.options.clone()).with_risk_free_rate(rate);
        let result = chain
            .ok_or_else(|| AnalyticsError::NoOptionsData("no option chain supplied".to_string()))
            .and_then(|chain| analytics.analyze_chain(chain, spot, valuation_date));

        match result {
            Ok(analysis) => OptionsSection::Available(analysis),
            Err(e) => {
                warn!("Options analytics unavailable: {}", e);
                OptionsSection::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }
}
