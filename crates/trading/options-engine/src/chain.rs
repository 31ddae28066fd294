//! Per-expiration analysis of an option chain

#![allow(clippy::cast_precision_loss)]

use crate::black_scholes::{BlackScholes, GreeksResult};
use chrono::NaiveDate;
use common::constants::{CALENDAR_DAYS_PER_YEAR, DEFAULT_OPTIONS_RISK_FREE_RATE};
use common::{AnalyticsError, ExpirationSlice, OptionChain, OptionQuote, OptionType, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Options analytics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsConfig {
    /// Annual continuously-compounded rate used for Black-Scholes
    pub risk_free_rate: f64,
    /// Evaluate expirations on the rayon pool
    pub parallel: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_OPTIONS_RISK_FREE_RATE,
            parallel: true,
        }
    }
}

/// One quote with its derived analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteAnalysis {
    pub quote: OptionQuote,
    pub greeks: GreeksResult,
    /// Spot over strike
    pub moneyness: f64,
    pub theoretical_price: Option<f64>,
}

/// Implied volatility summary of one expiration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpirationSummary {
    pub expiration_date: NaiveDate,
    /// Mean implied volatility over every call and put of the expiration
    pub average_implied_volatility: f64,
    /// Calendar days from the valuation date, negative once expired
    pub days_to_expiry: i64,
}

/// Full analysis of one expiration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpirationReport {
    pub summary: ExpirationSummary,
    pub calls: Vec<QuoteAnalysis>,
    pub puts: Vec<QuoteAnalysis>,
}

/// Success or failure of one expiration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Success(ExpirationReport),
    Failure { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpirationOutcome {
    pub expiration_date: NaiveDate,
    pub outcome: Outcome,
}

impl ExpirationOutcome {
    fn from_result(expiration_date: NaiveDate, result: Result<ExpirationReport>) -> Self {
        let outcome = match result {
            Ok(report) => Outcome::Success(report),
            Err(e) => Outcome::Failure {
                reason: e.to_string(),
            },
        };
        Self {
            expiration_date,
            outcome,
        }
    }

    #[must_use]
    pub const fn report(&self) -> Option<&ExpirationReport> {
        match &self.outcome {
            Outcome::Success(report) => Some(report),
            Outcome::Failure { .. } => None,
        }
    }
}

/// Analysis of a whole chain, in expiration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainAnalysis {
    pub valuation_date: NaiveDate,
    pub spot: f64,
    pub risk_free_rate: f64,
    pub expirations: Vec<ExpirationOutcome>,
}

impl ChainAnalysis {
    /// Summaries of every successful expiration
    pub fn summaries(&self) -> Vec<ExpirationSummary> {
        self.expirations
            .iter()
            .filter_map(ExpirationOutcome::report)
            .map(|report| report.summary.clone())
            .collect()
    }

    /// Expirations that failed, with their reasons
    pub fn failures(&self) -> impl Iterator<Item = (NaiveDate, &str)> {
        self.expirations.iter().filter_map(|e| match &e.outcome {
            Outcome::Failure { reason } => Some((e.expiration_date, reason.as_str())),
            Outcome::Success(_) => None,
        })
    }
}

/// Computes Greeks and implied volatility summaries for an option chain
#[derive(Debug, Clone, Default)]
pub struct OptionsAnalytics {
    config: OptionsConfig,
}

impl OptionsAnalytics {
    #[must_use]
    pub fn new(config: OptionsConfig) -> Self {
        Self { config }
    }

    /// Replace the configured rate with an externally supplied one
    #[must_use]
    pub fn with_risk_free_rate(mut self, annual_rate: Option<f64>) -> Self {
        if let Some(rate) = annual_rate {
            self.config.risk_free_rate = rate;
        }
        self
    }

    #[must_use]
    pub fn config(&self) -> &OptionsConfig {
        &self.config
    }

    /// Analyse every expiration of `chain` against `spot` as of `valuation_date`
    ///
    /// A failing expiration is recorded and the remaining ones are still
    /// analysed. Only an empty chain is an error.
    pub fn analyze_chain(
        &self,
        chain: &OptionChain,
        spot: f64,
        valuation_date: NaiveDate,
    ) -> Result<ChainAnalysis> {
        if chain.is_empty() {
            return Err(AnalyticsError::NoOptionsData(
                "option chain has no expirations".to_string(),
            ));
        }

        let analyse = |slice: &ExpirationSlice| {
            ExpirationOutcome::from_result(
                slice.expiration_date,
                self.analyze_expiration(slice, spot, valuation_date),
            )
        };
        let mut expirations: Vec<ExpirationOutcome> = if self.config.parallel {
            chain.expirations.par_iter().map(analyse).collect()
        } else {
            chain.expirations.iter().map(analyse).collect()
        };
        expirations.sort_by_key(|e| e.expiration_date);

        let analysis = ChainAnalysis {
            valuation_date,
            spot,
            risk_free_rate: self.config.risk_free_rate,
            expirations,
        };
        for (date, reason) in analysis.failures() {
            warn!("Expiration {} skipped: {}", date, reason);
        }

        Ok(analysis)
    }

    /// Analyse a single expiration
    pub fn analyze_expiration(
        &self,
        slice: &ExpirationSlice,
        spot: f64,
        valuation_date: NaiveDate,
    ) -> Result<ExpirationReport> {
        validate_slice(slice)?;

        let days_to_expiry = (slice.expiration_date - valuation_date).num_days();
        let time = days_to_expiry as f64 / CALENDAR_DAYS_PER_YEAR;

        let iv_sum: f64 = slice.quotes.iter().map(|q| q.implied_volatility).sum();
        let average_implied_volatility = iv_sum / slice.quotes.len() as f64;

        let mut calls = Vec::new();
        let mut puts = Vec::new();
        for quote in &slice.quotes {
            let analysis = self.analyze_quote(quote, spot, time);
            match quote.option_type {
                OptionType::Call => calls.push(analysis),
                OptionType::Put => puts.push(analysis),
            }
        }

        debug!(
            "Expiration {} - {} calls, {} puts, avg IV {:.4}, {} days",
            slice.expiration_date,
            calls.len(),
            puts.len(),
            average_implied_volatility,
            days_to_expiry
        );

        Ok(ExpirationReport {
            summary: ExpirationSummary {
                expiration_date: slice.expiration_date,
                average_implied_volatility,
                days_to_expiry,
            },
            calls,
            puts,
        })
    }

    fn analyze_quote(&self, quote: &OptionQuote, spot: f64, time: f64) -> QuoteAnalysis {
        let (kind, strike) = (quote.option_type, quote.strike);
        let rate = self.config.risk_free_rate;
        let sigma = quote.implied_volatility;

        QuoteAnalysis {
            quote: quote.clone(),
            greeks: BlackScholes::calculate_greeks(kind, spot, strike, rate, sigma, time),
            moneyness: spot / strike,
            theoretical_price: BlackScholes::price(kind, spot, strike, rate, sigma, time),
        }
    }
}

fn validate_slice(slice: &ExpirationSlice) -> Result<()> {
    if slice.quotes.is_empty() {
        return Err(AnalyticsError::MalformedQuote(format!(
            "expiration {} has no quotes",
            slice.expiration_date
        )));
    }

    for quote in &slice.quotes {
        if quote.expiration_date != slice.expiration_date {
            return Err(AnalyticsError::MalformedQuote(format!(
                "quote expiring {} listed under {}",
                quote.expiration_date, slice.expiration_date
            )));
        }
        if !quote.strike.is_finite() || quote.strike <= 0.0 {
            return Err(AnalyticsError::MalformedQuote(format!(
                "strike {} at expiration {}",
                quote.strike, slice.expiration_date
            )));
        }
        if !quote.implied_volatility.is_finite() {
            return Err(AnalyticsError::MalformedQuote(format!(
                "implied volatility {} at strike {} expiring {}",
                quote.implied_volatility, quote.strike, slice.expiration_date
            )));
        }
    }

    Ok(())
}
