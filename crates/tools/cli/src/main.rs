//! QuantScope command-line interface

#![allow(clippy::print_stdout)] // Reports are written to stdout

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cli::{AnalyticsConfig, Pipeline};
use common::OptionType;
use common::constants::CALENDAR_DAYS_PER_YEAR;
use feeds::{
    CachedPriceSource, CsvOptionChainSource, CsvPriceSource, OptionChainSource, Period,
    PriceSource, RateSource, StaticRateSource,
};
use options_engine::BlackScholes;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "quantscope", about = "Quantitative analytics for a single instrument")]
#[command(version)]
struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log: String,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run the full pipeline and print the report as JSON
    Report {
        #[arg(long)]
        symbol: String,
        /// 1mo, 3mo, 6mo, 1y, 2y, 5y or 10y
        #[arg(long, default_value = "1y")]
        period: Period,
        /// Overrides `feeds.data_dir` from the configuration
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Annual risk-free rate applied to every component
        #[arg(long)]
        rate: Option<f64>,
    },
    /// Black-Scholes Greeks of one contract
    Greeks {
        #[arg(long)]
        spot: f64,
        #[arg(long)]
        strike: f64,
        /// Calendar days to expiry
        #[arg(long)]
        days: i64,
        /// Implied volatility as a fraction
        #[arg(long)]
        vol: f64,
        #[arg(long)]
        rate: Option<f64>,
        #[arg(long)]
        put: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    match cli.cmd {
        Cmd::Report {
            symbol,
            period,
            data_dir,
            config,
            rate,
        } => cmd_report(&symbol, period, data_dir, config, rate),
        Cmd::Greeks {
            spot,
            strike,
            days,
            vol,
            rate,
            put,
        } => cmd_greeks(spot, strike, days, vol, rate, put),
    }
}

fn cmd_report(
    symbol: &str,
    period: Period,
    data_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
    rate: Option<f64>,
) -> Result<()> {
    let mut config = AnalyticsConfig::load(config_path.as_deref())?;
    if let Some(dir) = data_dir {
        config.feeds.data_dir = dir;
    }
    let dir = config.feeds.data_dir.clone();
    info!("Loading {} {} from {}", symbol, period, dir.display());

    let prices = CachedPriceSource::new(CsvPriceSource::new(&dir), config.feeds.cache_capacity)?;
    let series = prices
        .fetch(symbol, period)
        .with_context(|| format!("Failed to load prices for {symbol}"))?;

    let chain_source =
        CsvOptionChainSource::new(&dir).with_max_expirations(config.feeds.max_expirations);
    let chain = match chain_source.fetch_chain(symbol, series.last().date) {
        Ok(chain) => Some(chain),
        Err(e) => {
            warn!("Option chain unavailable for {}: {}", symbol, e);
            None
        }
    };

    let rate = StaticRateSource(rate.or(config.risk_free_rate)).annual_rate();
    let report = Pipeline::new(config)
        .run(&series, chain.as_ref(), rate)
        .with_context(|| format!("Analytics failed for {symbol}"))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_greeks(
    spot: f64,
    strike: f64,
    days: i64,
    vol: f64,
    rate: Option<f64>,
    put: bool,
) -> Result<()> {
    let option_type = if put { OptionType::Put } else { OptionType::Call };
    let rate = rate.unwrap_or(options_engine::OptionsConfig::default().risk_free_rate);
    #[allow(clippy::cast_precision_loss)]
    let time = days as f64 / CALENDAR_DAYS_PER_YEAR;

    let greeks = BlackScholes::calculate_greeks(option_type, spot, strike, rate, vol, time);
    let price = BlackScholes::price(option_type, spot, strike, rate, vol, time);

    let out = serde_json::json!({
        "option_type": option_type,
        "spot": spot,
        "strike": strike,
        "days_to_expiry": days,
        "risk_free_rate": rate,
        "implied_volatility": vol,
        "greeks": greeks,
        "theoretical_price": price,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
