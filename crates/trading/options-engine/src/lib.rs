//! Options analytics for a single underlying
//!
//! Features:
//! - Black-Scholes Greeks (Delta, Gamma, Theta, Vega) for European options
//! - Theoretical price per quote
//! - Per-expiration implied volatility summaries with partial-failure
//!   collection, evaluated in parallel across expirations

pub mod black_scholes;
pub mod chain;

pub use black_scholes::{BlackScholes, Greeks, GreeksResult};
pub use chain::{
    ChainAnalysis, ExpirationOutcome, ExpirationReport, ExpirationSummary, Outcome,
    OptionsAnalytics, OptionsConfig, QuoteAnalysis,
};
