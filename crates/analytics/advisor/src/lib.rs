//! Strategy advisor
//!
//! A deterministic rule table over implied volatility summaries and the
//! latest indicator readings. Nothing here fails: when no rule fires the
//! output is simply empty.

pub mod suggestion;
pub mod trend;

pub use suggestion::{AdvisorConfig, Suggestion, SuggestionEngine};
pub use trend::{MacdBias, MaRegime, RsiZone, TrendReading};
