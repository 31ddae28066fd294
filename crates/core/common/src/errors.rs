//! Error types shared by every analytics component

use thiserror::Error;

/// Result alias used across the pipeline
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Typed failures of the analytics pipeline
///
/// Greeks that cannot be computed are not represented here: they are a
/// per-quote value (`GreeksResult::Undefined` in the options engine).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// Series too short for the requested computation
    #[error("Insufficient data: {required} bars required, {available} available")]
    InsufficientData {
        /// Minimum number of bars the computation needs
        required: usize,
        /// Number of bars actually supplied
        available: usize,
    },

    /// A derived series the computation depends on is absent
    #[error("Missing indicator: {0}")]
    MissingIndicator(String),

    /// Zero variance precludes a ratio computation
    #[error("Degenerate series: {0}")]
    DegenerateSeries(String),

    /// The whole option chain is unavailable
    #[error("No options data: {0}")]
    NoOptionsData(String),

    /// Bars out of order or carrying unusable prices
    #[error("Malformed series: {0}")]
    MalformedSeries(String),

    /// Option quotes of one expiration could not be analysed
    #[error("Malformed quote: {0}")]
    MalformedQuote(String),

    /// A configuration value lies outside its valid range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AnalyticsError {
    /// Shorthand for [`AnalyticsError::InsufficientData`]
    #[must_use]
    pub const fn insufficient(required: usize, available: usize) -> Self {
        Self::InsufficientData {
            required,
            available,
        }
    }
}
