//! Common types and utilities for the QuantScope analytics pipeline
//!
//! Every component consumes these immutable records and reports failures
//! through [`AnalyticsError`].

pub mod constants;
pub mod errors;
pub mod types;

pub use constants::*;
pub use errors::*;
pub use types::*;
