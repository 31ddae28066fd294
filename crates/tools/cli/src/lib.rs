//! QuantScope pipeline
//!
//! Wires the indicator engine, backtest simulator, risk calculator,
//! options analytics and suggestion engine into one run over immutable
//! inputs.

pub mod config;
pub mod pipeline;

pub use crate::config::AnalyticsConfig;
pub use crate::pipeline::{OptionsSection, Pipeline, PipelineReport};
