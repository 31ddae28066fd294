//! Common constants used across all analytics components
//!
//! Single source of truth for the fixed defaults of the pipeline

// Calendar constants
/// Trading days per year used to annualize daily statistics
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
/// Calendar days per year used to convert days-to-expiry into a year fraction
pub const CALENDAR_DAYS_PER_YEAR: f64 = 365.0;

// Indicator windows
pub const DEFAULT_MA_SHORT: usize = 10;
pub const DEFAULT_MA_LONG: usize = 50;
pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_MACD_FAST: usize = 12;
pub const DEFAULT_MACD_SLOW: usize = 26;
pub const DEFAULT_MACD_SIGNAL: usize = 9;
pub const DEFAULT_BOLLINGER_WINDOW: usize = 20;
pub const DEFAULT_BOLLINGER_K: f64 = 2.0;

// Backtest defaults
pub const DEFAULT_INITIAL_BALANCE: f64 = 10_000.0;
pub const DEFAULT_TRANSACTION_COST: f64 = 10.0;

// Rates
/// Annual risk-free rate used by the risk calculator when no macro rate is supplied
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.01;
/// Annual risk-free rate used by the options engine when no macro rate is supplied
pub const DEFAULT_OPTIONS_RISK_FREE_RATE: f64 = 0.02;

// Risk
pub const DEFAULT_VAR_CONFIDENCE: f64 = 0.95;

// Suggestion thresholds
pub const HIGH_IV_THRESHOLD: f64 = 0.30;
pub const LOW_IV_THRESHOLD: f64 = 0.20;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;

// Market data collaborators
pub const DEFAULT_MAX_EXPIRATIONS: usize = 8;
pub const DEFAULT_CACHE_CAPACITY: usize = 128;
