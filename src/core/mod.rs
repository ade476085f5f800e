//! Core business logic abstractions

pub mod analytics;
pub mod calculator;
pub mod config;
pub mod converter;
pub mod currency;
pub mod format;
pub mod history;
pub mod log;
pub mod rates;
pub mod share;

// Re-export main types for cleaner imports
pub use analytics::{AnalyticsSink, TracingAnalytics};
pub use calculator::CurrencyCalculator;
pub use converter::{ConversionInput, ConversionResult, convert, convert_input};
pub use history::{HistoryRecorder, MemoryHistory};
pub use rates::{ExchangeRateTable, RateProvider};
pub use share::{ShareOutcome, Sharer};
