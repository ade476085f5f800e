//! Exchange rate table and the provider abstraction that fills it.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Currency every fetched rate is expressed against.
pub const BASE_CURRENCY: &str = "EUR";

/// Rates of every known currency relative to a single base currency.
///
/// The table is replaced wholesale on each successful fetch and never
/// mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateTable {
    pub base: String,
    pub date: Option<String>,
    rates: HashMap<String, f64>,
}

impl ExchangeRateTable {
    pub fn new(base: &str, rates: HashMap<String, f64>) -> Self {
        Self {
            base: base.to_uppercase(),
            date: None,
            rates,
        }
    }

    pub fn with_date(mut self, date: Option<String>) -> Self {
        self.date = date;
        self
    }

    /// Returns the rate for `code`, skipping entries that are not usable
    /// as a divisor (zero, negative, NaN or infinite).
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates
            .get(code)
            .copied()
            .filter(|r| r.is_finite() && *r > 0.0)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rate(code).is_some()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// All currency codes in the table, sorted.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.rates.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self, base: &str) -> Result<ExchangeRateTable>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ExchangeRateTable {
        ExchangeRateTable::new(
            "eur",
            HashMap::from([
                ("EUR".to_string(), 1.0),
                ("USD".to_string(), 1.1),
                ("ZERO".to_string(), 0.0),
                ("NEG".to_string(), -2.0),
                ("NAN".to_string(), f64::NAN),
            ]),
        )
    }

    #[test]
    fn test_rate_lookup_skips_unusable_entries() {
        let table = table();
        assert_eq!(table.base, "EUR");
        assert_eq!(table.rate("USD"), Some(1.1));
        assert_eq!(table.rate("EUR"), Some(1.0));
        assert!(table.rate("ZERO").is_none());
        assert!(table.rate("NEG").is_none());
        assert!(table.rate("NAN").is_none());
        assert!(!table.contains("GBP"));
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_default_table_is_empty() {
        let table = ExchangeRateTable::default();
        assert!(table.is_empty());
        assert!(table.rate("EUR").is_none());
        assert!(table.codes().is_empty());
    }

    #[test]
    fn test_codes_are_sorted() {
        let table = ExchangeRateTable::new(
            "EUR",
            HashMap::from([
                ("USD".to_string(), 1.1),
                ("AUD".to_string(), 1.6),
                ("EUR".to_string(), 1.0),
            ]),
        );
        assert_eq!(table.codes(), vec!["AUD", "EUR", "USD"]);
    }
}
