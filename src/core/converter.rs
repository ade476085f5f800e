//! Pure currency conversion over an [`ExchangeRateTable`].

use crate::core::rates::ExchangeRateTable;
use serde::{Deserialize, Serialize};

/// What the user asked to convert, exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionInput {
    pub amount: String,
    pub from_currency: String,
    pub to_currency: String,
}

impl ConversionInput {
    pub fn new(amount: &str, from: &str, to: &str) -> Self {
        Self {
            amount: amount.to_string(),
            from_currency: from.to_string(),
            to_currency: to.to_string(),
        }
    }

    /// Pair identifier used by analytics, e.g. `EUR_USD`.
    pub fn currency_pair(&self) -> String {
        format!("{}_{}", self.from_currency, self.to_currency)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    #[serde(rename = "result")]
    pub converted_amount: f64,
    #[serde(rename = "rate")]
    pub effective_rate: f64,
}

/// Normalises raw amount input: decimal commas become dots and surrounding
/// whitespace is dropped.
pub fn normalize_amount(raw: &str) -> String {
    raw.trim().replace(',', ".")
}

/// Parses an amount, accepting only finite non-negative numbers.
pub fn parse_amount(amount: &str) -> Option<f64> {
    normalize_amount(amount)
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite() && *a >= 0.0)
}

/// Converts `amount` from one currency to another through the table's base.
///
/// Returns `None` when either currency has no usable rate.
pub fn convert(
    amount: f64,
    from: &str,
    to: &str,
    rates: &ExchangeRateTable,
) -> Option<ConversionResult> {
    let from_rate = rates.rate(from)?;
    let to_rate = rates.rate(to)?;

    let amount_in_base = amount / from_rate;
    Some(ConversionResult {
        converted_amount: amount_in_base * to_rate,
        effective_rate: to_rate / from_rate,
    })
}

/// Converts a raw [`ConversionInput`]. Unparseable or negative amounts and
/// unknown currencies produce no result.
pub fn convert_input(
    input: &ConversionInput,
    rates: &ExchangeRateTable,
) -> Option<ConversionResult> {
    let amount = parse_amount(&input.amount)?;
    convert(amount, &input.from_currency, &input.to_currency, rates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn rates() -> ExchangeRateTable {
        ExchangeRateTable::new(
            "EUR",
            HashMap::from([
                ("EUR".to_string(), 1.0),
                ("USD".to_string(), 1.1),
                ("JPY".to_string(), 161.37),
                ("GBP".to_string(), 0.8412),
                ("INR".to_string(), 90.05),
            ]),
        )
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_eur_to_usd() {
        let result =
            convert_input(&ConversionInput::new("100", "EUR", "USD"), &rates()).unwrap();
        assert!(approx_eq(result.converted_amount, 110.0));
        assert_eq!(result.effective_rate, 1.1);
    }

    #[test]
    fn test_matches_proportional_formula() {
        let rates = rates();
        for amount in [0.5, 1.0, 42.0, 1234.56, 1_000_000.0] {
            for (from, to) in [("USD", "JPY"), ("GBP", "INR"), ("JPY", "EUR")] {
                let result = convert(amount, from, to, &rates).unwrap();
                let expected = amount / rates.rate(from).unwrap() * rates.rate(to).unwrap();
                assert!(approx_eq(result.converted_amount, expected));
            }
        }
    }

    #[test]
    fn test_same_currency_is_identity() {
        let rates = rates();
        for code in ["EUR", "USD", "JPY", "GBP"] {
            let result = convert(250.75, code, code, &rates).unwrap();
            assert!(approx_eq(result.converted_amount, 250.75));
            assert!(approx_eq(result.effective_rate, 1.0));
        }
    }

    #[test]
    fn test_round_trip_returns_original_amount() {
        let rates = rates();
        let there = convert(987.65, "GBP", "JPY", &rates).unwrap();
        let back = convert(there.converted_amount, "JPY", "GBP", &rates).unwrap();
        assert!(approx_eq(back.converted_amount, 987.65));
    }

    #[test]
    fn test_missing_currency_produces_no_result() {
        let rates = rates();
        assert!(convert(10.0, "EUR", "CHF", &rates).is_none());
        assert!(convert(10.0, "CHF", "EUR", &rates).is_none());
        assert!(convert(10.0, "EUR", "USD", &ExchangeRateTable::default()).is_none());
    }

    #[test]
    fn test_invalid_amounts_produce_no_result() {
        let rates = rates();
        for amount in ["abc", "", "   ", "-5", "NaN", "inf", "1.2.3"] {
            assert!(
                convert_input(&ConversionInput::new(amount, "EUR", "USD"), &rates).is_none(),
                "amount {amount:?} should not convert"
            );
        }
    }

    #[test]
    fn test_decimal_comma_is_accepted() {
        let result =
            convert_input(&ConversionInput::new("12,5", "EUR", "USD"), &rates()).unwrap();
        assert!(approx_eq(result.converted_amount, 13.75));
    }

    #[test]
    fn test_zero_amount_converts_to_zero() {
        let result =
            convert_input(&ConversionInput::new("0", "EUR", "USD"), &rates()).unwrap();
        assert_eq!(result.converted_amount, 0.0);
    }

    #[test]
    fn test_serialized_shapes() {
        let input = ConversionInput::new("100", "EUR", "USD");
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            serde_json::json!({"amount": "100", "fromCurrency": "EUR", "toCurrency": "USD"})
        );
        assert_eq!(input.currency_pair(), "EUR_USD");

        let result = ConversionResult {
            converted_amount: 110.0,
            effective_rate: 1.1,
        };
        assert_eq!(
            serde_json::to_value(result).unwrap(),
            serde_json::json!({"result": 110.0, "rate": 1.1})
        );
    }
}
