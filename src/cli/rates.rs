use super::ui;
use crate::core::config::AppConfig;
use crate::core::currency::SUPPORTED_CURRENCIES;
use crate::core::format::format_rate;
use crate::core::rates::BASE_CURRENCY;
use crate::core::{AnalyticsSink, ExchangeRateTable, HistoryRecorder, RateProvider};
use anyhow::Result;
use comfy_table::Cell;
use std::sync::Arc;

/// Renders the rate of every selectable currency against the table's base.
pub fn display_rates_table(rates: &ExchangeRateTable) -> String {
    let base = if rates.base.is_empty() {
        BASE_CURRENCY
    } else {
        rates.base.as_str()
    };

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Divisa"),
        ui::header_cell(""),
        ui::header_cell(&format!("1 {base} =")),
    ]);

    for currency in SUPPORTED_CURRENCIES {
        table.add_row(vec![
            Cell::new(currency.code),
            Cell::new(currency.flag),
            ui::format_optional_cell(rates.rate(currency.code), format_rate),
        ]);
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Tipos de cambio", ui::StyleType::Title)
    );
    output.push_str(&table.to_string());

    if let Some(date) = &rates.date {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(&format!("Actualizado: {date}"), ui::StyleType::Subtle)
        ));
    }
    output
}

pub async fn run(
    config: &AppConfig,
    provider: &dyn RateProvider,
    history: Arc<dyn HistoryRecorder>,
    analytics: Arc<dyn AnalyticsSink>,
) -> Result<()> {
    let calculator = super::start_calculator(
        config,
        provider,
        history,
        analytics,
        &config.defaults.from,
        &config.defaults.to,
    )
    .await;

    println!("{}", display_rates_table(calculator.rates()));
    println!("\n{}", super::attribution_line());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_rates_table_lists_catalogue() {
        let rates = ExchangeRateTable::new(
            "EUR",
            HashMap::from([("EUR".to_string(), 1.0), ("USD".to_string(), 1.0845)]),
        )
        .with_date(Some("2026-10-19".to_string()));

        let output = display_rates_table(&rates);
        assert!(output.contains("1 EUR ="));
        assert!(output.contains("1.0845"));
        assert!(output.contains("1.0000"));
        for currency in SUPPORTED_CURRENCIES {
            assert!(output.contains(currency.code));
        }
        assert!(output.contains("N/A"));
        assert!(output.contains("Actualizado: 2026-10-19"));
    }

    #[test]
    fn test_empty_table_shows_na() {
        let output = display_rates_table(&ExchangeRateTable::default());
        assert_eq!(output.matches("N/A").count(), SUPPORTED_CURRENCIES.len());
        assert!(!output.contains("Actualizado"));
    }
}
