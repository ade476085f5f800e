//! Interactive calculator session driven by line commands on stdin.

use super::{convert, rates, ui};
use crate::core::config::AppConfig;
use crate::core::format::format_amount;
use crate::core::history::CalculationRecord;
use crate::core::share::Sharer;
use crate::core::{AnalyticsSink, CurrencyCalculator, MemoryHistory, RateProvider};
use anyhow::{Context, Result};
use comfy_table::Cell;
use serde_json::Value;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Comandos:
  amount <cantidad>   cantidad a convertir (admite coma decimal)
  from <divisa>       divisa de origen
  to <divisa>         divisa de destino
  share               compartir el resultado
  history             cálculos de esta sesión
  rates               tipos de cambio disponibles
  source              origen de los datos
  help                esta ayuda
  quit                salir";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Amount(String),
    From(String),
    To(String),
    Share,
    History,
    Rates,
    Source,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> SessionCommand {
    let line = line.trim();
    let (verb, arg) = match line.split_once(char::is_whitespace) {
        Some((verb, arg)) => (verb, arg.trim()),
        None => (line, ""),
    };

    match (verb.to_lowercase().as_str(), arg) {
        ("", _) => SessionCommand::Empty,
        ("amount", arg) => SessionCommand::Amount(arg.to_string()),
        ("from", arg) if !arg.is_empty() => SessionCommand::From(arg.to_string()),
        ("to", arg) if !arg.is_empty() => SessionCommand::To(arg.to_string()),
        ("share", _) => SessionCommand::Share,
        ("history", _) => SessionCommand::History,
        ("rates", _) => SessionCommand::Rates,
        ("source", _) => SessionCommand::Source,
        ("help", _) => SessionCommand::Help,
        ("quit" | "exit", _) => SessionCommand::Quit,
        _ => SessionCommand::Unknown(line.to_string()),
    }
}

/// Everything a session needs besides the calculator itself.
pub struct SessionContext<'a> {
    pub config: &'a AppConfig,
    pub history: &'a MemoryHistory,
    pub sharer: &'a Sharer,
}

/// Applies one command and returns what should be printed.
pub fn handle_command(
    calculator: &mut CurrencyCalculator,
    command: SessionCommand,
    ctx: &SessionContext<'_>,
) -> Option<String> {
    match command {
        SessionCommand::Amount(amount) => {
            if !calculator.set_amount(&amount) {
                debug!(amount = %amount, "Ignored amount input");
            }
            convert::render_result(calculator)
        }
        SessionCommand::From(code) => {
            calculator.set_from(&code);
            convert::render_result(calculator)
        }
        SessionCommand::To(code) => {
            calculator.set_to(&code);
            convert::render_result(calculator)
        }
        SessionCommand::Share => calculator
            .share(ctx.sharer, &ctx.config.share.url)
            .map(convert::render_share_outcome),
        SessionCommand::History => Some(display_history(&ctx.history.entries())),
        SessionCommand::Rates => Some(rates::display_rates_table(calculator.rates())),
        SessionCommand::Source => {
            let url = calculator.open_attribution_link();
            Some(format!("ExchangeRate-API: {url}"))
        }
        SessionCommand::Help => Some(HELP.to_string()),
        SessionCommand::Unknown(line) => Some(ui::style_text(
            &format!("Comando desconocido: {line}"),
            ui::StyleType::Error,
        )),
        SessionCommand::Quit | SessionCommand::Empty => None,
    }
}

fn text_field<'v>(value: &'v Value, key: &str) -> &'v str {
    value.get(key).and_then(Value::as_str).unwrap_or("?")
}

/// Renders the calculations recorded in this session, oldest first.
pub fn display_history(entries: &[CalculationRecord]) -> String {
    if entries.is_empty() {
        return ui::style_text("Sin cálculos todavía", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Hora"),
        ui::header_cell("Cantidad"),
        ui::header_cell("Resultado"),
        ui::header_cell("Tasa"),
    ]);

    for entry in entries {
        let from = text_field(&entry.input, "fromCurrency");
        let to = text_field(&entry.input, "toCurrency");
        let amount = text_field(&entry.input, "amount");
        let result = entry.output.get("result").and_then(Value::as_f64);
        let rate = entry.output.get("rate").and_then(Value::as_f64);

        table.add_row(vec![
            Cell::new(entry.recorded_at.format("%H:%M:%S").to_string()),
            Cell::new(format!("{amount} {from}")),
            ui::format_optional_cell(result, |r| format!("{} {to}", format_amount(r))),
            ui::format_optional_cell(rate, |r| format!("{r:.4}")),
        ]);
    }
    table.to_string()
}

pub async fn run(
    config: &AppConfig,
    provider: &dyn RateProvider,
    history: Arc<MemoryHistory>,
    analytics: Arc<dyn AnalyticsSink>,
) -> Result<()> {
    let mut calculator = super::start_calculator(
        config,
        provider,
        history.clone(),
        analytics,
        &config.defaults.from,
        &config.defaults.to,
    )
    .await;
    let sharer = super::build_sharer(config);
    let ctx = SessionContext {
        config,
        history: &history,
        sharer: &sharer,
    };

    println!(
        "{}",
        ui::style_text("Calculadora de Divisas", ui::StyleType::Title)
    );
    println!(
        "{} → {} (escribe 'help' para ver los comandos)",
        calculator.from_currency(),
        calculator.to_currency()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read from stdin")?
        else {
            break;
        };

        let command = parse_command(&line);
        if command == SessionCommand::Quit {
            break;
        }
        if let Some(output) = handle_command(&mut calculator, command, &ctx) {
            println!("{output}");
        }
    }

    println!("\n{}", super::attribution_line());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ExchangeRateTable;
    use crate::core::analytics::TracingAnalytics;
    use crate::core::share::ClipboardWriter;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default, Clone)]
    struct RecordingClipboard {
        written: Arc<Mutex<Vec<String>>>,
    }

    impl ClipboardWriter for RecordingClipboard {
        fn write_text(&self, text: &str) -> Result<()> {
            self.written.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse_command("amount 12,5"),
            SessionCommand::Amount("12,5".to_string())
        );
        assert_eq!(parse_command("amount"), SessionCommand::Amount(String::new()));
        assert_eq!(
            parse_command("  FROM usd "),
            SessionCommand::From("usd".to_string())
        );
        assert_eq!(parse_command("to GBP"), SessionCommand::To("GBP".to_string()));
        assert_eq!(parse_command("share"), SessionCommand::Share);
        assert_eq!(parse_command("exit"), SessionCommand::Quit);
        assert_eq!(parse_command(""), SessionCommand::Empty);
        assert_eq!(
            parse_command("to"),
            SessionCommand::Unknown("to".to_string())
        );
        assert_eq!(
            parse_command("swap now"),
            SessionCommand::Unknown("swap now".to_string())
        );
    }

    #[test]
    fn test_session_flow() {
        let config = AppConfig::default();
        let history = Arc::new(MemoryHistory::new());
        let clipboard = RecordingClipboard::default();
        let sharer = Sharer::detect(None, Box::new(clipboard.clone()));
        let ctx = SessionContext {
            config: &config,
            history: &history,
            sharer: &sharer,
        };

        let mut calc = CurrencyCalculator::new(
            "EUR",
            "USD",
            history.clone(),
            Arc::new(TracingAnalytics),
        );
        calc.set_rates(ExchangeRateTable::new(
            "EUR",
            HashMap::from([
                ("EUR".to_string(), 1.0),
                ("USD".to_string(), 1.1),
                ("GBP".to_string(), 0.85),
            ]),
        ));

        // Nothing to share yet
        assert!(handle_command(&mut calc, SessionCommand::Share, &ctx).is_none());

        let out = handle_command(&mut calc, parse_command("amount 100"), &ctx).unwrap();
        assert!(out.contains("110 USD"));

        let out = handle_command(&mut calc, parse_command("to gbp"), &ctx).unwrap();
        assert!(out.contains("85 GBP"));

        assert!(handle_command(&mut calc, parse_command("to XYZ"), &ctx).is_none());

        let out = handle_command(&mut calc, parse_command("to GBP"), &ctx).unwrap();
        assert!(out.contains("85 GBP"));

        let out = handle_command(&mut calc, SessionCommand::Share, &ctx).unwrap();
        assert!(out.contains("Copiado al portapapeles"));
        assert_eq!(clipboard.written.lock().unwrap().len(), 1);

        // EUR->USD, EUR->GBP; returning to GBP after XYZ repeats the last
        // recorded calculation and is not stored again
        assert_eq!(history.len(), 2);
        let out = handle_command(&mut calc, SessionCommand::History, &ctx).unwrap();
        assert!(out.contains("100 EUR"));
        assert!(out.contains("110 USD"));

        let out = handle_command(&mut calc, SessionCommand::Source, &ctx).unwrap();
        assert!(out.contains("https://www.exchangerate-api.com"));
    }

    #[test]
    fn test_empty_history() {
        assert!(display_history(&[]).contains("Sin cálculos todavía"));
    }
}
