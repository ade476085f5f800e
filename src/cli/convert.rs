use super::ui;
use crate::core::config::AppConfig;
use crate::core::converter::parse_amount;
use crate::core::currency::flag_for;
use crate::core::format::{format_amount, format_rate};
use crate::core::{
    AnalyticsSink, CurrencyCalculator, HistoryRecorder, RateProvider, ShareOutcome,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

/// Renders the current result block, or `None` when there is nothing to show.
pub fn render_result(calculator: &CurrencyCalculator) -> Option<String> {
    let result = calculator.result()?;
    let amount = parse_amount(calculator.amount())?;
    let from = calculator.from_currency();
    let to = calculator.to_currency();

    let from_line = format!(
        "{} {} {}=",
        format_amount(amount),
        from,
        flag_for(from).unwrap_or("")
    );
    let to_line = format!(
        "{} {} {}",
        format_amount(result.converted_amount),
        to,
        flag_for(to).unwrap_or("")
    );
    let rate_line = format!(
        "Tasa de cambio: 1 {from} = {} {to}",
        format_rate(result.effective_rate)
    );

    Some(format!(
        "{}\n{}\n{}",
        ui::style_text(&from_line, ui::StyleType::Amount),
        ui::style_text(to_line.trim_end(), ui::StyleType::Result),
        ui::style_text(&rate_line, ui::StyleType::Subtle),
    ))
}

/// Confirmation shown after a successful share.
pub fn render_share_outcome(outcome: ShareOutcome) -> String {
    match outcome {
        ShareOutcome::Shared => ui::style_text("Compartido", ui::StyleType::Confirmation),
        ShareOutcome::CopiedToClipboard => {
            ui::style_text("Copiado al portapapeles", ui::StyleType::Confirmation)
        }
    }
}

/// A one-shot conversion requested from the command line.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub amount: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub share: bool,
}

pub async fn run(
    config: &AppConfig,
    provider: &dyn RateProvider,
    history: Arc<dyn HistoryRecorder>,
    analytics: Arc<dyn AnalyticsSink>,
    request: &ConvertRequest,
) -> Result<()> {
    let from = request.from.as_deref().unwrap_or(&config.defaults.from);
    let to = request.to.as_deref().unwrap_or(&config.defaults.to);
    let mut calculator =
        super::start_calculator(config, provider, history, analytics, from, to).await;

    if !calculator.set_amount(&request.amount) {
        debug!(amount = %request.amount, "Amount ignored");
    }

    match render_result(&calculator) {
        Some(block) => println!("{block}"),
        None => debug!(input = ?calculator.input(), "No result for input"),
    }

    if request.share {
        let sharer = super::build_sharer(config);
        if let Some(outcome) = calculator.share(&sharer, &config.share.url) {
            eprintln!("{}", render_share_outcome(outcome));
        }
    }

    println!("\n{}", super::attribution_line());
    Ok(())
}
