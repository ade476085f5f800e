//! Terminal front-end for the calculator.

pub mod convert;
pub mod rates;
pub mod session;
pub mod setup;
pub mod ui;

use std::sync::Arc;

use crate::core::config::AppConfig;
use crate::core::share::{CommandShare, NativeShare, Sharer, SystemClipboard};
use crate::core::{AnalyticsSink, CurrencyCalculator, HistoryRecorder, RateProvider};
use crate::providers::exchangerate_api::ATTRIBUTION_URL;

/// Starts a calculator session: builds it and fetches the rate table once.
pub async fn start_calculator(
    config: &AppConfig,
    provider: &dyn RateProvider,
    history: Arc<dyn HistoryRecorder>,
    analytics: Arc<dyn AnalyticsSink>,
    from: &str,
    to: &str,
) -> CurrencyCalculator {
    let mut calculator = CurrencyCalculator::new(from, to, history, analytics);

    let pb = ui::new_spinner("Obteniendo tipos de cambio...");
    calculator.load_rates(provider, &config.base_currency).await;
    pb.finish_and_clear();

    calculator
}

/// Uses the configured share command when there is one, the system
/// clipboard otherwise.
pub fn build_sharer(config: &AppConfig) -> Sharer {
    let native = CommandShare::from_argv(&config.share.command)
        .map(|cmd| Box::new(cmd) as Box<dyn NativeShare>);
    Sharer::detect(native, Box::new(SystemClipboard))
}

pub fn attribution_line() -> String {
    ui::style_text(
        &format!("Datos proporcionados por ExchangeRate-API ({ATTRIBUTION_URL})"),
        ui::StyleType::Subtle,
    )
}
