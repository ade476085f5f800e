pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::convert::ConvertRequest;
use crate::core::config::AppConfig;
use crate::core::{AnalyticsSink, MemoryHistory, TracingAnalytics};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert(ConvertRequest),
    Rates,
    Session,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency calculator starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = providers::ExchangeRateApiProvider::new(&config.provider.base_url);
    let history = Arc::new(MemoryHistory::new());
    let analytics: Arc<dyn AnalyticsSink> = Arc::new(TracingAnalytics);

    match command {
        AppCommand::Convert(request) => {
            cli::convert::run(&config, &provider, history, analytics, &request).await
        }
        AppCommand::Rates => cli::rates::run(&config, &provider, history, analytics).await,
        AppCommand::Session => cli::session::run(&config, &provider, history, analytics).await,
    }
}
