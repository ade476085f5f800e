use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use divisa::cli::convert::ConvertRequest;
use divisa::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for divisa::AppCommand {
    fn from(cmd: Commands) -> divisa::AppCommand {
        match cmd {
            Commands::Convert {
                amount,
                from,
                to,
                share,
            } => divisa::AppCommand::Convert(ConvertRequest {
                amount,
                from,
                to,
                share,
            }),
            Commands::Rates => divisa::AppCommand::Rates,
            Commands::Session => divisa::AppCommand::Session,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert; a decimal comma is accepted
        amount: String,
        /// Source currency code
        #[arg(short, long)]
        from: Option<String>,
        /// Target currency code
        #[arg(short, long)]
        to: Option<String>,
        /// Share the result, or copy it to the clipboard
        #[arg(short, long)]
        share: bool,
    },
    /// Display current exchange rates
    Rates,
    /// Start an interactive conversion session
    Session,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => divisa::cli::setup::setup(),
        Some(cmd) => divisa::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
