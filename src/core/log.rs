//! Tracing subscriber for the `divisa` binary.
//!
//! Without `RUST_LOG`, only this crate's events are shown: warnings and errors
//! by default, everything from debug up with `--verbose`. A `RUST_LOG` value
//! replaces that filter entirely.
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const APP_TARGET: &str = "divisa";

fn app_filter(verbose: bool) -> Targets {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    Targets::new().with_target(APP_TARGET, level)
}

pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().ok();
    let app_filter = env_filter.is_none().then(|| app_filter(verbose));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(app_filter)
        .with(env_filter)
        .init();
}
