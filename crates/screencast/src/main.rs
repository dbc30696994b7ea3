//! Screencast: screen and audio recording through an external encoder.

mod app;
mod cli;
mod config;
mod error;
mod report;

pub(crate) use {
    app::App,
    cli::{Cli, CliCommand, RecordArgs},
    error::{AppError, Result as AppResult},
};

use crate::config::Config;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "screencast=info,screencast_core=info";
const VERBOSE_LOG_FILTER: &str = "screencast=debug,screencast_core=debug";

/// Application entry point.
fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    let app = App::new(config, cli.backend.map(Into::into));
    if let Err(e) = rt.block_on(app.run(cli.command)) {
        error!(error = %e, "screencast failed");
        std::process::exit(1);
    }
}
