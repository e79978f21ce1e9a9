#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;
mod telemetry;

use std::process;

use anyhow::Context;
use cosi_server::{ServiceState, routes};

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "cosi_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "cosi_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "cosi_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = format!("{error:#}"),
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing(cli.telemetry.log_format)?;
    cli.log();
    cli.validate()?;

    let state = ServiceState::from_config(&cli.powerscale, cli.server.operation_timeout())
        .context("failed to initialize the PowerScale backend")?;
    let router = routes(state);

    server::serve(router, cli.server).await?;

    Ok(())
}
