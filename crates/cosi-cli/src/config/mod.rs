//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig          # Listener, shutdown, operation timeout
//! ├── powerscale: PowerscaleConfig  # Cluster connection profile
//! └── telemetry: TelemetryConfig    # Log format
//! ```
//!
//! Every option can be given as a flag or an environment variable.

mod server;
mod telemetry;

use std::process;

use anyhow::Context;
use clap::Parser;
use cosi_powerscale::PowerscaleConfig;
use serde::{Deserialize, Serialize};

pub use self::server::ServerConfig;
pub use self::telemetry::{LogFormat, TelemetryConfig};
use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "cosi-powerscale")]
#[command(about = "COSI driver for Dell PowerScale")]
#[command(version)]
pub struct Cli {
    /// Listener and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// PowerScale cluster connection.
    #[clap(flatten)]
    pub powerscale: PowerscaleConfig,

    /// Logging configuration.
    #[clap(flatten)]
    pub telemetry: TelemetryConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.powerscale
            .validate()
            .context("invalid PowerScale configuration")?;
        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            "starting PowerScale COSI driver"
        );
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        self.server.log();

        let powerscale = &self.powerscale;
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            name = %powerscale.name,
            api_endpoint = %powerscale.api_endpoint,
            api_username = %powerscale.api_username,
            s3_endpoint = %powerscale.s3_endpoint,
            s3_region = powerscale.s3_region.as_deref(),
            zone = %powerscale.zone,
            base_path = %powerscale.base_path,
            tls_insecure_skip_verify = powerscale.tls_insecure_skip_verify,
            tls_cacert = ?powerscale.tls_cacert,
            tls_client_cert = ?powerscale.tls_client_cert,
            http_timeout_secs = powerscale.http_timeout,
            "PowerScale configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
