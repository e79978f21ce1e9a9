//! Tracing subscriber initialization.

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::LogFormat;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initializes the tracing subscriber for structured logging.
///
/// The log level comes from `RUST_LOG` and defaults to `info`.
///
/// ```bash
/// RUST_LOG=debug cosi-powerscale
/// RUST_LOG=cosi_provisioner=trace,cosi_powerscale=debug cosi-powerscale
/// ```
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub(crate) fn init_tracing(format: LogFormat) -> anyhow::Result<()> {
    let env_filter = create_env_filter()?;

    tracing_subscriber::registry()
        .with(create_fmt_layer(format))
        .with(env_filter)
        .try_init()
        .context("Failed to initialize tracing")
}

fn create_env_filter() -> anyhow::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")
}

fn create_fmt_layer(format: LogFormat) -> BoxedLayer {
    let layer = fmt::layer().with_target(true).with_level(true);
    match format {
        LogFormat::Text => layer.with_ansi(true).boxed(),
        LogFormat::Json => layer.json().with_current_span(true).boxed(),
    }
}
