//! Listener startup with graceful shutdown.
//!
//! The driver serves either on TCP or, when a socket path is configured, on
//! a unix domain socket placed where the sidecar expects it.

mod error;
mod http_server;
mod lifecycle;
mod shutdown;
#[cfg(unix)]
mod unix_server;

use axum::Router;

pub use self::error::{ServerError, ServerResult};
use self::http_server::serve_http;
use self::shutdown::shutdown_signal;
#[cfg(unix)]
use self::unix_server::serve_unix;
use crate::config::ServerConfig;

/// Serves `app` on the listener selected by `config`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the listener cannot be
/// bound, or the server fails while running.
pub async fn serve(app: Router, config: ServerConfig) -> ServerResult<()> {
    if let Err(err) = config.validate() {
        return Err(ServerError::invalid_config(&err));
    }

    match config.socket.clone() {
        #[cfg(unix)]
        Some(path) => serve_unix(app, &path, &config).await,
        #[cfg(not(unix))]
        Some(_) => Err(ServerError::InvalidConfig(
            "unix sockets are not supported on this platform".into(),
        )),
        None => serve_http(app, &config).await,
    }
}
