//! Unix domain socket listener.

use std::io;
use std::path::Path;

use axum::Router;
use tokio::net::UnixListener;

use super::lifecycle::serve_with_shutdown;
use super::{ServerError, ServerResult, shutdown_signal};
use crate::TRACING_TARGET_SERVER_STARTUP;
use crate::config::ServerConfig;

/// Serves `app` on the unix socket at `path` until a shutdown signal arrives.
pub(super) async fn serve_unix(
    app: Router,
    path: &Path,
    config: &ServerConfig,
) -> ServerResult<()> {
    let listener = bind_unix(path).await?;

    let listening_on = format!("unix:{}", path.display());
    let shutdown = shutdown_signal(config.shutdown_timeout());
    let result = serve_with_shutdown(&listening_on, || async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    })
    .await;

    remove_socket(path).await;
    result
}

/// Binds the socket, replacing a stale file left by a previous run.
async fn bind_unix(path: &Path) -> ServerResult<UnixListener> {
    let bind_error = |err: io::Error| {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            socket = %path.display(),
            error = %err,
            "Failed to bind unix socket"
        );
        ServerError::bind_error(path.display().to_string(), err)
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(bind_error)?;
    }

    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            socket = %path.display(),
            "Removed stale socket file"
        ),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(bind_error(err)),
    }

    let listener = UnixListener::bind(path).map_err(bind_error)?;
    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        socket = %path.display(),
        "Successfully bound unix socket"
    );
    Ok(listener)
}

async fn remove_socket(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await
        && err.kind() != io::ErrorKind::NotFound
    {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            socket = %path.display(),
            error = %err,
            "Failed to remove socket file"
        );
    }
}
