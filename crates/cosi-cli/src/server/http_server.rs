//! TCP listener.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use super::lifecycle::serve_with_shutdown;
use super::{ServerError, ServerResult, shutdown_signal};
use crate::TRACING_TARGET_SERVER_STARTUP;
use crate::config::ServerConfig;

/// Serves `app` over TCP until a shutdown signal arrives.
pub(super) async fn serve_http(app: Router, config: &ServerConfig) -> ServerResult<()> {
    let listener = bind_tcp(config.server_addr()).await?;

    if config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            "Server is bound to all interfaces. Ensure firewall rules are properly configured."
        );
    }

    let listening_on = config.server_addr().to_string();
    let shutdown = shutdown_signal(config.shutdown_timeout());
    serve_with_shutdown(&listening_on, || async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
    })
    .await
}

async fn bind_tcp(addr: SocketAddr) -> ServerResult<TcpListener> {
    match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!(
                target: TRACING_TARGET_SERVER_STARTUP,
                addr = %addr,
                "Successfully bound to address"
            );
            Ok(listener)
        }
        Err(err) => {
            tracing::error!(
                target: TRACING_TARGET_SERVER_STARTUP,
                addr = %addr,
                error = %err,
                "Failed to bind to address"
            );
            Err(ServerError::bind_error(addr.to_string(), err))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[tokio::test]
    async fn occupied_port_is_bind_error() -> anyhow::Result<()> {
        let taken = TcpListener::bind("127.0.0.1:0").await?;
        let addr = taken.local_addr()?;

        let error = bind_tcp(addr).await.err();
        match error {
            Some(ServerError::BindError { address, source }) => {
                assert_eq!(address, addr.to_string());
                assert_eq!(source.kind(), io::ErrorKind::AddrInUse);
            }
            other => anyhow::bail!("expected bind error, got {other:?}"),
        }
        Ok(())
    }
}
