//! Startup and shutdown logging around a running listener.

use std::future::Future;
use std::io;
use std::time::Instant;

use super::{ServerError, ServerResult};
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Runs `serve_fn` and logs readiness, uptime and any fatal error.
pub(super) async fn serve_with_shutdown<F>(
    listening_on: &str,
    serve_fn: impl FnOnce() -> F,
) -> ServerResult<()>
where
    F: Future<Output = io::Result<()>>,
{
    let start_time = Instant::now();

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = listening_on,
        "Server is ready and listening for connections"
    );

    let result = serve_fn().await;
    let uptime_secs = start_time.elapsed().as_secs();

    match result {
        Ok(()) => {
            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                uptime_secs,
                "Server shut down gracefully"
            );
            Ok(())
        }
        Err(err) => {
            let error = ServerError::Runtime(err);
            tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error = %error,
                uptime_secs,
                error_code = error.error_code(),
                recoverable = error.is_recoverable(),
                suggestion = error.suggestion(),
                "Server encountered a fatal error"
            );
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clean_exit_is_ok() {
        let serve = serve_with_shutdown("127.0.0.1:3000", || async { Ok(()) });
        let result = serve.await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn io_failure_becomes_runtime_error() {
        let result = serve_with_shutdown("127.0.0.1:3000", || async {
            Err(io::Error::new(io::ErrorKind::TimedOut, "stalled"))
        })
        .await;

        assert!(matches!(result, Err(ServerError::Runtime(_))));
    }
}
