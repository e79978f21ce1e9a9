//! Listener and lifecycle configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result as AnyhowResult, anyhow};
use clap::Args;
use cosi_provisioner::DEFAULT_OPERATION_TIMEOUT_SECS;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Upper bound for every timeout option, in seconds.
const MAX_TIMEOUT_SECS: u64 = 300;

/// Listener and lifecycle configuration.
///
/// # Environment Variables
///
/// - `HOST` - TCP host address (default: 127.0.0.1)
/// - `PORT` - TCP port (default: 3000, valid range: 1024-65535)
/// - `COSI_SOCKET` - Unix socket path; replaces the TCP listener when set
/// - `SHUTDOWN_TIMEOUT` - Graceful shutdown timeout in seconds (default: 30, max: 300)
/// - `COSI_OPERATION_TIMEOUT` - Deadline of one provisioning operation in seconds
///   (default: 20, max: 300)
///
/// # Examples
///
/// ```bash
/// cosi-powerscale --socket /var/lib/cosi/cosi.sock
/// HOST=0.0.0.0 PORT=8080 cosi-powerscale
/// ```
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct ServerConfig {
    /// Host address to bind the TCP listener to.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// TCP port number to listen on.
    ///
    /// Must be in the range 1024-65535.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Unix domain socket to serve on instead of TCP.
    ///
    /// A stale socket file left by a previous run is removed before binding.
    #[arg(long, env = "COSI_SOCKET")]
    #[serde(default)]
    pub socket: Option<PathBuf>,

    /// Maximum time in seconds to wait for graceful shutdown.
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 30)]
    pub shutdown_timeout: u64,

    /// Maximum time in seconds one provisioning operation may take.
    #[arg(
        long,
        env = "COSI_OPERATION_TIMEOUT",
        default_value_t = DEFAULT_OPERATION_TIMEOUT_SECS
    )]
    pub operation_timeout: u64,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

impl ServerConfig {
    /// Validates all configuration values and returns errors for invalid settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the port is below 1024 while no socket is configured
    /// - a timeout is outside 1-300 seconds
    /// - the socket path is empty
    pub fn validate(&self) -> AnyhowResult<()> {
        if self.socket.is_none() && self.port < 1024 {
            return Err(anyhow!(
                "Port {} is below 1024. Use ports 1024-65535 to avoid requiring root privileges.",
                self.port
            ));
        }

        if self
            .socket
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(anyhow!("Socket path must not be empty"));
        }

        validate_timeout("Shutdown", self.shutdown_timeout)?;
        validate_timeout("Operation", self.operation_timeout)?;

        Ok(())
    }

    /// Returns the complete socket address for TCP binding.
    #[must_use]
    pub const fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the graceful shutdown timeout as a `Duration`.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    /// Returns the per-operation deadline as a `Duration`.
    #[must_use]
    pub const fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout)
    }

    /// Returns whether the TCP listener binds to all interfaces.
    #[must_use]
    pub const fn binds_to_all_interfaces(&self) -> bool {
        match self.host {
            IpAddr::V4(addr) => addr.is_unspecified(),
            IpAddr::V6(addr) => addr.is_unspecified(),
        }
    }

    /// Logs the listener configuration.
    pub fn log(&self) {
        match &self.socket {
            Some(socket) => tracing::info!(
                target: TRACING_TARGET_CONFIG,
                socket = %socket.display(),
                shutdown_timeout_secs = self.shutdown_timeout,
                operation_timeout_secs = self.operation_timeout,
                "Server configured on unix socket"
            ),
            None => tracing::info!(
                target: TRACING_TARGET_CONFIG,
                host = %self.host,
                port = self.port,
                shutdown_timeout_secs = self.shutdown_timeout,
                operation_timeout_secs = self.operation_timeout,
                "Server configured on TCP"
            ),
        }
    }
}

fn validate_timeout(name: &str, secs: u64) -> AnyhowResult<()> {
    if secs == 0 || secs > MAX_TIMEOUT_SECS {
        return Err(anyhow!(
            "{name} timeout {secs} seconds is invalid. Must be between 1 and {} seconds.",
            MAX_TIMEOUT_SECS
        ));
    }
    Ok(())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 3000,
            socket: None,
            shutdown_timeout: 30,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.binds_to_all_interfaces());
        assert_eq!(config.operation_timeout(), Duration::from_secs(20));
    }

    #[test]
    fn reject_privileged_ports() {
        let mut config = ServerConfig {
            port: 80,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());

        config.socket = Some(PathBuf::from("/var/lib/cosi/cosi.sock"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reject_empty_socket_path() {
        let config = ServerConfig {
            socket: Some(PathBuf::new()),
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_invalid_timeouts() {
        let mut config = ServerConfig {
            operation_timeout: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());

        config.operation_timeout = 301;
        assert!(config.validate().is_err());

        config.operation_timeout = 60;
        config.shutdown_timeout = 0;
        assert!(config.validate().is_err());

        config.shutdown_timeout = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn server_addr_returns_correct_socket() {
        let mut config = ServerConfig::default();
        let addr = config.server_addr();
        assert_eq!(addr.ip(), IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(addr.port(), 3000);

        config.host = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
        assert!(config.binds_to_all_interfaces());
    }
}
