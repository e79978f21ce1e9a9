//! Connection profile for the PowerScale administrative API.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// Default timeout for a single HTTP request: 30 seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Access zone used when none is configured.
pub const DEFAULT_ZONE: &str = "System";

/// Connection settings for one PowerScale cluster.
///
/// # Environment Variables
///
/// - `POWERSCALE_NAME` - Backend name, embedded in every bucket identifier
/// - `POWERSCALE_API_ENDPOINT` - Platform API URL, e.g. `https://isilon.example.com:8080`
/// - `POWERSCALE_API_USERNAME` / `POWERSCALE_API_PASSWORD` - Basic-auth credentials
/// - `POWERSCALE_S3_ENDPOINT` - S3 data URL handed out with credentials
/// - `POWERSCALE_S3_REGION` - Optional S3 region handed out with credentials
/// - `POWERSCALE_ZONE` - Access zone (default: `System`)
/// - `POWERSCALE_BASE_PATH` - Directory under which bucket directories are created
/// - `POWERSCALE_TLS_*` - CA bundle, client certificate/key, insecure mode
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct PowerscaleConfig {
    /// Backend name, the prefix of every bucket identifier.
    #[cfg_attr(
        feature = "config",
        arg(long = "powerscale-name", env = "POWERSCALE_NAME")
    )]
    pub name: String,

    /// Base URL of the platform API.
    #[cfg_attr(
        feature = "config",
        arg(long = "powerscale-api-endpoint", env = "POWERSCALE_API_ENDPOINT")
    )]
    pub api_endpoint: Url,

    /// User name for basic authentication.
    #[cfg_attr(
        feature = "config",
        arg(long = "powerscale-api-username", env = "POWERSCALE_API_USERNAME")
    )]
    #[serde(default)]
    pub api_username: String,

    /// Password for basic authentication.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "powerscale-api-password",
            env = "POWERSCALE_API_PASSWORD",
            hide_env_values = true
        )
    )]
    #[serde(default, skip_serializing)]
    pub api_password: String,

    /// S3 endpoint returned to clients together with their keys.
    #[cfg_attr(
        feature = "config",
        arg(long = "powerscale-s3-endpoint", env = "POWERSCALE_S3_ENDPOINT")
    )]
    #[serde(default)]
    pub s3_endpoint: String,

    /// S3 region returned to clients together with their keys.
    #[cfg_attr(
        feature = "config",
        arg(long = "powerscale-s3-region", env = "POWERSCALE_S3_REGION")
    )]
    #[serde(default)]
    pub s3_region: Option<String>,

    /// Access zone every platform call is scoped to.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "powerscale-zone",
            env = "POWERSCALE_ZONE",
            default_value = DEFAULT_ZONE
        )
    )]
    #[serde(default = "default_zone")]
    pub zone: String,

    /// Directory holding bucket directories (`<base_path>/<bucket>`).
    #[cfg_attr(
        feature = "config",
        arg(long = "powerscale-base-path", env = "POWERSCALE_BASE_PATH")
    )]
    pub base_path: String,

    /// Disables certificate verification of the platform API.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "powerscale-tls-insecure-skip-verify",
            env = "POWERSCALE_TLS_INSECURE_SKIP_VERIFY"
        )
    )]
    #[serde(default)]
    pub tls_insecure_skip_verify: bool,

    /// PEM client certificate presented to the platform API.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "powerscale-tls-client-cert",
            env = "POWERSCALE_TLS_CLIENT_CERT"
        )
    )]
    #[serde(default)]
    pub tls_client_cert: Option<PathBuf>,

    /// PEM private key matching `tls_client_cert`.
    #[cfg_attr(
        feature = "config",
        arg(long = "powerscale-tls-client-key", env = "POWERSCALE_TLS_CLIENT_KEY")
    )]
    #[serde(default)]
    pub tls_client_key: Option<PathBuf>,

    /// PEM bundle of CA certificates trusted for the platform API.
    #[cfg_attr(
        feature = "config",
        arg(long = "powerscale-tls-cacert", env = "POWERSCALE_TLS_CACERT")
    )]
    #[serde(default)]
    pub tls_cacert: Option<PathBuf>,

    /// HTTP request timeout in seconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "powerscale-http-timeout",
            env = "POWERSCALE_HTTP_TIMEOUT",
            default_value_t = DEFAULT_HTTP_TIMEOUT_SECS
        )
    )]
    #[serde(default = "default_http_timeout")]
    pub http_timeout: u64,
}

fn default_zone() -> String {
    DEFAULT_ZONE.to_owned()
}

fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

impl PowerscaleConfig {
    /// Creates a configuration for backend `name` reachable at `api_endpoint`.
    pub fn new(name: impl Into<String>, api_endpoint: Url) -> Self {
        Self {
            name: name.into(),
            api_endpoint,
            api_username: String::new(),
            api_password: String::new(),
            s3_endpoint: String::new(),
            s3_region: None,
            zone: default_zone(),
            base_path: String::new(),
            tls_insecure_skip_verify: false,
            tls_client_cert: None,
            tls_client_key: None,
            tls_cacert: None,
            http_timeout: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }

    /// Set the basic-auth credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.api_username = username.into();
        self.api_password = password.into();
        self
    }

    /// Set the S3 endpoint handed out with credentials.
    #[must_use]
    pub fn with_s3_endpoint(mut self, s3_endpoint: impl Into<String>) -> Self {
        self.s3_endpoint = s3_endpoint.into();
        self
    }

    /// Set the S3 region handed out with credentials.
    #[must_use]
    pub fn with_s3_region(mut self, s3_region: impl Into<String>) -> Self {
        self.s3_region = Some(s3_region.into());
        self
    }

    /// Set the access zone.
    #[must_use]
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = zone.into();
        self
    }

    /// Set the directory holding bucket directories.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Set the CA bundle used to verify the platform API.
    #[must_use]
    pub fn with_cacert(mut self, path: impl Into<PathBuf>) -> Self {
        self.tls_cacert = Some(path.into());
        self
    }

    /// Set the client certificate and key presented to the platform API.
    #[must_use]
    pub fn with_client_identity(
        mut self,
        cert: impl Into<PathBuf>,
        key: impl Into<PathBuf>,
    ) -> Self {
        self.tls_client_cert = Some(cert.into());
        self.tls_client_key = Some(key.into());
        self
    }

    /// Disable certificate verification.
    #[must_use]
    pub fn with_insecure_skip_verify(mut self, insecure: bool) -> Self {
        self.tls_insecure_skip_verify = insecure;
        self
    }

    /// Set the HTTP timeout in seconds.
    #[must_use]
    pub fn with_http_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = timeout_secs;
        self
    }

    /// Returns the effective HTTP timeout, using the default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Returns the filesystem path backing bucket `name`.
    pub fn bucket_path(&self, name: &str) -> String {
        format!("{}/{}", self.base_path.trim_end_matches('/'), name)
    }

    /// Returns the value of the `Authorization` header sent with every call.
    pub fn authorization(&self) -> String {
        let credentials = format!("{}:{}", self.api_username, self.api_password);
        format!("Basic {}", STANDARD.encode(credentials))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if:
    /// - the backend name is empty or contains `-`
    /// - the API endpoint is not an `http`/`https` base URL
    /// - the user name, zone or base path is empty
    /// - the S3 endpoint is not a URL
    /// - only one of client certificate and client key is set
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Config("backend name must not be empty".into()));
        }

        // Bucket identifiers are split on the first '-'.
        if self.name.contains('-') {
            return Err(Error::Config(format!(
                "backend name '{}' must not contain '-'",
                self.name
            )));
        }

        if !matches!(self.api_endpoint.scheme(), "http" | "https")
            || self.api_endpoint.cannot_be_a_base()
        {
            return Err(Error::Config(format!(
                "API endpoint '{}' must be an http(s) URL",
                self.api_endpoint
            )));
        }

        if self.api_username.is_empty() {
            return Err(Error::Config("API user name must not be empty".into()));
        }

        if self.zone.is_empty() {
            return Err(Error::Config("access zone must not be empty".into()));
        }

        if self.base_path.is_empty() {
            return Err(Error::Config("base path must not be empty".into()));
        }

        if let Err(err) = Url::parse(&self.s3_endpoint) {
            return Err(Error::Config(format!(
                "S3 endpoint '{}' is not a URL: {err}",
                self.s3_endpoint
            )));
        }

        match (&self.tls_client_cert, &self.tls_client_key) {
            (Some(_), None) | (None, Some(_)) => Err(Error::Config(
                String::from("TLS client certificate and key must be set together"),
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for PowerscaleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PowerscaleConfig")
            .field("name", &self.name)
            .field("api_endpoint", &self.api_endpoint.as_str())
            .field("api_username", &self.api_username)
            .field("api_password", &"***")
            .field("s3_endpoint", &self.s3_endpoint)
            .field("s3_region", &self.s3_region)
            .field("zone", &self.zone)
            .field("base_path", &self.base_path)
            .field("tls_insecure_skip_verify", &self.tls_insecure_skip_verify)
            .field("tls_client_cert", &self.tls_client_cert)
            .field("tls_client_key", &self.tls_client_key)
            .field("tls_cacert", &self.tls_cacert)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}
