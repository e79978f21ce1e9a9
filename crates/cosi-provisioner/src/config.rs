//! Provisioner settings.

use std::time::Duration;

use cosi_powerscale::PowerscaleConfig;

use crate::{Error, Result};

/// Default deadline for a single provisioning operation, in seconds.
pub const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 20;

/// Settings shared by every provisioning operation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ProvisionerConfig {
    /// Backend name, used as the bucket identifier prefix.
    pub backend: String,
    /// S3 data endpoint handed out in credentials.
    pub s3_endpoint: String,
    /// S3 region handed out in credentials, when configured.
    pub s3_region: Option<String>,
    /// Deadline for each provisioning operation.
    pub operation_timeout: Duration,
}

impl ProvisionerConfig {
    /// Creates settings for `backend` serving S3 at `s3_endpoint`.
    pub fn new(backend: impl Into<String>, s3_endpoint: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            s3_endpoint: s3_endpoint.into(),
            s3_region: None,
            operation_timeout: Duration::from_secs(DEFAULT_OPERATION_TIMEOUT_SECS),
        }
    }

    /// Sets the S3 region.
    pub fn with_s3_region(mut self, region: impl Into<String>) -> Self {
        self.s3_region = Some(region.into());
        self
    }

    /// Sets the operation deadline.
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Validates the settings.
    pub fn validate(&self) -> Result<()> {
        if self.backend.is_empty() {
            return Err(Error::InvalidArgument("backend name is empty".into()));
        }
        if self.s3_endpoint.is_empty() {
            return Err(Error::InvalidArgument("S3 endpoint is empty".into()));
        }
        if self.operation_timeout.is_zero() {
            return Err(Error::InvalidArgument(
                "operation timeout must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl From<&PowerscaleConfig> for ProvisionerConfig {
    fn from(config: &PowerscaleConfig) -> Self {
        let this = Self::new(&config.name, &config.s3_endpoint);
        match &config.s3_region {
            Some(region) if !region.is_empty() => this.with_s3_region(region),
            _ => this,
        }
    }
}
