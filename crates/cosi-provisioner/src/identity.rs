//! Driver identity reported to the orchestrator.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, TRACING_TARGET_IDENTITY};

/// Suffix appended to the backend name to form the driver name.
pub const DRIVER_NAME_SUFFIX: &str = "powerscale.cosi.japannext.co.jp";

/// Answer to a driver info request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverInfo {
    /// Driver name, `<backend>.powerscale.cosi.japannext.co.jp`.
    pub name: String,
}

/// Identity service of a single-backend driver.
#[derive(Debug, Clone)]
pub struct DriverIdentity {
    backend: String,
}

impl DriverIdentity {
    /// Creates the identity of the driver serving `backend`.
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
        }
    }

    /// Returns the driver name.
    ///
    /// Fails with [`Error::InvalidArgument`] when no backend name is set.
    pub fn driver_name(&self) -> Result<String> {
        if self.backend.is_empty() {
            tracing::error!(target: TRACING_TARGET_IDENTITY, "Driver name is empty");
            return Err(Error::InvalidArgument("driver name is empty".into()));
        }
        Ok(format!("{}.{DRIVER_NAME_SUFFIX}", self.backend))
    }

    /// Answers a driver info request.
    pub fn driver_info(&self) -> Result<DriverInfo> {
        let name = self.driver_name()?;
        tracing::debug!(target: TRACING_TARGET_IDENTITY, driver = %name, "Driver info requested");
        Ok(DriverInfo { name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_backend_plus_suffix() -> anyhow::Result<()> {
        let info = DriverIdentity::new("backendX").driver_info()?;
        assert_eq!(info.name, "backendX.powerscale.cosi.japannext.co.jp");
        Ok(())
    }

    #[test]
    fn empty_backend_is_invalid() {
        let error = DriverIdentity::new("").driver_info().err();
        assert!(matches!(error, Some(Error::InvalidArgument(_))));
    }
}
