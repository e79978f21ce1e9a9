use std::time::Duration;

use cosi_powerscale::{PowerscaleApi, PowerscaleClient, PowerscaleConfig};
use cosi_provisioner::{DriverIdentity, Provisioner, ProvisionerConfig};

use crate::service::Result;

/// Tracing target for state construction.
const TRACING_TARGET: &str = "cosi_server::service";

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    provisioner: Provisioner,
    identity: DriverIdentity,
}

impl ServiceState {
    /// Creates state around an existing backend.
    pub fn new(api: impl PowerscaleApi + 'static, config: ProvisionerConfig) -> Self {
        let identity = DriverIdentity::new(&config.backend);
        Self {
            provisioner: Provisioner::new(api, config),
            identity,
        }
    }

    /// Connects to the appliance described by `config`.
    ///
    /// Fails when the profile is invalid or its TLS material cannot be
    /// loaded. No request is sent to the appliance.
    pub fn from_config(config: &PowerscaleConfig, operation_timeout: Duration) -> Result<Self> {
        let client = PowerscaleClient::new(config.clone())?;
        let provisioner = ProvisionerConfig::from(config)
            .with_operation_timeout(operation_timeout);
        provisioner.validate()?;

        tracing::info!(
            target: TRACING_TARGET,
            backend = %provisioner.backend,
            operation_timeout_secs = operation_timeout.as_secs(),
            "Service state initialized"
        );

        Ok(Self::new(client, provisioner))
    }

    /// Returns the provisioner.
    pub fn provisioner(&self) -> &Provisioner {
        &self.provisioner
    }

    /// Returns the identity service.
    pub fn identity(&self) -> &DriverIdentity {
        &self.identity
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(provisioner: Provisioner);
impl_di!(identity: DriverIdentity);

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use cosi_powerscale::MockPowerscale;

    use super::*;
    use crate::service::Error;

    fn profile() -> anyhow::Result<PowerscaleConfig> {
        Ok(
            PowerscaleConfig::new("backendX", "https://isilon.example.com:8080".parse()?)
                .with_credentials("admin", "secret")
                .with_s3_endpoint("https://s3.example.com:9021")
                .with_base_path("/ifs/data/cosi"),
        )
    }

    #[test]
    fn builds_from_profile() -> anyhow::Result<()> {
        let timeout = Duration::from_secs(20);
        let state = ServiceState::from_config(&profile()?, timeout)?;
        assert_eq!(state.provisioner().backend(), "backendX");
        let config = state.provisioner().config();
        assert_eq!(config.operation_timeout, timeout);
        Ok(())
    }

    #[test]
    fn unreadable_tls_material_aborts() -> anyhow::Result<()> {
        let config = profile()?.with_cacert(PathBuf::from("/nonexistent/ca.pem"));
        let timeout = Duration::from_secs(20);
        match ServiceState::from_config(&config, timeout) {
            Err(Error::Backend(error)) => assert!(error.is_config_error()),
            other => anyhow::bail!("expected a backend error, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn zero_timeout_is_rejected() -> anyhow::Result<()> {
        let error = ServiceState::from_config(&profile()?, Duration::ZERO).err();
        assert!(matches!(error, Some(Error::Provisioner(_))));
        Ok(())
    }

    #[test]
    fn identity_follows_backend() -> anyhow::Result<()> {
        let state = ServiceState::new(
            MockPowerscale::default(),
            ProvisionerConfig::new("backendX", "https://s3"),
        );
        assert_eq!(
            state.identity().driver_name()?,
            "backendX.powerscale.cosi.japannext.co.jp"
        );
        Ok(())
    }
}
