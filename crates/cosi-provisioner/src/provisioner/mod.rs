//! The four provisioning operations.
//!
//! Each operation is a short fixed protocol over [`PowerscaleApi`]: read the
//! current state, then issue only the mutations needed to reach the desired
//! state. Remote calls are sequential, earlier steps are never rolled back,
//! and the whole operation is bounded by the configured timeout.

mod create_bucket;
mod delete_bucket;
mod grant_access;
mod revoke_access;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use cosi_powerscale::PowerscaleApi;

pub use self::grant_access::{AuthenticationType, BucketAccess};
use crate::{Action, Error, ProvisionerConfig, Result, TRACING_TARGET};

/// Reconciles bucket and bucket-access requests against one appliance.
///
/// Cheap to clone; clones share the backend handle.
#[derive(Clone)]
pub struct Provisioner {
    inner: Arc<ProvisionerInner>,
}

struct ProvisionerInner {
    api: Arc<dyn PowerscaleApi>,
    config: ProvisionerConfig,
}

impl Provisioner {
    /// Creates a provisioner driving `api`.
    pub fn new(api: impl PowerscaleApi + 'static, config: ProvisionerConfig) -> Self {
        Self::from_shared(Arc::new(api), config)
    }

    /// Creates a provisioner from an already shared backend handle.
    pub fn from_shared(api: Arc<dyn PowerscaleApi>, config: ProvisionerConfig) -> Self {
        Self {
            inner: Arc::new(ProvisionerInner { api, config }),
        }
    }

    /// Returns the backend name used as bucket identifier prefix.
    pub fn backend(&self) -> &str {
        &self.inner.config.backend
    }

    /// Returns the provisioner settings.
    pub fn config(&self) -> &ProvisionerConfig {
        &self.inner.config
    }

    fn api(&self) -> &dyn PowerscaleApi {
        self.inner.api.as_ref()
    }

    /// Runs `operation` under the configured deadline.
    async fn bounded<T>(
        &self,
        action: Action,
        operation: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let timeout = self.inner.config.operation_timeout;
        match tokio::time::timeout(timeout, operation).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    action = %action,
                    timeout_secs = timeout.as_secs(),
                    "Operation timed out"
                );
                Err(Error::Timeout { action, timeout })
            }
        }
    }
}

impl fmt::Debug for Provisioner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provisioner")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// Resource identifiers of one running operation, attached to every
/// failure it logs.
#[derive(Debug, Clone, Copy)]
struct Scope<'a> {
    action: Action,
    bucket: Option<&'a str>,
    user_name: Option<&'a str>,
}

impl<'a> Scope<'a> {
    fn new(action: Action) -> Self {
        Self {
            action,
            bucket: None,
            user_name: None,
        }
    }

    fn bucket(mut self, bucket: &'a str) -> Self {
        self.bucket = Some(bucket);
        self
    }

    fn user_name(mut self, user_name: &'a str) -> Self {
        self.user_name = Some(user_name);
        self
    }

    /// Logs and returns an [`Error::InvalidArgument`].
    fn invalid(self, message: &'static str) -> Error {
        tracing::error!(
            target: TRACING_TARGET,
            action = %self.action,
            bucket = self.bucket,
            user_name = self.user_name,
            "{message}"
        );
        Error::InvalidArgument(message.to_owned())
    }

    /// Decodes a bucket identifier, logging a failure.
    fn decode(self, bucket_id: &str) -> Result<crate::BucketId> {
        crate::BucketId::decode(bucket_id).inspect_err(|err| {
            tracing::error!(
                target: TRACING_TARGET,
                action = %self.action,
                bucket_id = %bucket_id,
                error = %err,
                "failed to decode bucket ID"
            );
        })
    }

    /// Returns a mapper turning a backend failure at `step` into a logged
    /// [`Error::Remote`].
    fn remote(self, step: &'static str) -> impl FnOnce(cosi_powerscale::Error) -> Error {
        move |source| {
            tracing::error!(
                target: TRACING_TARGET,
                action = %self.action,
                bucket = self.bucket,
                user_name = self.user_name,
                status = source.status().map(|status| status.as_u16()),
                error = %source,
                "{step}"
            );
            Error::Remote {
                action: self.action,
                step,
                source,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cosi_powerscale::{
        AclEntry, AclPermission, FakeAppliance, MockCall, MockPowerscale, PowerscaleClient,
    };

    use super::*;
    use crate::credentials::{BUCKET_NAME, S3_CREDENTIALS};

    pub(super) fn provisioner(mock: &MockPowerscale) -> Provisioner {
        Provisioner::new(
            mock.clone(),
            ProvisionerConfig::new("backendX", "https://s3.example.com:9021"),
        )
    }

    #[tokio::test]
    async fn end_to_end() -> anyhow::Result<()> {
        let mock = MockPowerscale::default();
        let provisioner = provisioner(&mock);

        let id = provisioner.create_bucket("reports").await?;
        let id = id.map(|id| id.to_string());
        assert_eq!(id.as_deref(), Some("backendX-reports"));

        let access = provisioner
            .grant_bucket_access("backendX-reports", "ba-1", AuthenticationType::Key)
            .await?;
        assert_eq!(access.account_id, "ba-1");
        assert_eq!(
            access.credentials[S3_CREDENTIALS].get(BUCKET_NAME),
            Some("reports")
        );
        assert!(mock.user("ba-1").is_some());
        assert_eq!(
            mock.bucket("reports").map(|bucket| bucket.acl),
            Some(vec![AclEntry::user("ba-1", AclPermission::FullControl)])
        );

        provisioner
            .revoke_bucket_access("backendX-reports", "ba-1")
            .await?;
        let acl = mock.bucket("reports").map(|bucket| bucket.acl);
        assert_eq!(acl, Some(vec![]));
        assert!(mock.key("ba-1").is_none());
        assert!(mock.user("ba-1").is_none());

        mock.clear_calls();
        provisioner.delete_bucket("backendX-reports").await?;
        assert_eq!(
            mock.mutations(),
            [
                MockCall::DeleteDirectory("/ifs/data/cosi/reports".into()),
                MockCall::DeleteBucket("reports".into()),
            ]
        );
        assert!(mock.bucket("reports").is_none());
        assert!(!mock.has_directory("/ifs/data/cosi/reports"));

        provisioner.delete_bucket("backendX-reports").await?;
        Ok(())
    }

    #[tokio::test]
    async fn end_to_end_through_platform_api() -> anyhow::Result<()> {
        let appliance = FakeAppliance::start().await?;
        let config = appliance
            .config("backendX")?
            .with_s3_endpoint("https://s3.example.com:9021")
            .with_base_path("/ifs/data/cosi");
        let client = PowerscaleClient::new(config.clone())?;
        let provisioner = Provisioner::new(client, ProvisionerConfig::from(&config));

        let id = provisioner.create_bucket("reports").await?;
        let id = id.map(|id| id.to_string());
        assert_eq!(id.as_deref(), Some("backendX-reports"));
        assert!(appliance.has_directory("/ifs/data/cosi/reports"));

        let access = provisioner
            .grant_bucket_access("backendX-reports", "ba-1", AuthenticationType::Key)
            .await?;
        let secrets = &access.credentials[S3_CREDENTIALS];
        assert_eq!(secrets.get(BUCKET_NAME), Some("reports"));
        assert!(appliance.has_user("ba-1"));
        assert!(appliance.has_key("ba-1"));
        let expected = AclEntry::user("ba-1", AclPermission::FullControl);
        assert_eq!(appliance.bucket_acl("reports"), [expected]);

        provisioner
            .revoke_bucket_access("backendX-reports", "ba-1")
            .await?;
        assert!(appliance.bucket_acl("reports").is_empty());
        assert!(!appliance.has_user("ba-1"));

        provisioner.delete_bucket("backendX-reports").await?;
        assert!(!appliance.has_bucket("reports"));
        assert!(!appliance.has_directory("/ifs/data/cosi/reports"));

        let requests = appliance.requests();
        assert!(requests.iter().all(|request| request.authenticated));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn slow_backend_times_out() -> anyhow::Result<()> {
        let latency = Duration::from_secs(30);
        let mock = MockPowerscale::default().with_latency(latency);
        let provisioner = provisioner(&mock);

        let error = provisioner.create_bucket("reports").await.err();
        assert!(matches!(
            error,
            Some(Error::Timeout {
                action: Action::CreateBucket,
                timeout,
            }) if timeout == Duration::from_secs(20)
        ));
        assert_eq!(error.map(|e| e.kind()), Some(crate::ErrorKind::Timeout));
        assert!(mock.bucket("reports").is_none());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_is_configurable() -> anyhow::Result<()> {
        let latency = Duration::from_secs(30);
        let mock = MockPowerscale::default().with_latency(latency);
        let provisioner = Provisioner::new(
            mock.clone(),
            ProvisionerConfig::new("backendX", "https://s3")
                .with_operation_timeout(Duration::from_secs(120)),
        );

        assert!(provisioner.create_bucket("reports").await?.is_some());
        Ok(())
    }

    #[test]
    fn debug_shows_config() {
        let provisioner = provisioner(&MockPowerscale::default());
        let debug = format!("{provisioner:?}");
        assert!(debug.contains("backendX"));
    }
}
