use super::{Provisioner, Scope};
use crate::{Action, BucketId, Result, TRACING_TARGET};

impl Provisioner {
    /// Creates bucket `name` unless it already exists.
    ///
    /// Returns the identifier of a newly created bucket. An existing bucket
    /// is left untouched and yields `None`.
    pub async fn create_bucket(&self, name: &str) -> Result<Option<BucketId>> {
        self.bounded(Action::CreateBucket, self.reconcile_bucket(name))
            .await
    }

    async fn reconcile_bucket(&self, name: &str) -> Result<Option<BucketId>> {
        let scope = Scope::new(Action::CreateBucket).bucket(name);
        if name.is_empty() {
            return Err(scope.invalid("empty bucket name"));
        }

        let existing = self
            .api()
            .get_bucket(name)
            .await
            .map_err(scope.remote("failed to check if bucket exists"))?;
        if existing.is_some() {
            tracing::info!(target: TRACING_TARGET, bucket = %name, "Bucket already exists");
            return Ok(None);
        }

        self.api()
            .create_bucket(name)
            .await
            .map_err(scope.remote("failed to create bucket"))?;

        let id = BucketId::new(self.backend(), name);
        tracing::info!(
            target: TRACING_TARGET,
            bucket = %name,
            bucket_id = %id,
            "Bucket provisioned"
        );
        Ok(Some(id))
    }
}

#[cfg(test)]
mod tests {
    use cosi_powerscale::{MockCall, MockPowerscale, StatusCode};

    use crate::provisioner::tests::provisioner;
    use crate::{Error, ErrorKind};

    #[tokio::test]
    async fn creates_once() -> anyhow::Result<()> {
        let mock = MockPowerscale::default();
        let provisioner = provisioner(&mock);

        let first = provisioner.create_bucket("reports").await?;
        let first = first.map(|id| id.to_string());
        assert_eq!(first.as_deref(), Some("backendX-reports"));
        assert!(mock.has_directory("/ifs/data/cosi/reports"));

        mock.clear_calls();
        let second = provisioner.create_bucket("reports").await?;
        assert!(second.is_none());
        assert_eq!(mock.calls(), [MockCall::GetBucket("reports".into())]);
        assert!(mock.mutations().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn empty_name_is_rejected_without_remote_calls() {
        let mock = MockPowerscale::default();
        let error = provisioner(&mock).create_bucket("").await.err();

        assert!(matches!(error, Some(Error::InvalidArgument(_))));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn remote_failure_carries_status() {
        let mock = MockPowerscale::default();
        mock.fail_on(
            MockCall::CreateBucket("reports".into()),
            StatusCode::INTERNAL_SERVER_ERROR,
        );

        let error = provisioner(&mock).create_bucket("reports").await.err();
        let Some(Error::Remote { step, source, .. }) = &error else {
            panic!("expected a remote error, got {error:?}");
        };
        assert_eq!(*step, "failed to create bucket");
        assert_eq!(source.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(error.map(|e| e.kind()), Some(ErrorKind::Remote));
    }
}
