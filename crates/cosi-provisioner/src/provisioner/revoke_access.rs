use super::{Provisioner, Scope};
use crate::{Action, Result, TRACING_TARGET};

impl Provisioner {
    /// Revokes everything a grant to `account_id` created.
    ///
    /// The ACL entry, the key and the user are each removed only when
    /// present, so revoking a partially provisioned or already revoked
    /// account succeeds.
    pub async fn revoke_bucket_access(&self, bucket_id: &str, account_id: &str) -> Result<()> {
        self.bounded(
            Action::RevokeBucketAccess,
            self.revoke(bucket_id, account_id),
        )
        .await
    }

    async fn revoke(&self, bucket_id: &str, account_id: &str) -> Result<()> {
        let scope = Scope::new(Action::RevokeBucketAccess).user_name(account_id);
        if bucket_id.is_empty() {
            return Err(scope.invalid("empty bucket ID"));
        }
        if account_id.is_empty() {
            return Err(scope.invalid("empty account ID"));
        }

        let id = scope.decode(bucket_id)?;
        let bucket = id.bucket_name();
        let scope = scope.bucket(bucket);
        let api = self.api();

        let existing = api
            .get_bucket(bucket)
            .await
            .map_err(scope.remote("failed to check if bucket exists"))?;
        if existing.is_some() {
            api.delete_acl_entry(bucket, account_id)
                .await
                .map_err(scope.remote("failed to remove bucket ACL entry"))?;
        }

        let key = api
            .get_key(account_id)
            .await
            .map_err(scope.remote("failed to check if S3 key exists"))?;
        if key.is_some() {
            api.delete_key(account_id)
                .await
                .map_err(scope.remote("failed to delete S3 key"))?;
        }

        let user = api
            .get_user(account_id)
            .await
            .map_err(scope.remote("failed to check if user exists"))?;
        if user.is_some() {
            api.delete_user(account_id)
                .await
                .map_err(scope.remote("failed to delete user"))?;
        }

        tracing::info!(
            target: TRACING_TARGET,
            bucket = %bucket,
            user_name = %account_id,
            "Bucket access revoked"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use cosi_powerscale::{AccessKey, AclEntry, AclPermission, MockCall, MockPowerscale, StatusCode};

    use crate::provisioner::tests::provisioner;
    use crate::{Error, ErrorKind};

    #[tokio::test]
    async fn nothing_present_means_no_mutations() -> anyhow::Result<()> {
        let mock = MockPowerscale::default();
        provisioner(&mock)
            .revoke_bucket_access("backendX-reports", "ba-1")
            .await?;

        assert_eq!(
            mock.calls(),
            [
                MockCall::GetBucket("reports".into()),
                MockCall::GetKey("ba-1".into()),
                MockCall::GetUser("ba-1".into()),
            ]
        );
        assert!(mock.mutations().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn removes_only_the_account_entry() -> anyhow::Result<()> {
        let mock = MockPowerscale::default()
            .with_bucket_acl(
                "reports",
                vec![
                    AclEntry::user("ba-0", AclPermission::Read),
                    AclEntry::user("ba-1", AclPermission::FullControl),
                ],
            )
            .with_key("ba-1", AccessKey::new("1_ba-1_accid", "secret"));

        provisioner(&mock)
            .revoke_bucket_access("backendX-reports", "ba-1")
            .await?;

        assert_eq!(
            mock.mutations(),
            [
                MockCall::UpdateBucketAcl("reports".into()),
                MockCall::DeleteKey("ba-1".into()),
                MockCall::DeleteUser("ba-1".into()),
            ]
        );
        let acl = mock.bucket("reports").map(|bucket| bucket.acl);
        assert_eq!(acl, Some(vec![AclEntry::user("ba-0", AclPermission::Read)]));
        Ok(())
    }

    #[tokio::test]
    async fn user_without_key_is_still_deleted() -> anyhow::Result<()> {
        let mock = MockPowerscale::default().with_user("ba-1");
        provisioner(&mock)
            .revoke_bucket_access("backendX-reports", "ba-1")
            .await?;

        assert_eq!(mock.mutations(), [MockCall::DeleteUser("ba-1".into())]);
        Ok(())
    }

    #[tokio::test]
    async fn key_failure_stops_before_user() {
        let mock = MockPowerscale::default()
            .with_key("ba-1", AccessKey::new("1_ba-1_accid", "secret"));
        let delete_key = MockCall::DeleteKey("ba-1".into());
        mock.fail_on(delete_key, StatusCode::BAD_GATEWAY);

        let error = provisioner(&mock)
            .revoke_bucket_access("backendX-reports", "ba-1")
            .await
            .err();

        assert!(error.as_ref().is_some_and(Error::is_retryable));
        assert_eq!(error.map(|e| e.kind()), Some(ErrorKind::Remote));
        assert!(mock.user("ba-1").is_some());
    }

    #[tokio::test]
    async fn rejects_empty_account() {
        let mock = MockPowerscale::default();
        let error = provisioner(&mock)
            .revoke_bucket_access("backendX-reports", "")
            .await
            .err();
        assert!(matches!(error, Some(Error::InvalidArgument(_))));
        assert!(mock.calls().is_empty());
    }
}
