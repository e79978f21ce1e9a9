//! The seam between the provisioner and the appliance.

use crate::types::{AccessKey, AclEntry, AclPermission, Bucket, User};
use crate::{Error, Result, TRACING_TARGET_ACL, acl};

/// Existence-checked CRUD over the four resource kinds a driver manages.
///
/// Reads return `Ok(None)` for absent resources and deletes of absent
/// resources succeed. Implemented by [`PowerscaleClient`] against a live
/// cluster and by `MockPowerscale` in memory.
///
/// [`PowerscaleClient`]: crate::PowerscaleClient
#[async_trait::async_trait]
pub trait PowerscaleApi: Send + Sync {
    /// Returns the filesystem path backing bucket `name`.
    fn bucket_path(&self, name: &str) -> String;

    /// Looks up a bucket by name.
    async fn get_bucket(&self, name: &str) -> Result<Option<Bucket>>;

    /// Creates a bucket together with its backing directory.
    async fn create_bucket(&self, name: &str) -> Result<()>;

    /// Deletes a bucket record.
    async fn delete_bucket(&self, name: &str) -> Result<()>;

    /// Replaces the whole ACL of a bucket.
    ///
    /// Fails with [`Error::BucketNotFound`] if the bucket does not exist.
    async fn update_bucket_acl(&self, name: &str, acl: Vec<AclEntry>) -> Result<()>;

    /// Recursively deletes a directory.
    async fn delete_directory(&self, path: &str) -> Result<()>;

    /// Looks up a user by name.
    async fn get_user(&self, name: &str) -> Result<Option<User>>;

    /// Creates an enabled user.
    async fn create_user(&self, name: &str) -> Result<()>;

    /// Deletes a user.
    async fn delete_user(&self, name: &str) -> Result<()>;

    /// Returns the active S3 key of a user.
    async fn get_key(&self, name: &str) -> Result<Option<AccessKey>>;

    /// Mints a new S3 key for a user.
    async fn create_key(&self, name: &str) -> Result<AccessKey>;

    /// Deletes the S3 keys of a user.
    async fn delete_key(&self, name: &str) -> Result<()>;

    /// Grants `permission` on bucket `bucket` to user `grantee`.
    ///
    /// Reads the bucket, merges the entry into its ACL and writes the whole
    /// list back. Concurrent updates of the same bucket may overwrite each
    /// other.
    async fn ensure_acl(
        &self,
        bucket: &str,
        grantee: &str,
        permission: AclPermission,
    ) -> Result<()> {
        let Some(current) = self.get_bucket(bucket).await? else {
            return Err(Error::BucketNotFound(bucket.to_owned()));
        };

        let merged = acl::insert_or_replace(current.acl, grantee, permission);
        self.update_bucket_acl(bucket, merged).await?;

        tracing::info!(
            target: TRACING_TARGET_ACL,
            bucket = %bucket,
            grantee = %grantee,
            permission = %permission,
            "ACL entry ensured"
        );

        Ok(())
    }

    /// Removes every ACL entry of `grantee` on bucket `bucket`.
    ///
    /// An absent bucket has nothing to revoke and counts as success.
    async fn delete_acl_entry(&self, bucket: &str, grantee: &str) -> Result<()> {
        let Some(current) = self.get_bucket(bucket).await? else {
            tracing::info!(
                target: TRACING_TARGET_ACL,
                bucket = %bucket,
                grantee = %grantee,
                "ACL entry removal skipped, bucket not found"
            );
            return Ok(());
        };

        let remaining = acl::remove(current.acl, grantee);
        match self.update_bucket_acl(bucket, remaining).await {
            Ok(()) | Err(Error::BucketNotFound(_)) => {}
            Err(err) => return Err(err),
        }

        tracing::info!(
            target: TRACING_TARGET_ACL,
            bucket = %bucket,
            grantee = %grantee,
            "ACL entry removed"
        );

        Ok(())
    }
}
