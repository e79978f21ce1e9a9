use cosi_powerscale::AclPermission;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use super::{Provisioner, Scope};
use crate::credentials::{self, Credentials};
use crate::{Action, Error, Result, TRACING_TARGET};

/// How a bucket access authenticates against the object store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, AsRefStr)]
pub enum AuthenticationType {
    /// Static S3 access keys.
    #[default]
    Key,
    /// Workload identity federation.
    #[serde(rename = "IAM")]
    #[strum(serialize = "IAM")]
    Iam,
}

/// Result of a successful grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketAccess {
    /// Account that received access; equal to the requested access name.
    pub account_id: String,
    /// Credential bundle for the new key.
    pub credentials: Credentials,
}

impl Provisioner {
    /// Grants user `name` full control over the bucket and mints a new key.
    ///
    /// The user is created when missing. Every call mints a fresh key, so
    /// repeating a grant rotates the credentials handed out.
    pub async fn grant_bucket_access(
        &self,
        bucket_id: &str,
        name: &str,
        authentication_type: AuthenticationType,
    ) -> Result<BucketAccess> {
        self.bounded(
            Action::GrantBucketAccess,
            self.grant(bucket_id, name, authentication_type),
        )
        .await
    }

    async fn grant(
        &self,
        bucket_id: &str,
        name: &str,
        authentication_type: AuthenticationType,
    ) -> Result<BucketAccess> {
        let scope = Scope::new(Action::GrantBucketAccess).user_name(name);
        if bucket_id.is_empty() {
            return Err(scope.invalid("empty bucket ID"));
        }
        if name.is_empty() {
            return Err(scope.invalid("empty bucket access name"));
        }
        if authentication_type == AuthenticationType::Iam {
            tracing::error!(
                target: TRACING_TARGET,
                action = %Action::GrantBucketAccess,
                bucket_id = %bucket_id,
                user_name = %name,
                "IAM authentication is not supported"
            );
            return Err(Error::Unsupported(
                "authentication type IAM is not supported".into(),
            ));
        }

        let id = scope.decode(bucket_id)?;
        let bucket = id.bucket_name();
        let scope = scope.bucket(bucket);

        let user = self
            .api()
            .get_user(name)
            .await
            .map_err(scope.remote("failed to check if user exists"))?;
        if user.is_none() {
            self.api()
                .create_user(name)
                .await
                .map_err(scope.remote("failed to create user"))?;
        }

        self.api()
            .ensure_acl(bucket, name, AclPermission::FullControl)
            .await
            .map_err(scope.remote("failed to update bucket ACL"))?;

        let key = self
            .api()
            .create_key(name)
            .await
            .map_err(scope.remote("failed to create S3 key"))?;

        let config = self.config();
        let credentials = credentials::assemble(
            &key,
            &config.s3_endpoint,
            config.s3_region.as_deref(),
            bucket,
        );

        tracing::info!(
            target: TRACING_TARGET,
            bucket = %bucket,
            user_name = %name,
            access_id = %key.access_id,
            "Bucket access granted"
        );

        Ok(BucketAccess {
            account_id: name.to_owned(),
            credentials,
        })
    }
}
