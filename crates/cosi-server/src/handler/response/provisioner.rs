use cosi_provisioner::{BucketAccess, BucketId, Credentials};
use serde::{Deserialize, Serialize};

/// Answer to a create-bucket request.
///
/// `bucket_id` is absent when the bucket already existed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBucketResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_id: Option<String>,
}

impl From<Option<BucketId>> for CreateBucketResponse {
    fn from(id: Option<BucketId>) -> Self {
        Self {
            bucket_id: id.map(|id| id.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteBucketResponse {}

/// Answer to a grant request, carrying the new credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantBucketAccessResponse {
    pub account_id: String,
    pub credentials: Credentials,
}

impl From<BucketAccess> for GrantBucketAccessResponse {
    fn from(access: BucketAccess) -> Self {
        Self {
            account_id: access.account_id,
            credentials: access.credentials,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevokeBucketAccessResponse {}
