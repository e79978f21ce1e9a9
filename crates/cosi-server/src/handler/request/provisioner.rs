use std::collections::BTreeMap;

use cosi_provisioner::AuthenticationType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBucketRequest {
    #[serde(default)]
    pub name: String,
    /// Bucket class parameters. Accepted and ignored.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBucketRequest {
    #[serde(default)]
    pub bucket_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantBucketAccessRequest {
    #[serde(default)]
    pub bucket_id: String,
    /// Name of the access; becomes the user and account name.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub authentication_type: AuthenticationType,
    /// Bucket access class parameters. Accepted and ignored.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeBucketAccessRequest {
    #[serde(default)]
    pub bucket_id: String,
    #[serde(default)]
    pub account_id: String,
}
