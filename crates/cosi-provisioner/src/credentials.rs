//! S3 credential bundles returned by a successful grant.

use std::collections::BTreeMap;
use std::fmt;

use cosi_powerscale::AccessKey;
use serde::{Deserialize, Serialize};

/// Key under which the S3 bundle is published.
pub const S3_CREDENTIALS: &str = "s3";

pub const ACCESS_KEY_ID: &str = "accessKeyID";
pub const ACCESS_SECRET_KEY: &str = "accessSecretKey";
pub const ENDPOINT: &str = "endpoint";
pub const BUCKET_NAME: &str = "bucketName";
pub const REGION: &str = "region";

/// Credential bundles keyed by protocol.
pub type Credentials = BTreeMap<String, CredentialDetails>;

/// Secrets of a single protocol.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialDetails {
    pub secrets: BTreeMap<String, String>,
}

impl CredentialDetails {
    /// Returns one secret by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.secrets.get(key).map(String::as_str)
    }
}

impl fmt::Debug for CredentialDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialDetails")
            .field("secrets", &self.secrets.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Assembles the `s3` bundle for a freshly minted key.
///
/// `region` is included only when present and non-empty.
pub fn assemble(
    key: &AccessKey,
    endpoint: &str,
    region: Option<&str>,
    bucket_name: &str,
) -> Credentials {
    let mut secrets = BTreeMap::from([
        (ACCESS_KEY_ID.to_owned(), key.access_id.clone()),
        (ACCESS_SECRET_KEY.to_owned(), key.secret_key.clone()),
        (ENDPOINT.to_owned(), endpoint.to_owned()),
        (BUCKET_NAME.to_owned(), bucket_name.to_owned()),
    ]);
    if let Some(region) = region.filter(|region| !region.is_empty()) {
        secrets.insert(REGION.to_owned(), region.to_owned());
    }

    Credentials::from([(S3_CREDENTIALS.to_owned(), CredentialDetails { secrets })])
}
