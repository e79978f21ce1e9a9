//! Bucket identifiers handed out to the orchestrator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Identifier of a provisioned bucket, rendered as `<backend>-<bucket>`.
///
/// Parsing splits on the first `-`, so the bucket part may itself contain
/// dashes while the backend part may not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct BucketId {
    backend: String,
    bucket: String,
}

impl BucketId {
    /// Creates an identifier for `bucket` on `backend`.
    pub fn new(backend: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            bucket: bucket.into(),
        }
    }

    /// Parses an identifier.
    ///
    /// Fails with [`Error::InvalidBucketId`] when there is no `-` or nothing
    /// follows it.
    pub fn decode(id: &str) -> Result<Self> {
        match id.split_once('-') {
            Some((backend, bucket)) if !bucket.is_empty() => Ok(Self::new(backend, bucket)),
            _ => Err(Error::InvalidBucketId(id.to_owned())),
        }
    }

    /// Returns the backend name.
    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// Returns the bucket name on the appliance.
    pub fn bucket_name(&self) -> &str {
        &self.bucket
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.backend, self.bucket)
    }
}

impl FromStr for BucketId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

impl From<BucketId> for String {
    fn from(id: BucketId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for BucketId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::decode(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_backend_and_bucket() {
        let id = BucketId::new("backendX", "reports");
        assert_eq!(id.to_string(), "backendX-reports");
    }

    #[test]
    fn splits_on_first_dash() -> anyhow::Result<()> {
        let id: BucketId = "backendX-reports-2024-q1".parse()?;
        assert_eq!(id.backend(), "backendX");
        assert_eq!(id.bucket_name(), "reports-2024-q1");
        assert_eq!(id.to_string(), "backendX-reports-2024-q1");
        Ok(())
    }

    #[test]
    fn rejects_identifiers_without_bucket() {
        for id in ["reports", "backendX-", ""] {
            let error = BucketId::decode(id).err();
            assert!(
                matches!(error, Some(Error::InvalidBucketId(ref v)) if v == id),
                "{id:?} should be rejected"
            );
        }
    }

    #[test]
    fn empty_backend_is_accepted() -> anyhow::Result<()> {
        let id = BucketId::decode("-reports")?;
        assert_eq!(id.backend(), "");
        assert_eq!(id.bucket_name(), "reports");
        Ok(())
    }

    #[test]
    fn serializes_as_string() -> anyhow::Result<()> {
        let id = BucketId::new("backendX", "reports");
        assert_eq!(serde_json::to_string(&id)?, "\"backendX-reports\"");
        assert!(serde_json::from_str::<BucketId>("\"reports\"").is_err());
        Ok(())
    }
}
