use std::fmt;

use serde::{Deserialize, Serialize};

/// An S3 access key pair belonging to one user.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKey {
    #[serde(default)]
    pub access_id: String,
    #[serde(default)]
    pub secret_key: String,
}

impl AccessKey {
    /// Creates a key pair.
    pub fn new(access_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_id: access_id.into(),
            secret_key: secret_key.into(),
        }
    }

    /// The appliance answers a key lookup for a user without keys with an
    /// empty `access_id` instead of a 404.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.access_id.is_empty()
    }
}

impl fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKey")
            .field("access_id", &self.access_id)
            .field("secret_key", &"***")
            .finish()
    }
}

/// Envelope used by the key endpoints.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct KeyEnvelope {
    #[serde(default)]
    pub keys: AccessKey,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn debug_masks_secret() {
        let key = AccessKey::new("AKID", "very-secret");
        let debug = format!("{key:?}");
        assert!(debug.contains("AKID"));
        assert!(!debug.contains("very-secret"));
    }

    #[test]
    fn envelope_without_key_is_empty() -> anyhow::Result<()> {
        let envelope: KeyEnvelope = serde_json::from_value(json!({ "keys": { "access_id": "" } }))?;
        assert!(envelope.keys.is_empty());

        let envelope: KeyEnvelope = serde_json::from_value(json!({
            "keys": { "access_id": "1_ba-1_accid", "secret_key": "s3cr3t", "old_key_expiry": 0 }
        }))?;
        assert!(!envelope.keys.is_empty());
        assert_eq!(envelope.keys.secret_key, "s3cr3t");
        Ok(())
    }
}
