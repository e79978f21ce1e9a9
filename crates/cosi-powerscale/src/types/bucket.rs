use serde::{Deserialize, Deserializer, Serialize};

use super::AclEntry;

/// Description stamped on buckets created by this driver.
pub const BUCKET_DESCRIPTION: &str = "Created by cosi-powerscale";

/// Owner assigned to buckets created by this driver.
pub const BUCKET_OWNER: &str = "root";

/// How the appliance treats object ACLs on PUT.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectAclPolicy {
    /// The whole ACL list is replaced on every update.
    #[default]
    Replace,
    /// ACL updates are rejected.
    Deny,
}

/// An S3 bucket record as stored by the appliance.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bucket {
    pub name: String,
    pub path: String,
    pub owner: String,
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub acl: Vec<AclEntry>,
    pub object_acl_policy: ObjectAclPolicy,
    pub create_path: bool,
}

impl Bucket {
    /// Creates the record POSTed for a new bucket at `path`.
    ///
    /// The backing directory is created by the appliance and the ACL starts
    /// empty.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            owner: BUCKET_OWNER.to_owned(),
            description: BUCKET_DESCRIPTION.to_owned(),
            acl: Vec::new(),
            object_acl_policy: ObjectAclPolicy::Replace,
            create_path: true,
        }
    }
}

/// Reads a JSON `null` as the default value of `T`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let value = Option::<T>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// Envelope returned by `GET /buckets/<name>`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct BucketList {
    #[serde(default)]
    pub buckets: Vec<Bucket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl BucketList {
    /// Returns the first bucket, which is the only one for a by-name lookup.
    pub fn into_first(self) -> Option<Bucket> {
        self.buckets.into_iter().next()
    }
}

/// Partial bucket update carrying only the ACL list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AclUpdate {
    pub acl: Vec<AclEntry>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn new_bucket_request_body() -> anyhow::Result<()> {
        let bucket = Bucket::new("reports", "/ifs/data/cosi/reports");
        let value = serde_json::to_value(&bucket)?;
        assert_eq!(
            value,
            json!({
                "name": "reports",
                "path": "/ifs/data/cosi/reports",
                "owner": "root",
                "description": "Created by cosi-powerscale",
                "acl": [],
                "object_acl_policy": "replace",
                "create_path": true,
            })
        );
        Ok(())
    }

    #[test]
    fn read_tolerates_missing_and_unknown_fields() -> anyhow::Result<()> {
        let list: BucketList = serde_json::from_value(json!({
            "buckets": [{
                "name": "reports",
                "path": "/ifs/data/cosi/reports",
                "id": "reports",
                "zid": 1,
                "acl": [{
                    "grantee": { "type": "user", "name": "root" },
                    "permission": "FULL_CONTROL",
                }],
                "object_acl_policy": "deny",
            }],
            "total": 1,
        }))?;

        let Some(bucket) = list.into_first() else {
            anyhow::bail!("no bucket");
        };
        assert_eq!(bucket.name, "reports");
        assert_eq!(bucket.acl.len(), 1);
        assert_eq!(bucket.object_acl_policy, ObjectAclPolicy::Deny);
        assert!(!bucket.create_path);
        assert!(bucket.owner.is_empty());
        Ok(())
    }

    #[test]
    fn null_acl_and_nameless_grantee_are_tolerated() -> anyhow::Result<()> {
        let bucket: Bucket = serde_json::from_value(json!({
            "name": "reports",
            "acl": null,
        }))?;
        assert!(bucket.acl.is_empty());

        let bucket: Bucket = serde_json::from_value(json!({
            "name": "shared",
            "acl": [{
                "grantee": { "id": "UID:2000", "type": "user" },
                "permission": "READ",
            }],
        }))?;
        assert_eq!(bucket.acl.len(), 1);
        assert!(bucket.acl[0].grantee.name.is_empty());
        assert!(!bucket.acl[0].is_for("ba-1"));
        Ok(())
    }

    #[test]
    fn empty_list_has_no_bucket() -> anyhow::Result<()> {
        let list: BucketList = serde_json::from_value(json!({ "buckets": [], "total": 0 }))?;
        assert!(list.into_first().is_none());
        Ok(())
    }
}
