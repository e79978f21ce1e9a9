use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Grantee type used for entries created by this crate.
pub const GRANTEE_TYPE_USER: &str = "user";

/// S3 permission level attached to an ACL entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AclPermission {
    Read,
    Write,
    ReadAcp,
    WriteAcp,
    FullControl,
}

/// Principal an ACL entry confers a permission to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grantee {
    /// Principal kind as reported by the appliance (`user`, `group`, ...).
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    /// Principal name. Some appliance entries (e.g. well-known groups) omit it.
    #[serde(default)]
    pub name: String,
}

impl Grantee {
    /// Creates a local user grantee.
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            kind: Some(GRANTEE_TYPE_USER.to_owned()),
            name: name.into(),
        }
    }
}

/// One `(grantee, permission)` pair of a bucket ACL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntry {
    pub grantee: Grantee,
    pub permission: AclPermission,
}

impl AclEntry {
    /// Creates an entry granting `permission` to the local user `name`.
    pub fn user(name: impl Into<String>, permission: AclPermission) -> Self {
        Self {
            grantee: Grantee::user(name),
            permission,
        }
    }

    /// Returns whether this entry is about the principal `name`.
    #[inline]
    pub fn is_for(&self, name: &str) -> bool {
        self.grantee.name == name
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_in_platform_shape() -> anyhow::Result<()> {
        let entry = AclEntry::user("ba-1", AclPermission::FullControl);
        let value = serde_json::to_value(&entry)?;
        let expected = json!({
            "grantee": { "type": "user", "name": "ba-1" },
            "permission": "FULL_CONTROL",
        });
        assert_eq!(value, expected);
        Ok(())
    }

    #[test]
    fn grantee_type_is_optional() -> anyhow::Result<()> {
        let entry: AclEntry = serde_json::from_value(json!({
            "grantee": { "name": "everyone" },
            "permission": "READ_ACP"
        }))?;
        assert_eq!(entry.grantee.kind, None);
        assert_eq!(entry.permission, AclPermission::ReadAcp);

        let value = serde_json::to_value(&entry)?;
        assert!(value["grantee"].get("type").is_none());
        Ok(())
    }

    #[test]
    fn permission_string_form() {
        assert_eq!(AclPermission::FullControl.as_ref(), "FULL_CONTROL");
        let parsed = "WRITE_ACP".parse::<AclPermission>().ok();
        assert_eq!(parsed, Some(AclPermission::WriteAcp));
    }
}
