use serde::{Deserialize, Serialize};

/// A local user in the configured access zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
}

impl User {
    /// Creates an enabled user record.
    pub fn enabled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
        }
    }
}

/// Envelope returned by `GET /auth/users/<name>`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct UserList {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl UserList {
    /// Returns the first user, which is the only one for a by-name lookup.
    pub fn into_first(self) -> Option<User> {
        self.users.into_iter().next()
    }
}
