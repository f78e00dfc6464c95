pub mod storage;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};

pub const TOKEN_KEY: &str = "token";
pub const USER_NAME_KEY: &str = "userName";
pub const USER_ROLE_KEY: &str = "userRole";
pub const USER_PROFILE_KEY: &str = "user";

/// Account role as reported by the API at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Anything other than `admin` is a plain user.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::parse(&value)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client-held login state. A present token is the only signal of being
/// logged in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub user_name: Option<String>,
    pub user_role: Option<Role>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn role(&self) -> Role {
        self.user_role.unwrap_or_default()
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }
}

/// Session view over an injected key/value storage.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Read the current session. Storage failures read as "absent".
    pub fn get(&self) -> Session {
        Session {
            token: self.read(TOKEN_KEY),
            user_name: self.read(USER_NAME_KEY),
            user_role: self.read(USER_ROLE_KEY).map(|r| Role::parse(&r)),
        }
    }

    pub fn set(&self, token: &str, name: &str, role: Role) -> Result<(), StorageError> {
        self.storage.set_items(&[
            (TOKEN_KEY, token),
            (USER_NAME_KEY, name),
            (USER_ROLE_KEY, role.as_str()),
        ])
    }

    /// Store a token without any user details.
    pub fn set_token(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set_item(TOKEN_KEY, token)
    }

    pub fn set_profile(&self, profile: &serde_json::Value) -> Result<(), StorageError> {
        let json = serde_json::to_string(profile)?;
        self.storage.set_item(USER_PROFILE_KEY, &json)
    }

    /// The raw user record saved at login, if any.
    pub fn profile(&self) -> Option<serde_json::Value> {
        let json = self.read(USER_PROFILE_KEY)?;
        match serde_json::from_str(&json) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!("Ignoring unreadable user profile: {}", e);
                None
            }
        }
    }

    /// Name to greet the user with: the stored profile first, then `userName`.
    pub fn display_name(&self) -> Option<String> {
        self.profile()
            .and_then(|p| p.get("name").and_then(|n| n.as_str()).map(str::to_string))
            .filter(|n| !n.is_empty())
            .or_else(|| self.read(USER_NAME_KEY))
    }

    /// Drop the three session keys, leaving anything else in storage.
    pub fn end(&self) -> Result<(), StorageError> {
        self.storage
            .remove_items(&[TOKEN_KEY, USER_NAME_KEY, USER_ROLE_KEY])
    }

    /// Wipe the storage entirely.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.clear()
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!("Session storage read failed for {}: {}", key, e);
                None
            }
        }
    }
}
