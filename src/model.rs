//! Wire model for users, roles and permissions
//!
//! Shapes match the auth API's JSON (camelCase). Fields the API may omit are
//! optional here and fall back to empty.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consolidate::consolidate;

/// An atomic authorization unit, referenced by `id` once issued
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_id: Option<i64>,
}

impl Permission {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), description: None, module_id: None }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A named bundle of permissions assignable to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `None` when the API omitted the field or sent `null`
    #[serde(default)]
    pub permissions: Option<Vec<Permission>>,
}

impl Role {
    pub fn new(id: i64, name: impl Into<String>, permissions: Vec<Permission>) -> Self {
        Self { id, name: name.into(), description: None, permissions: Some(permissions) }
    }

    /// Granted permissions; empty when the field was absent
    pub fn permissions(&self) -> &[Permission] {
        self.permissions.as_deref().unwrap_or_default()
    }
}

/// The user record returned by login and verify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub channel_id: i64,
    #[serde(default)]
    pub roles: Option<Vec<Role>>,
    /// Derived from `roles`; whatever the API sent here is discarded
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl LoggedUser {
    pub fn roles(&self) -> &[Role] {
        self.roles.as_deref().unwrap_or_default()
    }

    /// Replace `permissions` with the consolidation of `roles`
    pub fn consolidated(mut self) -> Self {
        self.permissions = consolidate(self.roles.as_deref());
        self
    }
}

/// Login form payload
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login and verify response: session token plus the user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: LoggedUser,
}

/// Role-edit form submission: the complete replacement list of permission ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePermissionsUpdate {
    pub permission_ids: Vec<i64>,
}

impl RolePermissionsUpdate {
    /// Start from the role's current grants
    pub fn from_role(role: &Role) -> Self {
        let mut update = Self::default();
        for p in role.permissions() {
            if !update.contains(p.id) {
                update.permission_ids.push(p.id);
            }
        }
        update
    }

    pub fn contains(&self, id: i64) -> bool {
        self.permission_ids.contains(&id)
    }

    /// Add `id` if absent, remove it if present. Returns the new membership.
    pub fn toggle(&mut self, id: i64) -> bool {
        match self.permission_ids.iter().position(|&p| p == id) {
            Some(i) => {
                self.permission_ids.remove(i);
                false
            }
            None => {
                self.permission_ids.push(id);
                true
            }
        }
    }
}
