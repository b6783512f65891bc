//! Role to permission consolidation
//!
//! A user's roles are flattened into one list of effective permissions,
//! deduplicated by permission id. The first occurrence of an id wins and the
//! output keeps first-insertion order.

use std::collections::HashSet;

use crate::model::{Permission, Role};

/// Flatten `roles` into their distinct permissions.
///
/// Roles are walked in order, and each role's permissions in order. Later
/// records with an already seen id are dropped even if other fields differ.
pub fn consolidate(roles: Option<&[Role]>) -> Vec<Permission> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for role in roles.unwrap_or_default() {
        for p in role.permissions() {
            if seen.insert(p.id) {
                out.push(p.clone());
            }
        }
    }
    out
}

/// Effective grants for one user: raw roles plus consolidated permissions.
///
/// Immutable once built. A new auth event builds a new set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    roles: Vec<Role>,
    permissions: Vec<Permission>,
    names: HashSet<String>,
}

impl PermissionSet {
    /// The set that grants nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_roles(roles: Option<&[Role]>) -> Self {
        let permissions = consolidate(roles);
        let names = permissions.iter().map(|p| p.name.clone()).collect();
        Self {
            roles: roles.map(<[Role]>::to_vec).unwrap_or_default(),
            permissions,
            names,
        }
    }

    /// Exact, case-sensitive match on a permission name. No wildcards.
    pub fn has_permission(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Exact match on the name of one of the user's own roles
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.name == name)
    }

    pub fn has_any_permission(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.has_permission(n))
    }

    /// True for an empty `names`
    pub fn has_all_permissions(&self, names: &[&str]) -> bool {
        names.iter().all(|n| self.has_permission(n))
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.permissions.iter().map(|p| p.id)
    }

    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}
