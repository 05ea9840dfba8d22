use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are modeled as opaque strings (e.g. "users.approve").
/// The wildcard permission `"*"` grants everything and is what super admins
/// usually carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of an administrator's permissions, fetched from storage at login
/// and frozen into the access token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAccess {
    pub permissions: Vec<Permission>,
}

impl AdminAccess {
    pub fn new(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            permissions: permissions.into_iter().collect(),
        }
    }

    pub fn allows(&self, required: &Permission) -> bool {
        self.permissions
            .iter()
            .any(|p| p.is_wildcard() || p == required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_permission_is_allowed() {
        let access = AdminAccess::new([Permission::new("users.approve")]);
        assert!(access.allows(&Permission::new("users.approve")));
        assert!(!access.allows(&Permission::new("shops.delete")));
    }

    #[test]
    fn wildcard_allows_everything() {
        let access = AdminAccess::new([Permission::new("*")]);
        assert!(access.allows(&Permission::new("shops.delete")));
    }

    #[test]
    fn empty_snapshot_allows_nothing() {
        assert!(!AdminAccess::default().allows(&Permission::new("users.approve")));
    }
}
