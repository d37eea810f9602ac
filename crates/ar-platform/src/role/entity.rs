//! Application Role Entities
//!
//! Roles are scoped to an application and carry their permission names plus
//! the users and groups assigned to them.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use std::collections::HashSet;

use crate::directory::IdentityProvider;

/// User assigned to a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleUser {
    pub id: String,
    pub user_name: String,
}

impl RoleUser {
    pub fn new(id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_name: user_name.into(),
        }
    }
}

/// Group assigned to a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleGroup {
    pub id: String,
    pub display_name: String,

    /// Name of the identity provider the group comes from
    pub identity_provider: String,
}

impl RoleGroup {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        identity_provider: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            identity_provider: identity_provider.into(),
        }
    }

    pub fn identity_provider(&self) -> IdentityProvider {
        IdentityProvider::from_name(&self.identity_provider)
    }
}

/// User record in the identity directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_name: String,
}

impl From<DirectoryUser> for RoleUser {
    fn from(user: DirectoryUser) -> Self {
        RoleUser::new(user.id, user.user_name)
    }
}

/// Group record in the identity directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryGroup {
    #[serde(rename = "_id")]
    pub id: String,
    pub display_name: String,
    pub identity_provider: String,
}

impl From<DirectoryGroup> for RoleGroup {
    fn from(group: DirectoryGroup) -> Self {
        RoleGroup::new(group.id, group.display_name, group.identity_provider)
    }
}

/// Role definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRole {
    /// UUID, assigned on creation
    #[serde(rename = "_id")]
    pub id: String,

    /// Application that owns this role
    pub application_id: String,

    pub name: String,

    /// Permission names, unique, in insertion order
    #[serde(default)]
    pub permissions: Vec<String>,

    #[serde(default)]
    pub assigned_users: Vec<RoleUser>,

    #[serde(default)]
    pub assigned_groups: Vec<RoleGroup>,

    /// Bumped on every write
    #[serde(default)]
    pub version: i64,

    /// Audit fields
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl ApplicationRole {
    pub fn new(application_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            application_id: application_id.into(),
            name: name.into(),
            permissions: Vec::new(),
            assigned_users: Vec::new(),
            assigned_groups: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let added: Vec<String> = permissions.into_iter().map(Into::into).collect();
        self.add_permissions(&added);
        self
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// Add permissions not already granted, keeping first occurrence order.
    pub fn add_permissions(&mut self, permissions: &[String]) {
        for permission in permissions {
            if !self.has_permission(permission) {
                self.permissions.push(permission.clone());
            }
        }
    }

    pub fn remove_permissions(&mut self, permissions: &[String]) {
        let removed: HashSet<&str> = permissions.iter().map(String::as_str).collect();
        self.permissions.retain(|p| !removed.contains(p.as_str()));
    }

    pub fn has_user(&self, user_id: &str) -> bool {
        self.assigned_users.iter().any(|u| u.id == user_id)
    }

    /// Drop `removed` ids, then append `added` users that are not yet assigned.
    pub fn apply_user_changes(&mut self, added: Vec<RoleUser>, removed: &[String]) {
        let removed: HashSet<&str> = removed.iter().map(String::as_str).collect();
        self.assigned_users.retain(|u| !removed.contains(u.id.as_str()));

        for user in added {
            if !self.has_user(&user.id) {
                self.assigned_users.push(user);
            }
        }
    }

    /// Groups assigned from one identity provider.
    pub fn groups_from(&self, idp: &IdentityProvider) -> Vec<RoleGroup> {
        self.assigned_groups
            .iter()
            .filter(|g| g.identity_provider == idp.name())
            .cloned()
            .collect()
    }

    /// Same as [`apply_user_changes`](Self::apply_user_changes), scoped to one identity provider.
    pub fn apply_group_changes(
        &mut self,
        idp: &IdentityProvider,
        added: Vec<RoleGroup>,
        removed: &[String],
    ) {
        let removed: HashSet<&str> = removed.iter().map(String::as_str).collect();
        self.assigned_groups
            .retain(|g| g.identity_provider != idp.name() || !removed.contains(g.id.as_str()));

        for group in added {
            let assigned = self
                .assigned_groups
                .iter()
                .any(|g| g.id == group.id && g.identity_provider == group.identity_provider);
            if !assigned {
                self.assigned_groups.push(group);
            }
        }
    }

    /// Record a write: bump the version and the update timestamp.
    pub fn touch(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }
}

/// Changes to a role's name and permissions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub added_permissions: Vec<String>,
    pub removed_permissions: Vec<String>,
}

impl RoleUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.added_permissions.is_empty() && self.removed_permissions.is_empty()
    }

    /// Removals run after additions, so a permission in both lists ends up removed.
    pub fn apply_to(&self, role: &mut ApplicationRole) {
        if let Some(name) = &self.name {
            role.name = name.clone();
        }
        role.add_permissions(&self.added_permissions);
        role.remove_permissions(&self.removed_permissions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_new_role_has_uuid() {
        let role = ApplicationRole::new("app-1", "viewer");
        assert!(uuid::Uuid::parse_str(&role.id).is_ok());
        assert_eq!(role.version, 0);
        assert!(role.assigned_users.is_empty());
    }

    #[test]
    fn test_permissions_deduplicated_in_order() {
        let role = ApplicationRole::new("app-1", "editor")
            .with_permissions(["read", "write", "read"]);
        assert_eq!(role.permissions, strings(&["read", "write"]));
    }

    #[test]
    fn test_update_applies_name_and_permissions() {
        let mut role = ApplicationRole::new("app-1", "editor").with_permissions(["read", "write"]);
        let update = RoleUpdate {
            name: Some("author".to_string()),
            added_permissions: strings(&["publish", "read"]),
            removed_permissions: strings(&["write"]),
        };

        update.apply_to(&mut role);

        assert_eq!(role.name, "author");
        assert_eq!(role.permissions, strings(&["read", "publish"]));
    }

    #[test]
    fn test_user_changes_are_set_like() {
        let mut role = ApplicationRole::new("app-1", "viewer");
        role.apply_user_changes(
            vec![RoleUser::new("u1", "alice"), RoleUser::new("u2", "bob")],
            &[],
        );
        role.apply_user_changes(
            vec![RoleUser::new("u1", "alice"), RoleUser::new("u3", "carol")],
            &strings(&["u2", "u9"]),
        );

        let ids: Vec<&str> = role.assigned_users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u3"]);
    }

    #[test]
    fn test_group_changes_scoped_to_idp() {
        let local = IdentityProvider::Local;
        let google = IdentityProvider::from_name("Google");
        let mut role = ApplicationRole::new("app-1", "viewer");

        role.apply_group_changes(&local, vec![RoleGroup::new("g1", "Admins", "LOCAL")], &[]);
        role.apply_group_changes(&google, vec![RoleGroup::new("g1", "Admins", "Google")], &[]);
        role.apply_group_changes(&google, vec![], &strings(&["g1"]));

        assert_eq!(role.groups_from(&local).len(), 1);
        assert!(role.groups_from(&google).is_empty());
    }

    #[test]
    fn test_touch_bumps_version() {
        let mut role = ApplicationRole::new("app-1", "viewer");
        let created = role.updated_at;
        role.touch();
        assert_eq!(role.version, 1);
        assert!(role.updated_at >= created);
    }
}
