//! In-memory role store for tests and development mode.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::directory::IdentityProvider;
use crate::role::entity::{
    ApplicationRole, DirectoryGroup, DirectoryUser, RoleGroup, RoleUpdate, RoleUser,
};
use crate::role::error::ManagementError;
use crate::role::repository::{resolve_principals, RoleStore, StoreResult};
use crate::seed::{dev_groups, dev_users};

/// Role store backed by process memory, with a small seeded directory.
///
/// Every mutation holds the write lock for its whole read-modify-write, so
/// assignments are applied atomically.
#[derive(Default)]
pub struct InMemoryRoleStore {
    roles: RwLock<HashMap<String, ApplicationRole>>,
    users: RwLock<HashMap<String, RoleUser>>,
    groups: RwLock<HashMap<(String, String), RoleGroup>>,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, id: &str, user_name: &str) -> Self {
        self.insert_user(DirectoryUser {
            id: id.to_string(),
            user_name: user_name.to_string(),
        });
        self
    }

    pub fn with_group(self, id: &str, display_name: &str, identity_provider: &str) -> Self {
        self.insert_group(DirectoryGroup {
            id: id.to_string(),
            display_name: display_name.to_string(),
            identity_provider: identity_provider.to_string(),
        });
        self
    }

    pub fn insert_user(&self, user: DirectoryUser) {
        self.users.write().insert(user.id.clone(), user.into());
    }

    pub fn insert_group(&self, group: DirectoryGroup) {
        let key = (group.identity_provider.clone(), group.id.clone());
        self.groups.write().insert(key, group.into());
    }

    /// Seed a few principals for local development.
    pub fn with_dev_directory(self) -> Self {
        dev_users().into_iter().for_each(|u| self.insert_user(u));
        dev_groups().into_iter().for_each(|g| self.insert_group(g));
        self
    }

    fn modify_role<T>(
        &self,
        application_id: &str,
        role_id: &str,
        change: impl FnOnce(&mut ApplicationRole) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut roles = self.roles.write();
        let stored = roles
            .get_mut(role_id)
            .filter(|r| r.application_id == application_id)
            .ok_or_else(|| ManagementError::role_not_found(role_id))?;

        // Work on a copy so a failed change leaves the stored role untouched.
        let mut role = stored.clone();
        let result = change(&mut role)?;
        role.touch();
        *stored = role;

        Ok(result)
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn create_role(&self, role: &ApplicationRole) -> StoreResult<()> {
        let mut roles = self.roles.write();
        if roles.contains_key(&role.id) {
            return Err(ManagementError::Storage(format!("Duplicate role id {}", role.id)));
        }
        roles.insert(role.id.clone(), role.clone());
        Ok(())
    }

    async fn find_role(&self, application_id: &str, role_id: &str) -> StoreResult<ApplicationRole> {
        self.roles
            .read()
            .get(role_id)
            .filter(|r| r.application_id == application_id)
            .cloned()
            .ok_or_else(|| ManagementError::role_not_found(role_id))
    }

    async fn list_roles(&self, application_id: &str, limit: Option<u32>) -> StoreResult<Vec<ApplicationRole>> {
        let mut roles: Vec<ApplicationRole> = self
            .roles
            .read()
            .values()
            .filter(|r| r.application_id == application_id)
            .cloned()
            .collect();

        roles.sort_by(|a, b| a.name.cmp(&b.name));
        if let Some(limit) = limit {
            roles.truncate(limit as usize);
        }
        Ok(roles)
    }

    async fn update_role(
        &self,
        application_id: &str,
        role_id: &str,
        update: &RoleUpdate,
    ) -> StoreResult<ApplicationRole> {
        self.modify_role(application_id, role_id, |role| {
            update.apply_to(role);
            Ok(())
        })?;
        self.find_role(application_id, role_id).await
    }

    async fn delete_role(&self, application_id: &str, role_id: &str) -> StoreResult<()> {
        let mut roles = self.roles.write();
        match roles.get(role_id) {
            Some(role) if role.application_id == application_id => {
                roles.remove(role_id);
                Ok(())
            }
            _ => Err(ManagementError::role_not_found(role_id)),
        }
    }

    async fn apply_user_assignment(
        &self,
        application_id: &str,
        role_id: &str,
        to_add: &[String],
        to_remove: &[String],
    ) -> StoreResult<Vec<RoleUser>> {
        let directory = self.users.read().clone();

        self.modify_role(application_id, role_id, |role| {
            let added = resolve_principals(to_add, &directory, |id| ManagementError::user_not_found(id))?;
            role.apply_user_changes(added, to_remove);
            Ok(role.assigned_users.clone())
        })
    }

    async fn apply_group_assignment(
        &self,
        application_id: &str,
        role_id: &str,
        idp: &IdentityProvider,
        to_add: &[String],
        to_remove: &[String],
    ) -> StoreResult<Vec<RoleGroup>> {
        let directory: HashMap<String, RoleGroup> = self
            .groups
            .read()
            .iter()
            .filter(|((provider, _), _)| provider == idp.name())
            .map(|((_, id), group)| (id.clone(), group.clone()))
            .collect();

        self.modify_role(application_id, role_id, |role| {
            let added = resolve_principals(to_add, &directory, |id| ManagementError::group_not_found(id))?;
            role.apply_group_changes(idp, added, to_remove);
            Ok(role.groups_from(idp))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_role_lookup_is_scoped_to_application() {
        let store = InMemoryRoleStore::new();
        let role = ApplicationRole::new("app-1", "viewer");
        store.create_role(&role).await.unwrap();

        assert!(store.find_role("app-1", &role.id).await.is_ok());
        assert!(matches!(
            store.find_role("app-2", &role.id).await,
            Err(ManagementError::RoleNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_user_leaves_role_unchanged() {
        let store = InMemoryRoleStore::new().with_user("u1", "alice");
        let role = ApplicationRole::new("app-1", "viewer");
        store.create_role(&role).await.unwrap();

        let result = store
            .apply_user_assignment("app-1", &role.id, &ids(&["u1", "ghost"]), &[])
            .await;

        assert!(matches!(result, Err(ManagementError::PrincipalNotFound { .. })));
        let stored = store.find_role("app-1", &role.id).await.unwrap();
        assert!(stored.assigned_users.is_empty());
        assert_eq!(stored.version, 0);
    }

    #[tokio::test]
    async fn test_group_must_exist_in_requested_idp() {
        let store = InMemoryRoleStore::new().with_group("g1", "Admins", "LOCAL");
        let role = ApplicationRole::new("app-1", "viewer");
        store.create_role(&role).await.unwrap();

        let google = IdentityProvider::from_name("Google");
        let result = store
            .apply_group_assignment("app-1", &role.id, &google, &ids(&["g1"]), &[])
            .await;
        assert!(matches!(result, Err(ManagementError::PrincipalNotFound { .. })));

        let groups = store
            .apply_group_assignment("app-1", &role.id, &IdentityProvider::Local, &ids(&["g1"]), &[])
            .await
            .unwrap();
        assert_eq!(groups, vec![RoleGroup::new("g1", "Admins", "LOCAL")]);
    }

    #[tokio::test]
    async fn test_list_roles_sorted_and_limited() {
        let store = InMemoryRoleStore::new();
        for name in ["writer", "admin", "reader"] {
            store.create_role(&ApplicationRole::new("app-1", name)).await.unwrap();
        }
        store.create_role(&ApplicationRole::new("app-2", "other")).await.unwrap();

        let roles = store.list_roles("app-1", Some(2)).await.unwrap();
        let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["admin", "reader"]);

        assert!(store.list_roles("app-1", Some(0)).await.unwrap().is_empty());
    }
}
