//! Role Repository
//!
//! `RoleStore` is the persistence contract used by the role use cases and
//! APIs. `MongoRoleStore` is the production implementation; writes are
//! guarded by the role's `version` so a concurrent writer surfaces as
//! [`ManagementError::Conflict`] instead of a lost update.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{Collection, Database, bson::doc};
use std::collections::{HashMap, HashSet};

use crate::directory::IdentityProvider;
use crate::role::entity::{
    ApplicationRole, DirectoryGroup, DirectoryUser, RoleGroup, RoleUpdate, RoleUser,
};
use crate::role::error::ManagementError;

pub type StoreResult<T> = std::result::Result<T, ManagementError>;

#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn create_role(&self, role: &ApplicationRole) -> StoreResult<()>;

    /// Fails with `RoleNotFound` when the role does not exist under `application_id`.
    async fn find_role(&self, application_id: &str, role_id: &str) -> StoreResult<ApplicationRole>;

    /// Roles sorted by name; `Some(0)` yields no roles.
    async fn list_roles(&self, application_id: &str, limit: Option<u32>) -> StoreResult<Vec<ApplicationRole>>;

    async fn update_role(
        &self,
        application_id: &str,
        role_id: &str,
        update: &RoleUpdate,
    ) -> StoreResult<ApplicationRole>;

    async fn delete_role(&self, application_id: &str, role_id: &str) -> StoreResult<()>;

    /// Add and remove users atomically, returning the resulting membership.
    async fn apply_user_assignment(
        &self,
        application_id: &str,
        role_id: &str,
        to_add: &[String],
        to_remove: &[String],
    ) -> StoreResult<Vec<RoleUser>>;

    /// Add and remove groups of one identity provider, returning that provider's membership.
    async fn apply_group_assignment(
        &self,
        application_id: &str,
        role_id: &str,
        idp: &IdentityProvider,
        to_add: &[String],
        to_remove: &[String],
    ) -> StoreResult<Vec<RoleGroup>>;

    async fn assigned_users(&self, application_id: &str, role_id: &str) -> StoreResult<Vec<RoleUser>> {
        Ok(self.find_role(application_id, role_id).await?.assigned_users)
    }

    async fn assigned_groups(
        &self,
        application_id: &str,
        role_id: &str,
        idp: &IdentityProvider,
    ) -> StoreResult<Vec<RoleGroup>> {
        Ok(self.find_role(application_id, role_id).await?.groups_from(idp))
    }
}

/// Look up each distinct id in `found`, keeping request order.
///
/// The first id with no directory record is reported through `missing`.
pub(crate) fn resolve_principals<T: Clone>(
    ids: &[String],
    found: &HashMap<String, T>,
    missing: impl Fn(&str) -> ManagementError,
) -> StoreResult<Vec<T>> {
    let mut seen = HashSet::new();
    let mut resolved = Vec::with_capacity(ids.len());

    for id in ids {
        if !seen.insert(id.as_str()) {
            continue;
        }
        let principal = found.get(id).ok_or_else(|| missing(id))?;
        resolved.push(principal.clone());
    }

    Ok(resolved)
}

/// MongoDB role store
pub struct MongoRoleStore {
    roles: Collection<ApplicationRole>,
    users: Collection<DirectoryUser>,
    groups: Collection<DirectoryGroup>,
}

impl MongoRoleStore {
    pub fn new(db: &Database) -> Self {
        Self {
            roles: db.collection("application_roles"),
            users: db.collection("users"),
            groups: db.collection("groups"),
        }
    }

    /// Replace the stored role if it is still at `expected_version`.
    async fn replace_versioned(&self, role: &ApplicationRole, expected_version: i64) -> StoreResult<()> {
        let result = self.roles
            .replace_one(
                doc! {
                    "_id": &role.id,
                    "applicationId": &role.application_id,
                    "version": expected_version,
                },
                role,
            )
            .await?;

        if result.matched_count == 0 {
            return Err(ManagementError::conflict(&role.id));
        }
        Ok(())
    }

    async fn lookup_users(&self, ids: &[String]) -> StoreResult<Vec<RoleUser>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self.users.find(doc! { "_id": { "$in": ids } }).await?;
        let records: Vec<DirectoryUser> = cursor.try_collect().await?;
        let found: HashMap<String, RoleUser> = records
            .into_iter()
            .map(|u| (u.id.clone(), RoleUser::from(u)))
            .collect();

        resolve_principals(ids, &found, |id| ManagementError::user_not_found(id))
    }

    async fn lookup_groups(&self, idp: &IdentityProvider, ids: &[String]) -> StoreResult<Vec<RoleGroup>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self.groups
            .find(doc! { "_id": { "$in": ids }, "identityProvider": idp.name() })
            .await?;
        let records: Vec<DirectoryGroup> = cursor.try_collect().await?;
        let found: HashMap<String, RoleGroup> = records
            .into_iter()
            .map(|g| (g.id.clone(), RoleGroup::from(g)))
            .collect();

        resolve_principals(ids, &found, |id| ManagementError::group_not_found(id))
    }
}

#[async_trait]
impl RoleStore for MongoRoleStore {
    async fn create_role(&self, role: &ApplicationRole) -> StoreResult<()> {
        self.roles.insert_one(role).await?;
        Ok(())
    }

    async fn find_role(&self, application_id: &str, role_id: &str) -> StoreResult<ApplicationRole> {
        self.roles
            .find_one(doc! { "_id": role_id, "applicationId": application_id })
            .await?
            .ok_or_else(|| ManagementError::role_not_found(role_id))
    }

    async fn list_roles(&self, application_id: &str, limit: Option<u32>) -> StoreResult<Vec<ApplicationRole>> {
        // MongoDB reads a limit of 0 as unlimited
        if limit == Some(0) {
            return Ok(Vec::new());
        }

        let mut find = self.roles
            .find(doc! { "applicationId": application_id })
            .sort(doc! { "name": 1 });
        if let Some(limit) = limit {
            find = find.limit(i64::from(limit));
        }
        let cursor = find.await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_role(
        &self,
        application_id: &str,
        role_id: &str,
        update: &RoleUpdate,
    ) -> StoreResult<ApplicationRole> {
        let mut role = self.find_role(application_id, role_id).await?;
        let expected_version = role.version;

        update.apply_to(&mut role);
        role.touch();
        self.replace_versioned(&role, expected_version).await?;

        Ok(role)
    }

    async fn delete_role(&self, application_id: &str, role_id: &str) -> StoreResult<()> {
        let result = self.roles
            .delete_one(doc! { "_id": role_id, "applicationId": application_id })
            .await?;

        if result.deleted_count == 0 {
            return Err(ManagementError::role_not_found(role_id));
        }
        Ok(())
    }

    async fn apply_user_assignment(
        &self,
        application_id: &str,
        role_id: &str,
        to_add: &[String],
        to_remove: &[String],
    ) -> StoreResult<Vec<RoleUser>> {
        let mut role = self.find_role(application_id, role_id).await?;
        let added = self.lookup_users(to_add).await?;
        let expected_version = role.version;

        role.apply_user_changes(added, to_remove);
        role.touch();
        self.replace_versioned(&role, expected_version).await?;

        Ok(role.assigned_users)
    }

    async fn apply_group_assignment(
        &self,
        application_id: &str,
        role_id: &str,
        idp: &IdentityProvider,
        to_add: &[String],
        to_remove: &[String],
    ) -> StoreResult<Vec<RoleGroup>> {
        let mut role = self.find_role(application_id, role_id).await?;
        let added = self.lookup_groups(idp, to_add).await?;
        let expected_version = role.version;

        role.apply_group_changes(idp, added, to_remove);
        role.touch();
        self.replace_versioned(&role, expected_version).await?;

        Ok(role.groups_from(idp))
    }
}
