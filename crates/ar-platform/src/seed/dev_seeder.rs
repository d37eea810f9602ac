//! Development Data Seeder
//!
//! Seeds a small directory and a demo role on startup in dev mode.
//!
//! Directory:
//!   Users:  u-alice (alice), u-bob (bob)
//!   Groups: g-admins (LOCAL), g-partners (Google)
//!   Role:   demo-app / viewer

use mongodb::bson::doc;
use mongodb::{Collection, Database};
use tracing::info;

use crate::directory::LOCAL_IDP;
use crate::role::entity::{ApplicationRole, DirectoryGroup, DirectoryUser};
use crate::role::error::ManagementError;
use crate::role::repository::{RoleStore, StoreResult};

pub const DEMO_APPLICATION_ID: &str = "demo-app";

pub fn dev_users() -> Vec<DirectoryUser> {
    vec![
        DirectoryUser { id: "u-alice".to_string(), user_name: "alice".to_string() },
        DirectoryUser { id: "u-bob".to_string(), user_name: "bob".to_string() },
    ]
}

pub fn dev_groups() -> Vec<DirectoryGroup> {
    vec![
        DirectoryGroup {
            id: "g-admins".to_string(),
            display_name: "Administrators".to_string(),
            identity_provider: LOCAL_IDP.to_string(),
        },
        DirectoryGroup {
            id: "g-partners".to_string(),
            display_name: "Partners".to_string(),
            identity_provider: "Google".to_string(),
        },
    ]
}

/// Development data seeder
pub struct DevDataSeeder {
    db: Option<Database>,
}

impl DevDataSeeder {
    /// Seeder for the MongoDB directory collections.
    pub fn new(db: Database) -> Self {
        Self { db: Some(db) }
    }

    /// Seeder that only creates the demo role; the in-memory store carries
    /// its own directory.
    pub fn roles_only() -> Self {
        Self { db: None }
    }

    /// Seed all development data
    pub async fn seed(&self, store: &dyn RoleStore) -> StoreResult<()> {
        info!("Seeding development data...");

        if let Some(db) = &self.db {
            self.seed_directory(db).await?;
        }
        self.seed_demo_role(store).await?;

        info!("Development data seeded");
        Ok(())
    }

    async fn seed_directory(&self, db: &Database) -> StoreResult<()> {
        let users: Collection<DirectoryUser> = db.collection("users");
        for user in dev_users() {
            users.replace_one(doc! { "_id": &user.id }, &user).upsert(true).await?;
        }

        let groups: Collection<DirectoryGroup> = db.collection("groups");
        for group in dev_groups() {
            groups.replace_one(doc! { "_id": &group.id }, &group).upsert(true).await?;
        }

        info!("Seeded directory: {} users, {} groups", dev_users().len(), dev_groups().len());
        Ok(())
    }

    async fn seed_demo_role(&self, store: &dyn RoleStore) -> StoreResult<()> {
        let existing = store.list_roles(DEMO_APPLICATION_ID, Some(1)).await?;
        if !existing.is_empty() {
            return Ok(());
        }

        let role = ApplicationRole::new(DEMO_APPLICATION_ID, "viewer").with_permissions(["read"]);
        match store.create_role(&role).await {
            Ok(()) => {
                info!("Created demo role: {}/{} ({})", DEMO_APPLICATION_ID, role.name, role.id);
                Ok(())
            }
            Err(ManagementError::Storage(msg)) => {
                tracing::warn!("Demo role not seeded: {}", msg);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
