//! Update Role Use Case

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::role::entity::{ApplicationRole, RoleUpdate};
use crate::role::repository::RoleStore;
use crate::usecase::{error::VALIDATION_ERROR, ExecutionContext, UseCaseError, UseCaseResult};

/// Command for renaming a role and changing its permissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleCommand {
    pub application_id: String,
    pub role_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub added_permissions: Vec<String>,

    #[serde(default)]
    pub removed_permissions: Vec<String>,
}

/// Use case for updating a role.
pub struct UpdateRoleUseCase {
    store: Arc<dyn RoleStore>,
}

impl UpdateRoleUseCase {
    pub fn new(store: Arc<dyn RoleStore>) -> Self {
        Self { store }
    }

    #[instrument(
        skip_all,
        fields(
            execution_id = %ctx.execution_id,
            correlation_id = %ctx.correlation_id,
            application_id = %command.application_id,
            role_id = %command.role_id,
        )
    )]
    pub async fn execute(
        &self,
        command: UpdateRoleCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<ApplicationRole> {
        let name = match command.name.as_deref().map(str::trim) {
            Some("") => {
                return UseCaseResult::failure(UseCaseError::validation(
                    VALIDATION_ERROR,
                    "Role name cannot be blank",
                ));
            }
            other => other.map(String::from),
        };

        let update = RoleUpdate {
            name,
            added_permissions: command.added_permissions,
            removed_permissions: command.removed_permissions,
        };

        if update.is_empty() {
            return UseCaseResult::failure(UseCaseError::validation(
                VALIDATION_ERROR,
                "At least one of name, addedPermissions or removedPermissions is required",
            ));
        }

        match self.store.update_role(&command.application_id, &command.role_id, &update).await {
            Ok(role) => {
                info!(version = role.version, "Role updated");
                UseCaseResult::success(role)
            }
            Err(e) => UseCaseResult::failure(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::memory::InMemoryRoleStore;

    fn command(role_id: &str) -> UpdateRoleCommand {
        UpdateRoleCommand {
            application_id: "app-1".to_string(),
            role_id: role_id.to_string(),
            name: None,
            added_permissions: vec![],
            removed_permissions: vec![],
        }
    }

    #[tokio::test]
    async fn test_empty_update_rejected() {
        let use_case = UpdateRoleUseCase::new(Arc::new(InMemoryRoleStore::new()));
        let err = use_case.execute(command("r1"), ExecutionContext::create()).await.unwrap_err();
        assert_eq!(err.http_status_code(), 400);
    }

    #[tokio::test]
    async fn test_rename_and_permissions() {
        let store = Arc::new(InMemoryRoleStore::new());
        let role = ApplicationRole::new("app-1", "editor").with_permissions(["read", "write"]);
        store.create_role(&role).await.unwrap();

        let use_case = UpdateRoleUseCase::new(store);
        let mut cmd = command(&role.id);
        cmd.name = Some("author".to_string());
        cmd.added_permissions = vec!["publish".to_string()];
        cmd.removed_permissions = vec!["write".to_string()];

        let updated = use_case.execute(cmd, ExecutionContext::create()).await.unwrap();
        assert_eq!(updated.name, "author");
        assert_eq!(updated.permissions, vec!["read", "publish"]);
        assert_eq!(updated.version, 1);
    }

    #[tokio::test]
    async fn test_unknown_role_is_not_found() {
        let use_case = UpdateRoleUseCase::new(Arc::new(InMemoryRoleStore::new()));
        let mut cmd = command("missing");
        cmd.name = Some("x".to_string());

        let err = use_case.execute(cmd, ExecutionContext::create()).await.unwrap_err();
        assert_eq!(err.code(), "ROLE_NOT_FOUND");
    }
}
