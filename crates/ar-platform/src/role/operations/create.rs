//! Create Role Use Case

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::role::entity::ApplicationRole;
use crate::role::repository::RoleStore;
use crate::usecase::{error::VALIDATION_ERROR, ExecutionContext, UseCaseError, UseCaseResult};

/// Command for creating a new role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleCommand {
    pub application_id: String,

    /// Role name, must not be blank
    pub name: String,

    /// Permission names; duplicates are dropped
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Use case for creating a new role.
pub struct CreateRoleUseCase {
    store: Arc<dyn RoleStore>,
}

impl CreateRoleUseCase {
    pub fn new(store: Arc<dyn RoleStore>) -> Self {
        Self { store }
    }

    #[instrument(
        skip_all,
        fields(
            execution_id = %ctx.execution_id,
            correlation_id = %ctx.correlation_id,
            application_id = %command.application_id,
        )
    )]
    pub async fn execute(
        &self,
        command: CreateRoleCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<ApplicationRole> {
        let name = command.name.trim();
        if name.is_empty() {
            return UseCaseResult::failure(UseCaseError::validation(
                VALIDATION_ERROR,
                "Role name is required",
            ));
        }

        if let Some(blank) = command.permissions.iter().position(|p| p.trim().is_empty()) {
            return UseCaseResult::failure(UseCaseError::validation(
                VALIDATION_ERROR,
                format!("Permission {} has an empty name", blank),
            ));
        }

        let role = ApplicationRole::new(&command.application_id, name)
            .with_permissions(command.permissions.iter().map(|p| p.trim()));

        if let Err(e) = self.store.create_role(&role).await {
            return UseCaseResult::failure(e.into());
        }

        info!(role_id = %role.id, name = %role.name, "Role created");
        UseCaseResult::success(role)
    }
}
