//! Delete Role Use Case

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::role::repository::RoleStore;
use crate::usecase::{ExecutionContext, UseCaseResult};

/// Command for deleting a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRoleCommand {
    pub application_id: String,
    pub role_id: String,
}

/// Use case for deleting a role.
pub struct DeleteRoleUseCase {
    store: Arc<dyn RoleStore>,
}

impl DeleteRoleUseCase {
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
    pub async fn execute(&self, command: DeleteRoleCommand, ctx: ExecutionContext) -> UseCaseResult<()> {
        match self.store.delete_role(&command.application_id, &command.role_id).await {
            Ok(()) => {
                info!("Role deleted");
                UseCaseResult::success(())
            }
            Err(e) => UseCaseResult::failure(e.into()),
        }
    }
}
