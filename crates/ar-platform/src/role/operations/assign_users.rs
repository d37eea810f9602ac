//! Assign Users to Role Use Case
//!
//! Applies a patch of add/remove operations to a role's assigned users and
//! returns the resulting membership with directory references.

use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::assignment::{reconcile, PatchOperation};
use crate::directory::{PrincipalReference, ReferenceResolver};
use crate::role::repository::RoleStore;
use crate::usecase::{ExecutionContext, UseCaseResult};

/// Command for patching a role's assigned users.
#[derive(Debug, Clone)]
pub struct AssignUsersCommand {
    pub application_id: String,
    pub role_id: String,
    pub tenant_domain: String,
    pub operations: Vec<PatchOperation>,
}

/// Use case for patching a role's assigned users.
pub struct AssignUsersUseCase {
    store: Arc<dyn RoleStore>,
    resolver: Arc<ReferenceResolver>,
}

impl AssignUsersUseCase {
    pub fn new(store: Arc<dyn RoleStore>, resolver: Arc<ReferenceResolver>) -> Self {
        Self { store, resolver }
    }

    #[instrument(
        skip_all,
        fields(
            execution_id = %ctx.execution_id,
            correlation_id = %ctx.correlation_id,
            tenant = %command.tenant_domain,
            application_id = %command.application_id,
            role_id = %command.role_id,
        )
    )]
    pub async fn execute(
        &self,
        command: AssignUsersCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<Vec<PrincipalReference>> {
        let delta = match reconcile(&command.operations) {
            Ok(delta) => delta,
            Err(e) => {
                debug!(error = %e, "Rejected user assignment patch");
                return UseCaseResult::failure(e.into());
            }
        };

        let users = match self
            .store
            .apply_user_assignment(
                &command.application_id,
                &command.role_id,
                &delta.to_add,
                &delta.to_remove,
            )
            .await
        {
            Ok(users) => users,
            Err(e) => return UseCaseResult::failure(e.into()),
        };

        info!(
            added = delta.to_add.len(),
            removed = delta.to_remove.len(),
            assigned = users.len(),
            "Role user assignment updated"
        );

        UseCaseResult::success(self.resolver.resolve_users(&users, &command.tenant_domain))
    }
}
