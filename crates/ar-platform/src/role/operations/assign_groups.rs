//! Assign Groups to Role Use Case

use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::assignment::{reconcile, PatchOperation};
use crate::directory::{IdentityProvider, PrincipalReference, ReferenceResolver};
use crate::role::repository::RoleStore;
use crate::usecase::{ExecutionContext, UseCaseResult};

/// Command for patching a role's groups from one identity provider.
#[derive(Debug, Clone)]
pub struct AssignGroupsCommand {
    pub application_id: String,
    pub role_id: String,
    pub tenant_domain: String,
    pub identity_provider: IdentityProvider,
    pub operations: Vec<PatchOperation>,
}

/// Use case for patching a role's assigned groups.
pub struct AssignGroupsUseCase {
    store: Arc<dyn RoleStore>,
    resolver: Arc<ReferenceResolver>,
}

impl AssignGroupsUseCase {
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
            idp = %command.identity_provider,
        )
    )]
    pub async fn execute(
        &self,
        command: AssignGroupsCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<Vec<PrincipalReference>> {
        let delta = match reconcile(&command.operations) {
            Ok(delta) => delta,
            Err(e) => {
                debug!(error = %e, "Rejected group assignment patch");
                return UseCaseResult::failure(e.into());
            }
        };

        let groups = match self
            .store
            .apply_group_assignment(
                &command.application_id,
                &command.role_id,
                &command.identity_provider,
                &delta.to_add,
                &delta.to_remove,
            )
            .await
        {
            Ok(groups) => groups,
            Err(e) => return UseCaseResult::failure(e.into()),
        };

        info!(
            added = delta.to_add.len(),
            removed = delta.to_remove.len(),
            assigned = groups.len(),
            "Role group assignment updated"
        );

        UseCaseResult::success(self.resolver.resolve_groups(&groups, &command.tenant_domain))
    }
}
