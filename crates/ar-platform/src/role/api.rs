//! Application Roles API
//!
//! REST endpoints for application role management and role assignment.

use axum::{
    extract::{State, Path, Query},
    http::{header, StatusCode},
    Json,
};
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa::{ToSchema, IntoParams};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::assignment::AssignmentPatchRequest;
use crate::directory::{IdentityProvider, PrincipalReference, ReferenceResolver, LOCAL_IDP};
use crate::role::entity::ApplicationRole;
use crate::role::operations::{
    AssignGroupsCommand, AssignGroupsUseCase, AssignUsersCommand, AssignUsersUseCase,
    CreateRoleCommand, CreateRoleUseCase, DeleteRoleCommand, DeleteRoleUseCase,
    UpdateRoleCommand, UpdateRoleUseCase,
};
use crate::role::repository::RoleStore;
use crate::shared::api_common::LimitParams;
use crate::shared::error::{ErrorResponse, PlatformError};
use crate::shared::request_context::TenantDomain;
use crate::usecase::{ExecutionContext, UseCaseResult};

/// Mount point of [`roles_router`].
pub const APPLICATIONS_BASE_PATH: &str = "/api/server/v1/applications";

/// Permission reference
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PermissionDto {
    pub name: String,
}

/// Create role request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    /// Role name
    pub name: String,

    /// Initial permissions
    #[serde(default)]
    pub permissions: Vec<PermissionDto>,
}

/// Update role request. At least one field is required.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub name: Option<String>,

    #[serde(default)]
    pub added_permissions: Vec<PermissionDto>,

    #[serde(default)]
    pub removed_permissions: Vec<PermissionDto>,
}

/// Role response DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub application_id: String,
    pub permissions: Vec<PermissionDto>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ApplicationRole> for RoleResponse {
    fn from(r: ApplicationRole) -> Self {
        Self {
            id: r.id,
            name: r.name,
            application_id: r.application_id,
            permissions: r.permissions.into_iter().map(|name| PermissionDto { name }).collect(),
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}

/// Role list response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleListResponse {
    pub roles: Vec<RoleResponse>,
    pub total: usize,
}

/// Assigned users of a role
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignedUsersResponse {
    pub assigned_users: Vec<PrincipalReference>,
}

/// Assigned groups of a role, for one identity provider
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignedGroupsResponse {
    pub assigned_groups: Vec<PrincipalReference>,
}

/// Identity provider selector for group endpoints
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GroupsQuery {
    /// Identity provider name, defaults to LOCAL
    pub idp: Option<String>,
}

impl GroupsQuery {
    fn identity_provider(&self) -> IdentityProvider {
        IdentityProvider::from_name(self.idp.as_deref().unwrap_or(LOCAL_IDP))
    }
}

/// Roles service state
#[derive(Clone)]
pub struct RolesState {
    pub store: Arc<dyn RoleStore>,
    pub resolver: Arc<ReferenceResolver>,
    pub create_use_case: Arc<CreateRoleUseCase>,
    pub update_use_case: Arc<UpdateRoleUseCase>,
    pub delete_use_case: Arc<DeleteRoleUseCase>,
    pub assign_users_use_case: Arc<AssignUsersUseCase>,
    pub assign_groups_use_case: Arc<AssignGroupsUseCase>,
}

impl RolesState {
    pub fn new(store: Arc<dyn RoleStore>, resolver: Arc<ReferenceResolver>) -> Self {
        Self {
            create_use_case: Arc::new(CreateRoleUseCase::new(store.clone())),
            update_use_case: Arc::new(UpdateRoleUseCase::new(store.clone())),
            delete_use_case: Arc::new(DeleteRoleUseCase::new(store.clone())),
            assign_users_use_case: Arc::new(AssignUsersUseCase::new(store.clone(), resolver.clone())),
            assign_groups_use_case: Arc::new(AssignGroupsUseCase::new(store.clone(), resolver.clone())),
            store,
            resolver,
        }
    }
}

fn permission_names(permissions: Vec<PermissionDto>) -> Vec<String> {
    permissions.into_iter().map(|p| p.name).collect()
}

/// Create a new role
#[utoipa::path(
    post,
    path = "/{application_id}/roles",
    tag = "application-roles",
    operation_id = "createApplicationRole",
    params(
        ("application_id" = String, Path, description = "Application ID")
    ),
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Role created", body = RoleResponse),
        (status = 400, description = "Validation error", body = ErrorResponse)
    )
)]
pub async fn create_role(
    State(state): State<RolesState>,
    ctx: ExecutionContext,
    Path(application_id): Path<String>,
    Json(req): Json<CreateRoleRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<RoleResponse>), PlatformError> {
    let command = CreateRoleCommand {
        application_id: application_id.clone(),
        name: req.name,
        permissions: permission_names(req.permissions),
    };

    match state.create_use_case.execute(command, ctx).await {
        UseCaseResult::Success(role) => {
            let location = format!("{}/{}/roles/{}", APPLICATIONS_BASE_PATH, application_id, role.id);
            Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(role.into())))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// List roles of an application
#[utoipa::path(
    get,
    path = "/{application_id}/roles",
    tag = "application-roles",
    operation_id = "listApplicationRoles",
    params(
        ("application_id" = String, Path, description = "Application ID"),
        LimitParams
    ),
    responses(
        (status = 200, description = "List of roles", body = RoleListResponse),
        (status = 400, description = "Invalid limit", body = ErrorResponse)
    )
)]
pub async fn list_roles(
    State(state): State<RolesState>,
    Path(application_id): Path<String>,
    Query(params): Query<LimitParams>,
) -> Result<Json<RoleListResponse>, PlatformError> {
    if params.limit == Some(0) {
        return Err(PlatformError::validation("limit must be at least 1"));
    }

    let roles: Vec<RoleResponse> = state.store
        .list_roles(&application_id, params.limit)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    let total = roles.len();
    Ok(Json(RoleListResponse { roles, total }))
}

/// Get role by ID
#[utoipa::path(
    get,
    path = "/{application_id}/roles/{role_id}",
    tag = "application-roles",
    operation_id = "getApplicationRole",
    params(
        ("application_id" = String, Path, description = "Application ID"),
        ("role_id" = String, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Role found", body = RoleResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    )
)]
pub async fn get_role(
    State(state): State<RolesState>,
    Path((application_id, role_id)): Path<(String, String)>,
) -> Result<Json<RoleResponse>, PlatformError> {
    let role = state.store.find_role(&application_id, &role_id).await?;
    Ok(Json(role.into()))
}

/// Rename a role or change its permissions
#[utoipa::path(
    patch,
    path = "/{application_id}/roles/{role_id}",
    tag = "application-roles",
    operation_id = "updateApplicationRole",
    params(
        ("application_id" = String, Path, description = "Application ID"),
        ("role_id" = String, Path, description = "Role ID")
    ),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = RoleResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse),
        (status = 409, description = "Concurrent modification", body = ErrorResponse)
    )
)]
pub async fn update_role(
    State(state): State<RolesState>,
    ctx: ExecutionContext,
    Path((application_id, role_id)): Path<(String, String)>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<RoleResponse>, PlatformError> {
    let command = UpdateRoleCommand {
        application_id,
        role_id,
        name: req.name,
        added_permissions: permission_names(req.added_permissions),
        removed_permissions: permission_names(req.removed_permissions),
    };

    match state.update_use_case.execute(command, ctx).await {
        UseCaseResult::Success(role) => Ok(Json(role.into())),
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Delete a role
#[utoipa::path(
    delete,
    path = "/{application_id}/roles/{role_id}",
    tag = "application-roles",
    operation_id = "deleteApplicationRole",
    params(
        ("application_id" = String, Path, description = "Application ID"),
        ("role_id" = String, Path, description = "Role ID")
    ),
    responses(
        (status = 204, description = "Role deleted"),
        (status = 404, description = "Role not found", body = ErrorResponse)
    )
)]
pub async fn delete_role(
    State(state): State<RolesState>,
    ctx: ExecutionContext,
    Path((application_id, role_id)): Path<(String, String)>,
) -> Result<StatusCode, PlatformError> {
    let command = DeleteRoleCommand { application_id, role_id };

    match state.delete_use_case.execute(command, ctx).await {
        UseCaseResult::Success(()) => Ok(StatusCode::NO_CONTENT),
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// List users assigned to a role
#[utoipa::path(
    get,
    path = "/{application_id}/roles/{role_id}/assigned-users",
    tag = "application-roles",
    operation_id = "getRoleAssignedUsers",
    params(
        ("application_id" = String, Path, description = "Application ID"),
        ("role_id" = String, Path, description = "Role ID"),
        ("X-Tenant-Domain" = Option<String>, Header, description = "Tenant domain, defaults to carbon.super")
    ),
    responses(
        (status = 200, description = "Assigned users", body = AssignedUsersResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    )
)]
pub async fn get_assigned_users(
    State(state): State<RolesState>,
    tenant: TenantDomain,
    Path((application_id, role_id)): Path<(String, String)>,
) -> Result<Json<AssignedUsersResponse>, PlatformError> {
    let users = state.store.assigned_users(&application_id, &role_id).await?;

    Ok(Json(AssignedUsersResponse {
        assigned_users: state.resolver.resolve_users(&users, tenant.as_str()),
    }))
}

/// Add or remove users assigned to a role
#[utoipa::path(
    patch,
    path = "/{application_id}/roles/{role_id}/assigned-users",
    tag = "application-roles",
    operation_id = "patchRoleAssignedUsers",
    params(
        ("application_id" = String, Path, description = "Application ID"),
        ("role_id" = String, Path, description = "Role ID"),
        ("X-Tenant-Domain" = Option<String>, Header, description = "Tenant domain, defaults to carbon.super")
    ),
    request_body = AssignmentPatchRequest,
    responses(
        (status = 200, description = "Resulting assigned users", body = AssignedUsersResponse),
        (status = 400, description = "Invalid patch operation", body = ErrorResponse),
        (status = 404, description = "Role or user not found", body = ErrorResponse),
        (status = 409, description = "Concurrent modification", body = ErrorResponse)
    )
)]
pub async fn patch_assigned_users(
    State(state): State<RolesState>,
    tenant: TenantDomain,
    ctx: ExecutionContext,
    Path((application_id, role_id)): Path<(String, String)>,
    Json(req): Json<AssignmentPatchRequest>,
) -> Result<Json<AssignedUsersResponse>, PlatformError> {
    let command = AssignUsersCommand {
        application_id,
        role_id,
        tenant_domain: tenant.0,
        operations: req.into_operations()?,
    };

    match state.assign_users_use_case.execute(command, ctx).await {
        UseCaseResult::Success(assigned_users) => Ok(Json(AssignedUsersResponse { assigned_users })),
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// List groups assigned to a role
#[utoipa::path(
    get,
    path = "/{application_id}/roles/{role_id}/assigned-groups",
    tag = "application-roles",
    operation_id = "getRoleAssignedGroups",
    params(
        ("application_id" = String, Path, description = "Application ID"),
        ("role_id" = String, Path, description = "Role ID"),
        ("X-Tenant-Domain" = Option<String>, Header, description = "Tenant domain, defaults to carbon.super"),
        GroupsQuery
    ),
    responses(
        (status = 200, description = "Assigned groups", body = AssignedGroupsResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    )
)]
pub async fn get_assigned_groups(
    State(state): State<RolesState>,
    tenant: TenantDomain,
    Path((application_id, role_id)): Path<(String, String)>,
    Query(query): Query<GroupsQuery>,
) -> Result<Json<AssignedGroupsResponse>, PlatformError> {
    let idp = query.identity_provider();
    let groups = state.store.assigned_groups(&application_id, &role_id, &idp).await?;

    Ok(Json(AssignedGroupsResponse {
        assigned_groups: state.resolver.resolve_groups(&groups, tenant.as_str()),
    }))
}

/// Add or remove groups assigned to a role
#[utoipa::path(
    patch,
    path = "/{application_id}/roles/{role_id}/assigned-groups",
    tag = "application-roles",
    operation_id = "patchRoleAssignedGroups",
    params(
        ("application_id" = String, Path, description = "Application ID"),
        ("role_id" = String, Path, description = "Role ID"),
        ("X-Tenant-Domain" = Option<String>, Header, description = "Tenant domain, defaults to carbon.super"),
        GroupsQuery
    ),
    request_body = AssignmentPatchRequest,
    responses(
        (status = 200, description = "Resulting assigned groups", body = AssignedGroupsResponse),
        (status = 400, description = "Invalid patch operation", body = ErrorResponse),
        (status = 404, description = "Role or group not found", body = ErrorResponse),
        (status = 409, description = "Concurrent modification", body = ErrorResponse)
    )
)]
pub async fn patch_assigned_groups(
    State(state): State<RolesState>,
    tenant: TenantDomain,
    ctx: ExecutionContext,
    Path((application_id, role_id)): Path<(String, String)>,
    Query(query): Query<GroupsQuery>,
    Json(req): Json<AssignmentPatchRequest>,
) -> Result<Json<AssignedGroupsResponse>, PlatformError> {
    let command = AssignGroupsCommand {
        application_id,
        role_id,
        tenant_domain: tenant.0,
        identity_provider: query.identity_provider(),
        operations: req.into_operations()?,
    };

    match state.assign_groups_use_case.execute(command, ctx).await {
        UseCaseResult::Success(assigned_groups) => Ok(Json(AssignedGroupsResponse { assigned_groups })),
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Create the application roles router
pub fn roles_router(state: RolesState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(create_role, list_roles))
        .routes(routes!(get_role, update_role, delete_role))
        .routes(routes!(get_assigned_users, patch_assigned_users))
        .routes(routes!(get_assigned_groups, patch_assigned_groups))
        .with_state(state)
}
