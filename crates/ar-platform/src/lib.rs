//! AppRole Platform
//!
//! Application role management with SCIM-style assignment patches:
//! - Patch reconciliation into add/remove sets
//! - Directory reference resolution (`$ref` URIs, tenant aware)
//! - Role CRUD with optimistic versioning
//! - Use Case pattern with categorized errors
//!
//! ## Module Organization
//!
//! - `assignment` - patch parsing and reconciliation
//! - `directory` - identity providers, URL building and reference resolution
//! - `role` - the role aggregate (`entity`, `repository`, `api`, `operations`)

pub mod assignment;
pub mod directory;
pub mod role;

// Shared infrastructure
pub mod shared;

// Cross-cutting concerns
pub mod usecase;
pub mod seed;

// Re-export common types from shared
pub use shared::error::{PlatformError, Result};

// Re-export use case infrastructure
pub use usecase::{UseCaseResult, UseCaseError, ExecutionContext};

// Re-export main types for convenience
pub use assignment::{reconcile, AssignmentDelta, AssignmentPatchRequest, InvalidPatchError, PatchOp, PatchOperation};
pub use directory::{IdentityProvider, PrincipalReference, ReferenceResolver, ServerUrlBuilder, DirectoryUrlProvider};
pub use role::entity::{ApplicationRole, RoleUser, RoleGroup, RoleUpdate};
pub use role::error::ManagementError;
pub use role::repository::{RoleStore, MongoRoleStore};
pub use role::memory::InMemoryRoleStore;
pub use role::api::{roles_router, RolesState, APPLICATIONS_BASE_PATH};
pub use seed::DevDataSeeder;
