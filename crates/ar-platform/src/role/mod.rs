//! Role Aggregate
//!
//! Application roles, their permissions and their user/group assignments.

pub mod entity;
pub mod error;
pub mod repository;
pub mod memory;
pub mod api;
pub mod operations;

// Re-export main types
pub use entity::{ApplicationRole, RoleUser, RoleGroup, RoleUpdate, DirectoryUser, DirectoryGroup};
pub use error::{ManagementError, PrincipalKind};
pub use repository::{RoleStore, MongoRoleStore};
pub use memory::InMemoryRoleStore;
pub use api::{RolesState, roles_router};
