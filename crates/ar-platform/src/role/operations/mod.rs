//! Role Operations
//!
//! Use cases for role management and role assignment.

pub mod assign_groups;
pub mod assign_users;
pub mod create;
pub mod delete;
pub mod update;

pub use assign_groups::{AssignGroupsCommand, AssignGroupsUseCase};
pub use assign_users::{AssignUsersCommand, AssignUsersUseCase};
pub use create::{CreateRoleCommand, CreateRoleUseCase};
pub use delete::{DeleteRoleCommand, DeleteRoleUseCase};
pub use update::{UpdateRoleCommand, UpdateRoleUseCase};
