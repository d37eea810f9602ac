//! Role store errors

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrincipalKind {
    User,
    Group,
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrincipalKind::User => f.write_str("User"),
            PrincipalKind::Group => f.write_str("Group"),
        }
    }
}

/// Failures reported by a [`RoleStore`](super::repository::RoleStore).
#[derive(Error, Debug)]
pub enum ManagementError {
    #[error("Role not found: {role_id}")]
    RoleNotFound { role_id: String },

    #[error("{kind} not found: {id}")]
    PrincipalNotFound { kind: PrincipalKind, id: String },

    #[error("Role {role_id} was modified concurrently")]
    Conflict { role_id: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

impl ManagementError {
    pub fn role_not_found(role_id: impl Into<String>) -> Self {
        Self::RoleNotFound { role_id: role_id.into() }
    }

    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::PrincipalNotFound {
            kind: PrincipalKind::User,
            id: id.into(),
        }
    }

    pub fn group_not_found(id: impl Into<String>) -> Self {
        Self::PrincipalNotFound {
            kind: PrincipalKind::Group,
            id: id.into(),
        }
    }

    pub fn conflict(role_id: impl Into<String>) -> Self {
        Self::Conflict { role_id: role_id.into() }
    }
}
