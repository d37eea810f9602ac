//! Assignment patch errors

use thiserror::Error;

use super::patch::PatchOp;

/// A patch request that cannot be applied.
///
/// Raised before the store is called, so a rejected request never mutates a role.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidPatchError {
    #[error("Operation {index}: '{op}' is not a supported patch operation")]
    UnsupportedOperation { index: usize, op: String },

    #[error("Operation {index}: '{op}' requires at least one value")]
    MissingValues { index: usize, op: PatchOp },

    #[error("Principal '{id}' cannot be both added and removed in one request")]
    ConflictingPrincipal { id: String },
}

impl InvalidPatchError {
    /// Error code reported to API clients.
    pub const CODE: &'static str = "INVALID_PATCH_OPERATION";
}
