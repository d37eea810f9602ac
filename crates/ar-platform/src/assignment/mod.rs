//! Role Assignment
//!
//! Patch-based reconciliation of a role's assigned users and groups.
//!
//! A request carries an ordered list of operations. They are decoded once into
//! [`PatchOperation`] values, validated as a whole by [`reconcile`], and only
//! then handed to the role store as one add list and one remove list.

pub mod error;
pub mod patch;
pub mod reconciler;

pub use error::InvalidPatchError;
pub use patch::{AssignmentPatchRequest, PatchOp, PatchOperation, PatchOperationRequest, PatchValue};
pub use reconciler::{reconcile, AssignmentDelta};
