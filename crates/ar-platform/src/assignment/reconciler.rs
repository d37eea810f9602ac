//! Patch Reconciler
//!
//! Turns an ordered list of patch operations into the add and remove lists
//! the role store applies. Pure: no I/O, no knowledge of current membership.

use std::collections::HashSet;

use super::error::InvalidPatchError;
use super::patch::{PatchOp, PatchOperation};

/// Principals to add and remove, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentDelta {
    pub to_add: Vec<String>,
    pub to_remove: Vec<String>,
}

/// Validate every operation and split their values into add/remove lists.
///
/// Duplicate ids inside the lists are kept; the store treats membership as a set.
///
/// Deliberate extra rule: an id present in both lists fails with
/// `ConflictingPrincipal` rather than reaching the store. A patch that adds and
/// removes the same id is not well-formed, so nothing is dropped from one that is.
pub fn reconcile(operations: &[PatchOperation]) -> Result<AssignmentDelta, InvalidPatchError> {
    let mut delta = AssignmentDelta::default();

    for (index, operation) in operations.iter().enumerate() {
        match operation.op {
            PatchOp::Add | PatchOp::Remove if operation.values.is_empty() => {
                return Err(InvalidPatchError::MissingValues {
                    index,
                    op: operation.op,
                });
            }
            PatchOp::Add => delta.to_add.extend(operation.values.iter().cloned()),
            PatchOp::Remove => delta.to_remove.extend(operation.values.iter().cloned()),
            PatchOp::Replace => {
                return Err(InvalidPatchError::UnsupportedOperation {
                    index,
                    op: PatchOp::Replace.to_string(),
                });
            }
        }
    }

    let removing: HashSet<&str> = delta.to_remove.iter().map(String::as_str).collect();
    if let Some(id) = delta.to_add.iter().find(|id| removing.contains(id.as_str())) {
        return Err(InvalidPatchError::ConflictingPrincipal { id: id.clone() });
    }

    Ok(delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove_partition_values() {
        let ops = vec![
            PatchOperation::add("users", &["u1", "u2"]),
            PatchOperation::remove("users", &["u3"]),
        ];

        let delta = reconcile(&ops).unwrap();
        assert_eq!(delta.to_add, vec!["u1", "u2"]);
        assert_eq!(delta.to_remove, vec!["u3"]);
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let ops = vec![
            PatchOperation::add("users", &["b", "a"]),
            PatchOperation::add("users", &["c", "a"]),
        ];

        let delta = reconcile(&ops).unwrap();
        assert_eq!(delta.to_add, vec!["b", "a", "c", "a"]);
        assert!(delta.to_remove.is_empty());
    }

    #[test]
    fn test_empty_add_is_rejected() {
        let ops = vec![PatchOperation::add("users", &[])];
        assert_eq!(
            reconcile(&ops),
            Err(InvalidPatchError::MissingValues { index: 0, op: PatchOp::Add })
        );
    }

    #[test]
    fn test_empty_remove_after_valid_add_is_rejected() {
        let ops = vec![
            PatchOperation::add("groups", &["g1"]),
            PatchOperation::remove("groups", &[]),
        ];
        assert_eq!(
            reconcile(&ops),
            Err(InvalidPatchError::MissingValues { index: 1, op: PatchOp::Remove })
        );
    }

    #[test]
    fn test_replace_is_rejected() {
        let ops = vec![PatchOperation::new(
            PatchOp::Replace,
            "users",
            vec!["u1".to_string()],
        )];
        assert!(matches!(
            reconcile(&ops),
            Err(InvalidPatchError::UnsupportedOperation { index: 0, .. })
        ));
    }

    #[test]
    fn test_same_id_added_and_removed_is_rejected() {
        let ops = vec![
            PatchOperation::add("users", &["u1", "u2"]),
            PatchOperation::remove("users", &["u2"]),
        ];
        assert_eq!(
            reconcile(&ops),
            Err(InvalidPatchError::ConflictingPrincipal { id: "u2".to_string() })
        );
    }

    #[test]
    fn test_no_operations_is_an_empty_delta() {
        let delta = reconcile(&[]).unwrap();
        assert_eq!(delta, AssignmentDelta::default());
    }
}
