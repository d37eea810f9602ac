//! Patch operation wire types and their decoded form.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use super::error::InvalidPatchError;

/// Kind of a patch operation.
///
/// `Replace` decodes successfully but is rejected by the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
}

impl PatchOp {
    /// Case-insensitive decode of the wire `op` field.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("add") {
            Some(PatchOp::Add)
        } else if raw.eq_ignore_ascii_case("remove") {
            Some(PatchOp::Remove)
        } else if raw.eq_ignore_ascii_case("replace") {
            Some(PatchOp::Replace)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PatchOp::Add => "add",
            PatchOp::Remove => "remove",
            PatchOp::Replace => "replace",
        }
    }
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One principal identifier, either `"id"` or `{"value": "id"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum PatchValue {
    Plain(String),
    Object { value: String },
}

impl PatchValue {
    pub fn into_id(self) -> String {
        match self {
            PatchValue::Plain(id) => id,
            PatchValue::Object { value } => value,
        }
    }
}

/// Patch operation as received on the wire
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatchOperationRequest {
    /// add, remove or replace (case-insensitive)
    pub op: String,

    /// Target field, e.g. "users" or "groups". Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Principal identifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Vec<PatchValue>>,
}

/// Assigned-users / assigned-groups patch request body
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentPatchRequest {
    #[serde(default)]
    pub operations: Vec<PatchOperationRequest>,
}

impl AssignmentPatchRequest {
    /// Decode every operation, failing on the first unknown `op`.
    pub fn into_operations(self) -> Result<Vec<PatchOperation>, InvalidPatchError> {
        self.operations
            .into_iter()
            .enumerate()
            .map(|(index, raw)| PatchOperation::decode(index, raw))
            .collect()
    }
}

/// A decoded patch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: Option<String>,
    pub values: Vec<String>,
}

impl PatchOperation {
    pub fn new(op: PatchOp, path: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            op,
            path: Some(path.into()),
            values,
        }
    }

    pub fn add(path: impl Into<String>, values: &[&str]) -> Self {
        Self::new(PatchOp::Add, path, values.iter().map(|v| v.to_string()).collect())
    }

    pub fn remove(path: impl Into<String>, values: &[&str]) -> Self {
        Self::new(PatchOp::Remove, path, values.iter().map(|v| v.to_string()).collect())
    }

    fn decode(index: usize, raw: PatchOperationRequest) -> Result<Self, InvalidPatchError> {
        let op = PatchOp::parse(&raw.op).ok_or_else(|| InvalidPatchError::UnsupportedOperation {
            index,
            op: raw.op.clone(),
        })?;

        Ok(Self {
            op,
            path: raw.path,
            values: raw
                .value
                .unwrap_or_default()
                .into_iter()
                .map(PatchValue::into_id)
                .collect(),
        })
    }
}
