use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A principal as shown in assignment responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PrincipalReference {
    /// Principal id
    pub value: String,

    /// User name or group display name
    pub display: String,

    /// Directory URI for the principal, absent for external groups and blank ids
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}
