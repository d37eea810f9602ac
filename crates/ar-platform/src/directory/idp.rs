//! Identity providers and tenants

use std::fmt;

/// Name of the server's own identity provider.
pub const LOCAL_IDP: &str = "LOCAL";

/// Tenant whose URLs carry no `/t/<tenant>` segment.
pub const SUPER_TENANT_DOMAIN: &str = "carbon.super";

/// Where a group comes from. Only local groups are addressable in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdentityProvider {
    #[default]
    Local,
    External(String),
}

impl IdentityProvider {
    /// Exact, case-sensitive match against [`LOCAL_IDP`].
    pub fn from_name(name: &str) -> Self {
        if name == LOCAL_IDP {
            IdentityProvider::Local
        } else {
            IdentityProvider::External(name.to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            IdentityProvider::Local => LOCAL_IDP,
            IdentityProvider::External(name) => name,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, IdentityProvider::Local)
    }
}

impl fmt::Display for IdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// True when URLs for `tenant_domain` omit the tenant segment.
pub fn is_super_tenant(tenant_domain: &str) -> bool {
    tenant_domain.is_empty() || tenant_domain == SUPER_TENANT_DOMAIN
}
