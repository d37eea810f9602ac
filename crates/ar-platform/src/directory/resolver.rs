//! Reference Resolver
//!
//! Annotates assigned principals with a display name and, where the directory
//! can serve them, a `$ref` URI. Never fails: URL builder errors fall back to
//! the legacy composition.

use std::sync::Arc;
use tracing::warn;

use super::reference::PrincipalReference;
use super::url_provider::DirectoryUrlProvider;
use crate::role::entity::{RoleGroup, RoleUser};

const USERS_RESOURCE: &str = "Users";
const GROUPS_RESOURCE: &str = "Groups";

#[derive(Clone)]
pub struct ReferenceResolver {
    urls: Arc<dyn DirectoryUrlProvider>,
}

impl ReferenceResolver {
    pub fn new(urls: Arc<dyn DirectoryUrlProvider>) -> Self {
        Self { urls }
    }

    /// Directory base URL for a tenant.
    pub fn directory_base(&self, tenant_domain: &str) -> String {
        match self.urls.tenant_qualified_base_url(tenant_domain) {
            Ok(url) => url,
            Err(e) => {
                warn!(
                    tenant_domain = %tenant_domain,
                    error = %e,
                    "Tenant-qualified directory URL unavailable, using legacy URL"
                );
                self.urls.legacy_base_url(tenant_domain)
            }
        }
    }

    pub fn resolve_users(&self, users: &[RoleUser], tenant_domain: &str) -> Vec<PrincipalReference> {
        if users.is_empty() {
            return Vec::new();
        }
        let base = self.directory_base(tenant_domain);

        users
            .iter()
            .map(|user| PrincipalReference {
                value: user.id.clone(),
                display: user.user_name.clone(),
                reference: member_uri(&base, USERS_RESOURCE, &user.id),
            })
            .collect()
    }

    /// Groups from an external identity provider never get a URI.
    pub fn resolve_groups(&self, groups: &[RoleGroup], tenant_domain: &str) -> Vec<PrincipalReference> {
        if groups.is_empty() {
            return Vec::new();
        }
        let base = self.directory_base(tenant_domain);

        groups
            .iter()
            .map(|group| PrincipalReference {
                value: group.id.clone(),
                display: group.display_name.clone(),
                reference: if group.identity_provider().is_local() {
                    member_uri(&base, GROUPS_RESOURCE, &group.id)
                } else {
                    None
                },
            })
            .collect()
    }
}

fn member_uri(base: &str, resource: &str, id: &str) -> Option<String> {
    if id.trim().is_empty() {
        None
    } else {
        Some(format!("{}/{}/{}", base, resource, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::url_provider::{ServerUrlBuilder, UrlBuildError};

    fn resolver() -> ReferenceResolver {
        ReferenceResolver::new(Arc::new(ServerUrlBuilder::new(
            "https://id.example.com",
            "https://legacy.example.com",
            "/scim2",
        )))
    }

    /// Provider whose tenant-qualified path always fails.
    struct BrokenBuilder;

    impl DirectoryUrlProvider for BrokenBuilder {
        fn tenant_qualified_base_url(&self, tenant_domain: &str) -> Result<String, UrlBuildError> {
            Err(UrlBuildError::CannotBeBase(tenant_domain.to_string()))
        }

        fn legacy_base_url(&self, tenant_domain: &str) -> String {
            format!("https://legacy.example.com/t/{}/scim2", tenant_domain)
        }
    }

    #[test]
    fn test_user_uri_for_super_tenant() {
        let refs = resolver().resolve_users(&[RoleUser::new("u1", "Alice")], "carbon.super");

        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].value, "u1");
        assert_eq!(refs[0].display, "Alice");
        assert_eq!(refs[0].reference.as_deref(), Some("https://id.example.com/scim2/Users/u1"));
    }

    #[test]
    fn test_user_uri_for_tenant() {
        let refs = resolver().resolve_users(&[RoleUser::new("u1", "Alice")], "acme");
        let uri = refs[0].reference.as_deref().unwrap();
        assert!(uri.contains("/t/acme/"));
        assert!(uri.ends_with("/Users/u1"));
    }

    #[test]
    fn test_blank_id_has_no_uri() {
        let refs = resolver().resolve_users(&[RoleUser::new("  ", "ghost")], "carbon.super");
        assert!(refs[0].reference.is_none());
    }

    #[test]
    fn test_only_local_groups_get_uri() {
        let groups = vec![
            RoleGroup::new("g1", "Admins", "LOCAL"),
            RoleGroup::new("g2", "Partners", "Google"),
        ];

        let refs = resolver().resolve_groups(&groups, "carbon.super");
        assert_eq!(
            refs[0].reference.as_deref(),
            Some("https://id.example.com/scim2/Groups/g1")
        );
        assert_eq!(refs[1].display, "Partners");
        assert!(refs[1].reference.is_none());
    }

    #[test]
    fn test_falls_back_to_legacy_url() {
        let resolver = ReferenceResolver::new(Arc::new(BrokenBuilder));
        let refs = resolver.resolve_users(&[RoleUser::new("u1", "Alice")], "acme");
        assert_eq!(
            refs[0].reference.as_deref(),
            Some("https://legacy.example.com/t/acme/scim2/Users/u1")
        );
    }

    #[test]
    fn test_ref_serialized_as_dollar_ref() {
        let refs = resolver().resolve_users(&[RoleUser::new("u1", "Alice")], "carbon.super");
        let json = serde_json::to_value(&refs[0]).unwrap();
        assert_eq!(json["$ref"], "https://id.example.com/scim2/Users/u1");

        let external = resolver().resolve_groups(&[RoleGroup::new("g2", "Partners", "Google")], "acme");
        let json = serde_json::to_value(&external[0]).unwrap();
        assert!(json.get("$ref").is_none());
    }
}
