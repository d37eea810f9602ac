//! Directory base URL construction
//!
//! Two ways to get the directory base for a tenant: the tenant-qualified
//! builder, which parses the public server URL and can fail, and the legacy
//! string composition, which cannot.

use thiserror::Error;
use url::Url;

use super::idp::is_super_tenant;

#[derive(Error, Debug)]
pub enum UrlBuildError {
    #[error("Invalid server URL '{url}': {source}")]
    InvalidServerUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Server URL '{0}' cannot carry a path")]
    CannotBeBase(String),
}

/// Supplies directory base URLs, e.g. `https://host/t/acme/scim2`.
pub trait DirectoryUrlProvider: Send + Sync {
    fn tenant_qualified_base_url(&self, tenant_domain: &str) -> Result<String, UrlBuildError>;

    /// Best-effort fallback when the tenant-qualified URL cannot be built.
    fn legacy_base_url(&self, tenant_domain: &str) -> String;
}

/// URL provider driven by the `[directory]` configuration section.
#[derive(Debug, Clone)]
pub struct ServerUrlBuilder {
    public_url: String,
    legacy_server_url: String,
    endpoint_path: String,
}

impl ServerUrlBuilder {
    pub fn new(
        public_url: impl Into<String>,
        legacy_server_url: impl Into<String>,
        endpoint_path: impl Into<String>,
    ) -> Self {
        Self {
            public_url: public_url.into(),
            legacy_server_url: legacy_server_url.into(),
            endpoint_path: endpoint_path.into(),
        }
    }
}

impl DirectoryUrlProvider for ServerUrlBuilder {
    fn tenant_qualified_base_url(&self, tenant_domain: &str) -> Result<String, UrlBuildError> {
        let mut url = Url::parse(&self.public_url).map_err(|source| UrlBuildError::InvalidServerUrl {
            url: self.public_url.clone(),
            source,
        })?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| UrlBuildError::CannotBeBase(self.public_url.clone()))?;
            segments.pop_if_empty();

            if !is_super_tenant(tenant_domain) {
                segments.push("t").push(tenant_domain);
            }
            segments.extend(self.endpoint_path.split('/').filter(|s| !s.is_empty()));
        }

        Ok(url.to_string())
    }

    fn legacy_base_url(&self, tenant_domain: &str) -> String {
        let server = self.legacy_server_url.trim_end_matches('/');
        if is_super_tenant(tenant_domain) {
            format!("{}{}", server, self.endpoint_path)
        } else {
            format!("{}/t/{}{}", server, urlencoding::encode(tenant_domain), self.endpoint_path)
        }
    }
}
