//! Identity Directory
//!
//! Builds the `$ref` links that point assigned principals back at the
//! identity directory's Users and Groups endpoints.

pub mod idp;
pub mod reference;
pub mod resolver;
pub mod url_provider;

pub use idp::{IdentityProvider, LOCAL_IDP, SUPER_TENANT_DOMAIN};
pub use reference::PrincipalReference;
pub use resolver::ReferenceResolver;
pub use url_provider::{DirectoryUrlProvider, ServerUrlBuilder, UrlBuildError};
