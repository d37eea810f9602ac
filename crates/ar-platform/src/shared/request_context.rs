//! Request context extractors
//!
//! Tenant and tracing ids are read from headers once, at the HTTP boundary,
//! and passed on explicitly.

use std::convert::Infallible;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::directory::SUPER_TENANT_DOMAIN;
use crate::usecase::ExecutionContext;

pub const TENANT_HEADER: &str = "x-tenant-domain";
pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Tenant the request acts on; the super tenant when the header is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantDomain(pub String);

impl TenantDomain {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for TenantDomain
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tenant = header_value(parts, TENANT_HEADER).unwrap_or(SUPER_TENANT_DOMAIN);
        Ok(TenantDomain(tenant.to_string()))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ExecutionContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(match header_value(parts, CORRELATION_HEADER) {
            Some(correlation_id) => ExecutionContext::with_correlation(correlation_id),
            None => ExecutionContext::create(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract_tenant(request: Request<()>) -> TenantDomain {
        let (mut parts, _) = request.into_parts();
        TenantDomain::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_tenant_defaults_to_super_tenant() {
        let tenant = extract_tenant(Request::new(())).await;
        assert_eq!(tenant.as_str(), "carbon.super");
    }

    #[tokio::test]
    async fn test_tenant_from_header() {
        let request = Request::builder()
            .header("X-Tenant-Domain", "acme")
            .body(())
            .unwrap();
        assert_eq!(extract_tenant(request).await.as_str(), "acme");
    }

    #[tokio::test]
    async fn test_correlation_id_from_header() {
        let request = Request::builder()
            .header("X-Correlation-ID", "corr-1")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let ctx = ExecutionContext::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ctx.correlation_id, "corr-1");
        assert_ne!(ctx.execution_id, "corr-1");
    }
}
