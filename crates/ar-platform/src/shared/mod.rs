//! Shared Module
//!
//! Cross-cutting concerns and shared utilities.

pub mod error;
pub mod api_common;
pub mod request_context;
pub mod health_api;

// Re-export commonly used items
pub use error::{PlatformError, Result};
pub use api_common::LimitParams;
pub use request_context::TenantDomain;
pub use health_api::{health_router, HealthState};
