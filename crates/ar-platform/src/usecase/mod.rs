//! Use Case Infrastructure
//!
//! - `UseCaseResult<T>` - result type for use case outcomes
//! - `UseCaseError` - categorized error types for consistent HTTP mapping
//! - `ExecutionContext` - tracing ids carried through one execution

pub mod error;
pub mod execution_context;
pub mod result;

pub use error::UseCaseError;
pub use execution_context::ExecutionContext;
pub use result::UseCaseResult;
