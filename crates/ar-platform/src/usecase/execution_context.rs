//! Execution Context
//!
//! Tracing ids for one use case execution.

use chrono::{DateTime, Utc};

/// Context for a use case execution.
///
/// `correlation_id` follows the request across services (taken from the
/// `X-Correlation-ID` header when present); `execution_id` is unique to this
/// execution.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub execution_id: String,
    pub correlation_id: String,
    pub initiated_at: DateTime<Utc>,
}

impl ExecutionContext {
    /// Fresh context; correlation starts as the execution id.
    pub fn create() -> Self {
        let exec_id = new_execution_id();
        Self {
            execution_id: exec_id.clone(),
            correlation_id: exec_id,
            initiated_at: Utc::now(),
        }
    }

    /// Context joining an existing correlation id.
    pub fn with_correlation(correlation_id: impl Into<String>) -> Self {
        Self {
            execution_id: new_execution_id(),
            correlation_id: correlation_id.into(),
            initiated_at: Utc::now(),
        }
    }
}

fn new_execution_id() -> String {
    format!("exec-{}", uuid::Uuid::new_v4().simple())
}
