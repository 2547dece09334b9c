//! Audit trail for administrative requests.
//!
//! `audited` wraps an administrative operation so that the caller id, the
//! interception time and the request method/path are recorded once the
//! operation finishes, whatever its outcome. Recording happens in a drop
//! guard, so it also runs when the wrapped future panics or is cancelled.
//! The operation's result is returned untouched.
//!
//! A sink that panics is contained and the entry is dropped. The exception is
//! a sink panic while the wrapped operation is itself unwinding: that is a
//! double panic and aborts the process, so sinks must not panic.

use std::{
    future::Future,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::Arc,
};

use time::OffsetDateTime;
use tracing::{info, warn};

use crate::{auth::AuthUser, error::AppResult};

/// Method and path of the request that triggered an administrative action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub method: String,
    pub path: String,
}

impl OperationDescriptor {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub caller_id: i64,
    pub requested_at: OffsetDateTime,
    pub operation: OperationDescriptor,
}

/// Write-only destination for audit entries. Must not fail observably.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: &AuditEntry);
}

/// Emits each entry as a structured `info` event on the `audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, entry: &AuditEntry) {
        info!(
            target: "audit",
            caller_id = entry.caller_id,
            requested_at = %entry.requested_at,
            method = %entry.operation.method,
            path = %entry.operation.path,
            "admin request"
        );
    }
}

struct AuditGuard {
    sink: Arc<dyn AuditSink>,
    entry: Option<AuditEntry>,
}

impl AuditGuard {
    fn begin(sink: Arc<dyn AuditSink>, caller_id: i64, operation: OperationDescriptor) -> Self {
        Self {
            sink,
            entry: Some(AuditEntry {
                caller_id,
                requested_at: OffsetDateTime::now_utc(),
                operation,
            }),
        }
    }
}

impl Drop for AuditGuard {
    fn drop(&mut self) {
        let Some(entry) = self.entry.take() else {
            return;
        };
        let sink = &self.sink;
        // Only catches when not already unwinding; a second panic aborts.
        if catch_unwind(AssertUnwindSafe(|| sink.record(&entry))).is_err() {
            warn!(caller_id = entry.caller_id, "audit sink panicked; entry dropped");
        }
    }
}

/// Runs `op` and records the administrative request after it completes.
pub async fn audited<T, F>(
    sink: Arc<dyn AuditSink>,
    caller: &AuthUser,
    operation: OperationDescriptor,
    op: F,
) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    let _guard = AuditGuard::begin(sink, caller.id, operation);
    op.await
}
