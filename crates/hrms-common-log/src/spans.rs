//! Span helpers shared by the access and audit crates.

use tracing::{info_span, Span};

/// Span around one authorization check.
pub fn authz_span(user_id: &str, capability: &str) -> Span {
    info_span!("authz", user = %user_id, capability = %capability)
}

/// Span around one audit store call.
pub fn audit_span(operation: &'static str, backend: &str) -> Span {
    info_span!("audit", op = operation, backend = %backend)
}

/// Logs the elapsed time of an operation when finished.
pub struct Timer {
    start: std::time::Instant,
    operation: &'static str,
}

impl Timer {
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: std::time::Instant::now(),
            operation,
        }
    }

    /// Elapsed milliseconds so far.
    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }

    pub fn finish(self) {
        tracing::debug!(
            operation = %self.operation,
            duration_ms = %self.elapsed_ms(),
            "operation completed"
        );
    }
}
