//! Gate errors and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hrms_audit_types::AuditError;
use serde_json::json;
use thiserror::Error;

pub type GateResult<T> = Result<T, GateError>;

#[derive(Debug, Error)]
pub enum GateError {
    /// No authenticated principal on the request.
    #[error("Authentication required")]
    Unauthenticated,

    /// The resolver denied the capability.
    #[error("Insufficient permissions for {capability}")]
    Forbidden { capability: String },

    /// The attempt could not be audited and the policy is fail-closed.
    #[error("Audit trail unavailable: {0}")]
    AuditUnavailable(#[source] AuditError),
}

impl GateError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::AuditUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthorized",
            Self::Forbidden { .. } => "insufficient_permissions",
            Self::AuditUnavailable(_) => "audit_unavailable",
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.error_code(),
            "message": self.to_string(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(GateError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        let forbidden = GateError::Forbidden {
            capability: "employee:delete".to_string(),
        };
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(forbidden.to_string(), "Insufficient permissions for employee:delete");
        let down = GateError::AuditUnavailable(AuditError::unavailable("disk full"));
        assert_eq!(down.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(down.error_code(), "audit_unavailable");
    }
}
