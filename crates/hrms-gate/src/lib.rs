//! Server-side access gate for HRMS.
//!
//! Every gated request is checked with the authorization resolver and the
//! attempt, allowed or denied, is written to the audit trail before the
//! handler runs. [`AuthzLayer`] wires this into an axum router.

mod error;
mod gate;
mod layer;
mod principal;

pub use error::{GateError, GateResult};
pub use gate::{AccessGate, Decision};
pub use layer::{AuthzLayer, AuthzMiddleware, ResourceId};
pub use principal::{Principal, RequestOrigin};

pub use hrms_common_config::AuditFailurePolicy;
