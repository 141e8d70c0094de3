//! Authorization decisions with an audit record of every attempt.

use crate::{GateError, GateResult, Principal, RequestOrigin};
use hrms_audit_recorder::AuditRecorder;
use hrms_audit_types::{AuditAction, NewAuditLogEntry};
use hrms_authz::{can_role, Capability, Resource, Verb};
use hrms_common_config::{AuditFailurePolicy, GateConfig};
use hrms_common_log::spans::authz_span;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, warn, Instrument};

/// Outcome of one access check. Denial is a value, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Granted,
    Denied,
}

impl Decision {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl From<bool> for Decision {
    fn from(granted: bool) -> Self {
        if granted {
            Self::Granted
        } else {
            Self::Denied
        }
    }
}

/// The server-side check that runs in front of every gated operation.
#[derive(Clone)]
pub struct AccessGate {
    recorder: AuditRecorder,
    policy: AuditFailurePolicy,
}

impl AccessGate {
    pub fn new(recorder: AuditRecorder, policy: AuditFailurePolicy) -> Self {
        Self { recorder, policy }
    }

    pub fn from_config(recorder: AuditRecorder, config: &GateConfig) -> Self {
        Self::new(recorder, config.audit_failure_policy)
    }

    pub fn policy(&self) -> AuditFailurePolicy {
        self.policy
    }

    pub fn recorder(&self) -> &AuditRecorder {
        &self.recorder
    }

    /// Decide and record one attempt.
    ///
    /// The audit entry is written before the decision is returned. Under
    /// [`AuditFailurePolicy::FailClosed`] a failed write fails the call.
    pub async fn authorize(
        &self,
        principal: &Principal,
        resource: Resource,
        verb: Verb,
        origin: &RequestOrigin,
        resource_id: Option<&str>,
    ) -> GateResult<Decision> {
        if principal.user_id.is_blank() {
            return Err(GateError::Unauthenticated);
        }

        let capability = Capability::new(resource, verb);
        let span = authz_span(principal.user_id.as_str(), &capability.to_string());

        async {
            let decision = Decision::from(can_role(principal.resolved_role(), resource, verb));
            self.finish(
                principal,
                verb_action(verb),
                resource.as_ref(),
                &capability.to_string(),
                decision,
                origin,
                resource_id,
            )
            .await
        }
        .instrument(span)
        .await
    }

    /// [`AccessGate::authorize`] for untyped input.
    ///
    /// Unknown resources or verbs are denied and the attempt is still
    /// recorded under the text that was asked for.
    pub async fn authorize_str(
        &self,
        principal: &Principal,
        resource: &str,
        verb: &str,
        origin: &RequestOrigin,
        resource_id: Option<&str>,
    ) -> GateResult<Decision> {
        match Capability::from_parts(resource, verb) {
            Some(cap) => {
                self.authorize(principal, cap.resource, cap.verb, origin, resource_id)
                    .await
            }
            None => {
                if principal.user_id.is_blank() {
                    return Err(GateError::Unauthenticated);
                }
                let capability = format!("{resource}:{verb}");
                let span = authz_span(principal.user_id.as_str(), &capability);
                let resource = or_unknown(resource).to_lowercase();
                self.finish(
                    principal,
                    AuditAction::parse(or_unknown(verb)),
                    &resource,
                    &capability,
                    Decision::Denied,
                    origin,
                    resource_id,
                )
                .instrument(span)
                .await
            }
        }
    }

    /// Like [`AccessGate::authorize`] but a denial becomes
    /// [`GateError::Forbidden`].
    pub async fn require(
        &self,
        principal: &Principal,
        resource: Resource,
        verb: Verb,
        origin: &RequestOrigin,
        resource_id: Option<&str>,
    ) -> GateResult<()> {
        match self
            .authorize(principal, resource, verb, origin, resource_id)
            .await?
        {
            Decision::Granted => Ok(()),
            Decision::Denied => Err(GateError::Forbidden {
                capability: Capability::new(resource, verb).to_string(),
            }),
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn finish(
        &self,
        principal: &Principal,
        action: AuditAction,
        resource: &str,
        capability: &str,
        decision: Decision,
        origin: &RequestOrigin,
        resource_id: Option<&str>,
    ) -> GateResult<Decision> {
        if decision.is_granted() {
            debug!(user = %principal.user_id, role = %principal.role, capability, "access granted");
        } else {
            warn!(user = %principal.user_id, role = %principal.role, capability, "access denied");
        }

        let mut entry = NewAuditLogEntry::builder(principal.user_id.clone(), action, resource)
            .detail("capability", capability)
            .detail("granted", decision.is_granted())
            .detail("role", principal.role.as_str());
        if let Some(id) = resource_id {
            entry = entry.resource_id(id);
        }
        if let Some(company) = &principal.company_id {
            entry = entry.company_id(company.clone());
        }
        if let Some(ip) = &origin.ip_address {
            entry = entry.ip_address(ip.clone());
        }
        if let Some(ua) = &origin.user_agent {
            entry = entry.user_agent(ua.clone());
        }

        match self.recorder.record(entry.build()).await {
            Ok(_) => Ok(decision),
            Err(err) => match self.policy {
                AuditFailurePolicy::FailClosed => Err(GateError::AuditUnavailable(err)),
                AuditFailurePolicy::FailOpen => {
                    error!(
                        user = %principal.user_id,
                        capability,
                        error = %err,
                        "access attempt could not be audited"
                    );
                    Ok(decision)
                }
            },
        }
    }
}

fn or_unknown(text: &str) -> &str {
    match text.trim() {
        "" => "unknown",
        trimmed => trimmed,
    }
}

/// Audit action recorded for an attempt with `verb`.
fn verb_action(verb: Verb) -> AuditAction {
    match verb {
        Verb::View => AuditAction::View,
        Verb::Create => AuditAction::Create,
        Verb::Update => AuditAction::Update,
        Verb::Delete => AuditAction::Delete,
        Verb::Approve | Verb::Export => AuditAction::parse(verb.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrms_audit_types::AuditQueryFilter;
    use hrms_test_utils::FailingStore;
    use std::sync::Arc;

    fn gate() -> AccessGate {
        AccessGate::new(AuditRecorder::in_memory(), AuditFailurePolicy::FailClosed)
    }

    #[tokio::test]
    async fn test_granted_attempt_is_recorded() {
        let gate = gate();
        let principal = Principal::new("u1", "hr_manager").with_company("acme");
        let origin = RequestOrigin::new(Some("192.0.2.1".into()), None);

        let decision = gate
            .authorize(&principal, Resource::Employee, Verb::Delete, &origin, Some("emp-4"))
            .await
            .unwrap();
        assert_eq!(decision, Decision::Granted);

        let entries = gate.recorder().query(&AuditQueryFilter::default()).await.unwrap();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.action, AuditAction::Delete);
        assert_eq!(entry.resource, "employee");
        assert_eq!(entry.resource_id.as_deref(), Some("emp-4"));
        assert_eq!(entry.ip_address.as_deref(), Some("192.0.2.1"));
        assert_eq!(
            entry.details,
            Some(json!({"capability": "employee:delete", "granted": true, "role": "hr_manager"}))
        );
    }

    #[tokio::test]
    async fn test_denied_attempt_is_recorded_not_an_error() {
        let gate = gate();
        let principal = Principal::new("u2", "hr_specialist");

        let decision = gate
            .authorize(&principal, Resource::Employee, Verb::Delete, &RequestOrigin::default(), None)
            .await
            .unwrap();
        assert_eq!(decision, Decision::Denied);

        let entries = gate.recorder().query(&AuditQueryFilter::new().user("u2")).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].details.as_ref().unwrap()["granted"], json!(false));
    }

    #[tokio::test]
    async fn test_unknown_role_denied() {
        let gate = gate();
        for role in ["superuser", "", "ADMIN "] {
            let principal = Principal::new("u3", role);
            let decision = gate
                .authorize(&principal, Resource::Report, Verb::View, &RequestOrigin::default(), None)
                .await
                .unwrap();
            assert_eq!(decision, Decision::Denied, "role {role:?}");
        }
    }

    #[tokio::test]
    async fn test_blank_user_unauthenticated() {
        let gate = gate();
        let principal = Principal::new("  ", "owner");
        let err = gate
            .authorize(&principal, Resource::Report, Verb::View, &RequestOrigin::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::Unauthenticated));
        assert_eq!(gate.recorder().count_unfiltered().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_authorize_str_unknown_verb() {
        let gate = gate();
        let principal = Principal::new("u1", "owner");
        let decision = gate
            .authorize_str(&principal, "employee", "archive", &RequestOrigin::default(), None)
            .await
            .unwrap();
        assert_eq!(decision, Decision::Denied);

        let entries = gate.recorder().query(&AuditQueryFilter::default()).await.unwrap();
        assert_eq!(entries[0].action.as_str(), "ARCHIVE");
        assert_eq!(entries[0].details.as_ref().unwrap()["capability"], json!("employee:archive"));
    }

    #[tokio::test]
    async fn test_approve_recorded_as_custom_action() {
        let gate = gate();
        let principal = Principal::new("u1", "department_manager");
        gate.authorize_str(&principal, "Leave", "APPROVE", &RequestOrigin::default(), Some("lr-2"))
            .await
            .unwrap();

        let entries = gate.recorder().query(&AuditQueryFilter::default()).await.unwrap();
        assert_eq!(entries[0].action.as_str(), "APPROVE");
        assert_eq!(entries[0].resource, "leave");
    }

    #[tokio::test]
    async fn test_require_maps_denial_to_forbidden() {
        let gate = gate();
        let principal = Principal::new("u5", "employee");
        let err = gate
            .require(&principal, Resource::Payroll, Verb::Update, &RequestOrigin::default(), None)
            .await
            .unwrap_err();
        match err {
            GateError::Forbidden { capability } => assert_eq!(capability, "payroll:update"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_audit_failure_policies() {
        let principal = Principal::new("u1", "owner");
        let origin = RequestOrigin::default();

        let closed = AccessGate::new(
            AuditRecorder::new(Arc::new(FailingStore::new())),
            AuditFailurePolicy::FailClosed,
        );
        let err = closed
            .authorize(&principal, Resource::Company, Verb::View, &origin, None)
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::AuditUnavailable(_)));

        let open = AccessGate::from_config(
            AuditRecorder::new(Arc::new(FailingStore::new())),
            &GateConfig {
                audit_failure_policy: AuditFailurePolicy::FailOpen,
            },
        );
        let decision = open
            .authorize(&principal, Resource::Company, Verb::View, &origin, None)
            .await
            .unwrap();
        assert_eq!(decision, Decision::Granted);
    }
}
