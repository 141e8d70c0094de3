//! Request-scoped audit enrichment.

use crate::AuditRecorder;
use hrms_audit_types::{
    AuditAction, AuditLogEntry, AuditResult, CompanyId, NewAuditLogEntry, NewAuditLogEntryBuilder,
    UserId,
};

/// Who is acting and from where, for one request.
///
/// Built by the caller from the authenticated principal and passed
/// explicitly; entries created through it carry these fields.
#[derive(Clone)]
pub struct AuditContext {
    recorder: AuditRecorder,
    user_id: UserId,
    company_id: Option<CompanyId>,
    ip_address: Option<String>,
    user_agent: Option<String>,
}

impl AuditContext {
    pub fn new(recorder: AuditRecorder, user_id: impl Into<UserId>) -> Self {
        Self {
            recorder,
            user_id: user_id.into(),
            company_id: None,
            ip_address: None,
            user_agent: None,
        }
    }

    /// Context for automated actions.
    pub fn system(recorder: AuditRecorder) -> Self {
        Self::new(recorder, UserId::system())
    }

    pub fn with_company(mut self, company: impl Into<CompanyId>) -> Self {
        self.company_id = Some(company.into());
        self
    }

    pub fn with_ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Builder pre-filled with this context.
    pub fn entry(
        &self,
        action: impl Into<AuditAction>,
        resource: impl Into<String>,
    ) -> NewAuditLogEntryBuilder {
        let mut builder = NewAuditLogEntry::builder(self.user_id.clone(), action, resource);
        if let Some(company) = &self.company_id {
            builder = builder.company_id(company.clone());
        }
        if let Some(ip) = &self.ip_address {
            builder = builder.ip_address(ip.clone());
        }
        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        builder
    }

    /// Record an entry built with [`AuditContext::entry`].
    pub async fn record(&self, builder: NewAuditLogEntryBuilder) -> AuditResult<AuditLogEntry> {
        self.recorder.record(builder.build()).await
    }

    /// Record an action on one record with no details.
    pub async fn record_action(
        &self,
        action: impl Into<AuditAction>,
        resource: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> AuditResult<AuditLogEntry> {
        self.record(self.entry(action, resource).resource_id(resource_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrms_audit_types::AuditQueryFilter;

    #[tokio::test]
    async fn test_context_stamps_request_fields() {
        let recorder = AuditRecorder::in_memory();
        let ctx = AuditContext::new(recorder.clone(), "u7")
            .with_company("acme")
            .with_ip_address("192.0.2.10")
            .with_user_agent("hrms-web/1.0");

        let stored = ctx
            .record(ctx.entry("UPDATE", "leave").resource_id("lr-1").detail("status", "approved"))
            .await
            .unwrap();

        assert_eq!(stored.user_id, UserId::new("u7"));
        assert_eq!(stored.company_id, Some(CompanyId::new("acme")));
        assert_eq!(stored.ip_address.as_deref(), Some("192.0.2.10"));
        assert_eq!(stored.user_agent.as_deref(), Some("hrms-web/1.0"));

        let found = recorder
            .query(&AuditQueryFilter::new().company("acme"))
            .await
            .unwrap();
        assert_eq!(found, vec![stored]);
    }

    #[tokio::test]
    async fn test_system_context() {
        let ctx = AuditContext::system(AuditRecorder::in_memory());
        let stored = ctx.record_action("archive", "payroll", "run-2024-03").await.unwrap();
        assert!(stored.user_id.is_system());
        assert_eq!(stored.action.as_str(), "ARCHIVE");
    }
}
