//! Audit log entries.

use crate::{AuditAction, AuditEntryId, AuditError, EntryField};
use hrms_common_core::{CompanyId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One recorded action. Immutable once the store has returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: AuditEntryId,
    /// Acting principal; may no longer resolve to a user.
    pub user_id: UserId,
    pub action: AuditAction,
    /// Resource type acted upon.
    pub resource: String,
    pub resource_id: Option<String>,
    /// Free-form structured payload.
    pub details: Option<Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    /// Tenant scope; `None` for platform-level actions.
    pub company_id: Option<CompanyId>,
    pub created_at: Timestamp,
}

impl AuditLogEntry {
    /// Details rendered as JSON text (empty when absent).
    pub fn details_text(&self) -> String {
        self.details
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default()
    }
}

/// Caller-supplied description of an action to record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAuditLogEntry {
    pub user_id: UserId,
    pub action: AuditAction,
    pub resource: String,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub company_id: Option<CompanyId>,
}

impl NewAuditLogEntry {
    /// Start a builder with the required fields.
    pub fn builder(
        user_id: impl Into<UserId>,
        action: impl Into<AuditAction>,
        resource: impl Into<String>,
    ) -> NewAuditLogEntryBuilder {
        NewAuditLogEntryBuilder::new(user_id.into(), action.into(), resource.into())
    }

    /// Check required fields.
    ///
    /// Fields are checked in the order `user_id`, `action`, `resource`; the
    /// first blank one is reported.
    pub fn validate(self) -> Result<ValidatedEntry, AuditError> {
        if self.user_id.is_blank() {
            return Err(AuditError::invalid(EntryField::UserId));
        }
        if self.action.is_blank() {
            return Err(AuditError::invalid(EntryField::Action));
        }
        if self.resource.trim().is_empty() {
            return Err(AuditError::invalid(EntryField::Resource));
        }
        Ok(ValidatedEntry(self))
    }
}

/// A new entry that passed validation. Only stores consume these.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEntry(NewAuditLogEntry);

impl ValidatedEntry {
    pub fn entry(&self) -> &NewAuditLogEntry {
        &self.0
    }

    /// Materialize with store-assigned identity.
    pub fn into_entry(self, id: AuditEntryId, created_at: Timestamp) -> AuditLogEntry {
        let e = self.0;
        AuditLogEntry {
            id,
            user_id: e.user_id,
            action: e.action,
            resource: e.resource,
            resource_id: e.resource_id,
            details: e.details,
            ip_address: e.ip_address,
            user_agent: e.user_agent,
            company_id: e.company_id,
            created_at,
        }
    }
}

/// Builder for [`NewAuditLogEntry`].
#[derive(Debug)]
pub struct NewAuditLogEntryBuilder {
    entry: NewAuditLogEntry,
    fields: Map<String, Value>,
}

impl NewAuditLogEntryBuilder {
    fn new(user_id: UserId, action: AuditAction, resource: String) -> Self {
        Self {
            entry: NewAuditLogEntry {
                user_id,
                action,
                resource,
                resource_id: None,
                details: None,
                ip_address: None,
                user_agent: None,
                company_id: None,
            },
            fields: Map::new(),
        }
    }

    /// Set the affected record.
    pub fn resource_id(mut self, id: impl Into<String>) -> Self {
        self.entry.resource_id = Some(id.into());
        self
    }

    /// Replace the details payload.
    pub fn details(mut self, details: Value) -> Self {
        self.fields.clear();
        self.entry.details = Some(details);
        self
    }

    /// Add one key to an object details payload.
    ///
    /// Values that fail to serialize are skipped.
    pub fn detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(json) = serde_json::to_value(value) {
            self.fields.insert(key.into(), json);
        }
        self
    }

    pub fn ip_address(mut self, ip: impl Into<String>) -> Self {
        self.entry.ip_address = Some(ip.into());
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.entry.user_agent = Some(ua.into());
        self
    }

    pub fn company_id(mut self, company: impl Into<CompanyId>) -> Self {
        self.entry.company_id = Some(company.into());
        self
    }

    /// Build the entry.
    pub fn build(mut self) -> NewAuditLogEntry {
        if !self.fields.is_empty() {
            let merged = match self.entry.details.take() {
                Some(Value::Object(mut existing)) => {
                    existing.extend(self.fields);
                    Value::Object(existing)
                }
                Some(other) => {
                    let mut map = self.fields;
                    map.insert("value".to_string(), other);
                    Value::Object(map)
                }
                None => Value::Object(self.fields),
            };
            self.entry.details = Some(merged);
        }
        self.entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_sets_optional_fields() {
        let entry = NewAuditLogEntry::builder("u1", "delete", "employee")
            .resource_id("emp-7")
            .ip_address("10.0.0.1")
            .user_agent("curl/8")
            .company_id("acme")
            .build();

        assert_eq!(entry.action, AuditAction::Delete);
        assert_eq!(entry.resource_id.as_deref(), Some("emp-7"));
        assert_eq!(entry.company_id, Some(CompanyId::new("acme")));
        assert!(entry.details.is_none());
    }

    #[test]
    fn test_detail_merges_into_object() {
        let entry = NewAuditLogEntry::builder("u1", "update", "employee")
            .details(json!({"changed": ["salary"]}))
            .detail("reason", "promotion")
            .build();

        assert_eq!(
            entry.details,
            Some(json!({"changed": ["salary"], "reason": "promotion"}))
        );
    }

    #[test]
    fn test_detail_wraps_scalar_details() {
        let entry = NewAuditLogEntry::builder("u1", "update", "employee")
            .details(json!("note"))
            .detail("k", 1)
            .build();
        assert_eq!(entry.details, Some(json!({"k": 1, "value": "note"})));
    }

    #[test]
    fn test_validate_rejects_blank_required_fields() {
        let blank_user = NewAuditLogEntry::builder("", "DELETE", "employee").build();
        assert_eq!(
            blank_user.validate(),
            Err(AuditError::invalid(EntryField::UserId))
        );

        let blank_action = NewAuditLogEntry::builder("u1", " ", "employee").build();
        assert_eq!(
            blank_action.validate(),
            Err(AuditError::invalid(EntryField::Action))
        );

        let blank_resource = NewAuditLogEntry::builder("u1", "CREATE", "").build();
        assert_eq!(
            blank_resource.validate(),
            Err(AuditError::invalid(EntryField::Resource))
        );
    }

    #[test]
    fn test_validated_entry_materializes() {
        let validated = NewAuditLogEntry::builder("system", "LOGIN", "user")
            .build()
            .validate()
            .unwrap();
        let ts = Timestamp::now();
        let entry = validated.into_entry(AuditEntryId::new(3), ts);
        assert_eq!(entry.id.get(), 3);
        assert_eq!(entry.created_at, ts);
        assert!(entry.user_id.is_system());
    }

    #[test]
    fn test_details_text() {
        let entry = NewAuditLogEntry::builder("u1", "CREATE", "leave")
            .detail("Reason", "Vacation")
            .build()
            .validate()
            .unwrap()
            .into_entry(AuditEntryId::new(1), Timestamp::now());
        assert_eq!(entry.details_text(), r#"{"Reason":"Vacation"}"#);
    }
}
