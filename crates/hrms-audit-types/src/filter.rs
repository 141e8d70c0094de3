//! Audit query filters.

use crate::{AuditAction, AuditLogEntry};
use hrms_common_core::{CompanyId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Criteria for reading the audit trail.
///
/// Every set field must match (logical AND). An empty filter matches every
/// entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditQueryFilter {
    /// Exact actor match.
    pub user_id: Option<UserId>,
    /// Exact action match, case-insensitive.
    pub action: Option<AuditAction>,
    /// Exact resource match, case-insensitive.
    pub resource: Option<String>,
    /// Exact tenant match.
    pub company_id: Option<CompanyId>,
    /// Case-insensitive substring over action, resource and details.
    pub search: Option<String>,
    /// Inclusive lower bound on `created_at`.
    pub from: Option<Timestamp>,
    /// Inclusive upper bound on `created_at`.
    pub to: Option<Timestamp>,
}

impl AuditQueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, user_id: impl Into<UserId>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn action(mut self, action: impl Into<AuditAction>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn company(mut self, company_id: impl Into<CompanyId>) -> Self {
        self.company_id = Some(company_id.into());
        self
    }

    /// Free-text search. Blank text is ignored.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.search = if text.trim().is_empty() { None } else { Some(text) };
        self
    }

    pub fn since(mut self, from: Timestamp) -> Self {
        self.from = Some(from);
        self
    }

    pub fn until(mut self, to: Timestamp) -> Self {
        self.to = Some(to);
        self
    }

    /// True when no criteria are set.
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.action.is_none()
            && self.resource.is_none()
            && self.company_id.is_none()
            && self.search_term().is_none()
            && self.from.is_none()
            && self.to.is_none()
    }

    /// Lower-cased search text, if any.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Whether `entry` satisfies every criterion.
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        self.matches_structured(entry) && self.matches_search(entry)
    }

    /// Every criterion except free-text search.
    pub fn matches_structured(&self, entry: &AuditLogEntry) -> bool {
        if let Some(user) = &self.user_id {
            if &entry.user_id != user {
                return false;
            }
        }
        if let Some(action) = &self.action {
            if !entry.action.as_str().eq_ignore_ascii_case(action.as_str()) {
                return false;
            }
        }
        if let Some(resource) = &self.resource {
            if !entry.resource.eq_ignore_ascii_case(resource) {
                return false;
            }
        }
        if let Some(company) = &self.company_id {
            if entry.company_id.as_ref() != Some(company) {
                return false;
            }
        }
        if let Some(from) = self.from {
            if entry.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if entry.created_at > to {
                return false;
            }
        }
        true
    }

    /// Free-text criterion alone.
    pub fn matches_search(&self, entry: &AuditLogEntry) -> bool {
        let Some(term) = self.search_term() else {
            return true;
        };
        entry.action.as_str().to_lowercase().contains(&term)
            || entry.resource.to_lowercase().contains(&term)
            || entry.details_text().to_lowercase().contains(&term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AuditEntryId, NewAuditLogEntry};
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use serde_json::json;

    fn entry(id: i64, user: &str, action: &str, resource: &str) -> AuditLogEntry {
        NewAuditLogEntry::builder(user, action, resource)
            .company_id("acme")
            .details(json!({"reason": "Annual Vacation"}))
            .build()
            .validate()
            .unwrap()
            .into_entry(
                AuditEntryId::new(id),
                Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
            )
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = AuditQueryFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&entry(1, "u1", "CREATE", "employee")));
    }

    #[test]
    fn test_conjunction() {
        let e = entry(1, "u1", "DELETE", "employee");
        assert!(AuditQueryFilter::new().user("u1").action("delete").matches(&e));
        assert!(!AuditQueryFilter::new().user("u2").action("DELETE").matches(&e));
        assert!(!AuditQueryFilter::new().user("u1").action("CREATE").matches(&e));
        assert!(AuditQueryFilter::new().resource("Employee").company("acme").matches(&e));
        assert!(!AuditQueryFilter::new().company("globex").matches(&e));
    }

    #[test]
    fn test_search_covers_details() {
        let e = entry(1, "u1", "CREATE", "leave");
        assert!(AuditQueryFilter::new().search("vacation").matches(&e));
        assert!(AuditQueryFilter::new().search("LEAV").matches(&e));
        assert!(AuditQueryFilter::new().search("creat").matches(&e));
        assert!(!AuditQueryFilter::new().search("payroll").matches(&e));
    }

    #[test]
    fn test_blank_search_ignored() {
        let filter = AuditQueryFilter::new().search("   ");
        assert!(filter.is_empty());
    }

    #[test]
    fn test_date_bounds_inclusive() {
        let e = entry(1, "u1", "CREATE", "leave");
        let at = e.created_at;
        let before = Timestamp::from_datetime(at.as_datetime() - Duration::seconds(1));
        let after = Timestamp::from_datetime(at.as_datetime() + Duration::seconds(1));

        assert!(AuditQueryFilter::new().since(at).until(at).matches(&e));
        assert!(AuditQueryFilter::new().since(before).until(after).matches(&e));
        assert!(!AuditQueryFilter::new().since(after).matches(&e));
        assert!(!AuditQueryFilter::new().until(before).matches(&e));
    }

    proptest! {
        #[test]
        fn adding_criteria_never_widens(user in "u[0-3]", action in "(CREATE|DELETE|LOGIN)") {
            let e = entry(1, "u1", "DELETE", "employee");
            let narrow = AuditQueryFilter::new().user(user.as_str()).action(action.as_str());
            let wide = AuditQueryFilter::new().user(user.as_str());
            prop_assert!(!narrow.matches(&e) || wide.matches(&e));
        }
    }
}
