//! User roles.

use crate::table::{CapabilitySet, RoleTable, ROLE_ALIASES};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// The fixed classification of a user that determines default permissions.
///
/// Declaration order follows organizational seniority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// Platform owner, sees every tenant.
    Owner,
    /// Tenant administrator.
    Admin,
    /// Head of human resources.
    HrManager,
    /// Human resources staff.
    HrSpecialist,
    /// Manager of a single department.
    DepartmentManager,
    /// Regular employee (self-service only).
    Employee,
}

impl Role {
    /// Parse a role label as stored on a user record.
    ///
    /// Matching lower-cases the input but does not trim it. Declared
    /// aliases resolve to their canonical role. Anything else is `None`.
    pub fn parse(label: &str) -> Option<Self> {
        let lowered = label.to_lowercase();
        if let Ok(role) = Self::from_str(&lowered) {
            return Some(role);
        }
        ROLE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == lowered)
            .map(|(_, role)| *role)
    }

    /// All known roles, most senior first.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Owner => "Owner",
            Self::Admin => "Administrator",
            Self::HrManager => "HR Manager",
            Self::HrSpecialist => "HR Specialist",
            Self::DepartmentManager => "Department Manager",
            Self::Employee => "Employee",
        }
    }

    /// The capability set granted to this role.
    pub fn capabilities(&self) -> &'static CapabilitySet {
        RoleTable::global().get(Some(*self))
    }

    /// Check if this role outranks or equals another.
    pub fn is_at_least(&self, other: Role) -> bool {
        *self <= other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_names() {
        assert_eq!(Role::parse("owner"), Some(Role::Owner));
        assert_eq!(Role::parse("hr_manager"), Some(Role::HrManager));
        assert_eq!(Role::parse("department_manager"), Some(Role::DepartmentManager));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("Hr_Specialist"), Some(Role::HrSpecialist));
    }

    #[test]
    fn test_parse_does_not_trim() {
        assert_eq!(Role::parse("ADMIN "), None);
        assert_eq!(Role::parse(" employee"), None);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Role::parse("hr"), Some(Role::HrManager));
        assert_eq!(Role::parse("HR"), Some(Role::HrManager));
        assert_eq!(Role::parse("manager"), Some(Role::DepartmentManager));
        assert_eq!(Role::parse("staff"), Some(Role::Employee));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_display_round_trips() {
        for role in Role::all() {
            assert_eq!(Role::parse(&role.to_string()), Some(role));
        }
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Role::HrManager).unwrap();
        assert_eq!(json, "\"hr_manager\"");
    }

    #[test]
    fn test_seniority() {
        assert!(Role::Owner.is_at_least(Role::Admin));
        assert!(Role::HrManager.is_at_least(Role::HrManager));
        assert!(!Role::Employee.is_at_least(Role::DepartmentManager));
    }
}
