//! Navigation sections shown in role dashboards.

use crate::capability::{Capability, Resource, Verb};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Menu group. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SectionGroup {
    Home,
    /// Administration and company-wide oversight.
    Strategic,
    /// Day-to-day HR operations.
    Operational,
    /// The user's own records.
    SelfService,
}

/// A navigation section.
///
/// Declaration order is the priority order within a [`SectionGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NavigationSection {
    Dashboard,

    Companies,
    Users,
    Settings,
    AuditLogs,
    Reports,

    Employees,
    Departments,
    LeaveRequests,
    Performance,
    Payroll,
    Training,
    Team,

    MyProfile,
    MyLeave,
    MyPayslips,
    MyTraining,
}

impl NavigationSection {
    /// The "home" section every caller gets.
    pub const HOME: Self = Self::Dashboard;

    pub fn group(&self) -> SectionGroup {
        match self {
            Self::Dashboard => SectionGroup::Home,
            Self::Companies | Self::Users | Self::Settings | Self::AuditLogs | Self::Reports => {
                SectionGroup::Strategic
            }
            Self::Employees
            | Self::Departments
            | Self::LeaveRequests
            | Self::Performance
            | Self::Payroll
            | Self::Training
            | Self::Team => SectionGroup::Operational,
            Self::MyProfile | Self::MyLeave | Self::MyPayslips | Self::MyTraining => {
                SectionGroup::SelfService
            }
        }
    }

    /// Capability a role must hold for the section to be meaningful.
    pub fn required_capability(&self) -> Option<Capability> {
        let resource = match self {
            Self::Dashboard | Self::MyProfile => return None,
            Self::Companies => Resource::Company,
            Self::Users => Resource::User,
            Self::Settings => Resource::Settings,
            Self::AuditLogs => Resource::AuditLog,
            Self::Reports => Resource::Report,
            Self::Employees | Self::Team => Resource::Employee,
            Self::Departments => Resource::Department,
            Self::LeaveRequests | Self::MyLeave => Resource::Leave,
            Self::Performance => Resource::Performance,
            Self::Payroll | Self::MyPayslips => Resource::Payroll,
            Self::Training | Self::MyTraining => Resource::Training,
        };
        Some(Capability::new(resource, Verb::View))
    }

    /// Menu title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Companies => "Companies",
            Self::Users => "Users",
            Self::Settings => "Settings",
            Self::AuditLogs => "Audit Logs",
            Self::Reports => "Reports",
            Self::Employees => "Employees",
            Self::Departments => "Departments",
            Self::LeaveRequests => "Leave Requests",
            Self::Performance => "Performance",
            Self::Payroll => "Payroll",
            Self::Training => "Training",
            Self::Team => "My Team",
            Self::MyProfile => "My Profile",
            Self::MyLeave => "My Leave",
            Self::MyPayslips => "My Payslips",
            Self::MyTraining => "My Training",
        }
    }

    /// Sort key: group first, then priority within the group.
    pub(crate) fn order_key(&self) -> (SectionGroup, Self) {
        (self.group(), *self)
    }
}
