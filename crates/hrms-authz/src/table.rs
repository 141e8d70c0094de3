//! The static role table.
//!
//! This is the single source of truth for what each role may see and do.
//! It is built once on first use and never mutated afterwards.

use crate::capability::{Capability, Resource, Verb};
use crate::navigation::NavigationSection;
use crate::role::Role;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use strum::IntoEnumIterator;

/// Role label synonyms, matched after lower-casing.
pub const ROLE_ALIASES: &[(&str, Role)] = &[
    ("super_admin", Role::Owner),
    ("hr", Role::HrManager),
    ("human_resources", Role::HrManager),
    ("hr_staff", Role::HrSpecialist),
    ("manager", Role::DepartmentManager),
    ("dept_manager", Role::DepartmentManager),
    ("staff", Role::Employee),
];

/// Navigation sections and capabilities granted to one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilitySet {
    /// `None` for the least-privilege default.
    pub role: Option<Role>,
    navigation: Vec<NavigationSection>,
    capabilities: BTreeSet<Capability>,
}

impl CapabilitySet {
    fn new(role: Option<Role>) -> Self {
        Self {
            role,
            navigation: Vec::new(),
            capabilities: BTreeSet::new(),
        }
    }

    /// Grant one verb on a resource.
    fn with_permission(mut self, resource: Resource, verb: Verb) -> Self {
        self.capabilities.insert(Capability::new(resource, verb));
        self
    }

    /// Grant several verbs on a resource.
    fn with_verbs(mut self, resource: Resource, verbs: &[Verb]) -> Self {
        for verb in verbs {
            self.capabilities.insert(Capability::new(resource, *verb));
        }
        self
    }

    /// Grant every verb on a resource.
    fn with_full_access(mut self, resource: Resource) -> Self {
        for verb in Verb::all() {
            self.capabilities.insert(Capability::new(resource, verb));
        }
        self
    }

    fn without(mut self, resource: Resource, verb: Verb) -> Self {
        self.capabilities.remove(&Capability::new(resource, verb));
        self
    }

    /// Set the visible sections; they are stored in display order.
    fn with_sections(mut self, sections: &[NavigationSection]) -> Self {
        let mut sections = sections.to_vec();
        sections.sort_by_key(|s| s.order_key());
        sections.dedup();
        self.navigation = sections;
        self
    }

    /// Ordered navigation sections.
    pub fn navigation(&self) -> &[NavigationSection] {
        &self.navigation
    }

    /// Every granted capability, in a stable order.
    pub fn capabilities(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.iter()
    }

    /// Set-membership test.
    pub fn allows(&self, resource: Resource, verb: Verb) -> bool {
        self.capabilities.contains(&Capability::new(resource, verb))
    }

    /// Check if a section is visible.
    pub fn shows(&self, section: NavigationSection) -> bool {
        self.navigation.contains(&section)
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

/// Role table with the predefined roles.
pub struct RoleTable {
    roles: HashMap<Role, CapabilitySet>,
    fallback: CapabilitySet,
}

static GLOBAL: Lazy<RoleTable> = Lazy::new(RoleTable::new);

impl RoleTable {
    fn new() -> Self {
        let mut roles = HashMap::new();
        for role in Role::all() {
            roles.insert(role, Self::definition(role));
        }
        Self {
            roles,
            fallback: Self::default_set(),
        }
    }

    /// The process-wide table.
    pub fn global() -> &'static RoleTable {
        &GLOBAL
    }

    /// Look up a role; `None` yields the least-privilege default.
    pub fn get(&self, role: Option<Role>) -> &CapabilitySet {
        role.and_then(|r| self.roles.get(&r)).unwrap_or(&self.fallback)
    }

    /// The set handed to unrecognized roles: home only, no capabilities.
    pub fn fallback(&self) -> &CapabilitySet {
        &self.fallback
    }

    fn default_set() -> CapabilitySet {
        CapabilitySet::new(None).with_sections(&[NavigationSection::HOME])
    }

    fn definition(role: Role) -> CapabilitySet {
        match role {
            Role::Owner => Self::owner_role(),
            Role::Admin => Self::admin_role(),
            Role::HrManager => Self::hr_manager_role(),
            Role::HrSpecialist => Self::hr_specialist_role(),
            Role::DepartmentManager => Self::department_manager_role(),
            Role::Employee => Self::employee_role(),
        }
    }

    fn owner_role() -> CapabilitySet {
        use NavigationSection::*;
        Resource::iter()
            .fold(CapabilitySet::new(Some(Role::Owner)), |set, r| set.with_full_access(r))
            .with_sections(&[
                Dashboard, Companies, Users, Settings, AuditLogs, Reports, Employees,
                Departments, LeaveRequests, Performance, Payroll, Training,
            ])
    }

    fn admin_role() -> CapabilitySet {
        use NavigationSection::*;
        Resource::iter()
            .fold(CapabilitySet::new(Some(Role::Admin)), |set, r| set.with_full_access(r))
            .without(Resource::Company, Verb::Delete)
            .with_sections(&[
                Dashboard, Users, Settings, AuditLogs, Reports, Employees, Departments,
                LeaveRequests, Performance, Payroll, Training,
            ])
    }

    fn hr_manager_role() -> CapabilitySet {
        use NavigationSection::*;
        CapabilitySet::new(Some(Role::HrManager))
            .with_full_access(Resource::Employee)
            .with_full_access(Resource::Department)
            .with_full_access(Resource::Leave)
            .with_full_access(Resource::Performance)
            .with_full_access(Resource::Payroll)
            .with_full_access(Resource::Training)
            .with_verbs(Resource::Report, &[Verb::View, Verb::Export])
            .with_permission(Resource::AuditLog, Verb::View)
            .with_permission(Resource::User, Verb::View)
            .with_sections(&[
                Dashboard, AuditLogs, Reports, Employees, Departments, LeaveRequests,
                Performance, Payroll, Training, MyProfile,
            ])
    }

    fn hr_specialist_role() -> CapabilitySet {
        use NavigationSection::*;
        let edit = [Verb::View, Verb::Create, Verb::Update];
        CapabilitySet::new(Some(Role::HrSpecialist))
            .with_verbs(Resource::Employee, &edit)
            .with_verbs(Resource::Leave, &edit)
            .with_verbs(Resource::Training, &edit)
            .with_permission(Resource::Performance, Verb::View)
            .with_permission(Resource::Department, Verb::View)
            .with_permission(Resource::Report, Verb::View)
            .with_sections(&[
                Dashboard, Reports, Employees, Departments, LeaveRequests, Performance,
                Training, MyProfile,
            ])
    }

    fn department_manager_role() -> CapabilitySet {
        use NavigationSection::*;
        CapabilitySet::new(Some(Role::DepartmentManager))
            .with_permission(Resource::Employee, Verb::View)
            .with_verbs(Resource::Leave, &[Verb::View, Verb::Approve])
            .with_verbs(Resource::Performance, &[Verb::View, Verb::Create, Verb::Update])
            .with_permission(Resource::Training, Verb::View)
            .with_permission(Resource::Department, Verb::View)
            .with_permission(Resource::Report, Verb::View)
            .with_sections(&[
                Dashboard, Reports, Team, LeaveRequests, Performance, Training, MyProfile,
                MyLeave,
            ])
    }

    fn employee_role() -> CapabilitySet {
        use NavigationSection::*;
        CapabilitySet::new(Some(Role::Employee))
            .with_permission(Resource::Employee, Verb::View)
            .with_verbs(Resource::Leave, &[Verb::View, Verb::Create])
            .with_permission(Resource::Payroll, Verb::View)
            .with_permission(Resource::Training, Verb::View)
            .with_permission(Resource::Performance, Verb::View)
            .with_sections(&[Dashboard, MyProfile, MyLeave, MyPayslips, MyTraining])
    }
}
