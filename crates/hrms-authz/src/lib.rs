//! Role-based authorization for HRMS.
//!
//! Maps a user's [`Role`] to the navigation sections and record-level
//! capabilities it is granted. Everything here is a pure function over a
//! static table built once per process:
//!
//! - [`resolve_navigation`] returns the ordered menu for a role string
//! - [`can`] answers a single `(role, resource, verb)` question
//! - [`resolve`] returns the whole [`CapabilitySet`]
//!
//! Unrecognized roles, resources and verbs never fail; they resolve to the
//! least-privilege default.

mod capability;
mod navigation;
mod resolver;
mod role;
mod table;

pub use capability::{Capability, Resource, Verb};
pub use navigation::{NavigationSection, SectionGroup};
pub use resolver::{can, can_role, resolve, resolve_navigation, resolve_role};
pub use role::Role;
pub use table::{CapabilitySet, RoleTable, ROLE_ALIASES};
