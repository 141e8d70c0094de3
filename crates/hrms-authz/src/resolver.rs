//! Authorization resolver.
//!
//! Entry points take the role as given on the user record. Nothing here
//! reads ambient state; callers pass the acting role explicitly.

use crate::capability::{Capability, Resource, Verb};
use crate::navigation::NavigationSection;
use crate::role::Role;
use crate::table::{CapabilitySet, RoleTable};
use tracing::trace;

/// Parse a role label, logging when it falls back to the default.
pub fn resolve_role(role: &str) -> Option<Role> {
    let parsed = Role::parse(role);
    if parsed.is_none() {
        trace!(role = role, "Unrecognized role, using least-privilege default");
    }
    parsed
}

/// Ordered navigation sections for a role label.
///
/// Unrecognized labels get the home section only.
pub fn resolve_navigation(role: &str) -> Vec<NavigationSection> {
    resolve_capabilities(resolve_role(role)).navigation().to_vec()
}

/// Full capability set for a role label.
pub fn resolve(role: &str) -> CapabilitySet {
    resolve_capabilities(resolve_role(role)).clone()
}

/// Answer whether `role` may perform `verb` on `resource`.
///
/// Total over all inputs: anything not explicitly granted is `false`.
pub fn can(role: &str, resource: &str, verb: &str) -> bool {
    match Capability::from_parts(resource, verb) {
        Some(cap) => can_role(resolve_role(role), cap.resource, cap.verb),
        None => false,
    }
}

/// Typed form of [`can`].
pub fn can_role(role: Option<Role>, resource: Resource, verb: Verb) -> bool {
    resolve_capabilities(role).allows(resource, verb)
}

fn resolve_capabilities(role: Option<Role>) -> &'static CapabilitySet {
    RoleTable::global().get(role)
}
