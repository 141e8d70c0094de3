//! Resources, verbs and the capabilities that pair them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Resource types that can be acted upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Resource {
    Company,
    User,
    Employee,
    Department,
    Leave,
    Performance,
    Payroll,
    Training,
    Report,
    AuditLog,
    Settings,
}

impl Resource {
    /// All resource types.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

/// Record-level verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Verb {
    View,
    Create,
    Update,
    Delete,
    Approve,
    Export,
}

impl Verb {
    /// All verbs.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// True for verbs that change stored state.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::View | Self::Export)
    }
}

/// A single `(resource, verb)` grant, written `resource:verb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Capability {
    pub resource: Resource,
    pub verb: Verb,
}

impl Capability {
    pub fn new(resource: Resource, verb: Verb) -> Self {
        Self { resource, verb }
    }

    /// Parse from loose text; `None` if either half is unknown.
    pub fn from_parts(resource: &str, verb: &str) -> Option<Self> {
        let resource = Resource::from_str(resource).ok()?;
        let verb = Verb::from_str(verb).ok()?;
        Some(Self::new(resource, verb))
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.verb)
    }
}

/// Error parsing a `resource:verb` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityParseError(pub String);

impl fmt::Display for CapabilityParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid capability: {}", self.0)
    }
}

impl std::error::Error for CapabilityParseError {}

impl FromStr for Capability {
    type Err = CapabilityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (resource, verb) = s
            .split_once(':')
            .ok_or_else(|| CapabilityParseError(s.to_string()))?;
        Self::from_parts(resource, verb).ok_or_else(|| CapabilityParseError(s.to_string()))
    }
}
