//! Audit actions.

use crate::label::title_case;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};

/// Verb recorded on an audit entry.
///
/// Stored and serialized upper-case (`CREATE`, `DELETE`, ...). Any other
/// tag is kept as [`AuditAction::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIter)]
#[derive(Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
    Logout,
    View,
    /// Extensible tag, normalized to upper case.
    Custom(String),
}

impl AuditAction {
    /// Parse case-insensitively; unknown tags become `Custom`.
    pub fn parse(s: &str) -> Self {
        let upper = s.to_uppercase();
        match upper.as_str() {
            "CREATE" => Self::Create,
            "UPDATE" => Self::Update,
            "DELETE" => Self::Delete,
            "LOGIN" => Self::Login,
            "LOGOUT" => Self::Logout,
            "VIEW" => Self::View,
            _ => Self::Custom(upper),
        }
    }

    /// Stored form.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::View => "VIEW",
            Self::Custom(tag) => tag,
        }
    }

    /// Display label for viewers. Total: custom tags are title-cased.
    pub fn label(&self) -> String {
        match self {
            Self::Create => "Created".to_string(),
            Self::Update => "Updated".to_string(),
            Self::Delete => "Deleted".to_string(),
            Self::Login => "Signed in".to_string(),
            Self::Logout => "Signed out".to_string(),
            Self::View => "Viewed".to_string(),
            Self::Custom(tag) => title_case(tag),
        }
    }

    /// The fixed vocabulary, without custom tags.
    pub fn standard() -> impl Iterator<Item = Self> {
        Self::iter().filter(|a| !a.is_custom())
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// True when the tag carries no text.
    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for AuditAction {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&str> for AuditAction {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<AuditAction> for String {
    fn from(action: AuditAction) -> Self {
        action.as_str().to_string()
    }
}
