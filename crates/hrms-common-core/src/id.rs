//! Strongly-typed identifiers.
//!
//! Identifiers are issued by the surrounding application (user accounts,
//! tenant companies), so they wrap the text form as received rather than
//! minting new values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Actor id used for automated actions with no human principal.
pub const SYSTEM_USER_ID: &str = "system";

/// A strongly-typed ID wrapper.
macro_rules! define_id {
    ($name:ident, $what:literal) => {
        #[doc = concat!("Identifier of a ", $what, ".")]
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an identifier without validation.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Parse from string, rejecting blank input.
            pub fn parse(s: &str) -> Result<Self, IdParseError> {
                if s.trim().is_empty() {
                    return Err(IdParseError::Blank);
                }
                Ok(Self(s.to_string()))
            }

            /// Get the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True when the identifier is empty or whitespace.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Error parsing an ID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    /// The ID is empty or whitespace only.
    #[error("identifier must not be blank")]
    Blank,
}

define_id!(UserId, "user account");
define_id!(CompanyId, "tenant company");

impl UserId {
    /// The sentinel actor for automated actions.
    pub fn system() -> Self {
        Self::new(SYSTEM_USER_ID)
    }

    /// Check for the system sentinel.
    pub fn is_system(&self) -> bool {
        self.0 == SYSTEM_USER_ID
    }
}
