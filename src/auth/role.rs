//! Role claims

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role asserted by the backend for a verified token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Manages semesters, weeks, courses, emails and tasks
    Admin,
    /// Views assigned tasks and marks them done
    User,
}

impl Role {
    /// Get the role name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Parse a role claim; surrounding whitespace is ignored, case is not
    pub fn try_parse(s: &str) -> Option<Self> {
        match s.trim() {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    /// Get all roles
    pub fn all() -> &'static [Role] {
        &[Role::Admin, Role::User]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::try_parse(s).ok_or_else(|| format!("unknown role '{}'", s))
    }
}
