use serde::{Deserialize, Serialize};
use std::fmt;

/// Role stored on the user record.
///
/// Only `Student` and `Admin` unlock premium content (news, live classes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Signed up, no paid enrollment
    #[default]
    Member,
    /// Enrolled in the academy
    Student,
    Admin,
}

impl UserRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Member => "member",
            Student => "student",
            Admin => "admin",
        }
    }

    #[inline]
    pub const fn is_entitled(&self) -> bool {
        matches!(self, UserRole::Student | UserRole::Admin)
    }

    /// Parse a stored role code. Unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        use UserRole::*;
        match code {
            "member" => Some(Member),
            "student" => Some(Student),
            "admin" => Some(Admin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
