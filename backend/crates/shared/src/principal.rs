//! Authenticated principal
//!
//! Produced by the access gate, consumed by content handlers through request
//! extensions. This is the explicit replacement for reading identity out of
//! shared client storage.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// The user a request acts for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: UserId,
    pub username: String,
    /// Role code (`member`, `student`, `admin`)
    pub role: String,
    /// Whether the role unlocks premium content
    pub entitled: bool,
}

/// Identity as seen by routes that work for anonymous callers too.
///
/// Inserted by the optional identification middleware.
#[derive(Debug, Clone, Default)]
pub struct Viewer(pub Option<Principal>);

impl Viewer {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.0.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}
