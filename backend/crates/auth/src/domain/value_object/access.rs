//! Access gate vocabulary

use kernel::principal::Principal;
use serde::{Deserialize, Serialize};

/// What a protected area requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessPolicy {
    /// Any valid session (lessons)
    #[default]
    #[serde(alias = "session")]
    Authenticated,
    /// A session whose role unlocks premium content (news, live classes)
    #[serde(alias = "entitlement")]
    Entitled,
}

impl AccessPolicy {
    /// Scope name on the role-verification wire
    pub fn scope(&self) -> &'static str {
        match self {
            AccessPolicy::Authenticated => "session",
            AccessPolicy::Entitled => "entitlement",
        }
    }

    pub fn admits(&self, principal: &Principal) -> bool {
        match self {
            AccessPolicy::Authenticated => true,
            AccessPolicy::Entitled => principal.entitled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// No session, or the session is invalid/expired
    Unauthenticated,
    /// Valid session, role not allowed
    NotEntitled,
    /// Role verification kept answering 429
    RateLimited,
    /// Role verification could not be reached or answered nonsense
    Unavailable,
}

/// Tri-state outcome the client renders as spinner / redirect / content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AccessState {
    Loading,
    Denied { reason: DenyReason },
    Granted { principal: Principal },
}

impl AccessState {
    pub fn denied(reason: DenyReason) -> Self {
        AccessState::Denied { reason }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, AccessState::Granted { .. })
    }
}

/// One answer from a role verifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleVerdict {
    Granted(Principal),
    Unauthorized,
    Forbidden,
    RateLimited,
}
