//! API DTOs (Data Transfer Objects)

use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::domain::value_object::access::AccessPolicy;

// ============================================================================
// Sign In
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: UserId,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    /// Same value as the session cookie, for `Authorization: Bearer`
    pub token: String,
    pub user: SessionUser,
    pub expires_at_ms: i64,
}

// ============================================================================
// Sign Out
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOutAllResponse {
    pub sessions_revoked: u64,
}

// ============================================================================
// Session Status
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    pub user: Option<SessionUser>,
    pub user_role: Option<String>,
    pub expires_at_ms: Option<i64>,
}

// ============================================================================
// Access
// ============================================================================

/// `?scope=session|entitlement`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ScopeQuery {
    #[serde(default)]
    pub scope: AccessPolicy,
}
