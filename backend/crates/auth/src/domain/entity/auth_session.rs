//! Auth Session Entity
//!
//! Server-side session row. Clients hold only the signed token naming it.

use chrono::{DateTime, Duration, Utc};
use kernel::principal::Principal;
use platform::client::ClientInfo;

use crate::domain::entity::user::User;
use crate::domain::value_object::{
    user_id::{SessionId, UserId},
    user_role::UserRole,
};

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub session_id: SessionId,
    pub user_id: UserId,
    /// User name at sign-in, for display without a user lookup
    pub user_name: String,
    /// Role at sign-in
    pub user_role: UserRole,
    /// Unix ms
    pub expires_at_ms: i64,
    pub remember_me: bool,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl AuthSession {
    /// TTL comes from configuration, chosen by `remember_me`.
    pub fn new(user: &User, remember_me: bool, client: &ClientInfo, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: SessionId::new(),
            user_id: user.user_id,
            user_name: user.user_name.original().to_string(),
            user_role: user.user_role,
            expires_at_ms: (now + ttl).timestamp_millis(),
            remember_me,
            client_ip: client.ip_string(),
            user_agent: client.user_agent.clone(),
            created_at: now,
            last_activity_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }

    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }

    pub fn remaining_ms(&self) -> i64 {
        (self.expires_at_ms - Utc::now().timestamp_millis()).max(0)
    }

    /// Slide a remember-me session to `now + ttl_long` once less than half
    /// of `ttl_long` remains. Other sessions never extend.
    pub fn extend_if_needed(&mut self, ttl_long: Duration) {
        if !self.remember_me {
            return;
        }

        let now = Utc::now();
        if self.expires_at_ms < (now + (ttl_long / 2)).timestamp_millis() {
            self.expires_at_ms = (now + ttl_long).timestamp_millis();
        }
    }

    /// Identity handed to content handlers
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.user_id,
            username: self.user_name.clone(),
            role: self.user_role.code().to_string(),
            entitled: self.user_role.is_entitled(),
        }
    }
}
