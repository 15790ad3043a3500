//! In-memory repository
//!
//! Backs use-case and router tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::{
    user_id::{SessionId, UserId},
    user_name::UserName,
};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct Tables {
    /// Keyed by canonical user name
    users: HashMap<String, User>,
    sessions: HashMap<SessionId, AuthSession>,
}

#[derive(Clone, Default)]
pub struct InMemoryAuthRepository {
    tables: Arc<Mutex<Tables>>,
    /// When set, every repository call fails like a dropped database
    unavailable: Arc<AtomicBool>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: User) {
        if let Ok(mut tables) = self.tables.lock() {
            tables
                .users
                .insert(user.user_name.canonical().to_string(), user);
        }
    }

    pub fn session_count(&self) -> usize {
        self.tables.lock().map(|t| t.sessions.len()).unwrap_or(0)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn with_tables<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> AuthResult<T> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AuthError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| AuthError::Internal("Session store lock poisoned".to_string()))?;
        Ok(f(&mut tables))
    }
}

impl UserRepository for InMemoryAuthRepository {
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        self.with_tables(|t| t.users.get(user_name.canonical()).cloned())
    }
}

impl AuthSessionRepository for InMemoryAuthRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        self.with_tables(|t| {
            t.sessions.insert(session.session_id, session.clone());
        })
    }

    async fn find_by_id(&self, session_id: &SessionId) -> AuthResult<Option<AuthSession>> {
        let now_ms = Utc::now().timestamp_millis();
        self.with_tables(|t| {
            t.sessions
                .get(session_id)
                .filter(|s| s.expires_at_ms > now_ms)
                .cloned()
        })
    }

    async fn update(&self, session: &AuthSession) -> AuthResult<()> {
        self.with_tables(|t| {
            if let Some(stored) = t.sessions.get_mut(&session.session_id) {
                stored.expires_at_ms = session.expires_at_ms;
                stored.last_activity_at = session.last_activity_at;
            }
        })
    }

    async fn delete(&self, session_id: &SessionId) -> AuthResult<()> {
        self.with_tables(|t| {
            t.sessions.remove(session_id);
        })
    }

    async fn delete_all_for_user(
        &self,
        user_id: &UserId,
        except: Option<&SessionId>,
    ) -> AuthResult<u64> {
        self.with_tables(|t| {
            let before = t.sessions.len();
            t.sessions
                .retain(|id, s| s.user_id != *user_id || Some(id) == except);
            (before - t.sessions.len()) as u64
        })
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();
        self.with_tables(|t| {
            let before = t.sessions.len();
            t.sessions.retain(|_, s| s.expires_at_ms >= now_ms);
            (before - t.sessions.len()) as u64
        })
    }
}
