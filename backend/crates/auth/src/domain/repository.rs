//! Repository Traits
//!
//! Interfaces for persistence. Implementations live in `infra`.

use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::domain::value_object::{
    user_id::{SessionId, UserId},
    user_name::UserName,
};
use crate::error::AuthResult;

/// Read-only access to user accounts
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Match on the canonical user name. At most one record.
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;
}

/// Auth session repository trait
#[trait_variant::make(AuthSessionRepository: Send)]
pub trait LocalAuthSessionRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()>;

    /// Unexpired session by id
    async fn find_by_id(&self, session_id: &SessionId) -> AuthResult<Option<AuthSession>>;

    /// Persist activity time and (possibly extended) expiry
    async fn update(&self, session: &AuthSession) -> AuthResult<()>;

    async fn delete(&self, session_id: &SessionId) -> AuthResult<()>;

    /// Delete every session of a user, optionally keeping one
    async fn delete_all_for_user(
        &self,
        user_id: &UserId,
        except: Option<&SessionId>,
    ) -> AuthResult<u64>;

    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
