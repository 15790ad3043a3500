//! Sign Out Use Case
//!
//! Deletes the current session, or every other session of its user, and
//! tells open event streams about it.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::events::{SessionEvent, SessionEvents};
use crate::domain::repository::AuthSessionRepository;
use crate::domain::value_object::session_token::SessionToken;
use crate::error::{AuthError, AuthResult};

pub struct SignOutUseCase<S>
where
    S: AuthSessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
    events: SessionEvents,
}

impl<S> SignOutUseCase<S>
where
    S: AuthSessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>, events: SessionEvents) -> Self {
        Self {
            session_repo,
            config,
            events,
        }
    }

    /// Sign out of the session the token names
    pub async fn execute(&self, session_token: &str) -> AuthResult<()> {
        let session_id = SessionToken::parse(session_token, &self.config.session_secret)?;
        let session = self.session_repo.find_by_id(&session_id).await?;
        self.session_repo.delete(&session_id).await?;

        if let Some(session) = session {
            self.events.publish(SessionEvent::SignedOut {
                session_id,
                user_id: session.user_id,
            });
        }

        tracing::info!(session_id = %session_id, "User signed out");
        Ok(())
    }

    /// Sign out of every session except the current one
    pub async fn execute_all(&self, session_token: &str) -> AuthResult<u64> {
        let session_id = SessionToken::parse(session_token, &self.config.session_secret)?;

        let session = self
            .session_repo
            .find_by_id(&session_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        let deleted = self
            .session_repo
            .delete_all_for_user(&session.user_id, Some(&session_id))
            .await?;

        self.events.publish(SessionEvent::SignedOutEverywhere {
            user_id: session.user_id,
            kept: Some(session_id),
        });

        tracing::info!(
            user_id = %session.user_id,
            deleted = deleted,
            "User signed out from all other sessions"
        );

        Ok(deleted)
    }
}
