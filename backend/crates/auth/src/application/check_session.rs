//! Check Session Use Case
//!
//! Resolves a session token to a live session. Every gated request goes
//! through here: signature, then row lookup, then expiry.

use std::sync::Arc;

use kernel::principal::Principal;

use crate::application::config::AuthConfig;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::AuthSessionRepository;
use crate::domain::value_object::session_token::SessionToken;
use crate::error::{AuthError, AuthResult};

pub struct SessionInfoOutput {
    pub principal: Principal,
    pub expires_at_ms: i64,
}

pub struct CheckSessionUseCase<S>
where
    S: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> CheckSessionUseCase<S>
where
    S: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, session_token: &str) -> AuthResult<SessionInfoOutput> {
        let session = self.get_session(session_token).await?;

        Ok(SessionInfoOutput {
            principal: session.principal(),
            expires_at_ms: session.expires_at_ms,
        })
    }

    /// Load the session, refresh its activity, and slide remember-me expiry
    pub async fn get_session(&self, session_token: &str) -> AuthResult<AuthSession> {
        let session_id = SessionToken::parse(session_token, &self.config.session_secret)?;

        let mut session = self
            .session_repo
            .find_by_id(&session_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if session.is_expired() {
            self.session_repo.delete(&session_id).await?;
            return Err(AuthError::SessionInvalid);
        }

        session.touch();

        let ttl_long = chrono::Duration::from_std(self.config.session_ttl_long)
            .map_err(|e| AuthError::Internal(format!("Invalid session TTL: {e}")))?;
        session.extend_if_needed(ttl_long);

        // Fire and forget
        let session_clone = session.clone();
        let repo = self.session_repo.clone();
        tokio::spawn(async move {
            if let Err(e) = repo.update(&session_clone).await {
                tracing::warn!(error = %e, "Failed to update session activity");
            }
        });

        Ok(session)
    }
}
