//! Sign In Use Case
//!
//! Authenticates a user by name and password and creates a session.
//! Every failure the caller can cause looks the same from outside.

use std::sync::Arc;

use platform::client::ClientInfo;

use crate::application::config::AuthConfig;
use crate::application::events::{SessionEvent, SessionEvents};
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::{
    session_token::SessionToken, user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

pub struct SignInInput {
    pub username: String,
    pub password: String,
    pub remember_me: bool,
}

pub struct SignInOutput {
    /// Signed token for the cookie and the `Authorization` header
    pub session_token: String,
    pub session: AuthSession,
}

pub struct SignInUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
    events: SessionEvents,
}

impl<U, S> SignInUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        session_repo: Arc<S>,
        config: Arc<AuthConfig>,
        events: SessionEvents,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
            events,
        }
    }

    pub async fn execute(&self, input: SignInInput, client: ClientInfo) -> AuthResult<SignInOutput> {
        let raw_password = RawPassword::new(input.password)?;
        let user_name =
            UserName::new(&input.username).map_err(|_| AuthError::InvalidCredentials)?;

        let Some(user) = self.user_repo.find_by_user_name(&user_name).await? else {
            UserPassword::verify_missing(&raw_password, self.config.pepper());
            return Err(AuthError::InvalidCredentials);
        };

        if !user.password_hash.verify(&raw_password, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        let ttl = chrono::Duration::from_std(self.config.session_ttl(input.remember_me))
            .map_err(|e| AuthError::Internal(format!("Invalid session TTL: {e}")))?;
        let session = AuthSession::new(&user, input.remember_me, &client, ttl);

        self.session_repo.create(&session).await?;

        let session_token = SessionToken::issue(&session.session_id, &self.config.session_secret);

        self.events.publish(SessionEvent::SignedIn {
            session_id: session.session_id,
            user_id: session.user_id,
        });

        tracing::info!(
            user_id = %user.user_id,
            session_id = %session.session_id,
            remember_me = input.remember_me,
            "User signed in"
        );

        Ok(SignInOutput {
            session_token,
            session,
        })
    }
}
