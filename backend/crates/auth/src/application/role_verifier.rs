//! Local role verification against the session store

use std::sync::Arc;

use crate::application::check_session::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::repository::AuthSessionRepository;
use crate::domain::value_object::access::{AccessPolicy, RoleVerdict};
use crate::domain::verifier::RoleVerifier;
use crate::error::{AuthError, AuthResult};

pub struct SessionRoleVerifier<S>
where
    S: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    check: CheckSessionUseCase<S>,
}

impl<S> SessionRoleVerifier<S>
where
    S: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            check: CheckSessionUseCase::new(session_repo, config),
        }
    }
}

impl<S> RoleVerifier for SessionRoleVerifier<S>
where
    S: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    async fn verify(&self, token: &str, policy: AccessPolicy) -> AuthResult<RoleVerdict> {
        match self.check.execute(token).await {
            Ok(output) if policy.admits(&output.principal) => {
                Ok(RoleVerdict::Granted(output.principal))
            }
            Ok(_) => Ok(RoleVerdict::Forbidden),
            Err(AuthError::SessionInvalid) => Ok(RoleVerdict::Unauthorized),
            Err(e) => Err(e),
        }
    }
}
