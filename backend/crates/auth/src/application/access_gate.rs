//! Access Gate
//!
//! Turns an optional token and a policy into an [`AccessState`]. A verifier
//! answering "rate limited" is retried on the configured backoff schedule;
//! everything else resolves on the first answer.

use std::sync::Arc;
use std::time::Duration;

use platform::backoff::Backoff;

use crate::domain::value_object::access::{AccessPolicy, AccessState, DenyReason, RoleVerdict};
use crate::domain::verifier::RoleVerifier;

pub struct AccessGate<V>
where
    V: RoleVerifier,
{
    verifier: Arc<V>,
    backoff: Backoff,
}

impl<V> Clone for AccessGate<V>
where
    V: RoleVerifier,
{
    fn clone(&self) -> Self {
        Self {
            verifier: self.verifier.clone(),
            backoff: self.backoff.clone(),
        }
    }
}

impl<V> AccessGate<V>
where
    V: RoleVerifier + Sync,
{
    pub fn new(verifier: Arc<V>, backoff: Backoff) -> Self {
        Self { verifier, backoff }
    }

    pub async fn resolve(&self, token: Option<&str>, policy: AccessPolicy) -> AccessState {
        self.resolve_with(token, policy, &self.backoff).await
    }

    /// Single verifier call. A rate-limited answer is not retried.
    pub async fn resolve_once(&self, token: Option<&str>, policy: AccessPolicy) -> AccessState {
        self.resolve_with(token, policy, &Backoff::fixed(Duration::ZERO, 0))
            .await
    }

    async fn resolve_with(
        &self,
        token: Option<&str>,
        policy: AccessPolicy,
        backoff: &Backoff,
    ) -> AccessState {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return AccessState::denied(DenyReason::Unauthenticated);
        };

        let mut retry = 0;
        loop {
            match self.verifier.verify(token, policy).await {
                Ok(RoleVerdict::Granted(principal)) => {
                    return if policy.admits(&principal) {
                        AccessState::Granted { principal }
                    } else {
                        AccessState::denied(DenyReason::NotEntitled)
                    };
                }
                Ok(RoleVerdict::Unauthorized) => {
                    return AccessState::denied(DenyReason::Unauthenticated);
                }
                Ok(RoleVerdict::Forbidden) => {
                    return AccessState::denied(DenyReason::NotEntitled);
                }
                Ok(RoleVerdict::RateLimited) => {
                    if !backoff.wait(retry).await {
                        tracing::warn!(
                            attempts = retry + 1,
                            scope = policy.scope(),
                            "Role verification still rate limited, giving up"
                        );
                        return AccessState::denied(DenyReason::RateLimited);
                    }
                    retry += 1;
                }
                Err(e) => {
                    tracing::warn!(error = %e, scope = policy.scope(), "Role verification failed");
                    return AccessState::denied(DenyReason::Unavailable);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use kernel::id::UserId;
    use kernel::principal::Principal;

    use super::*;
    use crate::error::{AuthError, AuthResult};

    /// Replays scripted verdicts and counts calls
    struct ScriptedVerifier {
        script: Mutex<VecDeque<AuthResult<RoleVerdict>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedVerifier {
        fn new(script: Vec<AuthResult<RoleVerdict>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    impl RoleVerifier for ScriptedVerifier {
        async fn verify(&self, _token: &str, _policy: AccessPolicy) -> AuthResult<RoleVerdict> {
            *self.calls.lock().unwrap() += 1;
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(RoleVerdict::RateLimited))
        }
    }

    fn principal(entitled: bool) -> Principal {
        Principal {
            user_id: UserId::new(),
            username: "vitalik".to_string(),
            role: (if entitled { "student" } else { "member" }).to_string(),
            entitled,
        }
    }

    #[tokio::test]
    async fn test_missing_token_denied_without_call() {
        let verifier = ScriptedVerifier::new(vec![]);
        let gate = AccessGate::new(verifier.clone(), Backoff::default());

        let state = gate.resolve(None, AccessPolicy::Authenticated).await;
        assert_eq!(state, AccessState::denied(DenyReason::Unauthenticated));
        let state = gate.resolve(Some(""), AccessPolicy::Authenticated).await;
        assert_eq!(state, AccessState::denied(DenyReason::Unauthenticated));
        assert_eq!(verifier.calls(), 0);
    }

    #[tokio::test]
    async fn test_granted_checks_policy() {
        let p = principal(false);
        let verifier = ScriptedVerifier::new(vec![
            Ok(RoleVerdict::Granted(p.clone())),
            Ok(RoleVerdict::Granted(p.clone())),
        ]);
        let gate = AccessGate::new(verifier, Backoff::default());

        let state = gate.resolve(Some("t"), AccessPolicy::Authenticated).await;
        assert_eq!(state, AccessState::Granted { principal: p });

        let state = gate.resolve(Some("t"), AccessPolicy::Entitled).await;
        assert_eq!(state, AccessState::denied(DenyReason::NotEntitled));
    }

    #[tokio::test]
    async fn test_verdicts_map_to_reasons() {
        let verifier = ScriptedVerifier::new(vec![
            Ok(RoleVerdict::Unauthorized),
            Ok(RoleVerdict::Forbidden),
            Err(AuthError::VerifierUnavailable("connection refused".into())),
        ]);
        let gate = AccessGate::new(verifier, Backoff::default());

        assert_eq!(
            gate.resolve(Some("t"), AccessPolicy::Entitled).await,
            AccessState::denied(DenyReason::Unauthenticated)
        );
        assert_eq!(
            gate.resolve(Some("t"), AccessPolicy::Entitled).await,
            AccessState::denied(DenyReason::NotEntitled)
        );
        assert_eq!(
            gate.resolve(Some("t"), AccessPolicy::Entitled).await,
            AccessState::denied(DenyReason::Unavailable)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_retries_once_after_fixed_delay() {
        let p = principal(true);
        let verifier = ScriptedVerifier::new(vec![
            Ok(RoleVerdict::RateLimited),
            Ok(RoleVerdict::Granted(p.clone())),
        ]);
        let gate = AccessGate::new(verifier.clone(), Backoff::fixed(Duration::from_secs(5), 1));

        let started = tokio::time::Instant::now();
        let state = gate.resolve(Some("t"), AccessPolicy::Entitled).await;

        assert_eq!(state, AccessState::Granted { principal: p });
        assert_eq!(verifier.calls(), 2);
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(5) && waited < Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_exhausts_to_denied() {
        let verifier = ScriptedVerifier::new(vec![]);
        let gate = AccessGate::new(verifier.clone(), Backoff::fixed(Duration::from_secs(5), 1));

        let state = gate.resolve(Some("t"), AccessPolicy::Authenticated).await;
        assert_eq!(state, AccessState::denied(DenyReason::RateLimited));
        assert_eq!(verifier.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_backoff_is_bounded() {
        let verifier = ScriptedVerifier::new(vec![]);
        let gate = AccessGate::new(verifier.clone(), Backoff::default());

        let started = tokio::time::Instant::now();
        let state = gate.resolve(Some("t"), AccessPolicy::Authenticated).await;

        assert_eq!(state, AccessState::denied(DenyReason::RateLimited));
        // 1 attempt + 3 retries after 5s, 10s, 20s
        assert_eq!(verifier.calls(), 4);
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(35) && waited < Duration::from_secs(36));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_once_does_not_wait() {
        let verifier = ScriptedVerifier::new(vec![]);
        let gate = AccessGate::new(verifier.clone(), Backoff::default());

        let started = tokio::time::Instant::now();
        let state = gate.resolve_once(Some("t"), AccessPolicy::Authenticated).await;

        assert_eq!(state, AccessState::denied(DenyReason::RateLimited));
        assert_eq!(verifier.calls(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
