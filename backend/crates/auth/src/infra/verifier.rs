//! Role verifier implementations selected at startup

use std::time::Duration;

use kernel::principal::Principal;
use reqwest::StatusCode;

use crate::application::role_verifier::SessionRoleVerifier;
use crate::domain::repository::AuthSessionRepository;
use crate::domain::value_object::access::{AccessPolicy, RoleVerdict};
use crate::domain::verifier::RoleVerifier;
use crate::error::{AuthError, AuthResult};

/// Calls a remote `/verify-role` endpoint with the caller's token
#[derive(Debug, Clone)]
pub struct HttpRoleVerifier {
    client: reqwest::Client,
    url: String,
}

impl HttpRoleVerifier {
    pub fn new(url: impl Into<String>) -> AuthResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl RoleVerifier for HttpRoleVerifier {
    async fn verify(&self, token: &str, policy: AccessPolicy) -> AuthResult<RoleVerdict> {
        let resp = self
            .client
            .get(&self.url)
            .query(&[("scope", policy.scope())])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::VerifierUnavailable(e.to_string()))?;

        match resp.status() {
            StatusCode::OK => {
                let principal = resp
                    .json::<Principal>()
                    .await
                    .map_err(|e| AuthError::VerifierUnavailable(format!("bad body: {e}")))?;
                Ok(RoleVerdict::Granted(principal))
            }
            StatusCode::UNAUTHORIZED => Ok(RoleVerdict::Unauthorized),
            StatusCode::FORBIDDEN => Ok(RoleVerdict::Forbidden),
            StatusCode::TOO_MANY_REQUESTS => Ok(RoleVerdict::RateLimited),
            status => Err(AuthError::VerifierUnavailable(format!(
                "unexpected status {status}"
            ))),
        }
    }
}

/// The verifier the gate runs with: the local session store, or a remote
/// deployment when `ROLE_VERIFY_URL` is set.
pub enum AnyRoleVerifier<S>
where
    S: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    Session(SessionRoleVerifier<S>),
    Remote(HttpRoleVerifier),
}

impl<S> RoleVerifier for AnyRoleVerifier<S>
where
    S: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    async fn verify(&self, token: &str, policy: AccessPolicy) -> AuthResult<RoleVerdict> {
        match self {
            AnyRoleVerifier::Session(v) => v.verify(token, policy).await,
            AnyRoleVerifier::Remote(v) => v.verify(token, policy).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use kernel::id::UserId;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn verifier_answering(
        status: u16,
        body: Option<serde_json::Value>,
    ) -> (MockServer, HttpRoleVerifier) {
        let server = MockServer::start().await;
        let mut template = ResponseTemplate::new(status);
        if let Some(body) = body {
            template = template.set_body_json(body);
        }
        Mock::given(method("GET"))
            .and(path("/api/auth/verify-role"))
            .and(query_param("scope", "entitlement"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(template)
            .mount(&server)
            .await;

        let verifier = HttpRoleVerifier::new(format!("{}/api/auth/verify-role", server.uri())).unwrap();
        (server, verifier)
    }

    #[tokio::test]
    async fn test_granted_parses_principal() {
        let user_id = UserId::new();
        let (_server, verifier) = verifier_answering(
            200,
            Some(serde_json::json!({
                "userId": user_id,
                "username": "cz",
                "role": "student",
                "entitled": true
            })),
        )
        .await;

        let verdict = verifier.verify("tok", AccessPolicy::Entitled).await.unwrap();
        match verdict {
            RoleVerdict::Granted(p) => {
                assert_eq!(p.user_id, user_id);
                assert!(p.entitled);
            }
            other => panic!("expected grant, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_status_mapping() {
        for (status, expected) in [
            (401, RoleVerdict::Unauthorized),
            (403, RoleVerdict::Forbidden),
            (429, RoleVerdict::RateLimited),
        ] {
            let (_server, verifier) = verifier_answering(status, None).await;
            assert_eq!(
                verifier.verify("tok", AccessPolicy::Entitled).await.unwrap(),
                expected
            );
        }
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let (_server, verifier) = verifier_answering(500, None).await;
        assert!(matches!(
            verifier.verify("tok", AccessPolicy::Entitled).await,
            Err(AuthError::VerifierUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_garbage_body_is_unavailable() {
        let (_server, verifier) = verifier_answering(200, Some(serde_json::json!({ "ok": true }))).await;
        assert!(matches!(
            verifier.verify("tok", AccessPolicy::Entitled).await,
            Err(AuthError::VerifierUnavailable(_))
        ));
    }
}
