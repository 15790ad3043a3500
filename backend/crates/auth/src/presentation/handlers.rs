//! HTTP Handlers

use std::convert::Infallible;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use kernel::principal::Principal;
use platform::client::ClientInfo;
use platform::rate_limit::{InMemoryRateLimitStore, RateLimitConfig, RateLimitStore};
use tokio::sync::broadcast::error::RecvError;

use crate::application::config::AuthConfig;
use crate::application::{
    AccessGate, CheckSessionUseCase, SessionEvents, SessionRoleVerifier, SignInInput,
    SignInUseCase, SignOutUseCase,
};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::access::{AccessState, DenyReason, RoleVerdict};
use crate::domain::value_object::session_token::SessionToken;
use crate::domain::verifier::RoleVerifier;
use crate::error::{AuthError, AuthResult};
use crate::infra::verifier::{AnyRoleVerifier, HttpRoleVerifier};
use crate::presentation::dto::{
    ScopeQuery, SessionStatusResponse, SessionUser, SignInRequest, SignInResponse,
    SignOutAllResponse,
};
use crate::presentation::extract::{Client, session_token};

/// Shared state for auth handlers and the access middleware
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub gate: AccessGate<AnyRoleVerifier<R>>,
    pub events: SessionEvents,
    pub limiter: Arc<InMemoryRateLimitStore>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    /// Gate backed by the local session store
    pub fn new(repo: R, config: AuthConfig) -> Self {
        let repo = Arc::new(repo);
        let config = Arc::new(config);
        let verifier = AnyRoleVerifier::Session(SessionRoleVerifier::new(repo.clone(), config.clone()));
        Self::assemble(repo, config, verifier)
    }

    /// Gate backed by another deployment's `/verify-role`
    pub fn with_remote_verifier(repo: R, config: AuthConfig, verifier: HttpRoleVerifier) -> Self {
        Self::assemble(Arc::new(repo), Arc::new(config), AnyRoleVerifier::Remote(verifier))
    }

    fn assemble(repo: Arc<R>, config: Arc<AuthConfig>, verifier: AnyRoleVerifier<R>) -> Self {
        let gate = AccessGate::new(Arc::new(verifier), config.verify_backoff.clone());
        Self {
            repo,
            config,
            gate,
            events: SessionEvents::default(),
            limiter: Arc::new(InMemoryRateLimitStore::new()),
        }
    }

    async fn enforce_rate_limit(
        &self,
        client: &ClientInfo,
        scope: &str,
        limit: &RateLimitConfig,
    ) -> AuthResult<()> {
        let result = self
            .limiter
            .check_and_increment(&client.rate_limit_key(scope), limit)
            .await
            .map_err(|e| AuthError::Internal(format!("Rate limiter: {e}")))?;

        if result.allowed {
            Ok(())
        } else {
            Err(AuthError::RateLimited {
                retry_after_secs: result.retry_after_secs(),
            })
        }
    }
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/signin
pub async fn sign_in<R>(
    State(state): State<AuthAppState<R>>,
    Client(client): Client,
    Json(req): Json<SignInRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    state
        .enforce_rate_limit(&client, "signin", &state.config.sign_in_rate_limit)
        .await?;

    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
        state.events.clone(),
    );

    let remember_me = req.remember_me;
    let input = SignInInput {
        username: req.username,
        password: req.password,
        remember_me,
    };

    let output = use_case.execute(input, client).await?;

    // Max-Age must match remember_me
    let cookie = state.config.cookie().build_set_cookie(
        &output.session_token,
        state.config.session_ttl(remember_me).as_secs(),
    );

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(SignInResponse {
            token: output.session_token,
            user: SessionUser {
                id: output.session.user_id,
                username: output.session.user_name,
            },
            expires_at_ms: output.session.expires_at_ms,
        }),
    ))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/signout
pub async fn sign_out<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> impl IntoResponse
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    if let Some(token) = session_token(&headers, &state.config.session_cookie_name) {
        let use_case =
            SignOutUseCase::new(state.repo.clone(), state.config.clone(), state.events.clone());
        // Ignore errors - just clear the cookie
        let _ = use_case.execute(&token).await;
    }

    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, state.config.cookie().build_delete_cookie())],
    )
}

/// POST /api/auth/signout/all
pub async fn sign_out_all<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<SignOutAllResponse>>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let token = session_token(&headers, &state.config.session_cookie_name)
        .ok_or(AuthError::SessionInvalid)?;

    let use_case =
        SignOutUseCase::new(state.repo.clone(), state.config.clone(), state.events.clone());
    let sessions_revoked = use_case.execute_all(&token).await?;

    Ok(Json(SignOutAllResponse { sessions_revoked }))
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/status
pub async fn session_status<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<SessionStatusResponse>>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let Some(token) = session_token(&headers, &state.config.session_cookie_name) else {
        return Ok(Json(anonymous_status()));
    };

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());

    match use_case.execute(&token).await {
        Ok(info) => Ok(Json(SessionStatusResponse {
            authenticated: true,
            user_role: Some(info.principal.role.clone()),
            user: Some(SessionUser {
                id: info.principal.user_id,
                username: info.principal.username,
            }),
            expires_at_ms: Some(info.expires_at_ms),
        })),
        Err(AuthError::SessionInvalid) => Ok(Json(anonymous_status())),
        Err(e) => Err(e),
    }
}

fn anonymous_status() -> SessionStatusResponse {
    SessionStatusResponse {
        authenticated: false,
        user: None,
        user_role: None,
        expires_at_ms: None,
    }
}

// ============================================================================
// Role Verification
// ============================================================================

/// GET /api/auth/verify-role?scope=
///
/// Always answers from this deployment's session store, even when the gate
/// itself delegates to a remote verifier.
pub async fn verify_role<R>(
    State(state): State<AuthAppState<R>>,
    Client(client): Client,
    headers: HeaderMap,
    Query(query): Query<ScopeQuery>,
) -> AuthResult<Json<Principal>>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    state
        .enforce_rate_limit(&client, "verify-role", &state.config.verify_rate_limit)
        .await?;

    let token = session_token(&headers, &state.config.session_cookie_name)
        .ok_or(AuthError::SessionInvalid)?;

    let verifier = SessionRoleVerifier::new(state.repo.clone(), state.config.clone());
    match verifier.verify(&token, query.scope).await? {
        RoleVerdict::Granted(principal) => Ok(Json(principal)),
        RoleVerdict::Unauthorized => Err(AuthError::SessionInvalid),
        RoleVerdict::Forbidden => Err(AuthError::NotEntitled),
        RoleVerdict::RateLimited => Err(AuthError::RateLimited { retry_after_secs: 1 }),
    }
}

// ============================================================================
// Access State
// ============================================================================

/// GET /api/auth/access?scope=
pub async fn access<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Query(query): Query<ScopeQuery>,
) -> Json<AccessState>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let token = session_token(&headers, &state.config.session_cookie_name);
    Json(state.gate.resolve(token.as_deref(), query.scope).await)
}

/// GET /api/auth/events?scope=
///
/// `access` events: `loading`, then the resolved state, then `denied` once
/// the session is signed out elsewhere.
pub async fn events<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Query(query): Query<ScopeQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let token = session_token(&headers, &state.config.session_cookie_name);
    // Subscribe before resolving so a concurrent sign-out is not missed
    let mut rx = state.events.subscribe();

    let stream = async_stream::stream! {
        yield Ok(access_event(&AccessState::Loading));

        let resolved = state.gate.resolve(token.as_deref(), query.scope).await;
        yield Ok(access_event(&resolved));

        let AccessState::Granted { principal } = resolved else {
            return;
        };
        let Some(session_id) = token
            .as_deref()
            .and_then(|t| SessionToken::parse(t, &state.config.session_secret).ok())
        else {
            return;
        };

        loop {
            match rx.recv().await {
                Ok(event) if event.ends(&session_id, &principal.user_id) => {
                    yield Ok(access_event(&AccessState::denied(DenyReason::Unauthenticated)));
                    break;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Session event stream lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn access_event(state: &AccessState) -> Event {
    Event::default()
        .event("access")
        .data(serde_json::to_string(state).unwrap_or_else(|_| "{}".to_string()))
}
