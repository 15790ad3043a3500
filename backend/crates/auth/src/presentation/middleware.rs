//! Auth Middleware
//!
//! `require_access` guards content routes behind an [`AccessPolicy`].
//! `identify` only attaches the caller's identity, if any.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::principal::Viewer;

use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::access::{AccessPolicy, AccessState, DenyReason};
use crate::error::AuthError;
use crate::presentation::extract::session_token;
use crate::presentation::handlers::AuthAppState;

/// Middleware state: the auth state plus the policy one route group needs
#[derive(Clone)]
pub struct GateState<R>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub app: AuthAppState<R>,
    pub policy: AccessPolicy,
}

impl<R> GateState<R>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(app: AuthAppState<R>, policy: AccessPolicy) -> Self {
        Self { app, policy }
    }
}

/// Run the access gate; on grant expose `Principal` and `Viewer` to handlers
pub async fn require_access<R>(
    State(gate): State<GateState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let token = session_token(req.headers(), &gate.app.config.session_cookie_name);

    match gate.app.gate.resolve(token.as_deref(), gate.policy).await {
        AccessState::Granted { principal } => {
            req.extensions_mut().insert(Viewer(Some(principal.clone())));
            req.extensions_mut().insert(principal);
            Ok(next.run(req).await)
        }
        AccessState::Denied { reason } => Err(denial_response(&gate.app, reason, token.is_some())),
        // resolve never yields Loading
        AccessState::Loading => Err(
            AuthError::Internal("Access gate did not resolve".to_string()).into_response(),
        ),
    }
}

fn denial_response<R>(app: &AuthAppState<R>, reason: DenyReason, had_token: bool) -> Response
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    match reason {
        DenyReason::Unauthenticated => {
            let mut response = AuthError::SessionInvalid.into_response();
            let headers = response.headers_mut();
            headers.insert("x-auth-required", HeaderValue::from_static("true"));
            if had_token {
                if let Ok(clear) = HeaderValue::from_str(&app.config.cookie().build_delete_cookie()) {
                    headers.insert(header::SET_COOKIE, clear);
                }
            }
            response
        }
        DenyReason::NotEntitled => AuthError::NotEntitled.into_response(),
        DenyReason::RateLimited => AuthError::RateLimited {
            retry_after_secs: app.config.verify_backoff.max_delay.as_secs().max(1),
        }
        .into_response(),
        DenyReason::Unavailable => {
            AuthError::VerifierUnavailable("access gate".to_string()).into_response()
        }
    }
}

/// Attach `Viewer` without requiring a session. One verifier call, no
/// backoff: a public page never waits on a rate-limited verifier.
pub async fn identify<R>(
    State(app): State<AuthAppState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let viewer = match session_token(req.headers(), &app.config.session_cookie_name) {
        Some(token) => match app
            .gate
            .resolve_once(Some(&token), AccessPolicy::Authenticated)
            .await
        {
            AccessState::Granted { principal } => Viewer(Some(principal)),
            _ => Viewer::anonymous(),
        },
        None => Viewer::anonymous(),
    };

    req.extensions_mut().insert(viewer);
    next.run(req).await
}
