//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};

use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::presentation::handlers::{self, AuthAppState};

/// Routes mounted at `/api/auth`
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/signin", post(handlers::sign_in::<R>))
        .route("/signout", post(handlers::sign_out::<R>))
        .route("/signout/all", post(handlers::sign_out_all::<R>))
        .route("/status", get(handlers::session_status::<R>))
        .route("/verify-role", get(handlers::verify_role::<R>))
        .route("/access", get(handlers::access::<R>))
        .route("/events", get(handlers::events::<R>))
        .with_state(state)
}
