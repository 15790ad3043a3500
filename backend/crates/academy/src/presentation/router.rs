//! Academy Routers
//!
//! Three groups so the binary can put each behind its own access policy.
//! All are mounted at `/api`.

use axum::{
    Router,
    routing::{get, post},
};

use crate::domain::repository::{NewsRepository, ProgressRepository};
use crate::presentation::handlers::{self, AcademyAppState};

/// Open to anonymous callers
pub fn public_routes<R>(state: AcademyAppState<R>) -> Router
where
    R: NewsRepository + ProgressRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/catalog", get(handlers::catalog))
        .route("/catalog/{category}", get(handlers::catalog_category))
        .route("/courses/{slug}", get(handlers::course_summary))
        .route("/market/ticker", get(handlers::market_ticker::<R>))
        .route("/nav", get(handlers::nav::<R>))
        .with_state(state)
}

/// Require a signed-in `Principal`
pub fn member_routes<R>(state: AcademyAppState<R>) -> Router
where
    R: NewsRepository + ProgressRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/courses/{slug}/lessons", get(handlers::watch_lesson::<R>))
        .route(
            "/courses/{slug}/lessons/{id}/complete",
            post(handlers::complete_lesson::<R>),
        )
        .with_state(state)
}

/// Require an entitled `Principal`
pub fn entitled_routes<R>(state: AcademyAppState<R>) -> Router
where
    R: NewsRepository + ProgressRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/news", get(handlers::list_news::<R>))
        .route("/news/{id}", get(handlers::news_detail::<R>))
        .with_state(state)
}
