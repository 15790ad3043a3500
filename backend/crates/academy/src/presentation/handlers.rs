//! HTTP Handlers
//!
//! Lesson and news handlers sit behind the access middleware and read the
//! caller from request extensions.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, header};
use axum::{Extension, Json};
use chrono::Utc;
use kernel::id::NewsId;
use kernel::principal::{Principal, Viewer};

use crate::application::config::AcademyConfig;
use crate::application::{
    BrowseCatalogUseCase, NavigationUseCase, ReadNewsUseCase, TickerHandle, WatchLessonInput,
    WatchLessonUseCase,
};
use crate::domain::market::TickerSnapshot;
use crate::domain::repository::{NewsRepository, ProgressRepository};
use crate::error::{AcademyError, AcademyResult};
use crate::presentation::dto::{
    CatalogResponse, CategoryResponse, CompleteQuery, CompletionResponse, CourseSummaryResponse,
    LessonQuery, LessonViewResponse, NavQuery, NavResponse, NewsResponse,
};

/// Shared state for academy handlers
#[derive(Clone)]
pub struct AcademyAppState<R>
where
    R: NewsRepository + ProgressRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AcademyConfig>,
    pub ticker: TickerHandle,
}

impl<R> AcademyAppState<R>
where
    R: NewsRepository + ProgressRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, config: AcademyConfig, ticker: TickerHandle) -> Self {
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
            ticker,
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// GET /api/catalog
pub async fn catalog() -> Json<CatalogResponse> {
    Json(BrowseCatalogUseCase::new().overview().into())
}

/// GET /api/catalog/{category}
pub async fn catalog_category(Path(category): Path<String>) -> AcademyResult<Json<CategoryResponse>> {
    let listing = BrowseCatalogUseCase::new().category(&category)?;
    Ok(Json(listing.into()))
}

/// GET /api/courses/{slug}
pub async fn course_summary(Path(slug): Path<String>) -> AcademyResult<Json<CourseSummaryResponse>> {
    let summary = BrowseCatalogUseCase::new().course(&slug)?;
    Ok(Json(summary.into()))
}

// ============================================================================
// Lessons
// ============================================================================

/// GET /api/courses/{slug}/lessons?id=&next=
pub async fn watch_lesson<R>(
    State(state): State<AcademyAppState<R>>,
    Extension(principal): Extension<Principal>,
    Path(slug): Path<String>,
    Query(query): Query<LessonQuery>,
) -> AcademyResult<Json<LessonViewResponse>>
where
    R: NewsRepository + ProgressRepository + Clone + Send + Sync + 'static,
{
    let use_case = WatchLessonUseCase::new(state.repo.clone());
    let view = use_case
        .execute(
            &principal.user_id,
            WatchLessonInput {
                course_slug: slug,
                lesson_id: query.id,
                next: query.next,
            },
        )
        .await?;

    Ok(Json(view.into()))
}

/// POST /api/courses/{slug}/lessons/{id}/complete
pub async fn complete_lesson<R>(
    State(state): State<AcademyAppState<R>>,
    Extension(principal): Extension<Principal>,
    Path((slug, lesson_id)): Path<(String, String)>,
    Query(query): Query<CompleteQuery>,
) -> AcademyResult<Json<CompletionResponse>>
where
    R: NewsRepository + ProgressRepository + Clone + Send + Sync + 'static,
{
    let use_case = WatchLessonUseCase::new(state.repo.clone());
    let out = use_case
        .complete(&principal.user_id, &slug, &lesson_id, query.next.as_deref())
        .await?;

    Ok(Json(out.into()))
}

// ============================================================================
// News
// ============================================================================

/// GET /api/news
pub async fn list_news<R>(State(state): State<AcademyAppState<R>>) -> AcademyResult<Json<Vec<NewsResponse>>>
where
    R: NewsRepository + ProgressRepository + Clone + Send + Sync + 'static,
{
    let cards = ReadNewsUseCase::new(state.repo.clone()).list(Utc::now()).await?;
    Ok(Json(cards.into_iter().map(Into::into).collect()))
}

/// GET /api/news/{id}
pub async fn news_detail<R>(
    State(state): State<AcademyAppState<R>>,
    Path(id): Path<String>,
) -> AcademyResult<Json<NewsResponse>>
where
    R: NewsRepository + ProgressRepository + Clone + Send + Sync + 'static,
{
    // A malformed id cannot match any row
    let id: NewsId = id.parse().map_err(|_| AcademyError::NewsNotFound)?;
    let card = ReadNewsUseCase::new(state.repo.clone())
        .detail(&id, Utc::now())
        .await?;

    Ok(Json(card.into()))
}

// ============================================================================
// Market
// ============================================================================

/// GET /api/market/ticker
pub async fn market_ticker<R>(State(state): State<AcademyAppState<R>>) -> AcademyResult<Json<TickerSnapshot>>
where
    R: NewsRepository + ProgressRepository + Clone + Send + Sync + 'static,
{
    state.ticker.latest().map(Json)
}

// ============================================================================
// Navigation
// ============================================================================

/// GET /api/nav?path=
pub async fn nav<R>(
    State(state): State<AcademyAppState<R>>,
    viewer: Option<Extension<Viewer>>,
    headers: HeaderMap,
    Query(query): Query<NavQuery>,
) -> Json<NavResponse>
where
    R: NewsRepository + ProgressRepository + Clone + Send + Sync + 'static,
{
    let viewer = viewer.map(|Extension(v)| v).unwrap_or_default();
    let host = headers.get(header::HOST).and_then(|h| h.to_str().ok());

    let shell = NavigationUseCase::new(state.config.clone()).execute(&viewer, &query.path, host);
    Json(shell.into())
}
