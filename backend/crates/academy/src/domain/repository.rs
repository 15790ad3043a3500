//! Repository Traits
//!
//! Interfaces for persistence and market data. Implementations live in
//! `infra`.

use kernel::id::{NewsId, UserId};

use crate::domain::market::MarketQuote;
use crate::domain::news::NewsItem;
use crate::error::AcademyResult;

/// Read-only news store
#[trait_variant::make(NewsRepository: Send)]
pub trait LocalNewsRepository {
    /// Newest first
    async fn list_newest_first(&self) -> AcademyResult<Vec<NewsItem>>;

    async fn find_by_id(&self, id: &NewsId) -> AcademyResult<Option<NewsItem>>;
}

/// Durable lesson completion records
#[trait_variant::make(ProgressRepository: Send)]
pub trait LocalProgressRepository {
    /// Idempotent
    async fn mark_completed(
        &self,
        user_id: &UserId,
        course_slug: &str,
        lesson_id: &str,
    ) -> AcademyResult<()>;

    /// Lesson ids the user completed in one course
    async fn completed_lessons(
        &self,
        user_id: &UserId,
        course_slug: &str,
    ) -> AcademyResult<Vec<String>>;
}

/// Upstream quote feed
#[trait_variant::make(MarketDataSource: Send)]
pub trait LocalMarketDataSource {
    /// Quotes for the tracked assets, in upstream order
    async fn fetch_quotes(&self) -> AcademyResult<Vec<MarketQuote>>;
}
