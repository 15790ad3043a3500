//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{NewsId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::news::NewsItem;
use crate::domain::repository::{NewsRepository, ProgressRepository};
use crate::error::AcademyResult;

#[derive(Clone)]
pub struct PgAcademyRepository {
    pool: PgPool,
}

impl PgAcademyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// News Repository Implementation
// ============================================================================

impl NewsRepository for PgAcademyRepository {
    async fn list_newest_first(&self) -> AcademyResult<Vec<NewsItem>> {
        let rows = sqlx::query_as::<_, NewsRow>(
            r#"
            SELECT id, title, image, content, created_at
            FROM news
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(NewsRow::into_news).collect())
    }

    async fn find_by_id(&self, id: &NewsId) -> AcademyResult<Option<NewsItem>> {
        let row = sqlx::query_as::<_, NewsRow>(
            r#"
            SELECT id, title, image, content, created_at
            FROM news
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(NewsRow::into_news))
    }
}

// ============================================================================
// Progress Repository Implementation
// ============================================================================

impl ProgressRepository for PgAcademyRepository {
    async fn mark_completed(
        &self,
        user_id: &UserId,
        course_slug: &str,
        lesson_id: &str,
    ) -> AcademyResult<()> {
        sqlx::query(
            r#"
            INSERT INTO lesson_progress (user_id, course_slug, lesson_id, completed_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, course_slug, lesson_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(course_slug)
        .bind(lesson_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn completed_lessons(
        &self,
        user_id: &UserId,
        course_slug: &str,
    ) -> AcademyResult<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>(
            r#"
            SELECT lesson_id
            FROM lesson_progress
            WHERE user_id = $1 AND course_slug = $2
            ORDER BY completed_at
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(course_slug)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct NewsRow {
    id: Uuid,
    title: String,
    image: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl NewsRow {
    fn into_news(self) -> NewsItem {
        NewsItem {
            id: NewsId::from_uuid(self.id),
            title: self.title,
            image: self.image,
            content: self.content,
            created_at: self.created_at,
        }
    }
}
