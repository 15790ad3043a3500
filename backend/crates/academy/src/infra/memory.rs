//! In-memory repository
//!
//! Backs use-case and router tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use kernel::id::{NewsId, UserId};

use crate::domain::news::NewsItem;
use crate::domain::repository::{NewsRepository, ProgressRepository};
use crate::error::{AcademyError, AcademyResult};

#[derive(Default)]
struct Tables {
    news: Vec<NewsItem>,
    /// (user, course) -> completed lesson ids
    progress: HashMap<(UserId, String), BTreeSet<String>>,
}

#[derive(Clone, Default)]
pub struct InMemoryAcademyRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryAcademyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_news(&self, item: NewsItem) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.news.push(item);
        }
    }

    fn with_tables<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> AcademyResult<T> {
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| AcademyError::Internal("Academy store lock poisoned".to_string()))?;
        Ok(f(&mut tables))
    }
}

impl NewsRepository for InMemoryAcademyRepository {
    async fn list_newest_first(&self) -> AcademyResult<Vec<NewsItem>> {
        self.with_tables(|t| {
            let mut items = t.news.clone();
            items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            items
        })
    }

    async fn find_by_id(&self, id: &NewsId) -> AcademyResult<Option<NewsItem>> {
        self.with_tables(|t| t.news.iter().find(|n| n.id == *id).cloned())
    }
}

impl ProgressRepository for InMemoryAcademyRepository {
    async fn mark_completed(
        &self,
        user_id: &UserId,
        course_slug: &str,
        lesson_id: &str,
    ) -> AcademyResult<()> {
        self.with_tables(|t| {
            t.progress
                .entry((*user_id, course_slug.to_string()))
                .or_default()
                .insert(lesson_id.to_string());
        })
    }

    async fn completed_lessons(
        &self,
        user_id: &UserId,
        course_slug: &str,
    ) -> AcademyResult<Vec<String>> {
        self.with_tables(|t| {
            t.progress
                .get(&(*user_id, course_slug.to_string()))
                .map(|ids| ids.iter().cloned().collect())
                .unwrap_or_default()
        })
    }
}
