//! Read News Use Case

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::NewsId;

use crate::domain::news::{NewsItem, time_ago};
use crate::domain::repository::NewsRepository;
use crate::error::{AcademyError, AcademyResult};

#[derive(Debug, Clone, PartialEq)]
pub struct NewsCard {
    pub item: NewsItem,
    pub time_ago: String,
    /// Only the newest item
    pub featured: bool,
}

pub struct ReadNewsUseCase<N>
where
    N: NewsRepository + Send + Sync + 'static,
{
    news_repo: Arc<N>,
}

impl<N> ReadNewsUseCase<N>
where
    N: NewsRepository + Send + Sync + 'static,
{
    pub fn new(news_repo: Arc<N>) -> Self {
        Self { news_repo }
    }

    pub async fn list(&self, now: DateTime<Utc>) -> AcademyResult<Vec<NewsCard>> {
        let items = self.news_repo.list_newest_first().await?;

        Ok(items
            .into_iter()
            .enumerate()
            .map(|(i, item)| NewsCard {
                time_ago: time_ago(item.created_at, now),
                featured: i == 0,
                item,
            })
            .collect())
    }

    pub async fn detail(&self, id: &NewsId, now: DateTime<Utc>) -> AcademyResult<NewsCard> {
        let item = self
            .news_repo
            .find_by_id(id)
            .await?
            .ok_or(AcademyError::NewsNotFound)?;

        Ok(NewsCard {
            time_ago: time_ago(item.created_at, now),
            featured: false,
            item,
        })
    }
}
