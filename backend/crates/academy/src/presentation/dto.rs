//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::NewsId;
use serde::{Deserialize, Serialize};

use crate::application::browse_catalog::{CatalogOverview, CategoryListing, CourseSummary};
use crate::application::navigation::NavShell;
use crate::application::read_news::NewsCard;
use crate::application::watch_lesson::{CompletionOutput, LessonView};
use crate::domain::catalog::{CatalogItem, Category};
use crate::domain::course::NextStep;
use crate::domain::navigation::MenuItem;

// ============================================================================
// Catalog
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItemDto {
    pub title: String,
    pub image: String,
    pub link: String,
}

impl From<CatalogItem> for CatalogItemDto {
    fn from(item: CatalogItem) -> Self {
        Self {
            title: item.title.to_string(),
            image: item.image.to_string(),
            link: item.link,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub category: Category,
    pub title: String,
    pub items: Vec<CatalogItemDto>,
}

impl From<CategoryListing> for CategoryResponse {
    fn from(listing: CategoryListing) -> Self {
        Self {
            category: listing.category,
            title: listing.title.to_string(),
            items: listing.items.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub categories: Vec<CategoryResponse>,
    pub all_classes: Vec<CatalogItemDto>,
}

impl From<CatalogOverview> for CatalogResponse {
    fn from(overview: CatalogOverview) -> Self {
        Self {
            categories: overview.categories.into_iter().map(Into::into).collect(),
            all_classes: overview.all_classes.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonTitleDto {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSummaryResponse {
    pub slug: String,
    pub title: String,
    pub category: Category,
    pub image: String,
    pub lessons: Vec<LessonTitleDto>,
}

impl From<CourseSummary> for CourseSummaryResponse {
    fn from(summary: CourseSummary) -> Self {
        Self {
            slug: summary.slug.to_string(),
            title: summary.title.to_string(),
            category: summary.category,
            image: summary.image.to_string(),
            lessons: summary
                .lessons
                .into_iter()
                .map(|l| LessonTitleDto {
                    id: l.id.to_string(),
                    title: l.title.to_string(),
                })
                .collect(),
        }
    }
}

// ============================================================================
// Lessons
// ============================================================================

/// `?id=<lesson>&next=<destination>`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LessonQuery {
    pub id: Option<String>,
    pub next: Option<String>,
}

/// `?next=<destination>`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompleteQuery {
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDto {
    pub id: String,
    pub title: String,
    /// Absent when the lesson has no playable video
    pub embed_url: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonEntryDto {
    pub id: String,
    pub title: String,
    pub current: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonViewResponse {
    pub course_slug: String,
    pub course_title: String,
    pub lesson: LessonDto,
    pub position: usize,
    pub total: usize,
    pub progress_percent: u8,
    pub lessons: Vec<LessonEntryDto>,
    pub next: NextStep,
    pub next_module_link: Option<String>,
}

impl From<LessonView> for LessonViewResponse {
    fn from(view: LessonView) -> Self {
        Self {
            course_slug: view.course.slug.to_string(),
            course_title: view.course.title.to_string(),
            lesson: LessonDto {
                id: view.lesson.id.to_string(),
                title: view.lesson.title.to_string(),
                embed_url: view.embed_url,
                thumbnail: view.lesson.thumbnail.map(str::to_string),
            },
            position: view.position,
            total: view.total,
            progress_percent: view.progress_percent,
            lessons: view
                .lessons
                .into_iter()
                .map(|l| LessonEntryDto {
                    id: l.id.to_string(),
                    title: l.title.to_string(),
                    current: l.current,
                    completed: l.completed,
                })
                .collect(),
            next: view.next,
            next_module_link: view.next_module_link,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub completed_count: usize,
    pub total: usize,
    pub next: NextStep,
}

impl From<CompletionOutput> for CompletionResponse {
    fn from(out: CompletionOutput) -> Self {
        Self {
            completed_count: out.completed_count,
            total: out.total,
            next: out.next,
        }
    }
}

// ============================================================================
// News
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub id: NewsId,
    pub title: String,
    pub image: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// "5 menit yang lalu"
    pub time_ago: String,
    pub featured: bool,
}

impl From<NewsCard> for NewsResponse {
    fn from(card: NewsCard) -> Self {
        Self {
            id: card.item.id,
            title: card.item.title,
            image: card.item.image,
            content: card.item.content,
            created_at: card.item.created_at,
            time_ago: card.time_ago,
            featured: card.featured,
        }
    }
}

// ============================================================================
// Navigation
// ============================================================================

/// `?path=/menu/news`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NavQuery {
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavUserDto {
    pub username: String,
    pub initial: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavResponse {
    pub visible: bool,
    pub show_back: bool,
    pub user: Option<NavUserDto>,
    pub menu: Vec<MenuItem>,
}

impl From<NavShell> for NavResponse {
    fn from(shell: NavShell) -> Self {
        Self {
            visible: shell.visible,
            show_back: shell.show_back,
            user: shell.user.map(|u| NavUserDto {
                username: u.username,
                initial: u.initial,
            }),
            menu: shell.menu,
        }
    }
}
