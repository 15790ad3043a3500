//! Browse Catalog Use Case
//!
//! Category listings and public course summaries. Content is compiled in,
//! so nothing here touches storage.

use crate::domain::catalog::{CatalogItem, Category};
use crate::domain::content;
use crate::error::{AcademyError, AcademyResult};

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryListing {
    pub category: Category,
    pub title: &'static str,
    pub items: Vec<CatalogItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogOverview {
    pub categories: Vec<CategoryListing>,
    pub all_classes: Vec<CatalogItem>,
}

/// Course card plus lesson titles. No media URLs.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseSummary {
    pub slug: &'static str,
    pub title: &'static str,
    pub category: Category,
    pub image: &'static str,
    pub lessons: Vec<LessonTitle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LessonTitle {
    pub id: &'static str,
    pub title: &'static str,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowseCatalogUseCase;

impl BrowseCatalogUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn overview(&self) -> CatalogOverview {
        let categories = Category::ALL.into_iter().map(listing).collect();

        CatalogOverview {
            categories,
            all_classes: content::all_classes(),
        }
    }

    pub fn category(&self, slug: &str) -> AcademyResult<CategoryListing> {
        Category::from_slug(slug)
            .map(listing)
            .ok_or(AcademyError::CategoryNotFound)
    }

    pub fn course(&self, slug: &str) -> AcademyResult<CourseSummary> {
        let course = content::find_course(slug).ok_or(AcademyError::CourseNotFound)?;

        Ok(CourseSummary {
            slug: course.slug,
            title: course.title,
            category: course.category,
            image: course.image,
            lessons: course
                .lessons
                .iter()
                .map(|l| LessonTitle {
                    id: l.id,
                    title: l.title,
                })
                .collect(),
        })
    }
}

fn listing(category: Category) -> CategoryListing {
    CategoryListing {
        category,
        title: category.title(),
        items: content::category_items(category),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_lists_every_category() {
        let overview = BrowseCatalogUseCase::new().overview();
        let categories: Vec<_> = overview.categories.iter().map(|c| c.category).collect();
        assert_eq!(categories, Category::ALL);

        let total: usize = overview.categories.iter().map(|c| c.items.len()).sum();
        assert_eq!(overview.all_classes.len(), total);
    }

    #[test]
    fn test_unknown_category() {
        assert!(matches!(
            BrowseCatalogUseCase::new().category("nft"),
            Err(AcademyError::CategoryNotFound)
        ));
    }

    #[test]
    fn test_course_summary() {
        let summary = BrowseCatalogUseCase::new()
            .course("cross-chain-technology")
            .unwrap();
        assert_eq!(summary.category, Category::Blockchain);
        assert_eq!(summary.lessons[0].id, "1");

        assert!(matches!(
            BrowseCatalogUseCase::new().course("missing"),
            Err(AcademyError::CourseNotFound)
        ));
    }
}
