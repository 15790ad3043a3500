//! Domain Layer
//!
//! Catalog, courses, news, market quotes and navigation rules, plus the
//! traits infrastructure implements.

pub mod catalog;
pub mod content;
pub mod course;
pub mod market;
pub mod navigation;
pub mod news;
pub mod repository;

// Re-exports
pub use catalog::{CatalogItem, Category};
pub use course::{CourseModule, Lesson, NextStep};
pub use market::{MarketQuote, TickerEntry, TickerSnapshot};
pub use navigation::{DomainConfig, MenuItem};
pub use news::NewsItem;
pub use repository::{MarketDataSource, NewsRepository, ProgressRepository};
