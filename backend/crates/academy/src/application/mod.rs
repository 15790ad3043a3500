//! Application Layer
//!
//! Use cases and the ticker service.

pub mod browse_catalog;
pub mod config;
pub mod market_ticker;
pub mod navigation;
pub mod read_news;
pub mod watch_lesson;

// Re-exports
pub use browse_catalog::BrowseCatalogUseCase;
pub use config::AcademyConfig;
pub use market_ticker::{MarketTicker, TickerHandle};
pub use navigation::{NavShell, NavigationUseCase};
pub use read_news::{NewsCard, ReadNewsUseCase};
pub use watch_lesson::{WatchLessonInput, WatchLessonUseCase};
