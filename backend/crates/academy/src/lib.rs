//! Academy (Learning Content) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Catalog, courses, news, market quotes, navigation rules
//! - `application/` - Use cases and the market ticker service
//! - `infra/` - PostgreSQL, in-memory, and CoinGecko implementations
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Features
//! - Course catalog grouped by category, plus an "all classes" listing
//! - Lesson player navigation with durable completion progress
//! - News feed with Indonesian relative-time labels
//! - Price ticker refreshed in the background
//! - Navigation shell state (menu, visibility, community link per host)
//!
//! Identity comes from `kernel::principal`; the access policy is enforced by
//! the caller's middleware, not here.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::{AcademyConfig, MarketTicker, TickerHandle};
pub use error::{AcademyError, AcademyResult};
pub use infra::{CoinGeckoSource, InMemoryAcademyRepository, PgAcademyRepository};
pub use presentation::{AcademyAppState, entitled_routes, member_routes, public_routes};
