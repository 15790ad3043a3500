//! Infrastructure Layer
//!
//! Database implementations and the market data client.

pub mod coingecko;
pub mod memory;
pub mod postgres;

pub use coingecko::CoinGeckoSource;
pub use memory::InMemoryAcademyRepository;
pub use postgres::PgAcademyRepository;
