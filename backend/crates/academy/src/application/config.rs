//! Application Configuration

use std::time::Duration;

use crate::domain::navigation::{DomainConfig, default_domain_configs};

pub const COINGECKO_API_BASE: &str = "https://api.coingecko.com/api/v3";

#[derive(Debug, Clone)]
pub struct AcademyConfig {
    /// CoinGecko-compatible API root, without trailing slash
    pub market_api_base: String,
    /// Ticker refresh interval (60 seconds)
    pub ticker_refresh: Duration,
    /// Upstream request timeout
    pub market_timeout: Duration,
    /// Community link per hostname
    pub domain_configs: Vec<DomainConfig>,
}

impl Default for AcademyConfig {
    fn default() -> Self {
        Self {
            market_api_base: COINGECKO_API_BASE.to_string(),
            ticker_refresh: Duration::from_secs(60),
            market_timeout: Duration::from_secs(10),
            domain_configs: default_domain_configs(),
        }
    }
}

impl AcademyConfig {
    /// Development: slower refresh to stay under the public API quota
    pub fn development() -> Self {
        Self {
            ticker_refresh: Duration::from_secs(120),
            ..Default::default()
        }
    }

    pub fn with_market_api_base(mut self, base: impl Into<String>) -> Self {
        self.market_api_base = base.into().trim_end_matches('/').to_string();
        self
    }
}
