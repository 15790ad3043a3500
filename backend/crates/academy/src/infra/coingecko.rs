//! CoinGecko market data source

use std::time::Duration;

use reqwest::StatusCode;

use crate::application::config::AcademyConfig;
use crate::domain::market::{MarketQuote, TRACKED_ASSETS};
use crate::domain::repository::MarketDataSource;
use crate::error::{AcademyError, AcademyResult};

/// `GET {base}/coins/markets` for the tracked assets, unauthenticated
#[derive(Debug, Clone)]
pub struct CoinGeckoSource {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AcademyResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AcademyError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AcademyConfig) -> AcademyResult<Self> {
        Self::new(config.market_api_base.clone(), config.market_timeout)
    }
}

fn tracked_ids() -> String {
    TRACKED_ASSETS
        .iter()
        .map(|a| a.id)
        .collect::<Vec<_>>()
        .join(",")
}

impl MarketDataSource for CoinGeckoSource {
    async fn fetch_quotes(&self) -> AcademyResult<Vec<MarketQuote>> {
        let ids = tracked_ids();
        let resp = self
            .client
            .get(format!("{}/coins/markets", self.base_url))
            .query(&[
                ("vs_currency", "usd"),
                ("ids", ids.as_str()),
                ("order", "market_cap_desc"),
                ("per_page", "100"),
                ("page", "1"),
                ("sparkline", "false"),
                ("price_change_percentage", "24h"),
            ])
            .send()
            .await
            .map_err(|e| AcademyError::Market(e.to_string()))?;

        match resp.status() {
            StatusCode::OK => resp
                .json::<Vec<MarketQuote>>()
                .await
                .map_err(|e| AcademyError::Market(format!("bad body: {e}"))),
            StatusCode::TOO_MANY_REQUESTS => {
                Err(AcademyError::Market("upstream rate limit".to_string()))
            }
            status => Err(AcademyError::Market(format!("unexpected status {status}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn source_answering(template: ResponseTemplate) -> (MockServer, CoinGeckoSource) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/coins/markets"))
            .and(query_param("vs_currency", "usd"))
            .and(query_param("ids", "bitcoin,ethereum,ripple,solana"))
            .respond_with(template)
            .mount(&server)
            .await;

        let source =
            CoinGeckoSource::new(format!("{}/api/v3/", server.uri()), Duration::from_secs(5)).unwrap();
        (server, source)
    }

    #[tokio::test]
    async fn test_parses_quotes() {
        let (_server, source) = source_answering(ResponseTemplate::new(200).set_body_json(
            serde_json::json!([
                {
                    "id": "bitcoin",
                    "symbol": "btc",
                    "name": "Bitcoin",
                    "current_price": 67012.5,
                    "market_cap": 1_320_000_000_000u64,
                    "price_change_percentage_24h": 2.31
                },
                {
                    "id": "ripple",
                    "symbol": "xrp",
                    "name": "XRP",
                    "current_price": 0.52,
                    "price_change_percentage_24h": null
                }
            ]),
        ))
        .await;

        let quotes = source.fetch_quotes().await.unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].id, "bitcoin");
        assert_eq!(quotes[0].price_change_percentage_24h, Some(2.31));
        assert_eq!(quotes[1].price_change_percentage_24h, None);
    }

    #[tokio::test]
    async fn test_rate_limit_is_market_error() {
        let (_server, source) = source_answering(ResponseTemplate::new(429)).await;
        assert!(matches!(
            source.fetch_quotes().await,
            Err(AcademyError::Market(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_market_error() {
        let (_server, source) =
            source_answering(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
                .await;
        assert!(matches!(
            source.fetch_quotes().await,
            Err(AcademyError::Market(_))
        ));
    }
}
