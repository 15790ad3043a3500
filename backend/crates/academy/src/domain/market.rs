//! Market ticker model
//!
//! Upstream quotes are keyed by CoinGecko id. The ticker shows a fixed set of
//! assets in a fixed order; assets missing upstream are skipped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedAsset {
    /// CoinGecko id
    pub id: &'static str,
    pub name: &'static str,
    pub logo: &'static str,
}

/// Display order
pub const TRACKED_ASSETS: [TrackedAsset; 4] = [
    TrackedAsset {
        id: "bitcoin",
        name: "Bitcoin",
        logo: "/images/btc.svg",
    },
    TrackedAsset {
        id: "ethereum",
        name: "Ethereum",
        logo: "/images/eth.svg",
    },
    TrackedAsset {
        id: "ripple",
        name: "XRP",
        logo: "/images/xrp.svg",
    },
    TrackedAsset {
        id: "solana",
        name: "Solana",
        logo: "/images/sol.svg",
    },
];

/// One row of `/coins/markets`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarketQuote {
    pub id: String,
    pub symbol: String,
    pub current_price: f64,
    /// Null upstream for freshly listed assets
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerEntry {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub logo: String,
    pub current_price: f64,
    pub price_change_percentage_24h: f64,
    /// `$1,234.56`
    pub price_display: String,
    /// `+1.23%`
    pub change_display: String,
    pub is_positive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerSnapshot {
    pub entries: Vec<TickerEntry>,
    pub fetched_at: DateTime<Utc>,
}

impl TickerSnapshot {
    pub fn from_quotes(quotes: &[MarketQuote], fetched_at: DateTime<Utc>) -> Self {
        let entries = TRACKED_ASSETS
            .iter()
            .filter_map(|asset| {
                let quote = quotes.iter().find(|q| q.id == asset.id)?;
                let change = quote.price_change_percentage_24h.unwrap_or(0.0);
                Some(TickerEntry {
                    id: asset.id.to_string(),
                    name: asset.name.to_string(),
                    symbol: quote.symbol.to_uppercase(),
                    logo: asset.logo.to_string(),
                    current_price: quote.current_price,
                    price_change_percentage_24h: change,
                    price_display: format_price(quote.current_price),
                    change_display: format_change(change),
                    is_positive: change >= 0.0,
                })
            })
            .collect();

        Self {
            entries,
            fetched_at,
        }
    }
}

/// US dollars with thousands separators and two decimals
pub fn format_price(price: f64) -> String {
    let cents = (price.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if price < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{fraction:02}")
}

/// Signed percentage with two decimals; zero counts as positive
pub fn format_change(change: f64) -> String {
    if change >= 0.0 {
        format!("+{change:.2}%")
    } else {
        format!("{change:.2}%")
    }
}
