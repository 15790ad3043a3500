//! Market Ticker
//!
//! Background refresh of the price ticker. The latest good snapshot lives in
//! a `watch` channel; a failed fetch leaves it untouched.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::market::TickerSnapshot;
use crate::domain::repository::MarketDataSource;
use crate::error::{AcademyError, AcademyResult};

/// Read side, cloned into handler state
#[derive(Debug, Clone)]
pub struct TickerHandle {
    rx: watch::Receiver<Option<TickerSnapshot>>,
}

impl TickerHandle {
    /// `TickerLoading` until the first successful fetch
    pub fn latest(&self) -> AcademyResult<TickerSnapshot> {
        self.rx.borrow().clone().ok_or(AcademyError::TickerLoading)
    }

    /// Wait for the next published snapshot. False once the ticker is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Handle pinned to a fixed snapshot
    pub fn fixed(snapshot: Option<TickerSnapshot>) -> Self {
        let (_tx, rx) = watch::channel(snapshot);
        Self { rx }
    }
}

pub struct MarketTicker<M>
where
    M: MarketDataSource + Send + Sync + 'static,
{
    source: Arc<M>,
    refresh: Duration,
    tx: watch::Sender<Option<TickerSnapshot>>,
}

impl<M> MarketTicker<M>
where
    M: MarketDataSource + Send + Sync + 'static,
{
    pub fn new(source: Arc<M>, refresh: Duration) -> (Self, TickerHandle) {
        let (tx, rx) = watch::channel(None);
        (
            Self {
                source,
                refresh,
                tx,
            },
            TickerHandle { rx },
        )
    }

    /// One fetch. Publishes only on success.
    pub async fn refresh_once(&self) -> AcademyResult<()> {
        let quotes = self.source.fetch_quotes().await?;
        let snapshot = TickerSnapshot::from_quotes(&quotes, Utc::now());

        tracing::debug!(entries = snapshot.entries.len(), "Ticker refreshed");
        self.tx.send_replace(Some(snapshot));
        Ok(())
    }

    /// Refresh on a fixed interval, first fetch immediately. Returns once
    /// every handle is dropped.
    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.refresh);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(refresh_secs = self.refresh.as_secs(), "Market ticker started");

        loop {
            interval.tick().await;
            if self.tx.is_closed() {
                break;
            }

            if let Err(e) = self.refresh_once().await {
                let stale = self.tx.borrow().is_some();
                tracing::warn!(error = %e, stale, "Ticker refresh failed");
            }
        }

        tracing::info!("Market ticker stopped");
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
