//! Scan orchestration: fetch, select, evaluate, and rank.

use std::time::Instant;

use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::arbitrage::{scan_event, sort_by_profit, Opportunity};
use crate::config::Config;
use crate::error::FeedError;
use crate::feed::{KeyStatus, MarketKind, MockOddsFeed, OddsFeedClient, SportEvent};
use crate::metrics;

/// Source of odds data for a scan.
///
/// Implemented by the real feed client and by the mock feed used in tests.
pub trait OddsFeed {
    /// Check the API key and remaining quota.
    fn check_key(&self) -> impl std::future::Future<Output = Result<KeyStatus, FeedError>> + Send;

    /// Fetch all events for one market kind.
    fn fetch_events(
        &self,
        kind: MarketKind,
    ) -> impl std::future::Future<Output = Result<Vec<SportEvent>, FeedError>> + Send;
}

impl OddsFeed for OddsFeedClient {
    async fn check_key(&self) -> Result<KeyStatus, FeedError> {
        OddsFeedClient::check_key(self).await
    }

    async fn fetch_events(&self, kind: MarketKind) -> Result<Vec<SportEvent>, FeedError> {
        OddsFeedClient::fetch_events(self, kind).await
    }
}

impl OddsFeed for MockOddsFeed {
    async fn check_key(&self) -> Result<KeyStatus, FeedError> {
        MockOddsFeed::check_key(self).await
    }

    async fn fetch_events(&self, kind: MarketKind) -> Result<Vec<SportEvent>, FeedError> {
        MockOddsFeed::fetch_events(self, kind).await
    }
}

/// Running statistics across scans.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ScanStats {
    /// Completed scans.
    pub scans_completed: u64,
    /// Events seen across all scans.
    pub events_seen: u64,
    /// Opportunities found across all scans.
    pub opportunities_found: u64,
    /// Feed errors across all scans.
    pub feed_errors: u64,
    /// When the last scan finished.
    pub last_scan_at: Option<OffsetDateTime>,
}

/// Arbitrage scanner over an odds feed.
#[derive(Debug)]
pub struct Scanner<F> {
    feed: F,
    kinds: Vec<MarketKind>,
    min_profit_percent: Decimal,
    stats: ScanStats,
}

impl<F: OddsFeed> Scanner<F> {
    /// Create a scanner over all market kinds.
    pub fn new(feed: F, config: &Config) -> Self {
        Self::with_kinds(feed, config, MarketKind::ALL.to_vec())
    }

    /// Create a scanner restricted to the given market kinds.
    pub fn with_kinds(feed: F, config: &Config, kinds: Vec<MarketKind>) -> Self {
        Self {
            feed,
            kinds,
            min_profit_percent: config.min_profit_percent,
            stats: ScanStats::default(),
        }
    }

    /// Current statistics.
    pub fn stats(&self) -> ScanStats {
        self.stats.clone()
    }

    /// Check the feed key before scanning.
    pub async fn check_key(&self) -> Result<KeyStatus, FeedError> {
        self.feed.check_key().await
    }

    /// Run one full scan across the configured market kinds.
    ///
    /// Market kinds are fetched concurrently. A feed failure for one kind is
    /// logged and contributes an empty result set; it never aborts the scan.
    #[instrument(skip(self))]
    pub async fn scan_once(&mut self) -> Vec<Opportunity> {
        let start = Instant::now();
        let mut opportunities = Vec::new();
        let mut events_seen = 0u64;

        let fetches = self.kinds.iter().map(|&kind| {
            let feed = &self.feed;
            async move { (kind, feed.fetch_events(kind).await) }
        });

        let results = futures::future::join_all(fetches).await;

        for (kind, result) in results {
            let events = match result {
                Ok(events) => events,
                Err(e) => {
                    warn!(market = %kind, error = %e, "feed fetch failed, skipping market");
                    metrics::inc_feed_errors(kind.label());
                    self.stats.feed_errors += 1;
                    continue;
                }
            };

            events_seen += events.len() as u64;
            for event in &events {
                opportunities.extend(scan_event(event, kind));
            }
        }

        sort_by_profit(&mut opportunities);
        opportunities.retain(|o| o.profit_percent >= self.min_profit_percent);

        metrics::record_scan_latency(start);
        metrics::add_events_scanned(events_seen);
        metrics::add_opportunities_found(opportunities.len() as u64);

        self.stats.scans_completed += 1;
        self.stats.events_seen += events_seen;
        self.stats.opportunities_found += opportunities.len() as u64;
        self.stats.last_scan_at = Some(OffsetDateTime::now_utc());

        info!(
            events = events_seen,
            opportunities = opportunities.len(),
            "scan complete"
        );

        opportunities
    }
}
