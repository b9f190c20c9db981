//! Mock odds feed for unit testing.
//!
//! This module provides a mock feed that can be used in tests
//! without making real network requests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;

use crate::error::FeedError;

use super::client::KeyStatus;
use super::types::{BookmakerEntry, MarketEntry, MarketKind, OutcomeQuote, SportEvent};

/// Configuration for mock feed behavior.
#[derive(Debug, Clone, Default)]
pub struct MockFeedConfig {
    /// Whether the key should be reported as invalid.
    pub invalid_key: bool,
    /// Remaining request quota to report.
    pub requests_remaining: Option<u64>,
    /// Whether fetches should fail.
    pub fail_fetch: bool,
    /// Simulated latency in milliseconds.
    pub latency_ms: u64,
}

/// Mock odds feed for testing.
#[derive(Debug, Clone)]
pub struct MockOddsFeed {
    /// Mock configuration.
    config: MockFeedConfig,
    /// Canned events per market kind.
    events: Arc<Mutex<HashMap<MarketKind, Vec<SportEvent>>>>,
}

impl MockOddsFeed {
    /// Create a new mock feed with default configuration.
    pub fn new() -> Self {
        Self {
            config: MockFeedConfig::default(),
            events: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Create a mock feed with custom configuration.
    pub fn with_config(config: MockFeedConfig) -> Self {
        Self {
            config,
            events: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Set the canned events for a market kind.
    pub fn set_events(&self, kind: MarketKind, events: Vec<SportEvent>) {
        self.events.lock().unwrap().insert(kind, events);
    }

    /// Clear all canned events.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    /// Report the mock key status.
    pub async fn check_key(&self) -> Result<KeyStatus, FeedError> {
        self.simulate_latency().await;

        Ok(KeyStatus {
            valid: !self.config.invalid_key,
            requests_remaining: self.config.requests_remaining,
        })
    }

    /// Return the canned events for a market kind.
    pub async fn fetch_events(&self, kind: MarketKind) -> Result<Vec<SportEvent>, FeedError> {
        self.simulate_latency().await;

        if self.config.invalid_key {
            return Err(FeedError::InvalidApiKey);
        }

        if self.config.fail_fetch {
            return Err(FeedError::FetchFailed {
                market: kind.label().to_string(),
                reason: "mock fetch failure".to_string(),
            });
        }

        Ok(self
            .events
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .unwrap_or_default())
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.latency_ms)).await;
        }
    }
}

impl Default for MockOddsFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for assembling feed events in tests.
pub struct SportEventBuilder {
    home_team: String,
    away_team: String,
    bookmakers: Vec<BookmakerEntry>,
}

impl SportEventBuilder {
    /// Create a builder for the given matchup.
    pub fn new(away_team: impl Into<String>, home_team: impl Into<String>) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            bookmakers: Vec::new(),
        }
    }

    /// Add a bookmaker with one market of quotes.
    pub fn bookmaker(
        mut self,
        key: impl Into<String>,
        market_key: &str,
        outcomes: Vec<(&str, Decimal, Option<Decimal>)>,
    ) -> Self {
        let key = key.into();
        self.bookmakers.push(BookmakerEntry {
            title: key.clone(),
            key,
            link: None,
            markets: vec![MarketEntry {
                key: market_key.to_string(),
                outcomes: outcomes
                    .into_iter()
                    .map(|(name, price, point)| OutcomeQuote {
                        name: name.to_string(),
                        price,
                        point,
                    })
                    .collect(),
            }],
        });
        self
    }

    /// Build the event.
    pub fn build(self) -> SportEvent {
        SportEvent {
            id: String::new(),
            sport_key: String::new(),
            home_team: self.home_team,
            away_team: self.away_team,
            bookmakers: self.bookmakers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn mock_feed_returns_canned_events() {
        let feed = MockOddsFeed::new();
        let event = SportEventBuilder::new("Away", "Home")
            .bookmaker("fanduel", "h2h", vec![("Away", dec!(2.10), None), ("Home", dec!(2.00), None)])
            .build();
        feed.set_events(MarketKind::Moneyline, vec![event]);

        let events = feed.fetch_events(MarketKind::Moneyline).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].bookmakers[0].key, "fanduel");

        // Unconfigured kinds come back empty, not as errors.
        let spreads = feed.fetch_events(MarketKind::Spread).await.unwrap();
        assert!(spreads.is_empty());
    }

    #[tokio::test]
    async fn mock_feed_failure_modes() {
        let feed = MockOddsFeed::with_config(MockFeedConfig {
            fail_fetch: true,
            ..Default::default()
        });

        assert!(feed.fetch_events(MarketKind::Total).await.is_err());
    }

    #[tokio::test]
    async fn mock_feed_invalid_key() {
        let feed = MockOddsFeed::with_config(MockFeedConfig {
            invalid_key: true,
            ..Default::default()
        });

        let status = feed.check_key().await.unwrap();
        assert!(!status.valid);
        assert!(feed.fetch_events(MarketKind::Moneyline).await.is_err());
    }
}
