//! The Odds API client wrapper.

use std::time::Instant;

use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::FeedError;
use crate::metrics;

use super::types::{MarketKind, SportEvent};

/// Response header carrying the remaining request quota.
const QUOTA_REMAINING_HEADER: &str = "x-requests-remaining";

/// API key status reported by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStatus {
    /// Whether the key was accepted.
    pub valid: bool,
    /// Requests remaining on the key, when the feed reports it.
    pub requests_remaining: Option<u64>,
}

impl KeyStatus {
    /// Whether the key can still be used for a scan.
    pub fn is_usable(&self) -> bool {
        self.valid && self.requests_remaining != Some(0)
    }
}

/// The Odds API client.
#[derive(Debug, Clone)]
pub struct OddsFeedClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Feed base URL.
    base_url: String,
    /// API key.
    api_key: String,
    /// Sport key to scan.
    sport: String,
    /// Bookmaker regions.
    regions: String,
    /// Bookmaker keys.
    bookmakers: String,
    /// State substituted into `{state}` deep-link templates.
    link_state: String,
}

impl OddsFeedClient {
    /// Create a new feed client from config with tuned HTTP settings.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(std::time::Duration::from_millis(2_000))
            .tcp_nodelay(true)
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .pool_max_idle_per_host(config.http_pool_size)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            base_url: config.odds_api_base_url.trim_end_matches('/').to_string(),
            api_key: config.odds_api_key.clone(),
            sport: config.sport.clone(),
            regions: config.regions.clone(),
            bookmakers: config.bookmakers.clone(),
            link_state: config.link_state.clone(),
        }
    }

    /// Get the feed base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check the API key against the sports index endpoint.
    ///
    /// A 401 means the key is invalid; any other response that carries the
    /// quota header also reports the requests remaining.
    #[instrument(skip(self))]
    pub async fn check_key(&self) -> Result<KeyStatus, FeedError> {
        let url = format!("{}/v4/sports/", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        let remaining = quota_remaining(response.headers());
        if let Some(remaining) = remaining {
            metrics::set_quota_remaining(remaining);
        }

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            warn!("odds API key rejected");
            return Ok(KeyStatus {
                valid: false,
                requests_remaining: remaining,
            });
        }

        Ok(KeyStatus {
            valid: true,
            requests_remaining: remaining,
        })
    }

    /// Fetch all events with quotes for one market kind.
    #[instrument(skip(self), fields(market = %kind))]
    pub async fn fetch_events(&self, kind: MarketKind) -> Result<Vec<SportEvent>, FeedError> {
        let url = format!("{}/v4/sports/{}/odds/", self.base_url, self.sport);
        let start = Instant::now();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("regions", self.regions.as_str()),
                ("markets", kind.feed_key()),
                ("bookmakers", self.bookmakers.as_str()),
                ("includeLinks", "true"),
            ])
            .send()
            .await?;

        metrics::record_feed_fetch_latency(start, kind.label());

        if let Some(remaining) = quota_remaining(response.headers()) {
            metrics::set_quota_remaining(remaining);
        }

        match response.status() {
            reqwest::StatusCode::UNAUTHORIZED => return Err(FeedError::InvalidApiKey),
            reqwest::StatusCode::TOO_MANY_REQUESTS => return Err(FeedError::QuotaExhausted),
            status if !status.is_success() => {
                return Err(FeedError::FetchFailed {
                    market: kind.label().to_string(),
                    reason: format!("HTTP {}", status),
                });
            }
            _ => {}
        }

        let mut events: Vec<SportEvent> = response
            .json()
            .await
            .map_err(|e| FeedError::ParseError(format!("failed to parse odds payload: {}", e)))?;

        for event in &mut events {
            self.resolve_links(event);
        }

        debug!(events = events.len(), "fetched odds feed");

        Ok(events)
    }

    /// Fill in bookmaker deep links: substitute the `{state}` placeholder and
    /// drop links that do not parse as URLs.
    fn resolve_links(&self, event: &mut SportEvent) {
        for bookmaker in &mut event.bookmakers {
            bookmaker.link = bookmaker
                .link
                .take()
                .map(|link| link.replace("{state}", &self.link_state))
                .filter(|link| url::Url::parse(link).is_ok());
        }
    }
}

/// Read the remaining-quota header if present and numeric.
fn quota_remaining(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(QUOTA_REMAINING_HEADER)
        .and_then(|v| v.to_str().ok())
        // The feed reports the quota as a decimal string like "497.0".
        .and_then(|v| v.split('.').next())
        .and_then(|v| v.parse().ok())
}
