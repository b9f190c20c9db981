//! Unified error types for the arbitrage scanner.

use thiserror::Error;

/// Unified error type for the arbitrage scanner.
#[derive(Error, Debug)]
pub enum ScannerError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Odds feed error.
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Odds feed fetch and parse errors.
///
/// A feed failure is local to one market kind: the caller surfaces it as an
/// empty result set for that kind and keeps scanning the others.
#[derive(Error, Debug)]
pub enum FeedError {
    /// The API key was rejected (HTTP 401).
    #[error("odds API key rejected")]
    InvalidApiKey,

    /// The API key has no requests remaining (HTTP 429).
    #[error("odds API request quota exhausted")]
    QuotaExhausted,

    /// Failed to fetch odds for a market kind.
    #[error("failed to fetch {market} odds: {reason}")]
    FetchFailed {
        /// The market kind that failed.
        market: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to parse the feed payload.
    #[error("failed to parse odds feed: {0}")]
    ParseError(String),

    /// HTTP request failed.
    #[error("http request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ScannerError>;
