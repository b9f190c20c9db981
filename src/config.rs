//! Application configuration loaded from environment variables.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Odds Feed Credentials ===
    /// The Odds API key.
    pub odds_api_key: String,

    /// Odds feed base URL.
    #[serde(default = "default_base_url")]
    pub odds_api_base_url: String,

    // === Feed Parameters ===
    /// Sport key to scan (e.g. "upcoming", "americanfootball_nfl").
    #[serde(default = "default_sport")]
    pub sport: String,

    /// Comma-separated bookmaker regions.
    #[serde(default = "default_regions")]
    pub regions: String,

    /// Comma-separated bookmaker keys to include.
    #[serde(default = "default_bookmakers")]
    pub bookmakers: String,

    /// US state substituted into `{state}` bookmaker deep-link templates.
    #[serde(default = "default_link_state")]
    pub link_state: String,

    // === Scan Parameters ===
    /// Discard opportunities below this guaranteed profit percentage.
    #[serde(default)]
    pub min_profit_percent: Decimal,

    /// Seconds between scans in daemon mode.
    #[serde(default = "default_scan_interval")]
    pub scan_interval_seconds: u64,

    // === HTTP Client ===
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    /// Max idle connections kept per host.
    #[serde(default = "default_http_pool_size")]
    pub http_pool_size: usize,

    // === Server Configuration ===
    /// HTTP server port for health/status/metrics endpoints.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable the Prometheus metrics endpoint.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_base_url() -> String {
    "https://api.the-odds-api.com".to_string()
}

fn default_sport() -> String {
    "upcoming".to_string()
}

fn default_regions() -> String {
    "us".to_string()
}

fn default_bookmakers() -> String {
    "betonlineag,betmgm,betrivers,betus,bovada,draftkings,fanduel,lowvig,mybookieag"
        .to_string()
}

fn default_link_state() -> String {
    "co".to_string()
}

fn default_scan_interval() -> u64 {
    60
}

fn default_http_timeout_ms() -> u64 {
    10_000
}

fn default_http_pool_size() -> usize {
    10
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.odds_api_key.trim().is_empty() {
            return Err("ODDS_API_KEY is required".to_string());
        }

        if url::Url::parse(&self.odds_api_base_url).is_err() {
            return Err("ODDS_API_BASE_URL must be a valid URL".to_string());
        }

        if self.bookmakers.trim().is_empty() {
            return Err("BOOKMAKERS must list at least one bookmaker key".to_string());
        }

        if self.scan_interval_seconds == 0 {
            return Err("SCAN_INTERVAL_SECONDS must be at least 1".to_string());
        }

        if self.min_profit_percent < Decimal::ZERO {
            return Err("MIN_PROFIT_PERCENT must not be negative".to_string());
        }

        Ok(())
    }

    /// Bookmaker keys as a trimmed list.
    pub fn bookmaker_keys(&self) -> Vec<&str> {
        self.bookmakers
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect()
    }
}
