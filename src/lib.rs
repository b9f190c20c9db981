//! Cross-bookmaker sports betting arbitrage scanner.
//!
//! This library scans decimal odds from multiple bookmakers per match and
//! market kind, keeps the best price per contender, and flags decision
//! points where the combined implied probability is below 100%:
//!
//! ```text
//! Away FC best price: 2.10 (fanduel)    → implied 47.62%
//! Home FC best price: 2.30 (draftkings) → implied 43.48%
//! ─────────────────────────────────────────────────────
//! Implied mass:       0.9110 < 1.0 ✅
//! Stakes:             52.27% / 47.73%
//! Profit:             9.77% guaranteed either way
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`feed`]: The Odds API types, client, and mock feed
//! - [`arbitrage`]: Best-price selection, evaluation, odds conversion
//! - [`scan`]: Scan orchestration and statistics
//! - [`api`]: HTTP API for health/status/metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod arbitrage;
pub mod config;
pub mod error;
pub mod feed;
pub mod metrics;
pub mod scan;
pub mod utils;

pub use config::Config;
pub use error::{Result, ScannerError};
