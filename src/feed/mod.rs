//! Odds feed module for The Odds API.
//!
//! This module handles:
//! - Feed types matching the upstream v4 schema
//! - The HTTP feed client and API-key reachability check
//! - Mock feed for testing

pub mod client;
pub mod mock;
pub mod types;

pub use client::{KeyStatus, OddsFeedClient};
pub use mock::{MockFeedConfig, MockOddsFeed, SportEventBuilder};
pub use types::{BookmakerEntry, MarketEntry, MarketKind, OutcomeQuote, SportEvent};
