//! Odds feed types matching The Odds API v4 schema.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Market category to scan for arbitrage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MarketKind {
    /// Head-to-head winner market.
    #[strum(serialize = "moneyline", serialize = "h2h")]
    Moneyline,
    /// Point spread market.
    #[strum(serialize = "spread", serialize = "spreads")]
    Spread,
    /// Over/under total market.
    #[strum(serialize = "total", serialize = "totals")]
    Total,
}

impl MarketKind {
    /// All market kinds in scan order.
    pub const ALL: [MarketKind; 3] = [MarketKind::Moneyline, MarketKind::Spread, MarketKind::Total];

    /// Market key used by the upstream feed query and payload.
    pub fn feed_key(&self) -> &'static str {
        match self {
            MarketKind::Moneyline => "h2h",
            MarketKind::Spread => "spreads",
            MarketKind::Total => "totals",
        }
    }

    /// Human-readable label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            MarketKind::Moneyline => "moneyline",
            MarketKind::Spread => "spread",
            MarketKind::Total => "total",
        }
    }
}

/// One event from the odds feed.
///
/// Nested collections default to empty so a sparse payload degrades to
/// "nothing to select" rather than a parse failure.
#[derive(Debug, Clone, Deserialize)]
pub struct SportEvent {
    /// Feed event ID.
    #[serde(default)]
    pub id: String,
    /// Sport key (e.g. "americanfootball_nfl").
    #[serde(default)]
    pub sport_key: String,
    /// Home team name.
    pub home_team: String,
    /// Away team name.
    pub away_team: String,
    /// Bookmaker entries in feed order.
    #[serde(default)]
    pub bookmakers: Vec<BookmakerEntry>,
}

impl SportEvent {
    /// Report label for this event, away side first.
    pub fn label(&self) -> String {
        format!("{} @ {}", self.away_team, self.home_team)
    }
}

/// One bookmaker's quotes for an event.
#[derive(Debug, Clone, Deserialize)]
pub struct BookmakerEntry {
    /// Bookmaker key (e.g. "draftkings").
    pub key: String,
    /// Bookmaker display title.
    #[serde(default)]
    pub title: String,
    /// Betslip deep link, possibly with a `{state}` placeholder.
    #[serde(default)]
    pub link: Option<String>,
    /// Markets quoted by this bookmaker.
    #[serde(default)]
    pub markets: Vec<MarketEntry>,
}

/// One market within a bookmaker entry.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketEntry {
    /// Market key ("h2h", "spreads", "totals").
    #[serde(default)]
    pub key: String,
    /// Quoted outcomes.
    #[serde(default)]
    pub outcomes: Vec<OutcomeQuote>,
}

impl MarketEntry {
    /// Whether this entry belongs to the given market kind.
    ///
    /// An empty key is tolerated and treated as matching: single-market feed
    /// responses omit it in some upstream versions.
    pub fn is_kind(&self, kind: MarketKind) -> bool {
        self.key.is_empty() || self.key == kind.feed_key()
    }
}

/// One quoted outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct OutcomeQuote {
    /// Outcome name: a team name, "Draw", "Over", or "Under".
    pub name: String,
    /// Decimal odds.
    pub price: Decimal,
    /// Line point for spread/total markets.
    #[serde(default)]
    pub point: Option<Decimal>,
}
