//! Arbitrage evaluation and stake allocation.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use smallvec::SmallVec;
use tracing::debug;

use crate::feed::types::{MarketKind, SportEvent};

use super::odds::{decimal_to_american, format_american};
use super::selector::{select_best_prices, BestPriceSet, BestQuote};

/// One contender leg of an arbitrage opportunity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunityLeg {
    /// Contender name.
    pub contender: String,
    /// Best decimal price found for this contender.
    pub price: Decimal,
    /// American odds rendering of the price.
    pub american: i64,
    /// Bookmaker offering the price.
    pub bookmaker: String,
    /// Betslip deep link, when available.
    pub link: Option<String>,
    /// Bankroll percentage to stake on this leg, rounded for display.
    pub stake_percent: Decimal,
}

impl OpportunityLeg {
    /// Odds rendered as "decimal / american", as shown in the betslip column.
    pub fn odds_display(&self) -> String {
        format!("{} / {}", self.price, format_american(self.american))
    }
}

/// A detected arbitrage opportunity.
///
/// Legs keep the selector's slot order: away/home/draw for moneyline,
/// away/home for spread, over/under for totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Opportunity {
    /// Event label, away side first ("Away @ Home").
    pub event_label: String,
    /// Market kind this opportunity was found in.
    pub market: MarketKind,
    /// Decision point for spread/total markets.
    pub line: Option<Decimal>,
    /// Contender legs in slot order.
    pub legs: SmallVec<[OpportunityLeg; 3]>,
    /// Guaranteed profit as a percentage of bankroll, rounded for display.
    pub profit_percent: Decimal,
}

/// Sum of inverse decimal odds over a set of quotes.
///
/// Returns `None` if any price is non-positive; such a set is never
/// arbitrable.
pub fn implied_mass(quotes: &[BestQuote]) -> Option<Decimal> {
    let mut sum = Decimal::ZERO;
    for quote in quotes {
        if quote.price <= Decimal::ZERO {
            return None;
        }
        sum += Decimal::ONE / quote.price;
    }
    Some(sum)
}

/// Evaluate one best-price set for arbitrage.
///
/// An opportunity exists iff the implied probability mass is strictly below
/// 1.0; exactly 1.0 is break-even and produces nothing. Stakes are
/// proportional to inverse price and sum to 100% of bankroll.
pub fn evaluate(
    event_label: &str,
    market: MarketKind,
    set: BestPriceSet,
) -> Option<Opportunity> {
    let quotes = set.quotes();
    if quotes.len() < 2 {
        return None;
    }

    let mass = implied_mass(quotes)?;
    if mass >= Decimal::ONE {
        debug!(event = event_label, %mass, "no arbitrage at this decision point");
        return None;
    }

    let mut legs: SmallVec<[OpportunityLeg; 3]> = SmallVec::new();
    for quote in quotes {
        // Selection already filters degenerate prices; a failed conversion
        // here still voids the whole set rather than emitting a bad leg.
        let american = decimal_to_american(quote.price)?;
        let stake = Decimal::ONE_HUNDRED / quote.price / mass;
        legs.push(OpportunityLeg {
            contender: quote.contender.clone(),
            price: quote.price,
            american,
            bookmaker: quote.bookmaker.clone(),
            link: quote.link.clone(),
            stake_percent: round_display(stake),
        });
    }

    let profit = (Decimal::ONE / mass - Decimal::ONE) * Decimal::ONE_HUNDRED;

    Some(Opportunity {
        event_label: event_label.to_string(),
        market,
        line: set.line(),
        legs,
        profit_percent: round_display(profit),
    })
}

/// Run selection and evaluation for one event and market kind.
pub fn scan_event(event: &SportEvent, kind: MarketKind) -> Vec<Opportunity> {
    let label = event.label();
    select_best_prices(event, kind)
        .into_iter()
        .filter_map(|set| evaluate(&label, kind, set))
        .collect()
}

/// Sort opportunities by descending profit; the sort is stable so ties keep
/// discovery order.
pub fn sort_by_profit(opportunities: &mut [Opportunity]) {
    opportunities.sort_by(|a, b| b.profit_percent.cmp(&a.profit_percent));
}

/// Round half away from zero to two decimals, the display precision for
/// stakes and profit.
fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
