//! Arbitrage engine: best-price selection and opportunity evaluation.
//!
//! This module handles:
//! - Reducing bookmaker quotes to best prices per contender slot
//! - Testing decision points for arbitrage and allocating stakes
//! - Decimal/American odds conversion for display

pub mod evaluator;
pub mod odds;
pub mod selector;

pub use evaluator::{evaluate, implied_mass, scan_event, sort_by_profit, Opportunity, OpportunityLeg};
pub use odds::{decimal_to_american, format_american};
pub use selector::{select_best_prices, BestPriceSet, BestQuote};
