//! Best-price selection across bookmakers.
//!
//! Reduces one event's bookmaker quotes to the single best decimal price per
//! contender slot, per decision point. Exact ties keep the first-seen
//! bookmaker (feed order is stable).

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::feed::types::{BookmakerEntry, MarketKind, SportEvent};

/// Draw outcome names accepted in moneyline markets.
const DRAW_NAMES: [&str; 2] = ["Draw", "DRAW"];

/// The winning quote for one contender slot.
#[derive(Debug, Clone, PartialEq)]
pub struct BestQuote {
    /// Contender name (team, "Draw", "Over", or "Under").
    pub contender: String,
    /// Best decimal price found across bookmakers.
    pub price: Decimal,
    /// Bookmaker offering that price.
    pub bookmaker: String,
    /// Betslip deep link, when the feed provides one.
    pub link: Option<String>,
}

/// Best prices for one decision point, tagged by market shape.
///
/// A moneyline with no priced draw collapses to a two-way set; the unused
/// draw slot is dropped rather than padded.
#[derive(Debug, Clone, PartialEq)]
pub enum BestPriceSet {
    /// Two opposing sides: away/home, or over/under at a line.
    TwoWay {
        /// Decision point: `|spread|` or the exact total line; `None` for
        /// moneyline.
        line: Option<Decimal>,
        /// Slot-ordered quotes (away/home or over/under).
        slots: [BestQuote; 2],
    },
    /// Three-way moneyline: away, home, draw.
    ThreeWay {
        /// Slot-ordered quotes (away, home, draw).
        slots: [BestQuote; 3],
    },
}

impl BestPriceSet {
    /// Quotes in slot order.
    pub fn quotes(&self) -> &[BestQuote] {
        match self {
            BestPriceSet::TwoWay { slots, .. } => slots,
            BestPriceSet::ThreeWay { slots } => slots,
        }
    }

    /// The decision point for spread/total sets.
    pub fn line(&self) -> Option<Decimal> {
        match self {
            BestPriceSet::TwoWay { line, .. } => *line,
            BestPriceSet::ThreeWay { .. } => None,
        }
    }
}

/// Running best price for one slot while scanning bookmakers.
#[derive(Debug, Clone, Default)]
struct Slot {
    price: Decimal,
    bookmaker: String,
    link: Option<String>,
}

impl Slot {
    /// Offer a price to the slot; strict greater-than preserves the
    /// first-seen bookmaker on exact ties.
    fn offer(&mut self, price: Decimal, bookmaker: &BookmakerEntry) {
        if price > self.price {
            self.price = price;
            self.bookmaker = bookmaker.key.clone();
            self.link = bookmaker.link.clone();
        }
    }

    fn is_populated(&self) -> bool {
        self.price > Decimal::ZERO
    }

    fn into_quote(self, contender: impl Into<String>) -> BestQuote {
        BestQuote {
            contender: contender.into(),
            price: self.price,
            bookmaker: self.bookmaker,
            link: self.link,
        }
    }
}

/// Select the best price per contender slot for one event and market kind.
///
/// Pure over the input: bookmaker entries with no markets or outcomes
/// contribute nothing. Quotes priced at or below 1.0 cannot be converted to
/// American odds and are skipped entirely.
pub fn select_best_prices(event: &SportEvent, kind: MarketKind) -> Vec<BestPriceSet> {
    match kind {
        MarketKind::Moneyline => select_moneyline(event),
        MarketKind::Spread => select_lined(event, kind, SpreadGrouping),
        MarketKind::Total => select_lined(event, kind, TotalGrouping),
    }
}

fn select_moneyline(event: &SportEvent) -> Vec<BestPriceSet> {
    let mut away = Slot::default();
    let mut home = Slot::default();
    let mut draw = Slot::default();

    for bookmaker in &event.bookmakers {
        // Only the first moneyline entry per bookmaker counts.
        let Some(market) = bookmaker
            .markets
            .iter()
            .find(|m| m.is_kind(MarketKind::Moneyline))
        else {
            continue;
        };

        for outcome in &market.outcomes {
            if is_degenerate(outcome.price) {
                continue;
            }
            if outcome.name == event.away_team {
                away.offer(outcome.price, bookmaker);
            } else if outcome.name == event.home_team {
                home.offer(outcome.price, bookmaker);
            } else if DRAW_NAMES.contains(&outcome.name.as_str()) {
                draw.offer(outcome.price, bookmaker);
            }
        }
    }

    if !away.is_populated() || !home.is_populated() {
        return Vec::new();
    }

    let set = if draw.is_populated() {
        BestPriceSet::ThreeWay {
            slots: [
                away.into_quote(event.away_team.clone()),
                home.into_quote(event.home_team.clone()),
                draw.into_quote("Draw"),
            ],
        }
    } else {
        BestPriceSet::TwoWay {
            line: None,
            slots: [
                away.into_quote(event.away_team.clone()),
                home.into_quote(event.home_team.clone()),
            ],
        }
    };

    vec![set]
}

/// How a lined market groups outcomes into decision points.
trait LineGrouping {
    /// Grouping key for a line point.
    fn group_key(&self, point: Decimal) -> Decimal;

    /// Slot index (0 or 1) for an outcome name, or `None` if the name is
    /// not a contender in this market shape.
    fn slot_index(&self, event: &SportEvent, name: &str) -> Option<usize>;

    /// Slot-ordered contender names for a group.
    fn contenders(&self, event: &SportEvent) -> [String; 2];
}

/// Spreads pair home/away sides at matching absolute line values, so +3.5
/// and -3.5 land in the same group.
struct SpreadGrouping;

impl LineGrouping for SpreadGrouping {
    fn group_key(&self, point: Decimal) -> Decimal {
        point.abs()
    }

    fn slot_index(&self, event: &SportEvent, name: &str) -> Option<usize> {
        if name == event.away_team {
            Some(0)
        } else if name == event.home_team {
            Some(1)
        } else {
            None
        }
    }

    fn contenders(&self, event: &SportEvent) -> [String; 2] {
        [event.away_team.clone(), event.home_team.clone()]
    }
}

/// Totals pair Over/Under at the exact signed line value: Over 2.5 and
/// Under 2.5 share a group, Over 2.5 and Over 3.5 do not.
struct TotalGrouping;

impl LineGrouping for TotalGrouping {
    fn group_key(&self, point: Decimal) -> Decimal {
        point
    }

    fn slot_index(&self, _event: &SportEvent, name: &str) -> Option<usize> {
        match name {
            "Over" => Some(0),
            "Under" => Some(1),
            _ => None,
        }
    }

    fn contenders(&self, _event: &SportEvent) -> [String; 2] {
        ["Over".to_string(), "Under".to_string()]
    }
}

fn select_lined<G: LineGrouping>(
    event: &SportEvent,
    kind: MarketKind,
    grouping: G,
) -> Vec<BestPriceSet> {
    // BTreeMap keys give a deterministic line order for the output.
    let mut groups: BTreeMap<Decimal, [Slot; 2]> = BTreeMap::new();

    for bookmaker in &event.bookmakers {
        for market in bookmaker.markets.iter().filter(|m| m.is_kind(kind)) {
            for outcome in &market.outcomes {
                if is_degenerate(outcome.price) {
                    continue;
                }
                let Some(point) = outcome.point else {
                    continue;
                };
                let Some(index) = grouping.slot_index(event, &outcome.name) else {
                    continue;
                };

                let slots = groups.entry(grouping.group_key(point)).or_default();
                slots[index].offer(outcome.price, bookmaker);
            }
        }
    }

    groups
        .into_iter()
        .filter(|(_, slots)| slots.iter().all(Slot::is_populated))
        .map(|(line, [first, second])| {
            let [first_name, second_name] = grouping.contenders(event);
            BestPriceSet::TwoWay {
                line: Some(line),
                slots: [
                    first.into_quote(first_name),
                    second.into_quote(second_name),
                ],
            }
        })
        .collect()
}

/// A price at or below 1.0 has no meaningful implied probability or American
/// odds representation.
fn is_degenerate(price: Decimal) -> bool {
    price <= Decimal::ONE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::mock::SportEventBuilder;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn moneyline_event() -> SportEvent {
        SportEventBuilder::new("Away FC", "Home FC")
            .bookmaker(
                "fanduel",
                "h2h",
                vec![("Away FC", dec!(2.10), None), ("Home FC", dec!(2.00), None)],
            )
            .bookmaker(
                "draftkings",
                "h2h",
                vec![("Away FC", dec!(1.95), None), ("Home FC", dec!(2.30), None)],
            )
            .build()
    }

    #[test]
    fn moneyline_picks_best_price_per_slot() {
        let sets = select_best_prices(&moneyline_event(), MarketKind::Moneyline);

        assert_eq!(sets.len(), 1);
        let quotes = sets[0].quotes();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].contender, "Away FC");
        assert_eq!(quotes[0].price, dec!(2.10));
        assert_eq!(quotes[0].bookmaker, "fanduel");
        assert_eq!(quotes[1].contender, "Home FC");
        assert_eq!(quotes[1].price, dec!(2.30));
        assert_eq!(quotes[1].bookmaker, "draftkings");
    }

    #[test]
    fn moneyline_lower_price_never_replaces_best() {
        // A third bookmaker quoting worse prices must not change anything.
        let event = SportEventBuilder::new("Away FC", "Home FC")
            .bookmaker(
                "fanduel",
                "h2h",
                vec![("Away FC", dec!(2.10), None), ("Home FC", dec!(2.00), None)],
            )
            .bookmaker(
                "draftkings",
                "h2h",
                vec![("Away FC", dec!(1.95), None), ("Home FC", dec!(2.30), None)],
            )
            .bookmaker(
                "betmgm",
                "h2h",
                vec![("Away FC", dec!(2.05), None), ("Home FC", dec!(2.25), None)],
            )
            .build();

        let sets = select_best_prices(&event, MarketKind::Moneyline);
        let quotes = sets[0].quotes();
        assert_eq!(quotes[0].price, dec!(2.10));
        assert_eq!(quotes[1].price, dec!(2.30));
    }

    #[test]
    fn moneyline_exact_tie_keeps_first_seen_bookmaker() {
        let event = SportEventBuilder::new("Away FC", "Home FC")
            .bookmaker(
                "fanduel",
                "h2h",
                vec![("Away FC", dec!(2.10), None), ("Home FC", dec!(2.00), None)],
            )
            .bookmaker(
                "draftkings",
                "h2h",
                vec![("Away FC", dec!(2.10), None), ("Home FC", dec!(2.00), None)],
            )
            .build();

        let sets = select_best_prices(&event, MarketKind::Moneyline);
        for quote in sets[0].quotes() {
            assert_eq!(quote.bookmaker, "fanduel");
        }
    }

    #[test]
    fn moneyline_with_draw_yields_three_way_set() {
        let event = SportEventBuilder::new("Away FC", "Home FC")
            .bookmaker(
                "fanduel",
                "h2h",
                vec![
                    ("Away FC", dec!(2.90), None),
                    ("Home FC", dec!(2.80), None),
                    ("Draw", dec!(3.40), None),
                ],
            )
            .build();

        let sets = select_best_prices(&event, MarketKind::Moneyline);
        let quotes = sets[0].quotes();
        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes[2].contender, "Draw");
        assert_eq!(quotes[2].price, dec!(3.40));
    }

    #[test]
    fn moneyline_uppercase_draw_is_accepted() {
        let event = SportEventBuilder::new("Away FC", "Home FC")
            .bookmaker(
                "fanduel",
                "h2h",
                vec![
                    ("Away FC", dec!(2.90), None),
                    ("Home FC", dec!(2.80), None),
                    ("DRAW", dec!(3.40), None),
                ],
            )
            .build();

        let sets = select_best_prices(&event, MarketKind::Moneyline);
        assert_eq!(sets[0].quotes().len(), 3);
    }

    #[test]
    fn moneyline_unpriced_draw_is_dropped_not_padded() {
        let sets = select_best_prices(&moneyline_event(), MarketKind::Moneyline);
        assert!(matches!(sets[0], BestPriceSet::TwoWay { line: None, .. }));
    }

    #[test]
    fn moneyline_only_first_matching_market_per_bookmaker_counts() {
        let mut event = moneyline_event();
        // A second h2h entry from the same bookmaker with a better price
        // must be ignored.
        event.bookmakers[0].markets.push(crate::feed::MarketEntry {
            key: "h2h".to_string(),
            outcomes: vec![crate::feed::OutcomeQuote {
                name: "Away FC".to_string(),
                price: dec!(9.99),
                point: None,
            }],
        });

        let sets = select_best_prices(&event, MarketKind::Moneyline);
        assert_eq!(sets[0].quotes()[0].price, dec!(2.10));
    }

    #[test]
    fn moneyline_missing_side_yields_nothing() {
        let event = SportEventBuilder::new("Away FC", "Home FC")
            .bookmaker("fanduel", "h2h", vec![("Away FC", dec!(2.10), None)])
            .build();

        assert!(select_best_prices(&event, MarketKind::Moneyline).is_empty());
    }

    #[test]
    fn degenerate_prices_are_skipped() {
        let event = SportEventBuilder::new("Away FC", "Home FC")
            .bookmaker(
                "fanduel",
                "h2h",
                vec![("Away FC", dec!(1.00), None), ("Home FC", dec!(2.00), None)],
            )
            .build();

        assert!(select_best_prices(&event, MarketKind::Moneyline).is_empty());
    }

    #[test]
    fn event_without_bookmakers_yields_nothing() {
        let event = SportEventBuilder::new("Away FC", "Home FC").build();
        assert!(select_best_prices(&event, MarketKind::Moneyline).is_empty());
        assert!(select_best_prices(&event, MarketKind::Spread).is_empty());
        assert!(select_best_prices(&event, MarketKind::Total).is_empty());
    }

    #[test]
    fn spread_groups_by_absolute_point() {
        let event = SportEventBuilder::new("Away FC", "Home FC")
            .bookmaker(
                "fanduel",
                "spreads",
                vec![
                    ("Away FC", dec!(1.91), Some(dec!(3.5))),
                    ("Home FC", dec!(1.91), Some(dec!(-3.5))),
                ],
            )
            .bookmaker(
                "draftkings",
                "spreads",
                vec![
                    ("Away FC", dec!(2.05), Some(dec!(3.5))),
                    ("Home FC", dec!(1.87), Some(dec!(-3.5))),
                ],
            )
            .build();

        let sets = select_best_prices(&event, MarketKind::Spread);
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].line(), Some(dec!(3.5)));

        let quotes = sets[0].quotes();
        assert_eq!(quotes[0].contender, "Away FC");
        assert_eq!(quotes[0].price, dec!(2.05));
        assert_eq!(quotes[0].bookmaker, "draftkings");
        assert_eq!(quotes[1].price, dec!(1.91));
        assert_eq!(quotes[1].bookmaker, "fanduel");
    }

    #[test]
    fn spread_distinct_lines_stay_separate() {
        let event = SportEventBuilder::new("Away FC", "Home FC")
            .bookmaker(
                "fanduel",
                "spreads",
                vec![
                    ("Away FC", dec!(1.91), Some(dec!(3.5))),
                    ("Home FC", dec!(1.91), Some(dec!(-3.5))),
                ],
            )
            .bookmaker(
                "draftkings",
                "spreads",
                vec![
                    ("Away FC", dec!(1.95), Some(dec!(4.5))),
                    ("Home FC", dec!(1.87), Some(dec!(-4.5))),
                ],
            )
            .build();

        let sets = select_best_prices(&event, MarketKind::Spread);
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].line(), Some(dec!(3.5)));
        assert_eq!(sets[1].line(), Some(dec!(4.5)));
    }

    #[test]
    fn spread_one_sided_group_is_dropped() {
        let event = SportEventBuilder::new("Away FC", "Home FC")
            .bookmaker(
                "fanduel",
                "spreads",
                vec![("Away FC", dec!(1.91), Some(dec!(3.5)))],
            )
            .build();

        assert!(select_best_prices(&event, MarketKind::Spread).is_empty());
    }

    #[test]
    fn total_groups_by_exact_signed_point() {
        let event = SportEventBuilder::new("Away FC", "Home FC")
            .bookmaker(
                "fanduel",
                "totals",
                vec![
                    ("Over", dec!(1.91), Some(dec!(47.5))),
                    ("Under", dec!(1.91), Some(dec!(47.5))),
                ],
            )
            .bookmaker(
                "draftkings",
                "totals",
                vec![
                    ("Over", dec!(2.02), Some(dec!(47.5))),
                    ("Under", dec!(1.85), Some(dec!(48.5))),
                ],
            )
            .build();

        let sets = select_best_prices(&event, MarketKind::Total);
        // 48.5 only has an Under side, so only 47.5 survives.
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].line(), Some(dec!(47.5)));

        let quotes = sets[0].quotes();
        assert_eq!(quotes[0].contender, "Over");
        assert_eq!(quotes[0].price, dec!(2.02));
        assert_eq!(quotes[1].contender, "Under");
        assert_eq!(quotes[1].price, dec!(1.91));
    }

    #[test]
    fn total_outcomes_without_points_contribute_nothing() {
        let event = SportEventBuilder::new("Away FC", "Home FC")
            .bookmaker(
                "fanduel",
                "totals",
                vec![("Over", dec!(1.91), None), ("Under", dec!(1.91), None)],
            )
            .build();

        assert!(select_best_prices(&event, MarketKind::Total).is_empty());
    }

    #[test]
    fn markets_of_other_kinds_are_ignored() {
        let event = SportEventBuilder::new("Away FC", "Home FC")
            .bookmaker(
                "fanduel",
                "totals",
                vec![
                    ("Over", dec!(2.10), Some(dec!(47.5))),
                    ("Under", dec!(2.10), Some(dec!(47.5))),
                ],
            )
            .build();

        assert!(select_best_prices(&event, MarketKind::Spread).is_empty());
    }
}
