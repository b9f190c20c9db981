//! End-to-end tests for the scan pipeline over canned feed data.
//!
//! These tests exercise the full path: feed payload parsing, best-price
//! selection, arbitrage evaluation, and profit ranking, without any network.

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use oddsarb::arbitrage::{scan_event, sort_by_profit, Opportunity};
use oddsarb::config::Config;
use oddsarb::feed::{MarketKind, MockOddsFeed, SportEvent, SportEventBuilder};
use oddsarb::scan::Scanner;

/// A realistic The Odds API h2h payload.
const H2H_FIXTURE: &str = include_str!("fixtures/upcoming_h2h.json");

fn test_config() -> Config {
    Config {
        odds_api_key: "test-key".to_string(),
        odds_api_base_url: "https://api.the-odds-api.com".to_string(),
        sport: "upcoming".to_string(),
        regions: "us".to_string(),
        bookmakers: "fanduel,draftkings,betmgm".to_string(),
        link_state: "co".to_string(),
        min_profit_percent: Decimal::ZERO,
        scan_interval_seconds: 60,
        http_timeout_ms: 10_000,
        http_pool_size: 10,
        port: 8080,
        metrics_enabled: true,
        rust_log: "info".to_string(),
        verbose: false,
    }
}

#[test]
fn fixture_payload_parses_and_scans() {
    let events: Vec<SportEvent> = serde_json::from_str(H2H_FIXTURE).expect("fixture parses");
    assert_eq!(events.len(), 3);

    let mut opportunities: Vec<Opportunity> = events
        .iter()
        .flat_map(|event| scan_event(event, MarketKind::Moneyline))
        .collect();
    sort_by_profit(&mut opportunities);

    // Only the NFL game has a cross-book edge; the EPL game is quoted by a
    // single bookmaker and the MLB game has no bookmakers at all.
    assert_eq!(opportunities.len(), 1);

    let opp = &opportunities[0];
    assert_eq!(opp.event_label, "Kansas City Chiefs @ Houston Texans");
    assert_eq!(opp.market, MarketKind::Moneyline);
    assert_eq!(opp.line, None);
    assert_eq!(opp.profit_percent, dec!(12.71));

    // Away slot first, best price per side across books.
    assert_eq!(opp.legs[0].contender, "Kansas City Chiefs");
    assert_eq!(opp.legs[0].price, dec!(2.02));
    assert_eq!(opp.legs[0].bookmaker, "fanduel");
    assert_eq!(opp.legs[0].stake_percent, dec!(55.80));
    assert_eq!(opp.legs[1].contender, "Houston Texans");
    assert_eq!(opp.legs[1].price, dec!(2.55));
    assert_eq!(opp.legs[1].bookmaker, "draftkings");
    assert_eq!(opp.legs[1].stake_percent, dec!(44.20));
}

#[test]
fn fixture_stakes_guarantee_constant_payout() {
    let events: Vec<SportEvent> = serde_json::from_str(H2H_FIXTURE).expect("fixture parses");
    let opportunities: Vec<Opportunity> = events
        .iter()
        .flat_map(|event| scan_event(event, MarketKind::Moneyline))
        .collect();

    for opp in &opportunities {
        let stake_total: Decimal = opp.legs.iter().map(|l| l.stake_percent).sum();
        let tolerance = dec!(0.01) * Decimal::from(opp.legs.len());
        assert!((stake_total - dec!(100)).abs() <= tolerance);

        let expected_payout = dec!(100) + opp.profit_percent;
        for leg in &opp.legs {
            let payout = leg.stake_percent * leg.price;
            assert!(
                (payout - expected_payout).abs() < dec!(0.05),
                "payout {} deviates from {}",
                payout,
                expected_payout
            );
        }
    }
}

#[tokio::test]
async fn scanner_merges_markets_and_sorts_by_profit() {
    let feed = MockOddsFeed::new();

    let events: Vec<SportEvent> = serde_json::from_str(H2H_FIXTURE).expect("fixture parses");
    feed.set_events(MarketKind::Moneyline, events);

    // A totals edge richer than the moneyline edge.
    feed.set_events(
        MarketKind::Total,
        vec![SportEventBuilder::new("Chelsea", "Arsenal")
            .bookmaker(
                "fanduel",
                "totals",
                vec![
                    ("Over", dec!(2.40), Some(dec!(2.5))),
                    ("Under", dec!(1.80), Some(dec!(2.5))),
                ],
            )
            .bookmaker(
                "betmgm",
                "totals",
                vec![
                    ("Over", dec!(1.72), Some(dec!(2.5))),
                    ("Under", dec!(2.25), Some(dec!(2.5))),
                ],
            )
            .build()],
    );

    let mut scanner = Scanner::new(feed, &test_config());
    let opportunities = scanner.scan_once().await;

    assert_eq!(opportunities.len(), 2);
    assert_eq!(opportunities[0].market, MarketKind::Total);
    assert_eq!(opportunities[0].line, Some(dec!(2.5)));
    assert_eq!(opportunities[0].legs[0].contender, "Over");
    assert_eq!(opportunities[0].legs[0].price, dec!(2.40));
    assert_eq!(opportunities[0].legs[1].price, dec!(2.25));
    assert!(opportunities[0].profit_percent > opportunities[1].profit_percent);

    let stats = scanner.stats();
    assert_eq!(stats.scans_completed, 1);
    assert_eq!(stats.events_seen, 4);
    assert_eq!(stats.opportunities_found, 2);
}

#[tokio::test]
async fn scanner_survives_partial_feed_failure() {
    // Spread and total fetches fail; the moneyline fixture still scans.
    let feed = MockOddsFeed::new();
    let events: Vec<SportEvent> = serde_json::from_str(H2H_FIXTURE).expect("fixture parses");
    feed.set_events(MarketKind::Moneyline, events);

    let mut scanner = Scanner::new(feed, &test_config());
    let opportunities = scanner.scan_once().await;

    // Unconfigured mock kinds come back empty rather than erroring, which
    // matches the degrade-to-empty contract.
    assert_eq!(opportunities.len(), 1);
    assert_eq!(scanner.stats().feed_errors, 0);
}
