//! Sports betting arbitrage scanner entry point.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use oddsarb::api::{create_router, AppState};
use oddsarb::arbitrage::Opportunity;
use oddsarb::config::Config;
use oddsarb::feed::{MarketKind, OddsFeedClient};
use oddsarb::metrics;
use oddsarb::scan::Scanner;
use oddsarb::utils::shutdown_signal;

/// Cross-bookmaker sports betting arbitrage scanner.
#[derive(Parser, Debug)]
#[command(name = "oddsarb")]
#[command(about = "Scans bookmaker odds for cross-book arbitrage opportunities")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port for health/status/metrics.
    #[arg(short, long, default_value = "8080")]
    port: u16,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the scan loop with the HTTP status server (default).
    Run {
        /// Seconds between scans (overrides SCAN_INTERVAL_SECONDS).
        #[arg(long)]
        interval: Option<u64>,

        /// HTTP server port for health/status/metrics.
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Run one scan and print the report to stdout.
    Scan {
        /// Restrict to one market kind (moneyline, spread, total).
        #[arg(long)]
        market: Option<String>,
    },

    /// Check the odds API key and remaining quota.
    CheckKey,

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("oddsarb=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::CheckKey) => cmd_check_key().await,
        Some(Command::Scan { market }) => cmd_scan(market).await,
        Some(Command::Run { interval, port }) => cmd_run(interval, port).await,
        None => cmd_run(None, args.port).await,
    }
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("ODDSARB - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Feed: {}", config.odds_api_base_url);
    println!("  Sport: {}", config.sport);
    println!("  Regions: {}", config.regions);
    println!("  Bookmakers: {}", config.bookmaker_keys().len());
    println!("  Min Profit: {}%", config.min_profit_percent);
    println!("  Scan Interval: {}s", config.scan_interval_seconds);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Check the odds API key and remaining quota.
async fn cmd_check_key() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("ODDSARB - API KEY CHECK");
    println!("======================================================================");

    let config = Config::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let client = OddsFeedClient::new(&config);

    print!("Checking key against {}... ", client.base_url());
    let status = client.check_key().await?;

    if status.valid {
        println!("OK");
        match status.requests_remaining {
            Some(remaining) => println!("  Requests remaining: {}", remaining),
            None => println!("  Requests remaining: unknown"),
        }
    } else {
        println!("REJECTED");
        println!("  The feed returned 401 for this key.");
        return Err(anyhow::anyhow!("API key invalid"));
    }

    println!("======================================================================");

    Ok(())
}

/// Run one scan and print the report.
async fn cmd_scan(market: Option<String>) -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let kinds = match market {
        Some(name) => vec![MarketKind::from_str(&name)
            .map_err(|_| anyhow::anyhow!("unknown market kind: {}", name))?],
        None => MarketKind::ALL.to_vec(),
    };

    let client = OddsFeedClient::new(&config);

    // The scanner assumes it only runs with a usable key.
    let status = client.check_key().await?;
    if !status.is_usable() {
        return Err(anyhow::anyhow!(
            "odds API key is invalid or out of requests"
        ));
    }

    let mut scanner = Scanner::with_kinds(client, &config, kinds);
    let opportunities = scanner.scan_once().await;

    print_report(&opportunities);

    Ok(())
}

/// Run the scan loop with the HTTP status server.
async fn cmd_run(interval_override: Option<u64>, port: u16) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Some(interval) = interval_override {
        config.scan_interval_seconds = interval;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    info!("Configuration loaded successfully");
    info!("Sport: {}", config.sport);
    info!("Bookmakers: {}", config.bookmakers);
    info!("Scan interval: {}s", config.scan_interval_seconds);

    // Initialize metrics
    let mut app_state = AppState::new();
    if config.metrics_enabled {
        let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("failed to install metrics recorder: {}", e))?;
        app_state = app_state.with_prometheus(handle);
    }
    metrics::init_metrics();

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    let router = create_router(app_state.clone());

    let _server_handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    });

    // Gate on key validity and quota before scanning at all.
    let client = OddsFeedClient::new(&config);
    let key_status = client.check_key().await?;
    if !key_status.valid {
        error!("Odds API key rejected, refusing to start");
        return Err(anyhow::anyhow!("API key invalid"));
    }
    if key_status.requests_remaining == Some(0) {
        error!("Odds API key has no requests remaining, refusing to start");
        return Err(anyhow::anyhow!("API quota exhausted"));
    }

    let mut scanner = Scanner::new(client, &config);

    info!("========================================");
    info!("ARBITRAGE SCANNER STARTED");
    info!("========================================");

    loop {
        let opportunities = scanner.scan_once().await;

        if opportunities.is_empty() {
            info!("No arbitrage opportunities this scan");
        } else {
            for opp in &opportunities {
                info!(
                    event = %opp.event_label,
                    market = %opp.market,
                    profit = %opp.profit_percent,
                    "arbitrage opportunity"
                );
            }
        }

        // Publish to the HTTP API
        *app_state.opportunities.write().await = opportunities;
        *app_state.stats.write().await = scanner.stats();
        app_state.set_ready(true);

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(config.scan_interval_seconds)) => {}
            _ = shutdown_signal() => {
                info!("Stopping scanner");
                break;
            }
        }
    }

    let stats = scanner.stats();
    info!("========================================");
    info!("SCANNER STOPPED - FINAL SUMMARY");
    info!("----------------------------------------");
    info!("Scans completed: {}", stats.scans_completed);
    info!("Events seen: {}", stats.events_seen);
    info!("Opportunities found: {}", stats.opportunities_found);
    info!("Feed errors: {}", stats.feed_errors);
    info!("========================================");

    Ok(())
}

/// Print a scan report to stdout.
fn print_report(opportunities: &[Opportunity]) {
    println!("======================================================================");
    println!("ARBITRAGE SCAN REPORT");
    println!("======================================================================");

    if opportunities.is_empty() {
        println!("there are currently no arbitrage opportunities");
        println!("======================================================================");
        return;
    }

    for opp in opportunities {
        let market = match opp.line {
            Some(line) => format!("{} {}", opp.market.label(), line),
            None => opp.market.label().to_string(),
        };
        println!("{} [{}]", opp.event_label, market);
        for leg in &opp.legs {
            let bookmaker = match &leg.link {
                Some(link) => format!("{} <{}>", leg.bookmaker, link),
                None => leg.bookmaker.clone(),
            };
            println!(
                "  {:<24} {:<12} {:>14}   stake {:>6}%",
                leg.contender,
                bookmaker,
                leg.odds_display(),
                leg.stake_percent
            );
        }
        println!("  guaranteed profit: {}%", opp.profit_percent);
        println!("----------------------------------------------------------------------");
    }

    println!("======================================================================");
}
