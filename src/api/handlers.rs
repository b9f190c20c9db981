//! HTTP API handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;

use crate::arbitrage::Opportunity;
use crate::scan::ScanStats;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Whether at least one scan has completed.
    pub ready: Arc<std::sync::atomic::AtomicBool>,
    /// Latest scan statistics.
    pub stats: Arc<tokio::sync::RwLock<ScanStats>>,
    /// Opportunities from the latest scan, profit-sorted.
    pub opportunities: Arc<tokio::sync::RwLock<Vec<Opportunity>>>,
    /// Prometheus render handle, when metrics are enabled.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new() -> Self {
        Self {
            ready: Arc::new(std::sync::atomic::AtomicBool::new(false)),
            stats: Arc::new(tokio::sync::RwLock::new(ScanStats::default())),
            opportunities: Arc::new(tokio::sync::RwLock::new(Vec::new())),
            prometheus: None,
        }
    }

    /// Attach a Prometheus render handle.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Set ready state.
    pub fn set_ready(&self, ready: bool) {
        self.ready
            .store(ready, std::sync::atomic::Ordering::SeqCst);
    }

    /// Check if ready.
    pub fn is_ready(&self) -> bool {
        self.ready.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether at least one scan has completed.
    pub ready: bool,
}

/// Status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Service status.
    pub status: &'static str,
    /// Opportunities in the latest scan.
    pub current_opportunities: usize,
    /// Scan statistics.
    pub stats: ScanStats,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check handler - returns 200 after the first completed scan,
/// 503 before.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let is_ready = state.is_ready();
    let response = ReadyResponse { ready: is_ready };

    if is_ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Status handler - returns scanner status and statistics.
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.stats.read().await.clone();
    let current = state.opportunities.read().await.len();

    let status = if state.is_ready() { "running" } else { "starting" };

    Json(StatusResponse {
        status,
        current_opportunities: current,
        stats,
    })
}

/// Opportunities handler - returns the latest scan's records, profit-sorted.
pub async fn opportunities(State(state): State<AppState>) -> impl IntoResponse {
    let opportunities = state.opportunities.read().await.clone();
    Json(opportunities)
}

/// Prometheus metrics handler.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.prometheus {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}
