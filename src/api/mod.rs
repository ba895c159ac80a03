//! Read-only REST API over a completed batch run.
//!
//! Provides three GET endpoints:
//! - `/state`: configuration, KPI report, final state and latest hour
//! - `/history`: hour records with optional index range filtering
//! - `/catalog`: customer classes, technologies and rate plans

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::sim::kpi::KpiReport;
use crate::sim::types::{Configuration, HourRecord, SimulationState};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the batch run completes and wrapped in `Arc`;
/// no locks needed since all data is read-only.
pub struct AppState {
    /// Configuration the run used.
    pub config: Configuration,
    /// Aggregate KPI report.
    pub kpi: KpiReport,
    /// Engine state after the last simulated hour.
    pub state: SimulationState,
    /// Every simulated hour, in order.
    pub records: Vec<HourRecord>,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/history", get(handlers::get_history))
        .route("/catalog", get(handlers::get_catalog))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind to `addr` or the
/// server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
