//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::catalog::{CustomerClass, RatePlan, Technology};
use crate::sim::kpi::KpiReport;
use crate::sim::types::{Configuration, HourRecord, SimulationState};

/// Combined state response.
#[derive(Debug, Serialize)]
pub struct StateResponse<'a> {
    pub config: &'a Configuration,
    /// Aggregate curtailable capacity of the selection at peak demand (kW).
    pub technical_potential_kw: f64,
    pub kpi: &'a KpiReport,
    /// Engine state after the last simulated hour.
    pub state: &'a SimulationState,
    /// Most recent hour, absent for an empty run.
    pub latest_hour: Option<&'a HourRecord>,
}

/// The static catalog.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub customer_classes: &'static [CustomerClass],
    pub technologies: &'static [Technology],
    pub rate_plans: &'static [RatePlan],
}

/// Optional range query parameters for the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// First hour index (inclusive).
    pub from: Option<usize>,
    /// Last hour index (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
