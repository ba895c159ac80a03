//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::AppState;
use super::types::{CatalogResponse, ErrorResponse, HistoryQuery, StateResponse};
use crate::catalog;

/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Response {
    Json(StateResponse {
        config: &state.config,
        technical_potential_kw: state.config.technical_potential_kw(),
        kpi: &state.kpi,
        state: &state.state,
        latest_hour: state.records.last(),
    })
    .into_response()
}

/// Returns hour records, optionally filtered by index range.
///
/// `GET /history` → 200 + `Vec<HourRecord>` JSON
/// `GET /history?from=N&to=M` → filtered range (inclusive)
/// `GET /history?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        )
            .into_response();
    }

    let records: Vec<_> = state
        .records
        .iter()
        .filter(|r| r.index >= from && r.index <= to)
        .collect();

    Json(records).into_response()
}

/// `GET /catalog` → 200 + `CatalogResponse` JSON
pub async fn get_catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        customer_classes: catalog::customer_classes(),
        technologies: catalog::all_technologies(),
        rate_plans: catalog::rate_plans(),
    })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::sim::engine::Engine;
    use crate::sim::kpi::KpiReport;
    use crate::sim::presenter::FixedPresenter;
    use crate::sim::types::SimulationSetup;

    fn make_test_state() -> Arc<AppState> {
        let mut engine = Engine::with_seed(42);
        engine
            .start_simulation(&SimulationSetup::default())
            .expect("valid setup");
        let records = engine
            .run(&mut FixedPresenter::new(20.0), 24)
            .expect("run");
        Arc::new(AppState {
            config: engine.configuration().cloned().expect("running"),
            kpi: KpiReport::from_records(&records),
            state: engine.state().cloned().expect("running"),
            records,
        })
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let app = router(make_test_state());
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn state_returns_200() {
        let (status, json) = get_json("/state").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json.get("config").is_some());
        assert!(json.get("kpi").is_some());
        assert_eq!(json["state"]["current_day"], 2);
        assert_eq!(json["latest_hour"]["hour"], 23);
        assert_eq!(json["technical_potential_kw"], 0.75);
    }

    #[tokio::test]
    async fn history_returns_all_hours() {
        let (status, json) = get_json("/history").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().map(Vec::len), Some(24));
    }

    #[tokio::test]
    async fn history_range_query() {
        let (status, json) = get_json("/history?from=5&to=10").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().cloned().unwrap_or_default();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0]["index"], 5);
        assert_eq!(rows[5]["index"], 10);
    }

    #[tokio::test]
    async fn history_invalid_range_returns_400() {
        let (status, json) = get_json("/history?from=10&to=5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json.get("error").is_some());
    }

    #[tokio::test]
    async fn catalog_lists_everything() {
        let (status, json) = get_json("/catalog").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["customer_classes"].as_array().map(Vec::len), Some(4));
        assert_eq!(json["technologies"].as_array().map(Vec::len), Some(16));
        assert_eq!(json["rate_plans"].as_array().map(Vec::len), Some(3));
        assert_eq!(json["rate_plans"][2]["policy"]["kind"], "real_time");
    }
}
