//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use dr_sim::api::{AppState, router};
use dr_sim::config::ScenarioConfig;
use dr_sim::sim::kpi::KpiReport;

/// Runs the commercial preset and returns the API state.
fn build_api_state() -> Arc<AppState> {
    let cfg = ScenarioConfig::commercial_cpp();
    let mut engine = cfg.engine();
    engine.start_simulation(&cfg.customer).expect("valid preset");
    let records = engine
        .run(cfg.presenter().as_mut(), cfg.simulation.hours)
        .expect("run");
    Arc::new(AppState {
        config: engine.configuration().cloned().expect("running"),
        kpi: KpiReport::from_records(&records),
        state: engine.state().cloned().expect("running"),
        records,
    })
}

async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
    let app = router(build_api_state());
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn state_reports_configuration_and_kpis() {
    let (status, json) = get("/state").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["config"]["class"]["id"], "commercial");
    assert_eq!(json["config"]["rate_plan"]["id"], "cpp");
    assert_eq!(json["technical_potential_kw"], 160.0);
    assert_eq!(json["kpi"]["hours_simulated"], 48);
    assert_eq!(json["state"]["current_day"], 3);
    assert_eq!(json["latest_hour"]["index"], 47);
}

#[tokio::test]
async fn history_filters_by_index() {
    let (status, json) = get("/history?from=17&to=20").await;
    assert_eq!(status, StatusCode::OK);
    let rows = json.as_array().cloned().unwrap_or_default();
    assert_eq!(rows.len(), 4);
    for row in &rows {
        assert_eq!(row["event"], "critical_peak");
        assert_eq!(row["price"], 0.75);
    }
}

#[tokio::test]
async fn history_open_ended_range() {
    let (status, json) = get("/history?from=40").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().map(Vec::len), Some(8));
}

#[tokio::test]
async fn history_rejects_inverted_range() {
    let (status, json) = get("/history?from=30&to=2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        json["error"]
            .as_str()
            .is_some_and(|e| e.contains("must be <="))
    );
}

#[tokio::test]
async fn catalog_exposes_static_tables() {
    let (status, json) = get("/catalog").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["customer_classes"][0]["id"], "residential");
    assert_eq!(json["technologies"].as_array().map(Vec::len), Some(16));
    assert_eq!(json["rate_plans"][1]["policy"]["critical_peak"], 0.75);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = router(build_api_state());
    let req = Request::builder()
        .uri("/telemetry")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
