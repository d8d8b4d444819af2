//! Integration tests for the distribution endpoint.
//!
//! Uses `tower::ServiceExt::oneshot` against the full router with a fake
//! upstream and an in-memory log store.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{body_json, get_req, make_app, FakeGbif, Upstream};
use fish_common::LogStatus;
use storage::MemoryLogStore;

fn salmon() -> Upstream {
    Upstream::Found {
        key: 5208,
        records: vec![
            json!({"key": 1, "decimalLatitude": 40.0, "decimalLongitude": -75.0}),
            json!({"key": 2}),
        ],
    }
}

// ── Validation ────────────────────────────────────────────────

#[tokio::test]
async fn missing_name_returns_400_without_log() {
    let gbif = FakeGbif::new(salmon());
    let store = MemoryLogStore::new();

    for uri in ["/fishSelector", "/fishSelector/"] {
        let app = make_app(gbif.clone(), store.clone());
        let resp = app.oneshot(get_req(uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Fish name is required in the URL path.");
    }

    assert!(store.is_empty().await);
    assert_eq!(gbif.species_calls(), 0);
}

#[tokio::test]
async fn blank_name_returns_400() {
    let gbif = FakeGbif::new(salmon());
    let store = MemoryLogStore::new();
    let app = make_app(gbif.clone(), store.clone());

    let resp = app.oneshot(get_req("/fishSelector/%20%20")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(store.is_empty().await);
    assert_eq!(gbif.species_calls(), 0);
}

#[tokio::test]
async fn undecodable_name_returns_json_400_without_log() {
    let gbif = FakeGbif::new(salmon());
    let store = MemoryLogStore::new();
    let app = make_app(gbif.clone(), store.clone());

    let resp = app.oneshot(get_req("/fishSelector/%FF")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await["error"],
        "Fish name is required in the URL path."
    );
    assert!(store.is_empty().await);
    assert_eq!(gbif.species_calls(), 0);
}

// ── Success ───────────────────────────────────────────────────

#[tokio::test]
async fn success_returns_records_and_map() {
    let gbif = FakeGbif::new(salmon());
    let store = MemoryLogStore::new();
    let app = make_app(gbif.clone(), store.clone());

    let resp = app.oneshot(get_req("/fishSelector/Salmon")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["fishName"], "Salmon");
    assert_eq!(body["distributionData"].as_array().unwrap().len(), 2);
    assert_eq!(body["distributionData"][0]["key"], 1);
    let map = body["mapHtml"].as_str().unwrap();
    assert_eq!(map.matches("L.marker(").count(), 1);
    assert!(map.contains("L.marker([40.0, -75.0]).addTo(map);"));

    let logs = store.records().await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].fish_name, "Salmon");
    assert_eq!(logs[0].status, LogStatus::Success);
    assert_eq!(logs[0].message, "Data fetched successfully");
    assert_eq!(logs[0].response_code, 200);
    let (start, end) = (logs[0].start_time.unwrap(), logs[0].end_time.unwrap());
    assert!(start <= end);
}

#[tokio::test]
async fn encoded_name_is_decoded_once() {
    let gbif = FakeGbif::new(salmon());
    let store = MemoryLogStore::new();
    let app = make_app(gbif, store.clone());

    let resp = app
        .oneshot(get_req("/fishSelector/Atlantic%20Salmon"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["fishName"], "Atlantic Salmon");
    assert_eq!(store.records().await[0].fish_name, "Atlantic Salmon");
}

#[tokio::test]
async fn fish_name_is_escaped_in_map() {
    let gbif = FakeGbif::new(salmon());
    let app = make_app(gbif, MemoryLogStore::new());

    let resp = app
        .oneshot(get_req("/fishSelector/%3Cscript%3Ealert(1)%3C%2Fscript%3E"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["fishName"], "<script>alert(1)</script>");
    let map = body["mapHtml"].as_str().unwrap();
    assert!(map.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!map.contains("<script>alert(1)"));
}

#[tokio::test]
async fn repeated_requests_log_twice_with_identical_maps() {
    let gbif = FakeGbif::new(salmon());
    let store = MemoryLogStore::new();

    let first = make_app(gbif.clone(), store.clone())
        .oneshot(get_req("/fishSelector/Salmon"))
        .await
        .unwrap();
    let second = make_app(gbif.clone(), store.clone())
        .oneshot(get_req("/fishSelector/Salmon"))
        .await
        .unwrap();

    let first = body_json(first).await;
    let second = body_json(second).await;
    assert_eq!(first["mapHtml"], second["mapHtml"]);
    assert_eq!(store.len().await, 2);
    assert_eq!(gbif.species_calls(), 2);
}

#[tokio::test]
async fn abandoned_request_is_still_logged() {
    let gbif = FakeGbif::slow(salmon(), Duration::from_millis(300));
    let store = MemoryLogStore::new();
    let app = make_app(gbif, store.clone());

    let early = tokio::time::timeout(
        Duration::from_millis(50),
        app.oneshot(get_req("/fishSelector/Salmon")),
    )
    .await;
    assert!(early.is_err());

    tokio::time::sleep(Duration::from_millis(1000)).await;
    let logs = store.records().await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].fish_name, "Salmon");
    assert_eq!(logs[0].status, LogStatus::Success);
}

#[tokio::test]
async fn numeric_string_coordinates_are_plotted() {
    let gbif = FakeGbif::new(Upstream::Found {
        key: 1,
        records: vec![json!({"decimalLatitude": "40.5", "decimalLongitude": "-75.25"})],
    });
    let app = make_app(gbif, MemoryLogStore::new());

    let resp = app.oneshot(get_req("/fishSelector/Cod")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body["mapHtml"]
        .as_str()
        .unwrap()
        .contains("L.marker([40.5, -75.25]).addTo(map);"));
}

// ── Failures ──────────────────────────────────────────────────

#[tokio::test]
async fn unknown_species_returns_404_and_logs_failure() {
    let gbif = FakeGbif::new(Upstream::NotFound);
    let store = MemoryLogStore::new();
    let app = make_app(gbif.clone(), store.clone());

    let resp = app.oneshot(get_req("/fishSelector/Nemo")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(resp).await["error"],
        "No taxon key found for fish: Nemo"
    );
    assert_eq!(gbif.occurrence_calls(), 0);

    let logs = store.records().await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].status, LogStatus::Failure);
    assert_eq!(logs[0].message, "No taxon key found");
    assert_eq!(logs[0].response_code, 404);
}

#[tokio::test]
async fn upstream_error_returns_generic_500_and_logs_detail() {
    let gbif = FakeGbif::new(Upstream::SpeciesStatus(503));
    let store = MemoryLogStore::new();
    let app = make_app(gbif, store.clone());

    let resp = app.oneshot(get_req("/fishSelector/Cod")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Failed to fetch fish distribution data");
    assert!(!body.to_string().contains("503"));

    let logs = store.records().await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].status, LogStatus::Failure);
    assert_eq!(logs[0].response_code, 500);
    assert!(logs[0].message.contains("503"));
}

#[tokio::test]
async fn occurrence_timeout_returns_500_and_logs_failure() {
    let gbif = FakeGbif::new(Upstream::OccurrenceTimeout { key: 5208 });
    let store = MemoryLogStore::new();
    let app = make_app(gbif, store.clone());

    let resp = app.oneshot(get_req("/fishSelector/Salmon")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let logs = store.records().await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].response_code, 500);
    assert!(logs[0].message.contains("timed out"));
}

#[tokio::test]
async fn malformed_coordinates_return_500() {
    let gbif = FakeGbif::new(Upstream::Found {
        key: 1,
        records: vec![json!({"decimalLatitude": "north", "decimalLongitude": 1.0})],
    });
    let store = MemoryLogStore::new();
    let app = make_app(gbif, store.clone());

    let resp = app.oneshot(get_req("/fishSelector/Cod")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(store.records().await[0].response_code, 500);
}

// ── Degraded logging ──────────────────────────────────────────

#[tokio::test]
async fn unreachable_log_store_does_not_fail_request() {
    let gbif = FakeGbif::new(salmon());
    let store = MemoryLogStore::new();
    store.set_reachable(false);
    let app = make_app(gbif, store.clone());

    let resp = app.oneshot(get_req("/fishSelector/Salmon")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["fishName"], "Salmon");

    store.set_reachable(true);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn rejected_log_write_does_not_change_response() {
    let gbif = FakeGbif::new(Upstream::NotFound);
    let store = MemoryLogStore::new();
    store.set_reject_writes(true);
    let app = make_app(gbif, store.clone());

    let resp = app.oneshot(get_req("/fishSelector/Nemo")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(store.is_empty().await);
}
