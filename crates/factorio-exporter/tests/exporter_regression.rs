//! Exporter regression tests.
//!
//! Drives the full router against snapshot files on disk: scrape output,
//! degraded scrapes on broken files, and recovery.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use factorio_api::build_router;
use factorio_metrics::ScrapeCoordinator;
use tower::ServiceExt;

const SNAPSHOT: &str = r#"{
    "game": {"time": {"tick": 216000, "paused": false}},
    "players": {"alice": {"connected": true}},
    "forces": {
        "Engineers": {
            "research": {"progress": 0.5},
            "items": {"nauvis": {
                "iron-plate": {"production": 5, "consumption": 0}
            }},
            "rockets": {"launches": 12, "items": {"iron-plate": 300}}
        }
    },
    "pollution": {"nauvis": {"boiler": 12.5}},
    "surfaces": {"nauvis": {
        "pollution": 1000,
        "ticks_per_day": 25000,
        "entities": {"inserter": 40}
    }}
}"#;

fn router_for(path: &Path) -> (Router, Arc<ScrapeCoordinator>) {
    let coordinator = Arc::new(ScrapeCoordinator::for_path(path));
    (build_router(coordinator.clone()), coordinator)
}

async fn scrape(router: &Router) -> (StatusCode, String) {
    let req = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn metrics_endpoint_renders_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrics.json");
    std::fs::write(&path, SNAPSHOT).unwrap();
    let (router, _) = router_for(&path);

    let (status, body) = scrape(&router).await;
    assert_eq!(status, StatusCode::OK);

    for line in [
        "# TYPE factorio_game_tick counter",
        "factorio_game_tick 216000",
        "factorio_game_paused 0",
        "factorio_player_connected{username=\"alice\"} 1",
        "factorio_force_research_progress{force=\"Engineers\"} 0.5",
        "factorio_force_prototype_production{force=\"Engineers\",prototype=\"iron-plate\",surface=\"nauvis\",type=\"items\"} 5",
        "factorio_surface_pollution_production{source=\"boiler\",surface=\"nauvis\"} 12.5",
        "factorio_surface_pollution_total{surface=\"nauvis\"} 1000",
        "factorio_surface_ticks_per_day{surface=\"nauvis\"} 25000",
        "factorio_entity_count{force=\"player\",name=\"inserter\",surface=\"nauvis\"} 40",
        "# TYPE factorio_rockets_launched counter",
        "factorio_rockets_launched{force=\"Engineers\"} 12",
        "factorio_items_launched{force=\"Engineers\",name=\"iron-plate\"} 300",
    ] {
        assert!(
            body.lines().any(|l| l == line),
            "missing line {line:?} in:\n{body}"
        );
    }

    // Zero consumption is suppressed.
    assert!(!body.contains("factorio_force_prototype_consumption"));
}

#[tokio::test]
async fn broken_snapshot_degrades_then_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrics.json");
    std::fs::write(&path, SNAPSHOT).unwrap();
    let (router, coordinator) = router_for(&path);

    let (_, first) = scrape(&router).await;
    assert!(first.contains("factorio_game_tick 216000"));

    std::fs::write(&path, "{ this is not json").unwrap();
    let (status, body) = scrape(&router).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    // The good snapshot survives the failed load.
    let kept = coordinator.current().unwrap();
    assert_eq!(kept.get(&["game", "time", "tick"]).number(), 216000.0);

    std::fs::write(&path, r#"{"game": {"time": {"tick": 216060}}}"#).unwrap();
    let (_, body) = scrape(&router).await;
    assert!(body.contains("factorio_game_tick 216060"));
    assert!(!body.contains("factorio_player_connected"));
}

#[tokio::test]
async fn missing_snapshot_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = router_for(&dir.path().join("metrics.json"));

    let (status, body) = scrape(&router).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn healthz_independent_of_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = router_for(&dir.path().join("metrics.json"));

    let req = Request::builder()
        .uri("/healthz")
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn repeated_scrapes_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrics.json");
    std::fs::write(&path, SNAPSHOT).unwrap();
    let (router, _) = router_for(&path);

    let (_, a) = scrape(&router).await;
    let (_, b) = scrape(&router).await;
    assert_eq!(a, b);
}
