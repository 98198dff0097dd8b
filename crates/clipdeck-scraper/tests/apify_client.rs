//! Integration tests for `ApifyClient::fetch_candidates`.
//!
//! Each test stands up a `wiremock` server playing the Apify API: the run
//! start, the run-status long poll and the dataset read.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clipdeck_scraper::{ApifyClient, ScraperError, SearchOptions};

const ACTOR: &str = "apify/tiktok-search-scraper";
const RUN_PATH: &str = "/acts/apify~tiktok-search-scraper/runs";

fn test_client(server: &MockServer) -> ApifyClient {
    ApifyClient::with_base_url("test-token", ACTOR, 5, &server.uri())
        .expect("failed to build test ApifyClient")
}

fn run_body(status: &str, dataset: Option<&str>) -> serde_json::Value {
    json!({
        "data": {
            "id": "run-1",
            "status": status,
            "defaultDatasetId": dataset
        }
    })
}

fn item(id: &str, plays: u64) -> serde_json::Value {
    json!({
        "id": id,
        "desc": format!("edit {id}"),
        "stats": { "playCount": plays },
        "video": { "downloadAddr": format!("https://cdn.example.com/{id}.mp4") }
    })
}

// ---------------------------------------------------------------------------
// happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_candidates_runs_actor_and_reads_dataset() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_PATH))
        .and(query_param("waitForFinish", "60"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(201).set_body_json(run_body("SUCCEEDED", Some("ds-1"))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/datasets/ds-1/items"))
        .and(query_param("format", "json"))
        .and(query_param("clean", "true"))
        .and(query_param("limit", "96"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([item("a", 900_000), item("b", 600_000)])),
        )
        .mount(&server)
        .await;

    let items = test_client(&server)
        .fetch_candidates(&SearchOptions::default())
        .await
        .expect("fetch should succeed");

    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn fetch_candidates_polls_until_run_finishes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(run_body("RUNNING", None)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/actor-runs/run-1"))
        .and(query_param("waitForFinish", "60"))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body("SUCCEEDED", Some("ds-1"))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/datasets/ds-1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([item("a", 700_000)])))
        .mount(&server)
        .await;

    let items = test_client(&server)
        .fetch_candidates(&SearchOptions::default())
        .await
        .expect("fetch should succeed");

    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn fetch_candidates_drops_items_below_view_floor_but_keeps_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(run_body("SUCCEEDED", Some("ds-1"))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/datasets/ds-1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            item("low", 10),
            item("high", 2_000_000),
            { "id": "unknown", "video": { "downloadAddr": "https://cdn.example.com/u.mp4" } },
            "not an object"
        ])))
        .mount(&server)
        .await;

    let items = test_client(&server)
        .fetch_candidates(&SearchOptions::default())
        .await
        .expect("fetch should succeed");

    let videos = clipdeck_scraper::normalize_all(items);
    let ids: Vec<&str> = videos.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["high", "unknown"]);
}

#[tokio::test]
async fn fetch_candidates_without_dataset_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(run_body("SUCCEEDED", None)))
        .mount(&server)
        .await;

    let items = test_client(&server)
        .fetch_candidates(&SearchOptions::default())
        .await
        .expect("fetch should succeed");

    assert!(items.is_empty());
}

// ---------------------------------------------------------------------------
// errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_candidates_surfaces_failed_run() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(run_body("FAILED", Some("ds-1"))))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .fetch_candidates(&SearchOptions::default())
        .await;

    assert!(
        matches!(result, Err(ScraperError::RunFailed { ref status, .. }) if status == "FAILED"),
        "expected RunFailed, got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_candidates_surfaces_provider_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .fetch_candidates(&SearchOptions::default())
        .await;

    match result {
        Err(ScraperError::Provider {
            status, message, ..
        }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid token");
        }
        other => panic!("expected Provider error, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_candidates_rejects_malformed_run_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "unexpected": true })))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .fetch_candidates(&SearchOptions::default())
        .await;

    assert!(
        matches!(result, Err(ScraperError::Deserialize { .. })),
        "expected Deserialize, got: {result:?}"
    );
}
