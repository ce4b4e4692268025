//! JSON API tests driving a crawl through the router

use crate::common::{create_test_crawler, html_page, mount_page, mount_status};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use kensaku::api::{router, ApiState};
use kensaku::crawler::QueueRegistry;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::MockServer;

fn create_test_state() -> ApiState {
    ApiState::new(create_test_crawler(), Arc::new(QueueRegistry::new()))
}

async fn get_json(state: &ApiState, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router(state.clone())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[tokio::test]
async fn test_crawl_then_search() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        &html_page("Home", &["Searchable words live here"], &["/more"]),
    )
    .await;
    mount_page(&mock_server, "/more", &html_page("More", &["More words"], &[])).await;

    let state = create_test_state();
    let seed = format!("{}/", mock_server.uri());

    let (status, body) = get_json(&state, &format!("/api/crawl?url={}", encode(&seed))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 200);
    assert_eq!(body["message"], "Crawling successful");

    // The background drain keeps running after the response
    let queue = state.queues.get(&seed).expect("queue registered");
    for _ in 0..100 {
        if queue.status() == kensaku::QueueStatus::Finished {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(queue.status(), kensaku::QueueStatus::Finished);

    let (status, body) = get_json(&state, "/api/search?q=words").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);

    let (status, body) = get_json(&state, &format!("/api/queue/{}", encode(&seed))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], seed.as_str());
    assert_eq!(body["status"], "finished");
    assert_eq!(body["seen"], 2);
}

#[tokio::test]
async fn test_crawl_unreachable_seed() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "/", 500).await;

    let state = create_test_state();
    let seed = format!("{}/", mock_server.uri());

    let (status, body) = get_json(&state, &format!("/api/crawl?url={}", encode(&seed))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], 500);
    assert_eq!(body["message"], "Crawling failed.");

    let (_, body) = get_json(&state, "/api/queues").await;
    assert_eq!(body[0]["name"], seed.as_str());
    assert_eq!(body[0]["status"], "failed");
}

#[tokio::test]
async fn test_queues_trailing_slash() {
    let state = create_test_state();

    let (status, body) = get_json(&state, "/api/queues/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}
