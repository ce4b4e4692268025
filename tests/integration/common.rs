//! Shared fixtures for the integration tests

use kensaku::config::Config;
use kensaku::crawler::Crawler;
use kensaku::storage::SqliteStorage;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a crawler over a fresh in-memory database with no politeness delay
pub fn create_test_crawler() -> Crawler<SqliteStorage> {
    create_crawler_with_delay(0)
}

/// Creates a crawler over a fresh in-memory database pausing `delay_ms` between fetches
pub fn create_crawler_with_delay(delay_ms: u64) -> Crawler<SqliteStorage> {
    let mut config = Config::default();
    config.crawler.politeness_delay = delay_ms;
    config.user_agent.crawler_name = "TestBot".to_string();

    let storage = Arc::new(Mutex::new(
        SqliteStorage::open_in_memory().expect("Failed to open in-memory database"),
    ));
    Crawler::from_config(&config, storage).expect("Failed to create crawler")
}

/// Serves `body` as an HTML page at `route`
pub async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Serves an empty response with `status` at `route`
pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Builds a minimal HTML page
pub fn html_page(title: &str, paragraphs: &[&str], links: &[&str]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<p>{}</p>", p))
        .chain(links.iter().map(|href| format!(r#"<a href="{}">link</a>"#, href)))
        .collect();

    format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        title, body
    )
}
