//! Crawl cycle tests against a mock site

use crate::common::{
    create_crawler_with_delay, create_test_crawler, html_page, mount_page, mount_status,
};
use kensaku::config::{CrawlerConfig, UserAgentConfig};
use kensaku::crawler::{Fetcher, Queue};
use kensaku::storage::Storage;
use kensaku::{JobState, KensakuError, QueueStatus};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_seed_failure_persists_nothing() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "/", 500).await;

    let crawler = create_test_crawler();
    let queue = Arc::new(Queue::new("failing"));
    let seed = format!("{}/", mock_server.uri());

    let result = crawler.crawl(&seed, Arc::clone(&queue)).await;

    match result {
        Err(KensakuError::UnreachableUrl { status, .. }) => assert_eq!(status, 500),
        other => panic!("Expected UnreachableUrl, got {:?}", other.map(|_| ())),
    }
    assert_eq!(queue.state(), JobState::Failed);
    assert_eq!(queue.status(), QueueStatus::Failed);

    let storage = crawler.storage().lock().unwrap();
    assert_eq!(storage.count_documents().unwrap(), 0);
    assert_eq!(storage.count_index_entries().unwrap(), 0);
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        &html_page("Home", &["Welcome home"], &["/page1", "./page2"]),
    )
    .await;
    mount_page(
        &mock_server,
        "/page1",
        &html_page("Page 1", &["First crawled page"], &["/", "/page2"]),
    )
    .await;
    mount_page(
        &mock_server,
        "/page2",
        &html_page("Page 2", &["Second crawled page"], &["/page1"]),
    )
    .await;

    let crawler = create_test_crawler();
    let queue = Arc::new(Queue::new("site"));
    let seed = format!("{}/", mock_server.uri());

    let handle = crawler
        .crawl(&seed, Arc::clone(&queue))
        .await
        .expect("Seed crawl failed");

    // Both links are queued before crawl() returns
    assert_eq!(queue.state(), JobState::Indexed);
    assert_eq!(queue.len(), 2);

    handle.await.expect("Crawl task panicked");

    assert_eq!(queue.seen_count(), 3);
    assert!(queue.is_empty());
    assert_eq!(queue.state(), JobState::Finished);
    assert_eq!(queue.status(), QueueStatus::Finished);

    let storage = crawler.storage().lock().unwrap();
    assert_eq!(storage.count_documents().unwrap(), 3);

    let sites = storage.documents_per_site().unwrap();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].1, 3);
    assert!(mock_server.uri().ends_with(&sites[0].0));
}

#[tokio::test]
async fn test_seed_without_trailing_slash_is_fetched_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(html_page("Home", &["Home"], &["/a"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/a", &html_page("A", &["Page a"], &["/"])).await;

    let crawler = create_test_crawler();
    let queue = Arc::new(Queue::new("bare"));
    let seed = mock_server.uri();
    assert!(!seed.ends_with('/'));

    let handle = crawler.crawl(&seed, Arc::clone(&queue)).await.unwrap();
    handle.await.unwrap();

    assert_eq!(queue.seen_count(), 2);
    assert!(queue.has_seen(&format!("{}/", seed)));

    let storage = crawler.storage().lock().unwrap();
    assert_eq!(storage.count_documents().unwrap(), 2);
}

#[tokio::test]
async fn test_politeness_delay_between_fetches() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        &html_page("Home", &["Home"], &["/one", "/two", "/three"]),
    )
    .await;
    for route in ["/one", "/two", "/three"] {
        mount_page(&mock_server, route, &html_page(route, &["Page"], &[])).await;
    }

    let crawler = create_crawler_with_delay(150);
    let queue = Arc::new(Queue::new("polite"));
    let seed = format!("{}/", mock_server.uri());

    let handle = crawler.crawl(&seed, Arc::clone(&queue)).await.unwrap();
    assert_eq!(queue.len(), 3);

    let started = Instant::now();
    handle.await.unwrap();
    let elapsed = started.elapsed();

    // Three queued pages mean two pauses; none after the last page
    assert!(
        elapsed >= Duration::from_millis(300),
        "drain took {:?}",
        elapsed
    );
    assert_eq!(queue.status(), QueueStatus::Finished);
    assert_eq!(crawler.storage().lock().unwrap().count_documents().unwrap(), 4);
}

#[tokio::test]
async fn test_off_site_and_fragment_links_are_ignored() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        &html_page(
            "Home",
            &["Links everywhere"],
            &[
                "http://www.google.com/",
                "#section",
                "mailto:someone@example.com",
                "/about",
            ],
        ),
    )
    .await;
    mount_page(&mock_server, "/about", &html_page("About", &["About us"], &[])).await;

    let crawler = create_test_crawler();
    let queue = Arc::new(Queue::new("site"));
    let seed = format!("{}/", mock_server.uri());

    let handle = crawler.crawl(&seed, Arc::clone(&queue)).await.unwrap();
    assert_eq!(queue.len(), 1);

    handle.await.unwrap();

    assert_eq!(queue.seen_count(), 2);
    assert!(!queue.has_seen("http://www.google.com/"));
    assert_eq!(crawler.storage().lock().unwrap().count_documents().unwrap(), 2);
}

#[tokio::test]
async fn test_failing_page_is_skipped() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        &html_page("Home", &["Home page"], &["/missing", "/broken", "/page1"]),
    )
    .await;
    mount_status(&mock_server, "/missing", 404).await;
    mount_status(&mock_server, "/broken", 503).await;
    mount_page(&mock_server, "/page1", &html_page("Page 1", &["Still here"], &[])).await;

    let crawler = create_test_crawler();
    let queue = Arc::new(Queue::new("site"));
    let seed = format!("{}/", mock_server.uri());

    let handle = crawler.crawl(&seed, Arc::clone(&queue)).await.unwrap();
    handle.await.unwrap();

    assert_eq!(queue.status(), QueueStatus::Finished);
    assert_eq!(queue.seen_count(), 4);
    assert_eq!(crawler.storage().lock().unwrap().count_documents().unwrap(), 2);
}

#[tokio::test]
async fn test_pages_are_fetched_once() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        &html_page("Home", &["Home"], &["/a", "/a", "/b"]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("A", &["a"], &["/b", "/"])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("B", &["b"], &["/a"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let crawler = create_test_crawler();
    let queue = Arc::new(Queue::new("site"));
    let seed = format!("{}/", mock_server.uri());

    let handle = crawler.crawl(&seed, Arc::clone(&queue)).await.unwrap();
    handle.await.unwrap();

    assert_eq!(queue.seen_count(), 3);
    // Mock expectations are verified when the server is dropped
}

#[tokio::test]
async fn test_user_agent_header_is_sent() {
    let mock_server = MockServer::start().await;
    let user_agent = UserAgentConfig::default();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", user_agent.header_value().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>hi</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::from_config(&user_agent, &CrawlerConfig::default()).unwrap();
    let body = fetcher
        .fetch(&format!("{}/", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(body, b"<p>hi</p>");
}

#[tokio::test]
async fn test_body_is_truncated_at_cap() {
    let mock_server = MockServer::start().await;
    let large = "a".repeat(10_000);

    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(ResponseTemplate::new(200).set_body_string(large))
        .mount(&mock_server)
        .await;

    let crawler_config = CrawlerConfig {
        max_body_size: 2048,
        ..CrawlerConfig::default()
    };
    let fetcher = Fetcher::from_config(&UserAgentConfig::default(), &crawler_config).unwrap();

    let body = fetcher
        .fetch(&format!("{}/large", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(body.len(), 2048);
    assert!(body.iter().all(|b| *b == b'a'));
}

#[tokio::test]
async fn test_non_200_success_is_unreachable() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "/created", 201).await;

    let fetcher =
        Fetcher::from_config(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
    let result = fetcher
        .fetch(&format!("{}/created", mock_server.uri()))
        .await;

    assert!(matches!(
        result,
        Err(KensakuError::UnreachableUrl { status: 201, .. })
    ));
}
