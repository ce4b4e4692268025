//! Search over pages indexed by a real crawl

use crate::common::{create_test_crawler, html_page, mount_page};
use kensaku::crawler::Queue;
use kensaku::search;
use std::sync::Arc;
use wiremock::MockServer;

#[tokio::test]
async fn test_search_crawled_pages() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        &html_page(
            "Rust",
            &["Rust is a language.", "Rust crawlers crawl quickly."],
            &["/ferris"],
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/ferris",
        &html_page("Ferris", &["Ferris the crab loves Rust"], &[]),
    )
    .await;

    let crawler = create_test_crawler();
    let queue = Arc::new(Queue::new("rust"));
    let seed = format!("{}/", mock_server.uri());

    crawler
        .crawl(&seed, Arc::clone(&queue))
        .await
        .unwrap()
        .await
        .unwrap();

    let storage = crawler.storage().lock().unwrap();

    let results = search(&*storage, "rust").unwrap();
    assert_eq!(results.count, 2);
    assert_eq!(results.results[0].document.url, seed);
    assert_eq!(results.results[0].index.count, 2);
    assert_eq!(results.results[1].document.title, "Ferris");
    assert_eq!(results.results[1].index.count, 1);

    let results = search(&*storage, "Crab").unwrap();
    assert_eq!(results.count, 1);
    assert_eq!(results.results[0].document.title, "Ferris");

    let results = search(&*storage, "crawling").unwrap();
    assert_eq!(results.count, 1);
    assert_eq!(results.results[0].index.word, "crawl");
}

#[tokio::test]
async fn test_search_is_idempotent() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", &html_page("Example", &["exampl"], &[])).await;

    let crawler = create_test_crawler();
    let seed = format!("{}/", mock_server.uri());
    crawler
        .crawl(&seed, Arc::new(Queue::new("example")))
        .await
        .unwrap()
        .await
        .unwrap();

    let storage = crawler.storage().lock().unwrap();
    let first = search(&*storage, "exampl").unwrap();
    let second = search(&*storage, "exampl").unwrap();

    assert_eq!(first.count, 1);
    assert_eq!(first.results[0].index.count, 1);
    assert_eq!(first.results, second.results);
}
