//! Integration tests for Kensaku
//!
//! These tests use wiremock to create mock HTTP servers and exercise
//! crawling, search and the JSON API end-to-end.

mod api_tests;
mod common;
mod crawl_tests;
mod search_tests;
