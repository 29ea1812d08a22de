//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, including persistence.

use crate::common::{html_page, mount_forbidden, mount_page, page_url, test_indexer};
use docs_indexer::crawler::CrawlRequest;
use docs_indexer::storage::DocumentationStore;
use docs_indexer::{is_within_prefix, normalize, IndexerError};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_pages_in_depth_first_pre_order() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/a", "/b"]).await;
    mount_page(&server, "/a", "A", &["/a/1", "/b"]).await;
    mount_page(&server, "/a/1", "A1", &["/"]).await;
    mount_page(&server, "/b", "B", &[]).await;

    let temp_dir = TempDir::new().unwrap();
    let indexer = test_indexer(temp_dir.path(), 1);
    let root = page_url(&server, "/");

    let report = indexer.crawl("site", &root, &root).await.unwrap();

    let urls: Vec<&str> = report
        .documentation
        .pages
        .iter()
        .map(|p| p.url.as_str())
        .collect();
    assert_eq!(
        urls,
        vec![
            page_url(&server, "/"),
            page_url(&server, "/a"),
            page_url(&server, "/a/1"),
            page_url(&server, "/b"),
        ]
    );

    let titles: Vec<&str> = report
        .documentation
        .pages
        .iter()
        .map(|p| p.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Home", "A", "A1", "B"]);
    assert!(report.failures.is_empty());
    assert_eq!(report.duplicates_skipped, 2);
}

#[tokio::test]
async fn test_cycle_terminates_with_each_page_once() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", "A", &["/b"]).await;
    mount_page(&server, "/b", "B", &["/a", "/a#again", "/b?tab=1"]).await;

    let temp_dir = TempDir::new().unwrap();
    let indexer = test_indexer(temp_dir.path(), 1);

    let report = indexer
        .crawl("cycle", &page_url(&server, "/a"), &page_url(&server, "/"))
        .await
        .unwrap();

    let pages = &report.documentation.pages;
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].url, page_url(&server, "/a"));
    assert_eq!(pages[1].url, page_url(&server, "/b"));
}

#[tokio::test]
async fn test_server_error_is_not_fatal() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/ok", "/broken", "/also-ok"]).await;
    mount_page(&server, "/ok", "Ok", &[]).await;
    mount_page(&server, "/also-ok", "Also Ok", &[]).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let indexer = test_indexer(temp_dir.path(), 1);
    let root = page_url(&server, "/");

    let report = indexer.crawl("site", &root, &root).await.unwrap();

    let urls: Vec<&str> = report
        .documentation
        .pages
        .iter()
        .map(|p| p.url.as_str())
        .collect();
    assert_eq!(
        urls,
        vec![
            page_url(&server, "/"),
            page_url(&server, "/ok"),
            page_url(&server, "/also-ok"),
        ]
    );
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].url, page_url(&server, "/broken"));
    assert!(report.failures[0].error.contains("500"));

    // The failure is not persisted either
    let stored = indexer.documentation("site").unwrap();
    assert!(stored.page_by_url(&page_url(&server, "/broken")).is_none());
}

#[tokio::test]
async fn test_only_pages_within_prefix_are_crawled() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/docs/",
        "Docs",
        &[
            "intro",
            "/blog/post",
            "/docs-archive/old",
            "https://elsewhere.invalid/docs/",
        ],
    )
    .await;
    mount_page(&server, "/docs/intro", "Intro", &["../blog/post"]).await;
    mount_forbidden(&server, "/blog/post").await;
    mount_forbidden(&server, "/docs-archive/old").await;

    let temp_dir = TempDir::new().unwrap();
    let indexer = test_indexer(temp_dir.path(), 1);
    let prefix = page_url(&server, "/docs/");

    let report = indexer.crawl("docs", &prefix, &prefix).await.unwrap();

    let pages = &report.documentation.pages;
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].url, prefix);
    for page in pages {
        assert!(normalize(&page.url).unwrap().starts_with(&prefix));
        assert!(is_within_prefix(&page.url, &prefix));
    }
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn test_query_and_fragment_variants_fetched_once() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        "Home",
        &["/guide?lang=en", "/guide#install", "/guide", "#top"],
    )
    .await;
    mount_page(&server, "/guide", "Guide", &["/?from=guide"]).await;

    let temp_dir = TempDir::new().unwrap();
    let indexer = test_indexer(temp_dir.path(), 1);
    let root = page_url(&server, "/");

    let report = indexer.crawl("site", &root, &root).await.unwrap();

    let pages = &report.documentation.pages;
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1].url, page_url(&server, "/guide"));

    let unique: HashSet<&str> = pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(unique.len(), pages.len());
}

#[tokio::test]
async fn test_concurrent_fetches_visit_each_url_once() {
    let server = MockServer::start().await;

    // Densely linked graph: every page links to every other page
    let routes: Vec<String> = (0..12).map(|i| format!("/p{}", i)).collect();
    let hrefs: Vec<&str> = routes.iter().map(String::as_str).collect();
    mount_page(&server, "/", "Home", &hrefs).await;
    for route in &routes {
        let mut links = hrefs.clone();
        links.push("/");
        mount_page(&server, route, route, &links).await;
    }

    let temp_dir = TempDir::new().unwrap();
    let indexer = test_indexer(temp_dir.path(), 4);
    let root = page_url(&server, "/");

    let report = indexer.crawl("dense", &root, &root).await.unwrap();

    let pages = &report.documentation.pages;
    assert_eq!(pages.len(), routes.len() + 1);
    let unique: HashSet<&str> = pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(unique.len(), pages.len());
    // The seed is always fetched first
    assert_eq!(pages[0].url, root);
}

#[tokio::test]
async fn test_missing_title_falls_back_to_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/untitled"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html_page(None, &[], "No title here"), "text/html"),
        )
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let indexer = test_indexer(temp_dir.path(), 1);
    let url = page_url(&server, "/untitled");

    let report = indexer.crawl("site", &url, &url).await.unwrap();

    assert_eq!(report.documentation.pages[0].title, url);
}

#[tokio::test]
async fn test_links_resolve_against_redirect_target() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/docs/start"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/docs/guide/intro"))
        .mount(&server)
        .await;
    mount_page(&server, "/docs/guide/intro", "Intro", &["next"]).await;
    mount_page(&server, "/docs/guide/next", "Next", &[]).await;

    let temp_dir = TempDir::new().unwrap();
    let indexer = test_indexer(temp_dir.path(), 1);

    let report = indexer
        .crawl(
            "guide",
            &page_url(&server, "/docs/start"),
            &page_url(&server, "/docs/"),
        )
        .await
        .unwrap();

    let pages = &report.documentation.pages;
    assert_eq!(pages.len(), 2);
    // Stored under the requested URL, titled from the final page
    assert_eq!(pages[0].url, page_url(&server, "/docs/start"));
    assert_eq!(pages[0].title, "Intro");
    assert_eq!(pages[1].url, page_url(&server, "/docs/guide/next"));
}

#[tokio::test]
async fn test_seed_outside_prefix_is_followed_but_not_indexed() {
    let server = MockServer::start().await;
    mount_page(&server, "/docs", "Docs", &["/docs/intro", "/blog/"]).await;
    mount_page(&server, "/docs/intro", "Intro", &[]).await;
    mount_forbidden(&server, "/blog/").await;

    let temp_dir = TempDir::new().unwrap();
    let indexer = test_indexer(temp_dir.path(), 1);

    let report = indexer
        .crawl(
            "d",
            &page_url(&server, "/docs"),
            &page_url(&server, "/docs/"),
        )
        .await
        .unwrap();

    let urls: Vec<&str> = report
        .documentation
        .pages
        .iter()
        .map(|p| p.url.as_str())
        .collect();
    assert_eq!(urls, vec![page_url(&server, "/docs/intro")]);
    assert_eq!(report.outside_prefix, 1);
    assert_eq!(report.documentation.base_url, page_url(&server, "/docs"));
    assert!(indexer.store().exists("d"));
}

#[tokio::test]
async fn test_redirect_out_of_prefix_is_not_indexed() {
    let server = MockServer::start().await;
    mount_page(&server, "/docs/", "Docs", &["/docs/moved", "/docs/kept"]).await;
    Mock::given(method("GET"))
        .and(path("/docs/moved"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/elsewhere/page"))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/elsewhere/page", "Elsewhere", &[]).await;
    mount_page(&server, "/docs/kept", "Kept", &[]).await;

    let temp_dir = TempDir::new().unwrap();
    let indexer = test_indexer(temp_dir.path(), 1);

    let root = page_url(&server, "/docs/");
    let report = indexer.crawl("docs", &root, &root).await.unwrap();

    let urls: Vec<&str> = report
        .documentation
        .pages
        .iter()
        .map(|p| p.url.as_str())
        .collect();
    assert_eq!(urls, vec![root.clone(), page_url(&server, "/docs/kept")]);
    assert_eq!(report.outside_prefix, 1);
    for page in &report.documentation.pages {
        assert!(is_within_prefix(&page.url, &root));
    }
}

#[tokio::test]
async fn test_cancel_aborts_in_flight_fetches() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/slow1", "/slow2"]).await;
    for route in ["/slow1", "/slow2"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(html_page(Some("Slow"), &[], "slow"), "text/html")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;
    }

    let temp_dir = TempDir::new().unwrap();
    let indexer = test_indexer(temp_dir.path(), 2);
    let root = page_url(&server, "/");
    let request = CrawlRequest::new("site", &root, &root);
    let cancel = CancellationToken::new();

    let started = Instant::now();
    let (result, _) = tokio::join!(
        indexer.crawl_with_cancellation(&request, cancel.clone()),
        async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            cancel.cancel();
        }
    );

    assert!(matches!(result, Err(IndexerError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(!indexer.store().exists("site"));
    assert!(indexer.list_documentations().unwrap().is_empty());
}

#[tokio::test]
async fn test_crawl_persists_snapshot() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/about"]).await;
    mount_page(&server, "/about", "About", &[]).await;

    let temp_dir = TempDir::new().unwrap();
    let root = page_url(&server, "/");

    let report = {
        let indexer = test_indexer(temp_dir.path(), 1);
        indexer.crawl("site", &root, &root).await.unwrap()
    };

    // A fresh indexer over the same directory sees the saved record
    let indexer = test_indexer(temp_dir.path(), 1);
    assert_eq!(indexer.list_documentations().unwrap(), vec!["site"]);

    let stored = indexer.documentation("site").unwrap();
    assert_eq!(stored, report.documentation);
    assert_eq!(stored.base_url, root);
    assert_eq!(stored.prefix, root);
    assert!(stored.last_synced.is_some());
    assert_eq!(indexer.list_pages("site").unwrap().len(), 2);

    assert!(indexer.store().exists("site"));
    assert!(temp_dir
        .path()
        .join("docs")
        .join("site")
        .join("meta.json")
        .is_file());
}

#[tokio::test]
async fn test_recrawl_replaces_previous_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let indexer = test_indexer(temp_dir.path(), 1);

    let first = MockServer::start().await;
    mount_page(&first, "/", "Home", &["/old-a", "/old-b"]).await;
    mount_page(&first, "/old-a", "Old A", &[]).await;
    mount_page(&first, "/old-b", "Old B", &[]).await;
    let root = page_url(&first, "/");
    indexer.crawl("site", &root, &root).await.unwrap();
    assert_eq!(indexer.list_pages("site").unwrap().len(), 3);

    let second = MockServer::start().await;
    mount_page(&second, "/", "New Home", &[]).await;
    let root = page_url(&second, "/");
    indexer.crawl("site", &root, &root).await.unwrap();

    let pages = indexer.list_pages("site").unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].title, "New Home");
    assert_eq!(indexer.documentation("site").unwrap().base_url, root);
}

#[tokio::test]
async fn test_concurrent_crawls_of_same_name_serialize() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html_page(Some("Home"), &[], "home"), "text/html")
                .set_delay(Duration::from_millis(200)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let first = test_indexer(temp_dir.path(), 1);
    let second = test_indexer(temp_dir.path(), 1);
    let root = page_url(&server, "/");

    let (a, b) = tokio::join!(
        first.crawl("site", &root, &root),
        second.crawl("site", &root, &root)
    );
    assert!(a.is_ok());
    assert!(b.is_ok());

    let stored = first.documentation("site").unwrap();
    assert_eq!(stored.pages.len(), 1);
}
