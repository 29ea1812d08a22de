//! Integration tests for reading indexed pages

use crate::common::{html_page, mount_page, page_url, test_indexer};
use docs_indexer::crawler::FetchError;
use docs_indexer::storage::DocumentationStore;
use docs_indexer::{Documentation, IndexerError, Page};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE: &str = r#"<html>
<head><title>Live Title</title><style>.hidden { display: none; }</style></head>
<body>
  <h1>Installing</h1>
  <p>Run the installer and follow the <a href="/docs/next">next steps</a>.</p>
  <p><img src="/img/diagram.png" alt="architecture diagram"></p>
  <script>trackVisitor();</script>
</body>
</html>"#;

async fn mount_article(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/docs/install"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(ARTICLE, "text/html"),
        )
        .mount(server)
        .await;
}

/// Saves an index containing the article under a title that differs from
/// the live page's
fn save_index(indexer: &docs_indexer::Indexer, server: &MockServer) -> String {
    let url = page_url(server, "/docs/install");
    let prefix = page_url(server, "/docs/");
    let mut doc = Documentation::new("guide", prefix.clone(), prefix);
    doc.pages.push(Page::new("Indexed Title", url.clone()));
    indexer.store().save(&doc).unwrap();
    url
}

#[tokio::test]
async fn test_read_returns_stored_title_and_live_text() {
    let server = MockServer::start().await;
    mount_article(&server).await;

    let temp_dir = TempDir::new().unwrap();
    let indexer = test_indexer(temp_dir.path(), 1);
    let url = save_index(&indexer, &server);

    let content = indexer.read_page("guide", &url).await.unwrap();

    assert_eq!(content.title, "Indexed Title");
    assert_eq!(content.url, url);
    assert!(content.text.contains("Run the installer"));
    assert!(content.text.contains("[next steps](/docs/next)"));
    assert!(content.text.contains("![architecture diagram](/img/diagram.png)"));
    assert!(!content.text.contains("trackVisitor"));
    assert!(!content.text.contains("display: none"));

    assert!(content.render().starts_with("# Indexed Title\n"));
}

#[tokio::test]
async fn test_read_after_crawl() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/page"]).await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            html_page(Some("Page"), &[], "Known fixture text"),
            "text/html",
        ))
        .expect(2)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let indexer = test_indexer(temp_dir.path(), 1);
    let root = page_url(&server, "/");
    indexer.crawl("site", &root, &root).await.unwrap();

    // Query strings and fragments normalize to the stored URL
    let requested = format!("{}?v=2#section", page_url(&server, "/page"));
    let content = indexer.read_page("site", &requested).await.unwrap();

    assert_eq!(content.title, "Page");
    assert_eq!(content.url, page_url(&server, "/page"));
    assert!(content.text.contains("Known fixture text"));
}

#[tokio::test]
async fn test_read_matches_unnormalized_stored_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            html_page(Some("Root"), &[], "Site root text"),
            "text/html",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let indexer = test_indexer(temp_dir.path(), 1);

    // Root stored without the trailing slash normalization would add
    let root = server.uri();
    let mut doc = Documentation::new("legacy", root.clone(), root.clone());
    doc.pages.push(Page::new("Root", root.clone()));
    indexer.store().save(&doc).unwrap();

    let content = indexer.read_page("legacy", &root).await.unwrap();

    assert_eq!(content.title, "Root");
    assert_eq!(content.url, root);
    assert!(content.text.contains("Site root text"));
}

#[tokio::test]
async fn test_read_unknown_documentation() {
    let temp_dir = TempDir::new().unwrap();
    let indexer = test_indexer(temp_dir.path(), 1);

    let err = indexer.read_page("nonexistent", "http://x").await.unwrap_err();

    assert!(matches!(err, IndexerError::NotFound { name } if name == "nonexistent"));
}

#[tokio::test]
async fn test_read_unknown_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let indexer = test_indexer(temp_dir.path(), 1);
    save_index(&indexer, &server);

    let err = indexer
        .read_page("guide", "http://not-in-index.example/")
        .await
        .unwrap_err();
    assert!(matches!(err, IndexerError::PageNotFound { .. }));

    // Matching is exact: a parent URL of an indexed page is not a match
    let err = indexer
        .read_page("guide", &page_url(&server, "/docs/"))
        .await
        .unwrap_err();
    assert!(matches!(err, IndexerError::PageNotFound { .. }));
}

#[tokio::test]
async fn test_read_invalid_url() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let indexer = test_indexer(temp_dir.path(), 1);
    save_index(&indexer, &server);

    let err = indexer.read_page("guide", "not a url").await.unwrap_err();
    assert!(matches!(err, IndexerError::InvalidInput(_)));
}

#[tokio::test]
async fn test_read_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/docs/install"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let indexer = test_indexer(temp_dir.path(), 1);
    let url = save_index(&indexer, &server);

    let err = indexer.read_page("guide", &url).await.unwrap_err();

    assert!(matches!(
        err,
        IndexerError::Fetch(FetchError::Status { status: 404, .. })
    ));
}
