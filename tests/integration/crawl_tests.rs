//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full mirror cycle (crawl, store, compile) end-to-end.

use doc_mirror::config::Config;
use doc_mirror::crawler::crawl;
use doc_mirror::output::run_compile;
use doc_mirror::storage::{FsPageStore, PageStore};
use doc_mirror::url::Pathname;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn p(s: &str) -> Pathname {
    Pathname::parse(s).unwrap()
}

/// Wraps article content and page navigation in the site's page chrome
fn page(article: &str, nav: &str) -> String {
    format!(
        r#"<html><head><title>Docs</title></head><body>
        <header><a href="/">Home</a></header>
        <main><article>{}</article></main>
        <nav>{}</nav>
        </body></html>"#,
        article, nav
    )
}

/// Creates a test configuration mirroring the mock server into `store_dir`
fn create_test_config(base_url: &str, store_dir: &Path) -> Config {
    let mut config = Config::default();
    config.site.root = base_url.to_string();
    config.site.seeds = vec![p("/guides/introduction/"), p("/api/")];
    config.site.skip = vec![];
    config.crawler.request_delay = 0;
    config.store.root = store_dir.join("docs").display().to_string();
    config.compile.title = "Test Docs".to_string();
    config.compile.output_path = store_dir.join("out/docs.md").display().to_string();
    config
}

async fn mount_page(server: &MockServer, pathname: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(pathname))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts a small documentation site with one dead index link
async fn mount_site(server: &MockServer) {
    mount_page(
        server,
        "/guides/introduction/",
        page(
            r#"<h1>Introduction<span aria-hidden="true">#</span></h1>
            <p>Use <a href="/api/pipe/">pipe</a> or read <a href="https://example.org/x">this</a>.</p>"#,
            r#"<a aria-label="Next page" href="/guides/installation/">Installation</a>"#,
        ),
    )
    .await;

    mount_page(
        server,
        "/guides/installation/",
        page(
            "<h1>Installation</h1><p>Run the installer.</p>",
            r#"<a aria-label="Previous page" href="/guides/introduction/">Introduction</a>"#,
        ),
    )
    .await;

    mount_page(
        server,
        "/api/",
        page(
            r#"<h1>API</h1><ul>
            <li><a href="/api/pipe/">pipe</a></li>
            <li><a href="/api/ValiError/">ValiError</a></li>
            <li><a href="/api/gone/">gone</a></li>
            </ul>"#,
            "",
        ),
    )
    .await;

    mount_page(
        server,
        "/api/pipe/",
        page("<h1>pipe</h1><p>Adds a pipeline.</p>", ""),
    )
    .await;

    mount_page(
        server,
        "/api/ValiError/",
        page(
            r#"<h1>ValiError</h1><p>Thrown by <code><a href="../pipe/">pipe</a></code>.</p>"#,
            "",
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/api/gone/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

async fn request_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_full_crawl_stores_every_reachable_page() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp_dir.path());

    let report = crawl(&config).await.unwrap();

    assert_eq!(
        report.visited,
        vec![
            p("/guides/introduction/"),
            p("/api/"),
            p("/guides/installation/"),
            p("/api/pipe/"),
            p("/api/ValiError/"),
        ]
    );
    assert_eq!(report.fetched, 5);
    assert_eq!(report.cached, 0);
    assert_eq!(report.not_found, vec![p("/api/gone/")]);

    let store = FsPageStore::new(&config.store.root);
    let intro = store.read(&p("/guides/introduction/")).unwrap();
    assert_eq!(intro.meta.next, Some(p("/guides/installation/")));
    assert_eq!(intro.meta.prev, None);
    assert_eq!(intro.meta.links, vec![p("/api/pipe/")]);
    assert_eq!(
        intro.markdown,
        "Introduction\n------------\n\nUse [pipe](../api/pipe.md) or read [this](https://example.org/x)."
    );

    let installation = store.read(&p("/guides/installation/")).unwrap();
    assert_eq!(installation.meta.prev, Some(p("/guides/introduction/")));
    assert_eq!(installation.meta.next, None);

    let vali_error = store.read(&p("/api/ValiError/")).unwrap();
    assert!(vali_error.markdown.contains("Thrown by `pipe`."));
    assert_eq!(vali_error.meta.links, vec![p("/api/pipe/")]);

    assert!(Path::new(&config.store.root).join("api/_ValiError.md").exists());
    assert!(Path::new(&config.store.root).join("api/_ValiError.json").exists());
    assert!(!Path::new(&config.store.root).join("api/gone.md").exists());
}

#[tokio::test]
async fn test_second_run_only_retries_missing_pages() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp_dir.path());

    crawl(&config).await.unwrap();
    let first_run = request_paths(&mock_server).await;
    assert_eq!(first_run.len(), 6);

    let intro_path = Path::new(&config.store.root).join("guides/introduction.md");
    let snapshot = std::fs::read(&intro_path).unwrap();

    let report = crawl(&config).await.unwrap();

    let second_run = request_paths(&mock_server).await;
    assert_eq!(&second_run[first_run.len()..], &["/api/gone/".to_string()]);
    assert_eq!(report.fetched, 0);
    assert_eq!(report.cached, 5);
    assert_eq!(std::fs::read(&intro_path).unwrap(), snapshot);
}

#[tokio::test]
async fn test_server_error_aborts_crawl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/guides/introduction/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp_dir.path());

    let result = crawl(&config).await;

    assert!(result.is_err());
    assert_eq!(request_paths(&mock_server).await, vec!["/guides/introduction/"]);
}

#[tokio::test]
async fn test_crawl_then_compile() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let mut config = create_test_config(&mock_server.uri(), temp_dir.path());
    config.compile.start = p("/guides/introduction/");
    config.compile.index = p("/api/");

    crawl(&config).await.unwrap();
    let document = run_compile(&config).unwrap();

    assert_eq!(
        document.sections,
        vec![
            p("/guides/introduction/"),
            p("/guides/installation/"),
            p("/api/"),
            p("/api/pipe/"),
            p("/api/ValiError/"),
        ]
    );
    assert_eq!(document.missing, vec![p("/api/gone/")]);

    let written = std::fs::read_to_string(&config.compile.output_path).unwrap();
    assert_eq!(written, document.markdown);
    assert!(written.starts_with("# Test Docs\n\nIntroduction\n------------\n\n"));
    assert!(written.ends_with("Thrown by `pipe`.\n\n"));
}
