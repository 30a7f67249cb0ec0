//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! fetch, count, save and follow cycle end-to-end.

use site_crawler::config::Config;
use site_crawler::crawler::{Coordinator, StopSignal};
use site_crawler::output::CrawlObserver;
use site_crawler::state::PageState;
use site_crawler::storage::{PageSink, StorageResult};
use site_crawler::{run_crawl, CrawlReport};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with a short request timeout
fn create_test_config(max_pages: usize) -> Config {
    let mut config = Config::default();
    config.crawler.max_pages = max_pages;
    config.fetcher.request_timeout_ms = 2_000;
    config
}

/// Observer that keeps every line it receives
fn collecting_observer() -> (Arc<dyn CrawlObserver>, Arc<Mutex<Vec<String>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = lines.clone();
    let observer: Arc<dyn CrawlObserver> =
        Arc::new(move |line: &str| sink.lock().unwrap().push(line.to_string()));
    (observer, lines)
}

fn html_page(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html")
}

/// Builds a page whose body is nothing but the given links
fn page_with_links(title: &str, hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        title, links
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

async fn run(config: Config, server: &MockServer) -> (CrawlReport, Vec<String>) {
    let (observer, lines) = collecting_observer();
    let seed = format!("{}/", server.uri());

    let report = Coordinator::new(config, &seed, observer)
        .expect("Failed to create coordinator")
        .run()
        .await;

    let lines = lines.lock().unwrap().clone();
    (report, lines)
}

async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

fn saved_file_names(dir: &Path) -> BTreeSet<String> {
    std::fs::read_dir(dir)
        .expect("pages directory should exist")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[tokio::test]
async fn test_budget_of_one_fetches_only_seed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        page_with_links("Home", &["/p1", "/p2", "/p3", "/p4", "/p5"]),
    )
    .await;
    for page in ["/p1", "/p2", "/p3", "/p4", "/p5"] {
        mount_page(&mock_server, page, page_with_links(page, &[])).await;
    }

    let (report, lines) = run(create_test_config(1), &mock_server).await;

    assert_eq!(report.pages_fetched, 1);
    assert!(report.budget_exhausted);
    assert_eq!(lines, vec![format!("[1] Crawling: {}/", base_url)]);
    assert_eq!(requested_paths(&mock_server).await, vec!["/"]);
}

#[tokio::test]
async fn test_interlinked_pages_visited_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", page_with_links("Home", &["/about", "/contact"])).await;
    mount_page(&mock_server, "/about", page_with_links("About", &["/", "/contact"])).await;
    mount_page(&mock_server, "/contact", page_with_links("Contact", &["/", "/about"])).await;

    let (report, lines) = run(create_test_config(100), &mock_server).await;

    assert_eq!(report.pages_fetched, 3);
    assert!(!report.budget_exhausted);

    let visited: BTreeSet<String> = report.visited.iter().cloned().collect();
    let expected: BTreeSet<String> = ["/", "/about", "/contact"]
        .iter()
        .map(|p| format!("{}{}", base_url, p))
        .collect();
    assert_eq!(visited, expected);
    assert_eq!(report.visited.len(), 3, "no page may be counted twice");

    assert_eq!(lines.len(), 3);
    assert_eq!(requested_paths(&mock_server).await.len(), 3);
}

#[tokio::test]
async fn test_dead_seed_ends_cleanly() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let (report, lines) = run(create_test_config(10), &mock_server).await;

    assert_eq!(report.pages_fetched, 0);
    assert!(report.visited.is_empty());
    assert_eq!(lines, vec![format!("[Skip] {}/ -> HTTP 404", base_url)]);
    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.pages[0].state, PageState::DeadLink);
    assert!(!report.cancelled);
}

#[tokio::test]
async fn test_timed_out_page_does_not_stop_siblings() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let pages_dir = TempDir::new().unwrap();

    mount_page(&mock_server, "/", page_with_links("Home", &["/slow", "/fast"])).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page("<html><body>late</body></html>").set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/fast", page_with_links("Fast", &[])).await;

    let mut config = create_test_config(10);
    config.fetcher.request_timeout_ms = 300;
    config.crawler.save_content = true;
    config.output.pages_dir = pages_dir.path().to_string_lossy().into_owned();

    let (report, lines) = run(config, &mock_server).await;

    let slow = format!("{}/slow", base_url);
    assert_eq!(report.pages_fetched, 2);
    assert!(!report.visited.contains(&slow));
    assert!(lines
        .iter()
        .any(|line| line.starts_with(&format!("[Error] {} -> ", slow))));
    assert!(lines.contains(&format!("[2] Crawling: {}/fast", base_url)));

    let record = report.pages.iter().find(|p| p.url == slow).unwrap();
    assert_eq!(record.state, PageState::TimedOut);

    let files = saved_file_names(pages_dir.path());
    assert_eq!(
        files,
        BTreeSet::from(["index.html".to_string(), "fast.html".to_string()])
    );
}

#[tokio::test]
async fn test_saved_page_named_after_path() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let pages_dir = temp_dir.path().join("pages");

    let post_body = "<html><head><title>Post</title></head><body>Hello, wörld</body></html>";
    mount_page(&mock_server, "/", page_with_links("Home", &["/blog/post-1"])).await;
    mount_page(&mock_server, "/blog/post-1", post_body.to_string()).await;

    let mut config = create_test_config(10);
    config.crawler.save_content = true;
    config.output.pages_dir = pages_dir.to_string_lossy().into_owned();

    let (report, _) = run(config, &mock_server).await;

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.saved_files.len(), 2);
    assert!(report.save_failures.is_empty());

    let saved = std::fs::read(pages_dir.join("blog_post-1.html")).unwrap();
    assert_eq!(saved, post_body.as_bytes());
    assert!(pages_dir.join("index.html").exists());
}

#[tokio::test]
async fn test_external_links_never_fetched() {
    let mock_server = MockServer::start().await;
    let external_server = MockServer::start().await;
    let external_url = format!("{}/elsewhere", external_server.uri());

    mount_page(
        &mock_server,
        "/",
        page_with_links("Home", &[external_url.as_str(), "/local"]),
    )
    .await;
    mount_page(&mock_server, "/local", page_with_links("Local", &[external_url.as_str()])).await;
    mount_page(&external_server, "/elsewhere", page_with_links("Elsewhere", &[])).await;

    let (report, _) = run(create_test_config(10), &mock_server).await;

    assert_eq!(report.pages_fetched, 2);
    assert!(!report.visited.contains(&external_url));
    assert!(requested_paths(&external_server).await.is_empty());
}

#[tokio::test]
async fn test_content_type_handling() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", page_with_links("Home", &["/report.pdf", "/page"])).await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/page", page_with_links("Page", &[])).await;

    let (report, lines) = run(create_test_config(10), &mock_server).await;

    assert_eq!(report.pages_fetched, 2);
    assert!(lines.contains(&format!(
        "[Skip] {}/report.pdf -> content type application/pdf",
        base_url
    )));

    let record = report
        .pages
        .iter()
        .find(|p| p.url.ends_with("/report.pdf"))
        .unwrap();
    assert_eq!(record.state, PageState::ContentMismatch);
}

#[tokio::test]
async fn test_depth_first_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", page_with_links("Home", &["/a", "/b"])).await;
    mount_page(&mock_server, "/a", page_with_links("A", &["/a1", "/a2", "/b"])).await;
    mount_page(&mock_server, "/a1", page_with_links("A1", &[])).await;
    mount_page(&mock_server, "/a2", page_with_links("A2", &[])).await;
    mount_page(&mock_server, "/b", page_with_links("B", &["/a"])).await;

    let (report, lines) = run(create_test_config(10), &mock_server).await;

    let expected: Vec<String> = ["/", "/a", "/a1", "/a2", "/b"]
        .iter()
        .enumerate()
        .map(|(i, p)| format!("[{}] Crawling: {}{}", i + 1, base_url, p))
        .collect();
    assert_eq!(lines, expected);
    assert_eq!(report.pages_fetched, 5);
}

#[tokio::test]
async fn test_budget_respected_with_concurrency() {
    let mock_server = MockServer::start().await;

    let children: Vec<String> = (1..=10).map(|i| format!("/child-{}", i)).collect();
    let hrefs: Vec<&str> = children.iter().map(String::as_str).collect();
    mount_page(&mock_server, "/", page_with_links("Home", &hrefs)).await;
    for child in &children {
        Mock::given(method("GET"))
            .and(path(child.as_str()))
            .respond_with(html_page(page_with_links(child, &[])).set_delay(Duration::from_millis(50)))
            .mount(&mock_server)
            .await;
    }

    let mut config = create_test_config(4);
    config.crawler.concurrency = 4;

    let (report, lines) = run(config, &mock_server).await;

    assert_eq!(report.pages_fetched, 4);
    assert_eq!(lines.len(), 4);
    // Reservations keep in-flight fetches within the budget
    assert_eq!(requested_paths(&mock_server).await.len(), 4);
}

#[tokio::test]
async fn test_redirect_uses_final_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", page_with_links("Home", &["/old", "/docs/new"])).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/docs/new"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/docs/new", page_with_links("New", &["child"])).await;
    mount_page(&mock_server, "/docs/child", page_with_links("Child", &[])).await;

    let (report, lines) = run(create_test_config(10), &mock_server).await;

    assert_eq!(report.pages_fetched, 3);
    assert_eq!(
        report.visited,
        vec![
            format!("{}/", base_url),
            format!("{}/docs/new", base_url),
            format!("{}/docs/child", base_url),
        ]
    );
    assert_eq!(lines[1], format!("[2] Crawling: {}/old", base_url));

    // Reached once through the redirect, never again through its own link
    let paths = requested_paths(&mock_server).await;
    assert_eq!(paths.iter().filter(|p| p.as_str() == "/docs/new").count(), 1);
}

#[tokio::test]
async fn test_redirect_off_domain_is_skipped() {
    let mock_server = MockServer::start().await;
    let external_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let landing = format!("{}/landing", external_server.uri());

    mount_page(&mock_server, "/", page_with_links("Home", &["/away"])).await;
    Mock::given(method("GET"))
        .and(path("/away"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", landing.as_str()))
        .mount(&mock_server)
        .await;
    mount_page(&external_server, "/landing", page_with_links("Landing", &["/more"])).await;

    let (report, lines) = run(create_test_config(10), &mock_server).await;

    assert_eq!(report.pages_fetched, 1);
    assert!(lines.contains(&format!(
        "[Skip] {}/away -> redirected off-domain to {}",
        base_url, landing
    )));
    assert!(!report.visited.contains(&landing));
    // Links on the foreign page are never followed
    assert_eq!(requested_paths(&external_server).await, vec!["/landing"]);
}

#[tokio::test]
async fn test_save_failure_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = TempDir::new().unwrap();

    // A plain file where the pages directory should go
    let blocker = temp_dir.path().join("pages");
    std::fs::write(&blocker, "not a directory").unwrap();

    mount_page(&mock_server, "/", page_with_links("Home", &["/next"])).await;
    mount_page(&mock_server, "/next", page_with_links("Next", &[])).await;

    let mut config = create_test_config(10);
    config.crawler.save_content = true;
    config.output.pages_dir = blocker.to_string_lossy().into_owned();

    let (report, lines) = run(config, &mock_server).await;

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.save_failures.len(), 2);
    assert!(report.saved_files.is_empty());
    assert!(lines
        .iter()
        .any(|line| line.starts_with(&format!("[Error] failed to save {}/next: ", base_url))));
}

#[tokio::test]
async fn test_stop_signal_cancels_running_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", page_with_links("Home", &["/slow"])).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page("<html></html>").set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(10);
    config.fetcher.request_timeout_ms = 10_000;

    let (observer, lines) = collecting_observer();
    let stop = StopSignal::new();
    let coordinator = Coordinator::new(config, &format!("{}/", base_url), observer)
        .unwrap()
        .with_stop_signal(stop.clone());

    let trigger = stop.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        trigger.raise();
    });

    let report = tokio::time::timeout(Duration::from_secs(3), coordinator.run())
        .await
        .expect("a raised stop signal should end the crawl promptly");

    assert!(report.cancelled);
    assert_eq!(report.pages_fetched, 1);
    let lines = lines.lock().unwrap();
    assert_eq!(
        lines.last().map(String::as_str),
        Some("[Stopped] crawl cancelled after 1 pages")
    );
}

#[tokio::test]
async fn test_run_crawl_returns_page_count() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", page_with_links("Home", &["/about"])).await;
    mount_page(&mock_server, "/about", page_with_links("About", &[])).await;

    let (observer, lines) = collecting_observer();
    let pages = run_crawl(&format!("{}/", base_url), false, 10, move |line: &str| {
        observer.on_log(line)
    })
    .await;

    assert_eq!(pages, 2);
    assert_eq!(lines.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_run_crawl_with_unusable_seed() {
    let (observer, lines) = collecting_observer();
    let pages = run_crawl("ftp://example.test/", false, 10, move |line: &str| {
        observer.on_log(line)
    })
    .await;

    assert_eq!(pages, 0);
    let lines = lines.lock().unwrap();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("[Error] ftp://example.test/ -> "));
}

#[tokio::test]
async fn test_repeated_crawl_is_idempotent() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", page_with_links("Home", &["/a", "/b/c"])).await;
    mount_page(&mock_server, "/a", page_with_links("A", &["/b/c", "/"])).await;
    mount_page(&mock_server, "/b/c", page_with_links("C", &["/a"])).await;

    let mut runs = Vec::new();
    for _ in 0..2 {
        let pages_dir = TempDir::new().unwrap();
        let mut config = create_test_config(10);
        config.crawler.save_content = true;
        config.output.pages_dir = pages_dir.path().to_string_lossy().into_owned();

        let (report, _) = run(config, &mock_server).await;
        runs.push((report.pages_fetched, saved_file_names(pages_dir.path())));
    }

    assert_eq!(runs[0], runs[1]);
    assert_eq!(runs[0].0, 3);
    assert_eq!(
        runs[0].1,
        BTreeSet::from([
            "index.html".to_string(),
            "a.html".to_string(),
            "b_c.html".to_string()
        ])
    );
}

/// Sink that remembers every page handed to it
#[derive(Clone, Default)]
struct RecordingSink {
    saved: Arc<Mutex<Vec<(String, String)>>>,
}

impl PageSink for RecordingSink {
    fn save(&self, url: &Url, body: &str) -> StorageResult<PathBuf> {
        self.saved
            .lock()
            .unwrap()
            .push((url.to_string(), body.to_string()));
        Ok(PathBuf::from(url.path()))
    }
}

/// Seed links to `/flaky` twice; `/flaky` always answers 500 after a delay
async fn crawl_with_failing_relink(concurrency: usize) {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let flaky = format!("{}/flaky", base_url);

    mount_page(
        &mock_server,
        "/",
        page_with_links("Home", &["/flaky", "/other", "/flaky"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_millis(200)))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/other", page_with_links("Other", &[])).await;

    let mut config = create_test_config(10);
    config.crawler.concurrency = concurrency;

    let (report, lines) = run(config, &mock_server).await;

    assert_eq!(report.pages_fetched, 2);
    assert!(!report.visited.contains(&flaky));

    let paths = requested_paths(&mock_server).await;
    assert_eq!(paths.iter().filter(|p| p.as_str() == "/flaky").count(), 2);

    let skip_line = format!("[Skip] {} -> HTTP 500", flaky);
    assert_eq!(lines.iter().filter(|line| **line == skip_line).count(), 2);

    let attempts: Vec<_> = report.pages.iter().filter(|p| p.url == flaky).collect();
    assert_eq!(attempts.len(), 2);
    assert!(attempts.iter().all(|p| p.state == PageState::HttpError));
}

#[tokio::test]
async fn test_failed_page_retried_when_linked_again() {
    crawl_with_failing_relink(1).await;
}

#[tokio::test]
async fn test_failed_page_retried_when_linked_during_fetch() {
    crawl_with_failing_relink(4).await;
}

#[tokio::test]
async fn test_two_redirects_to_one_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", page_with_links("Home", &["/old-a", "/old-b"])).await;
    for old in ["/old-a", "/old-b"] {
        Mock::given(method("GET"))
            .and(path(old))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "/target"))
            .mount(&mock_server)
            .await;
    }
    mount_page(&mock_server, "/target", page_with_links("Target", &[])).await;

    let (report, lines) = run(create_test_config(10), &mock_server).await;

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(
        lines,
        vec![
            format!("[1] Crawling: {}/", base_url),
            format!("[2] Crawling: {}/old-a", base_url),
            format!(
                "[Skip] {}/old-b -> already crawled as {}/target",
                base_url, base_url
            ),
        ]
    );

    let duplicate = report
        .pages
        .iter()
        .find(|p| p.url.ends_with("/old-b"))
        .unwrap();
    assert_eq!(duplicate.state, PageState::DuplicateRedirect);
    assert_eq!(
        report.visited,
        vec![format!("{}/", base_url), format!("{}/target", base_url)]
    );
}

#[tokio::test]
async fn test_custom_sink_gets_each_counted_page_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let home = page_with_links("Home", &["/old", "/missing", "/new"]);
    let new_page = page_with_links("New", &["/"]);
    mount_page(&mock_server, "/", home.clone()).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new", new_page.clone()).await;

    let sink = RecordingSink::default();
    let (observer, _) = collecting_observer();
    let report = Coordinator::new(create_test_config(10), &format!("{}/", base_url), observer)
        .unwrap()
        .with_sink(Box::new(sink.clone()))
        .run()
        .await;

    assert_eq!(report.pages_fetched, 2);
    // Saved under the final URL, never under the redirecting one
    assert_eq!(
        *sink.saved.lock().unwrap(),
        vec![
            (format!("{}/", base_url), home),
            (format!("{}/new", base_url), new_page),
        ]
    );
    assert_eq!(
        report.saved_files,
        vec![PathBuf::from("/"), PathBuf::from("/new")]
    );
}
