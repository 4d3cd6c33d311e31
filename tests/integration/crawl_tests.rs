//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle end-to-end against a real output file.

use std::path::Path;
use sumi_fanout::config::Config;
use sumi_fanout::crawler::{run_crawl, Coordinator};
use sumi_fanout::output::verify_output_log;
use sumi_fanout::FanoutError;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at `seed` and writing to `output`
fn create_test_config(seed: &str, output: &Path, workers: usize) -> Config {
    let mut config = Config::default();
    config.seed.link = seed.to_string();
    config.output.file_path = output.to_string_lossy().to_string();
    config.crawler.workers = Some(workers);
    config.crawler.max_retries = 0;
    config.crawler.retry_delay_ms = 10;
    config.crawler.request_timeout_secs = 5;
    config
}

fn anchors(links: &[String]) -> String {
    let body: String = links
        .iter()
        .map(|link| format!(r#"<a href="{}">link</a>"#, link))
        .collect();
    format!("<html><body>{}</body></html>", body)
}

async fn mount_page(server: &MockServer, route: &str, links: &[String]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(anchors(links))
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("Failed to read output log")
        .lines()
        .map(|line| line.to_string())
        .collect()
}

#[tokio::test]
async fn test_full_crawl_against_mock_server() {
    let server = MockServer::start().await;
    let base = server.uri();
    let page = |route: &str| format!("{}{}", base, route);

    mount_page(&server, "/", &[page("/a"), page("/b"), page("/c")]).await;
    mount_page(
        &server,
        "/a",
        &[page("/b"), page("/d"), page("/style.css"), page("/a")],
    )
    .await;
    mount_page(&server, "/b", &[]).await;
    mount_page(&server, "/d", &[page("/a"), page("/e")]).await;
    mount_page(&server, "/e", &[page("/d")]).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("sites.txt");
    let config = create_test_config(&page("/"), &output, 2);

    let summary = run_crawl(config).await.expect("crawl failed");

    let lines = read_lines(&output);
    assert_eq!(
        lines,
        vec![page("/a"), page("/b"), page("/c"), page("/d"), page("/e")]
    );
    assert_eq!(verify_output_log(&output).unwrap(), 5);

    assert_eq!(summary.workers_spawned, 2);
    assert_eq!(summary.initial_links_recorded, 1);
    assert_eq!(summary.accepted, 5);
    assert_eq!(summary.authorized, 2);
    assert_eq!(summary.clean_exits, 2);
    assert!(summary.is_durable());
}

#[tokio::test]
async fn test_recorded_seed_links_are_not_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();
    let page = |route: &str| format!("{}{}", base, route);

    mount_page(&server, "/", &[page("/a"), page("/extra")]).await;
    mount_page(&server, "/a", &[]).await;
    Mock::given(method("GET"))
        .and(path("/extra"))
        .respond_with(ResponseTemplate::new(200).set_body_string(anchors(&[page("/hidden")])))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("sites.txt");
    let config = create_test_config(&page("/"), &output, 1);

    let summary = run_crawl(config).await.expect("crawl failed");

    assert_eq!(read_lines(&output), vec![page("/a"), page("/extra")]);
    assert_eq!(summary.initial_links_recorded, 1);
    // MockServer verifies `expect(0)` for /extra on drop
}

#[tokio::test]
async fn test_seed_failure_aborts_crawl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("sites.txt");
    let config = create_test_config(&format!("{}/", server.uri()), &output, 2);

    let result = run_crawl(config).await;

    assert!(matches!(result, Err(FanoutError::SeedUnavailable { .. })));
    assert!(read_lines(&output).is_empty());
}

#[tokio::test]
async fn test_unreachable_workers_exit_with_seed_links_logged() {
    let server = MockServer::start().await;

    // A closed port: every worker fetch fails and counts as zero links
    let dead = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port())
    };
    let links: Vec<String> = ["/a", "/b", "/c", "/d"]
        .iter()
        .map(|route| format!("{}{}", dead, route))
        .collect();
    mount_page(&server, "/", &links).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("sites.txt");
    let config = create_test_config(&format!("{}/", server.uri()), &output, 2);

    let summary = run_crawl(config).await.expect("crawl failed");

    assert_eq!(read_lines(&output), links);
    assert_eq!(summary.workers_spawned, 2);
    assert_eq!(summary.clean_exits, 2);
    assert_eq!(summary.authorized + summary.denied, 0);
}

#[tokio::test]
async fn test_existing_log_is_appended_not_truncated() {
    let server = MockServer::start().await;
    let base = server.uri();
    let page = |route: &str| format!("{}{}", base, route);
    mount_page(&server, "/", &[page("/a")]).await;
    mount_page(&server, "/a", &[]).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("sites.txt");
    std::fs::write(&output, "https://previous.example.com/\n").unwrap();

    let config = create_test_config(&page("/"), &output, 1);
    let coordinator = Coordinator::from_config(&config).expect("setup failed");
    coordinator.run().await.expect("crawl failed");

    assert_eq!(
        read_lines(&output),
        vec!["https://previous.example.com/".to_string(), page("/a")]
    );
}
