//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full measurement cycle end-to-end.

use std::sync::Arc;
use std::time::Duration;
use webtimer::config::{CrawlerConfig, ErrorPolicy};
use webtimer::crawler::{build_http_client, CrawlEngine, FetchTimer, FixedUserAgent};
use webtimer::state::{AssetType, EngineState};
use webtimer::{FetchError, WebTimerError};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) WebTimerTest/1.0";

/// Creates an engine that always sends `TEST_AGENT`
fn create_test_engine(settings: CrawlerConfig) -> CrawlEngine {
    let client = build_http_client(&settings).expect("Failed to build client");
    let fetcher = FetchTimer::new(client, Arc::new(FixedUserAgent::new(TEST_AGENT)));
    CrawlEngine::new(fetcher, settings)
}

/// Mounts a GET handler that must be hit exactly `times` times
async fn mount_asset(server: &MockServer, asset_path: &str, body: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(asset_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(times)
        .mount(server)
        .await;
}

/// Mounts the root page
async fn mount_page(server: &MockServer, html: &str) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(server)
        .await;
}

const SIMPLE_PAGE: &str = r#"<html><head>
<script src="/app.js"></script>
<link rel="stylesheet" href="/style.css">
<link rel="icon" href="/favicon.ico">
</head><body><img src="/logo.png"></body></html>"#;

#[tokio::test]
async fn test_full_measurement_single_page() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/", mock_server.uri());

    mount_page(&mock_server, SIMPLE_PAGE).await;
    mount_asset(&mock_server, "/app.js", "console.log(1);", 1).await;
    mount_asset(&mock_server, "/style.css", "body {}", 1).await;
    mount_asset(&mock_server, "/logo.png", "png", 1).await;
    // Not a stylesheet, must never be requested
    mount_asset(&mock_server, "/favicon.ico", "ico", 0).await;

    let mut engine = create_test_engine(CrawlerConfig::default());
    let report = engine.evaluate(&root).await.expect("Measurement failed");

    assert_eq!(engine.state(), EngineState::Done);
    assert_eq!(report.fetch_count(), 4);
    assert!(report.failures().is_empty());

    // HTML bucket holds exactly the root page's own time
    let root_seconds = report.seconds_for_url(&root).expect("Root not timed");
    assert_eq!(report.seconds_for(AssetType::Html), root_seconds);

    let by_url = report.by_url();
    assert_eq!(by_url.len(), 4);
    assert!(by_url.windows(2).all(|w| w[0].seconds <= w[1].seconds));

    let by_type = report.by_type();
    assert_eq!(by_type.len(), 4);
    assert!(by_type.windows(2).all(|w| w[0].seconds <= w[1].seconds));

    // The icon is still listed among the raw discovered links
    let css_links = &report.links_by_type()[&AssetType::Css];
    assert!(css_links.contains("/favicon.ico"));
    assert!(css_links.contains("/style.css"));
}

#[tokio::test]
async fn test_time_is_conserved_across_views() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/", mock_server.uri());

    mount_page(&mock_server, SIMPLE_PAGE).await;
    mount_asset(&mock_server, "/app.js", "a", 1).await;
    mount_asset(&mock_server, "/style.css", "b", 1).await;
    mount_asset(&mock_server, "/logo.png", "c", 1).await;

    let mut engine = create_test_engine(CrawlerConfig::default());
    let report = engine.evaluate(&root).await.expect("Measurement failed");

    let url_sum: f64 = report.by_url().iter().map(|t| t.seconds).sum();
    let type_sum: f64 = report.by_type().iter().map(|t| t.seconds).sum();
    assert!((url_sum - type_sum).abs() < 1e-9);
    assert!((report.total_seconds() - url_sum).abs() < 1e-9);

    let percent_sum: f64 = report.by_type().iter().map(|t| t.percent).sum();
    assert!((percent_sum - 100.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_repeated_url_fetched_once() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/", mock_server.uri());
    let authority = mock_server.uri().trim_start_matches("http:").to_string();

    // Same script three ways, plus a link back to the page itself
    let html = format!(
        r#"<script src="/app.js"></script>
        <script src="{authority}/app.js"></script>
        <img src="/logo.png"><img src="/logo.png">
        <img src="/">"#,
        authority = authority
    );

    mount_page(&mock_server, &html).await;
    mount_asset(&mock_server, "/app.js", "a", 1).await;
    mount_asset(&mock_server, "/logo.png", "b", 1).await;

    let mut engine = create_test_engine(CrawlerConfig::default());
    let report = engine.evaluate(&root).await.expect("Measurement failed");

    assert_eq!(report.fetch_count(), 3);
}

#[tokio::test]
async fn test_breadth_first_discovery_order() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/", mock_server.uri());

    let html = r#"<script src="/c.js"></script>
        <script src="/a.js"></script>
        <script src="/b.js"></script>
        <img src="/z.png">"#;

    mount_page(&mock_server, html).await;
    for asset in ["/a.js", "/b.js", "/c.js", "/z.png"] {
        mount_asset(&mock_server, asset, "x", 1).await;
    }

    let mut engine = create_test_engine(CrawlerConfig::default());
    let report = engine.evaluate(&root).await.expect("Measurement failed");

    let base = mock_server.uri();
    assert_eq!(
        report.fetch_order(),
        &[
            root.clone(),
            format!("{}/c.js", base),
            format!("{}/a.js", base),
            format!("{}/b.js", base),
            format!("{}/z.png", base),
        ]
    );
}

#[tokio::test]
async fn test_concurrent_frontier_keeps_order_and_memoization() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/", mock_server.uri());

    let html = r#"<script src="/a.js"></script>
        <script src="/b.js"></script>
        <link rel="stylesheet" href="/c.css">
        <img src="/d.png"><img src="/e.png">"#;

    mount_page(&mock_server, html).await;
    // Earlier items respond slower so completion order differs from queue order
    for (asset, delay_ms) in [("/a.js", 120), ("/b.js", 90), ("/c.css", 60), ("/d.png", 30), ("/e.png", 0)] {
        Mock::given(method("GET"))
            .and(path(asset))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("x")
                    .set_delay(Duration::from_millis(delay_ms)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let mut engine = create_test_engine(CrawlerConfig {
        concurrency: 4,
        ..CrawlerConfig::default()
    });
    let report = engine.evaluate(&root).await.expect("Measurement failed");

    assert_eq!(report.fetch_count(), 6);

    let base = mock_server.uri();
    let expected: Vec<String> = std::iter::once(root.clone())
        .chain(["/a.js", "/b.js", "/c.css", "/d.png", "/e.png"].iter().map(|p| format!("{}{}", base, p)))
        .collect();
    assert_eq!(report.fetch_order(), expected.as_slice());

    // Each resource is charged its own download time, not the batch's
    let slow = report.seconds_for_url(&format!("{}/a.js", base)).unwrap();
    let fast = report.seconds_for_url(&format!("{}/e.png", base)).unwrap();
    assert!(slow > fast);
}

#[tokio::test]
async fn test_random_user_agent_is_sent() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", TEST_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut engine = create_test_engine(CrawlerConfig::default());
    let report = engine.evaluate(&root).await.expect("Measurement failed");

    assert_eq!(report.fetch_count(), 1);
    // No robots.txt lookup is ever made
    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != "/robots.txt"));
}

#[tokio::test]
async fn test_redirect_followed_and_timed() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/", mock_server.uri());

    mount_page(&mock_server, r#"<img src="/old.png">"#).await;
    Mock::given(method("GET"))
        .and(path("/old.png"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new.png"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_asset(&mock_server, "/new.png", "png", 1).await;

    let mut engine = create_test_engine(CrawlerConfig::default());
    let report = engine.evaluate(&root).await.expect("Measurement failed");

    // Timed under the URL that was discovered
    assert!(report
        .seconds_for_url(&format!("{}/old.png", mock_server.uri()))
        .is_some());
    assert_eq!(report.fetch_count(), 2);
}

#[tokio::test]
async fn test_failed_asset_is_skipped() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/", mock_server.uri());

    mount_page(
        &mock_server,
        r#"<script src="/missing.js"></script><img src="/logo.png">"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing.js"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_asset(&mock_server, "/logo.png", "png", 1).await;

    let mut engine = create_test_engine(CrawlerConfig::default());
    let report = engine.evaluate(&root).await.expect("Measurement failed");

    assert_eq!(report.fetch_count(), 2);
    assert_eq!(report.failures().len(), 1);

    let failure = &report.failures()[0];
    assert_eq!(failure.url, format!("{}/missing.js", mock_server.uri()));
    assert_eq!(failure.asset_type, AssetType::Javascript);
    assert!(failure.message.contains("404"));
    assert_eq!(report.seconds_for(AssetType::Javascript), 0.0);
}

#[tokio::test]
async fn test_failed_root_yields_empty_report() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut engine = create_test_engine(CrawlerConfig::default());
    let report = engine.evaluate(&root).await.expect("Measurement failed");

    assert_eq!(report.total_seconds(), 0.0);
    assert!(report.by_url().is_empty());
    assert!(report.by_type().is_empty());
    assert_eq!(report.failures().len(), 1);
}

#[tokio::test]
async fn test_abort_policy_stops_crawl() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/", mock_server.uri());

    mount_page(
        &mock_server,
        r#"<script src="/missing.js"></script><img src="/logo.png">"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing.js"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_asset(&mock_server, "/logo.png", "png", 0).await;

    let mut engine = create_test_engine(CrawlerConfig {
        on_error: ErrorPolicy::Abort,
        ..CrawlerConfig::default()
    });
    let result = engine.evaluate(&root).await;

    let report = match result {
        Err(WebTimerError::Aborted {
            source: FetchError::Status { url, status },
            report,
        }) => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/missing.js"));
            report
        }
        other => panic!("Expected a status error, got {:?}", other.map(|r| r.fetch_count())),
    };
    assert_eq!(engine.state(), EngineState::Done);

    // Timings booked before the failure survive the abort
    assert_eq!(report.fetch_count(), 1);
    assert!(report.seconds_for_url(&root).is_some());
    assert_eq!(report.failures().len(), 1);
    assert!(report.failures()[0].url.ends_with("/missing.js"));
}

#[tokio::test]
async fn test_timeout_is_a_fetch_failure() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/", mock_server.uri());

    mount_page(&mock_server, r#"<img src="/slow.png">"#).await;
    Mock::given(method("GET"))
        .and(path("/slow.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("png")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut engine = create_test_engine(CrawlerConfig {
        timeout_secs: 1,
        ..CrawlerConfig::default()
    });
    let report = engine.evaluate(&root).await.expect("Measurement failed");

    assert_eq!(report.fetch_count(), 1);
    assert_eq!(report.failures().len(), 1);
    assert!(report.failures()[0].message.contains("timeout"));
}

#[tokio::test]
async fn test_resource_cap_limits_downloads() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/", mock_server.uri());

    mount_page(
        &mock_server,
        r#"<img src="/a.png"><img src="/b.png"><img src="/c.png">"#,
    )
    .await;
    mount_asset(&mock_server, "/a.png", "a", 1).await;
    mount_asset(&mock_server, "/b.png", "b", 0).await;
    mount_asset(&mock_server, "/c.png", "c", 0).await;

    let mut engine = create_test_engine(CrawlerConfig {
        max_resources: Some(2),
        ..CrawlerConfig::default()
    });
    let report = engine.evaluate(&root).await.expect("Measurement failed");

    assert_eq!(report.fetch_count(), 2);
    assert_eq!(report.links_by_type()[&AssetType::Image].len(), 3);
}
