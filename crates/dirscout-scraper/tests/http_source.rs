//! Integration tests for `HttpSource`.
//!
//! Each test stands up a local `wiremock` server, so no real network
//! traffic is made.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dirscout_scraper::{DocumentSource, HttpSource, ScraperError};

const TEST_UA: &str = "dirscout-test/0.1";

/// 5-second timeout, descriptive UA, no retries.
fn test_source() -> HttpSource {
    HttpSource::new(5, TEST_UA, 0, 0).expect("failed to build test HttpSource")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

#[tokio::test]
async fn fetch_returns_utf8_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coating/taipei/1"))
        .respond_with(html("<h1>台北市中正區汽車美容</h1>"))
        .mount(&server)
        .await;

    let body = test_source()
        .fetch(&format!("{}/coating/taipei/1", server.uri()))
        .await
        .unwrap();
    assert_eq!(body, "<h1>台北市中正區汽車美容</h1>");
}

#[tokio::test]
async fn fetch_sends_configured_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/detailing/1"))
        .and(header("user-agent", TEST_UA))
        .respond_with(html("<p>ok</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_source()
        .fetch(&format!("{}/detailing/1", server.uri()))
        .await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

#[tokio::test]
async fn fetch_follows_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/detailing/old"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("Location", format!("{}/detailing/new", server.uri()).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/detailing/new"))
        .respond_with(html("<p>moved here</p>"))
        .mount(&server)
        .await;

    let body = test_source()
        .fetch(&format!("{}/detailing/old", server.uri()))
        .await
        .unwrap();
    assert_eq!(body, "<p>moved here</p>");
}

#[tokio::test]
async fn fetch_maps_404_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_source()
        .fetch(&format!("{}/detailing/gone", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::NotFound { .. }), "got: {err:?}");
}

#[tokio::test]
async fn fetch_maps_429_to_rate_limited_with_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .mount(&server)
        .await;

    match test_source().fetch(&server.uri()).await.unwrap_err() {
        ScraperError::RateLimited {
            retry_after_secs, ..
        } => assert_eq!(retry_after_secs, 30),
        other => panic!("expected ScraperError::RateLimited, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_maps_other_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = test_source().fetch(&server.uri()).await.unwrap_err();
    assert!(
        matches!(err, ScraperError::UnexpectedStatus { status: 500, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_rejects_challenge_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(503).set_body_string(
                "<title>Just a moment...</title><div id=\"cf-chl-widget\"></div>",
            ),
        )
        .mount(&server)
        .await;

    let err = test_source().fetch(&server.uri()).await.unwrap_err();
    assert!(matches!(err, ScraperError::BotChallenge { .. }), "got: {err:?}");
}

#[tokio::test]
async fn fetch_retries_server_error_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/detailing/7"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/detailing/7"))
        .respond_with(html("<p>電話：02-2345-6789</p>"))
        .mount(&server)
        .await;

    let source = HttpSource::new(5, TEST_UA, 1, 0).unwrap();
    let body = source
        .fetch(&format!("{}/detailing/7", server.uri()))
        .await
        .unwrap();
    assert!(body.contains("02-2345-6789"));
}

#[tokio::test]
async fn fetch_does_not_retry_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let source = HttpSource::new(5, TEST_UA, 3, 0).unwrap();
    let result = source.fetch(&server.uri()).await;
    assert!(matches!(result, Err(ScraperError::NotFound { .. })));
}

#[tokio::test]
async fn fetch_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/detailing/slow"))
        .respond_with(
            html("<p>電話：02-2345-6789</p>").set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let source = HttpSource::new(1, TEST_UA, 0, 0).unwrap();
    let err = source
        .fetch(&format!("{}/detailing/slow", server.uri()))
        .await
        .unwrap_err();
    assert!(
        matches!(err, ScraperError::Http(ref e) if e.is_timeout()),
        "got: {err:?}"
    );
}
