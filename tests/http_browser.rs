use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use review_harvest::browser::{Browser, HttpBrowser};
use review_harvest::error::HarvestError;
use review_harvest::parsers::{extract_product_ids, RESULTS_SELECTOR};

const SEARCH_PAGE: &str = include_str!("fixtures/search_page.html");

fn browser(timeout: Duration) -> HttpBrowser {
    let client = reqwest::Client::builder().timeout(timeout).build().unwrap();
    HttpBrowser::with_client(client, timeout)
}

#[tokio::test]
async fn navigates_and_finds_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let mut browser = browser(Duration::from_secs(5));
    browser.navigate(&format!("{}/s?k=phone", server.uri())).await.unwrap();
    browser.wait_for(RESULTS_SELECTOR, Duration::from_secs(1)).await.unwrap();

    let html = browser.page_source().await.unwrap();
    assert_eq!(extract_product_ids(&html).len(), 3);
    browser.quit().await.unwrap();
}

#[tokio::test]
async fn missing_element_is_a_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>Robot check</body></html>"))
        .mount(&server)
        .await;

    let mut browser = browser(Duration::from_secs(5));
    browser.navigate(&server.uri()).await.unwrap();

    let err = browser
        .wait_for(RESULTS_SELECTOR, Duration::from_secs(25))
        .await
        .unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn slow_response_is_a_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(SEARCH_PAGE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut browser = browser(Duration::from_millis(200));
    let err = browser.navigate(&server.uri()).await.unwrap_err();
    assert!(err.is_timeout(), "unexpected error: {err}");
}

#[tokio::test]
async fn error_status_is_a_navigation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dp/B0GONE"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut browser = browser(Duration::from_secs(5));
    let err = browser
        .navigate(&format!("{}/dp/B0GONE", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, HarvestError::Navigation { .. }));
    // The previous page is not served after a failed navigation
    assert_eq!(browser.page_source().await.unwrap(), "");
}
