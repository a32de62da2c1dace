// Client behaviour against a local mock of the API: paging, the page cap,
// retries on 5xx and error statuses. The blocking client runs on a
// `spawn_blocking` thread so it never blocks the runtime serving the mock.
mod common;

use common::{entry, page_body};
use serde_json::json;
use std::time::{Duration, Instant};
use wbi_climate::config::ClientConfig;
use wbi_climate::models::RawTable;
use wbi_climate::{Client, FetchError, RemoteSource};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CO2: &str = "EN.ATM.CO2E.PC";
const KEN_CO2: &str = "/country/KEN/indicator/EN.ATM.CO2E.PC";

async fn query_ken(server: &MockServer, max_pages: u32) -> Result<RawTable, FetchError> {
    let cfg = ClientConfig {
        max_pages,
        ..ClientConfig::default().with_base_url(server.uri())
    }
    .with_timeout(Duration::from_secs(5));
    tokio::task::spawn_blocking(move || {
        let client = Client::with_config(&cfg)?;
        client.query(CO2, "KEN", 2010, 2020)
    })
    .await
    .unwrap()
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

#[tokio::test(flavor = "multi_thread")]
async fn follows_pages_until_last() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(KEN_CO2))
        .and(query_param("page", "1"))
        .and(query_param("date", "2010:2020"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            1,
            2,
            &[entry(CO2, "KEN", "2020", json!(0.4))],
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(KEN_CO2))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            2,
            2,
            &[entry(CO2, "KEN", "2010", json!(0.3))],
        )))
        .mount(&server)
        .await;

    let raw = query_ken(&server, 1000).await.unwrap();
    let dates: Vec<&str> = raw.entries.iter().map(|e| e.date.as_str()).collect();
    assert_eq!(dates, vec!["2020", "2010"]);
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn null_page_is_an_empty_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(KEN_CO2))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 0, &[])))
        .mount(&server)
        .await;

    let raw = query_ken(&server, 1000).await.unwrap();
    assert!(raw.entries.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn stops_at_page_cap() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(KEN_CO2))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            1,
            3,
            &[entry(CO2, "KEN", "2020", json!(0.4))],
        )))
        .mount(&server)
        .await;

    let err = query_ken(&server, 1).await.unwrap_err();
    assert!(matches!(err, FetchError::PageLimit(1)), "{err:?}");
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn retries_transient_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(KEN_CO2))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(KEN_CO2))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            1,
            1,
            &[entry(CO2, "KEN", "2015", json!(0.35))],
        )))
        .mount(&server)
        .await;

    let raw = query_ken(&server, 1000).await.unwrap();
    assert_eq!(raw.entries.len(), 1);
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn gives_up_after_three_attempts_without_trailing_wait() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(KEN_CO2))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let started = Instant::now();
    let err = query_ken(&server, 1000).await.unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(err, FetchError::Status { status: 500, .. }), "{err:?}");
    assert_eq!(request_count(&server).await, 3);
    // Two backoffs (100ms + 300ms) between three attempts; none after the last.
    assert!(elapsed < Duration::from_millis(1000), "took {elapsed:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(KEN_CO2))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = query_ken(&server, 1000).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }), "{err:?}");
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn api_message_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(KEN_CO2))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"message": [{"id": "120", "key": "Invalid value", "value": "The provided parameter value is not valid"}]}
        ])))
        .mount(&server)
        .await;

    let err = query_ken(&server, 1000).await.unwrap_err();
    assert!(matches!(err, FetchError::Api(_)), "{err:?}");
}
