//! End-to-end tests for the job workflow over real HTTP
//!
//! A wiremock server plays the backend; the client talks to it through the
//! reqwest transport.

use std::time::{Duration, Instant};

use scrapi_core::{
    ApiCredentials, ClientConfig, ConfigOverrides, Method, ScrapiClient, ScrapiError, SearchOpts,
};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AUTH: &str = "Basic dXNlcjpwYXNz";

fn client(server: &MockServer) -> ScrapiClient {
    let config = ClientConfig::new(format!("{}/v1/queries", server.uri()))
        .with_realtime_url(format!("{}/v1/realtime", server.uri()))
        .with_request_timeout(Duration::from_secs(5));
    ScrapiClient::new(&ApiCredentials::new("user", "pass"), config).expect("client")
}

fn fast() -> ConfigOverrides {
    ConfigOverrides::default()
        .with_timeout(Duration::from_secs(5))
        .with_poll_interval(Duration::from_millis(10))
}

async fn mount_submit(server: &MockServer, id: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/queries"))
        .and(header("authorization", AUTH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": id, "status": "pending"})),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_search_job_completes() {
    let server = MockServer::start().await;
    mount_submit(&server, "abc").await;

    Mock::given(method("GET"))
        .and(path("/v1/queries/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/queries/abc"))
        .and(header("authorization", AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "done"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/queries/abc/results"))
        .and(header("authorization", AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server)
        .search("bing_search", "rust", &SearchOpts::default(), &fast())
        .await
        .unwrap();

    assert_eq!(result, json!({"result": 42}));
}

#[tokio::test]
async fn test_faulted_job_is_reported() {
    let server = MockServer::start().await;
    mount_submit(&server, "bad").await;

    Mock::given(method("GET"))
        .and(path("/v1/queries/bad"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "faulted"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/queries/bad/results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .execute(&json!({"source": "universal"}), &fast())
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapiError::JobFaulted { ref job_id } if job_id == "bad"));
}

#[tokio::test]
async fn test_submit_server_error_stops_workflow() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/queries"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "done"})))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .execute(&json!({"source": "universal"}), &fast())
        .await
        .unwrap_err();

    match err {
        ScrapiError::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("Expected HttpStatus error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_never_finishing_job_times_out() {
    let server = MockServer::start().await;
    mount_submit(&server, "slow").await;

    Mock::given(method("GET"))
        .and(path("/v1/queries/slow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/queries/slow/results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let overrides = ConfigOverrides::default()
        .with_timeout(Duration::from_millis(200))
        .with_poll_interval(Duration::from_millis(20));

    let start = Instant::now();
    let err = client(&server)
        .execute(&json!({"source": "universal"}), &overrides)
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_realtime_post() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/realtime"))
        .and(header("authorization", AUTH))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [1, 2]})))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server)
        .request(Method::POST, Some(&json!({"source": "universal"})), &fast())
        .await
        .unwrap();

    assert_eq!(result, json!({"results": [1, 2]}));
}

#[tokio::test]
async fn test_validation_failure_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .search("bing_search", "rust", &SearchOpts::default().with_pages(-1), &fast())
        .await
        .unwrap_err();

    assert_eq!(err.field(), Some("pages"));
}
