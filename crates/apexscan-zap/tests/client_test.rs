//! Integration tests for ZapClient using wiremock

use apexscan_core::{JobId, Severity};
use apexscan_zap::{EngineError, Method, RawRequest, ScanEngine, ZapClient};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_client(mock_server: &MockServer) -> ZapClient {
    ZapClient::with_url(mock_server.uri()).expect("create client")
}

#[tokio::test]
async fn test_version() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/JSON/core/view/version/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "version": "2.15.0" })),
        )
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    assert_eq!(client.version().await.expect("version"), "2.15.0");
}

#[tokio::test]
async fn test_api_key_header_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/JSON/core/view/version/"))
        .and(header("X-ZAP-API-Key", "secret"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "version": "2.15.0" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server).with_api_key("secret");
    client.version().await.expect("version");
}

#[tokio::test]
async fn test_api_error_is_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/JSON/core/view/version/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "code": "bad_api_key",
            "message": "Missing or invalid API key"
        })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let err = client.version().await.expect_err("403 must fail");
    match err {
        EngineError::Api {
            operation,
            status,
            message,
        } => {
            assert_eq!(operation, "core/view/version");
            assert_eq!(status, 403);
            assert_eq!(message, "Missing or invalid API key");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Nothing listens on port 9 locally
    let client = ZapClient::with_url("http://127.0.0.1:9").expect("create client");
    let err = client.version().await.expect_err("no engine running");
    assert!(matches!(err, EngineError::Network(_)));
}

#[tokio::test]
async fn test_context_operations() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/JSON/context/action/newContext/"))
        .and(body_string_contains("contextName=ApexShare"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "contextId": "3" })),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/JSON/context/action/includeInContext/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "Result": "OK" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/JSON/replacer/action/addRule/"))
        .and(body_string_contains("matchType=REQ_HEADER"))
        .and(body_string_contains("matchString=Accept"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "Result": "OK" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    assert_eq!(client.new_context("ApexShare").await.expect("context"), "3");
    client
        .include_in_context("ApexShare", "https://apexshare.be/*")
        .await
        .expect("include");
    client
        .add_header_rule("Accept", "application/json")
        .await
        .expect("header rule");
}

#[tokio::test]
async fn test_spider_lifecycle() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/JSON/spider/action/scan/"))
        .and(body_string_contains("maxChildren=10"))
        .and(body_string_contains("subtreeOnly=true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "scan": "0" })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/JSON/spider/view/status/"))
        .and(query_param("scanId", "0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "100" })),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/JSON/spider/view/results/"))
        .and(query_param("scanId", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": ["https://apexshare.be/", "https://apexshare.be/upload"]
        })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let job = client
        .start_spider("https://apexshare.be", 10, true, true)
        .await
        .expect("start spider");
    assert_eq!(job, JobId::new("0"));
    assert!(client
        .spider_progress(&job)
        .await
        .expect("progress")
        .is_complete());
    assert_eq!(client.spider_results(&job).await.expect("results").len(), 2);
}

#[tokio::test]
async fn test_active_scan_and_alerts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/JSON/ascan/action/scan/"))
        .and(body_string_contains("scanPolicyName=Default+Policy"))
        .and(body_string_contains("inScopeOnly=true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "scan": "4" })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/JSON/ascan/view/status/"))
        .and(query_param("scanId", "4"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "37" })),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/JSON/core/view/alerts/"))
        .and(query_param("baseurl", "https://api.apexshare.be"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "alerts": [
                {
                    "alert": "SQL Injection",
                    "risk": "High",
                    "description": "SQL injection may be possible.",
                    "url": "https://api.apexshare.be/upload",
                    "pluginId": "40018"
                },
                {
                    "alert": "Server Leaks Version Information",
                    "risk": "Low",
                    "description": "Server header present.",
                    "url": "https://api.apexshare.be/"
                }
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let job = client
        .start_active_scan("https://api.apexshare.be", true, true, "Default Policy")
        .await
        .expect("start active scan");
    assert_eq!(
        client
            .active_scan_progress(&job)
            .await
            .expect("progress")
            .percent(),
        37
    );

    let alerts = client
        .alerts("https://api.apexshare.be")
        .await
        .expect("alerts");
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].severity(), Severity::High);
    assert_eq!(alerts[1].severity(), Severity::Low);
}

#[tokio::test]
async fn test_send_raw_request_returns_recorded_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/JSON/core/action/sendRequest/"))
        .and(body_string_contains("followRedirects=false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sendRequest": [{
                "id": "12",
                "requestHeader": "OPTIONS https://api.apexshare.be/upload HTTP/1.1\r\n",
                "requestBody": "",
                "responseHeader": "HTTP/1.1 204 No Content\r\nAccess-Control-Allow-Origin: https://evil.com\r\n\r\n",
                "responseBody": ""
            }]
        })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let request = RawRequest::new(Method::OPTIONS, "https://api.apexshare.be/upload")
        .header("Origin", "https://evil.com");
    let message = client.send_raw_request(&request).await.expect("send");

    assert_eq!(message.status_code(), Some(204));
    assert!(message
        .response_headers()
        .contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_send_raw_request_falls_back_to_history() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/JSON/core/action/sendRequest/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "sendRequest": [] })),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/JSON/core/view/messages/"))
        .and(query_param("baseurl", "https://api.apexshare.be"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messages": [
                { "id": "1", "responseHeader": "HTTP/1.1 200 OK\r\n\r\n" },
                { "id": "2", "responseHeader": "HTTP/1.1 404 Not Found\r\n\r\n" }
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let request = RawRequest::new(Method::GET, "https://api.apexshare.be/download/admin");
    let message = client.send_raw_request(&request).await.expect("send");

    assert_eq!(message.id, "2");
    assert_eq!(message.status_code(), Some(404));
}

#[tokio::test]
async fn test_invalid_raw_request_never_reaches_engine() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/JSON/core/action/sendRequest/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let request = RawRequest::new(Method::GET, "relative/path");
    let err = client
        .send_raw_request(&request)
        .await
        .expect_err("invalid URL must fail");
    assert!(matches!(err, EngineError::InvalidRequest(_)));
}
