// Integration tests for HttpGateway against a mocked SentinelX backend
//
// Run with: cargo test -p sentinelx-core --test http_gateway_test

use std::sync::Arc;
use std::time::Duration;

use sentinelx_core::gateway::{BackendGateway, HttpGateway};
use sentinelx_core::{AlertId, DashboardConfig, DashboardController, ManualClock, Severity};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn alerts_body() -> serde_json::Value {
    json!([
        {
            "id": 12,
            "message": "demo@example.com found in LinkedIn breach",
            "severity": "critical",
            "created_at": "2024-06-01T10:15:00",
            "is_read": false,
            "email": "demo@example.com"
        },
        {
            "id": 11,
            "message": "Phone number exposed",
            "severity": "medium",
            "created_at": "2024-05-30T08:00:00Z",
            "is_read": true
        }
    ])
}

#[tokio::test]
async fn test_list_alerts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alerts_body()))
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(&server.uri());
    let alerts = gateway.list_alerts().await.unwrap();

    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].id, AlertId::from("12"));
    assert_eq!(alerts[0].severity, Severity::Critical);
    assert_eq!(
        alerts[0].associated_email.as_deref(),
        Some("demo@example.com")
    );
    assert!(alerts[1].is_read);
    assert_eq!(alerts[1].associated_email, None);
}

#[tokio::test]
async fn test_unread_count() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/alerts/unread-count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 7})))
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(&server.uri());
    assert_eq!(gateway.unread_count().await.unwrap(), 7);
}

#[tokio::test]
async fn test_mutations_hit_expected_routes() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/alerts/12/read"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/alerts/read-all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/alerts/12"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/monitoring/toggle"))
        .and(body_json(json!({"enabled": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"enabled": false})))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(&server.uri());
    let id = AlertId::from("12");
    gateway.mark_read(&id).await.unwrap();
    gateway.mark_all_read().await.unwrap();
    gateway.delete_alert(&id).await.unwrap();
    gateway.toggle_monitoring(false).await.unwrap();
}

#[tokio::test]
async fn test_check_email_and_monitoring_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/emails/3/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"breaches_found": 4})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/monitoring/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "enabled": true,
            "last_sweep_at": "2024-06-01T11:00:00"
        })))
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(&server.uri());
    assert_eq!(gateway.check_email("3").await.unwrap().breaches_found, 4);

    let status = gateway.monitoring_status().await.unwrap();
    assert!(status.enabled);
    assert!(status.last_sweep_at.is_some());
}

#[tokio::test]
async fn test_error_field_becomes_failure_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/emails/99/check"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Email not found"})))
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(&server.uri());
    let err = gateway.check_email("99").await.unwrap_err();
    assert_eq!(err.message, "Email not found");
}

#[tokio::test]
async fn test_status_used_when_body_has_no_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/alerts/read-all"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(&server.uri());
    let err = gateway.mark_all_read().await.unwrap_err();
    assert_eq!(err.message, "HTTP 503");
}

#[tokio::test]
async fn test_undecodable_body_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "severity": "urgent"}])))
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(&server.uri());
    let err = gateway.list_alerts().await.unwrap_err();
    assert!(err.message.starts_with("invalid response body"), "{}", err.message);
}

#[tokio::test]
async fn test_timeout_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/alerts/unread-count"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"count": 1}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let gateway = HttpGateway::with_timeout(&server.uri(), Duration::from_millis(50)).unwrap();
    let err = gateway.unread_count().await.unwrap_err();
    assert_eq!(err.message, "request timed out");
}

#[tokio::test]
async fn test_unreachable_backend_is_a_failure() {
    // Nothing listens on port 9 (discard) in the test environment
    let gateway = HttpGateway::with_timeout("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    assert!(gateway.list_alerts().await.is_err());
}

#[tokio::test]
async fn test_controller_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alerts_body()))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/alerts/12/read"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "database locked"})))
        .mount(&server)
        .await;

    let config = DashboardConfig::default().with_api_url(server.uri());
    let gateway = Arc::new(HttpGateway::from_config(&config).unwrap());
    let controller =
        DashboardController::new(gateway, Arc::new(ManualClock::new()), config).unwrap();

    let badge = controller.refresh_alerts().await.unwrap();
    assert_eq!(badge.count, 1);
    assert_eq!(badge.label, "1");

    let err = controller.mark_read(&AlertId::from("12")).await.unwrap_err();
    assert_eq!(err.to_string(), "backend request failed: database locked");
    assert_eq!(controller.unread_count(), 1);
}

#[tokio::test]
async fn test_opaque_ids_are_encoded_as_one_segment() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/alerts/a%2Fb%20c%3Fd%23e/read"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/alerts/a%2Fb%20c%3Fd%23e"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/emails/team%2Fops/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"breaches_found": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(&server.uri());
    let id = AlertId::from("a/b c?d#e");
    gateway.mark_read(&id).await.unwrap();
    gateway.delete_alert(&id).await.unwrap();

    let scan = gateway.check_email("team/ops").await.unwrap();
    assert_eq!(scan.breaches_found, 0);
}
