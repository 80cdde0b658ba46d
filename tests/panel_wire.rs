//! Wire-level tests for the panel protocol client.
//!
//! A wiremock server stands in for a live panel so the key-action request
//! shape and the response-classification ladder can be verified for real
//! HTTP round trips. Mock-mode behavior is covered here too, since its whole
//! point is to never touch the network.

use panelsync::errors::PanelError;
use panelsync::panel::{Mode, PanelClient};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn live_client(server: &MockServer) -> PanelClient {
    // The key must not contain "test", or mode detection would short-circuit
    // the network call.
    PanelClient::new(&server.uri(), "prod-key-123", Mode::Live).unwrap()
}

#[tokio::test]
async fn services_sends_key_and_action() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_string_contains("key=prod-key-123"))
        .and(body_string_contains("action=services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "service": 1, "name": "Instagram Followers", "category": "Instagram",
              "type": "Default", "rate": "10.80", "min": 10, "max": 10000 },
            { "service": "2", "name": "YouTube Views", "rate": 4.75 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let services = live_client(&server).await.services().await.unwrap();
    assert_eq!(services.len(), 2);
    assert_eq!(services[0].external_service_id, "1");
    assert_eq!(services[0].rate.as_deref(), Some("10.80"));
    assert_eq!(services[1].external_service_id, "2");
    assert_eq!(services[1].rate.as_deref(), Some("4.75"));
}

#[tokio::test]
async fn services_accepts_enveloped_list() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "services": [ { "service": 7, "name": "Twitch Followers", "rate": "3.90" } ]
        })))
        .mount(&server)
        .await;

    let services = live_client(&server).await.services().await.unwrap();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].external_service_id, "7");
}

#[tokio::test]
async fn services_drops_records_without_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "service": 1, "name": "Instagram Followers", "rate": "10.80" },
            { "name": "orphan record", "rate": "1.00" }
        ])))
        .mount(&server)
        .await;

    let services = live_client(&server).await.services().await.unwrap();
    assert_eq!(services.len(), 1);
}

#[tokio::test]
async fn non_2xx_classifies_as_transport() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    match live_client(&server).await.services().await {
        Err(PanelError::Transport { status, .. }) => assert_eq!(status, Some(502)),
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_body_classifies_as_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    assert!(matches!(
        live_client(&server).await.balance().await,
        Err(PanelError::EmptyResponse)
    ));
}

#[tokio::test]
async fn html_body_classifies_as_protocol_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<!DOCTYPE html><html><body>We'll be back soon</body></html>"),
        )
        .mount(&server)
        .await;

    assert!(matches!(
        live_client(&server).await.services().await,
        Err(PanelError::Protocol)
    ));
}

#[tokio::test]
async fn truncated_json_classifies_as_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{"))
        .mount(&server)
        .await;

    match live_client(&server).await.services().await {
        Err(PanelError::Malformed { snippet, .. }) => assert_eq!(snippet, "{"),
        other => panic!("expected Malformed, got {other:?}"),
    }
}

#[tokio::test]
async fn provider_error_field_is_relayed_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "Invalid API key" })))
        .mount(&server)
        .await;

    match live_client(&server).await.balance().await {
        Err(PanelError::Provider(msg)) => assert_eq!(msg, "Invalid API key"),
        other => panic!("expected Provider, got {other:?}"),
    }
}

#[tokio::test]
async fn balance_parses_loose_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("action=balance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "balance": 84.2, "currency": "USD" })))
        .mount(&server)
        .await;

    let balance = live_client(&server).await.balance().await.unwrap();
    assert_eq!(balance.balance, "84.2");
    assert_eq!(balance.currency.as_deref(), Some("USD"));
}

#[tokio::test]
async fn add_order_sends_params_and_returns_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("action=add"))
        .and(body_string_contains("service=1"))
        .and(body_string_contains("quantity=500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "order": 23501 })))
        .expect(1)
        .mount(&server)
        .await;

    let order_id = live_client(&server)
        .await
        .add_order("1", "https://instagram.com/someone", Some(500), &[])
        .await
        .unwrap();
    assert_eq!(order_id, "23501");
}

#[tokio::test]
async fn add_order_without_order_id_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    assert!(matches!(
        live_client(&server).await.add_order("1", "https://x.example", None, &[]).await,
        Err(PanelError::Malformed { .. })
    ));
}

#[tokio::test]
async fn single_order_status_parses_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("action=status"))
        .and(body_string_contains("order=4821"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "In progress", "charge": "0.27", "start_count": 100, "remains": "40", "currency": "USD"
        })))
        .mount(&server)
        .await;

    let order = live_client(&server).await.order_status("4821").await.unwrap();
    assert_eq!(order.provider_order_id, "4821");
    assert_eq!(order.status.as_deref(), Some("In progress"));
    assert_eq!(order.remains, Some(40));
}

#[tokio::test]
async fn batch_status_joins_ids_into_one_request() {
    let server = MockServer::start().await;

    // The comma is form-encoded as %2C in the request body.
    Mock::given(method("POST"))
        .and(body_string_contains("orders=10%2C11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "10": { "status": "Completed", "charge": "0.10" },
            "11": { "status": "Partial", "remains": 25 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let statuses = live_client(&server)
        .await
        .multi_order_status(&["10".to_string(), "11".to_string()])
        .await
        .unwrap();
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses["10"].status.as_deref(), Some("Completed"));
    assert_eq!(statuses["11"].remains, Some(25));
}

#[tokio::test]
async fn refill_relays_raw_ack() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("action=refill"))
        .and(body_string_contains("order=4821"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "refill": "re-77" })))
        .mount(&server)
        .await;

    let ack = live_client(&server).await.refill_order("4821").await.unwrap();
    assert_eq!(ack["refill"], "re-77");
}

#[tokio::test]
async fn mock_mode_never_touches_the_network() {
    let server = MockServer::start().await;

    // Zero requests expected: mock mode must short-circuit before HTTP.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = PanelClient::new(&server.uri(), "prod-key", Mode::Mock).unwrap();
    let services = client.services().await.unwrap();
    assert_eq!(services.len(), 20);
}
