//! Integration tests for the VKPNS client against a mock gateway
//!
//! These tests verify:
//! 1. Request shape: endpoint, headers and `{"message": ...}` body
//! 2. Response decoding for success and error statuses
//! 3. Cancellation and deadline handling
//! 4. Transport, decoding and dry-run failures
//! 5. Client reuse across sends
//!
//! Run tests:
//! ```bash
//! cargo test --package nova-vkpns-shared --test client_integration
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nova_vkpns_shared::{
    AndroidConfig, AndroidNotification, CancellationToken, ClickActionType, CredentialField,
    DialStrategy, DynPushGateway, GatewayStatus, Message, Notification, SendContext,
    TransportConfig, VkpnsClient, VkpnsConfig, VkpnsError,
};
use serde_json::{json, Value};
use tokio::time::Instant;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROJECT_ID: &str = "test-project";
const SERVICE_TOKEN: &str = "service-token-123";
const SEND_PATH: &str = "/v1/projects/test-project/messages:send";

/// Plain HTTP dialer so the client can reach the local mock gateway
#[derive(Debug, Default)]
struct PlainHttpDialer {
    configured: AtomicUsize,
}

impl DialStrategy for PlainHttpDialer {
    fn configure(
        &self,
        builder: reqwest::ClientBuilder,
        transport: &TransportConfig,
    ) -> reqwest::ClientBuilder {
        self.configured.fetch_add(1, Ordering::SeqCst);
        builder.connect_timeout(transport.dial_timeout)
    }
}

fn client_for(gateway_url: &str) -> VkpnsClient {
    let config = VkpnsConfig::new(PROJECT_ID, SERVICE_TOKEN).with_gateway_url(gateway_url);
    VkpnsClient::with_dialer(config, TransportConfig::default(), &PlainHttpDialer::default())
        .expect("Failed to create client")
}

fn ok_body() -> Value {
    json!({"code": 200, "message": "", "status": "OK"})
}

#[tokio::test]
async fn test_send_posts_message_with_auth_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .and(header("Content-Type", "application/json"))
        .and(header("Authorization", "Bearer service-token-123"))
        .and(body_json(json!({"message": {"token": "device-1"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let response = client
        .send(&Message::new("device-1"), &SendContext::background())
        .await
        .expect("send should succeed");

    assert_eq!(response.code, 200);
    assert_eq!(response.status, "OK");
}

#[tokio::test]
async fn test_send_full_message_body() {
    let server = MockServer::start().await;
    let message = Message::new("device-1")
        .with_data("chat_id", "77")
        .with_notification(Notification::new("New message", "Hi there"))
        .with_android(
            AndroidConfig::default()
                .with_ttl(Duration::from_secs(30))
                .with_notification(AndroidNotification {
                    channel_id: "chat".to_string(),
                    click_action: "nova://chat/77".to_string(),
                    click_action_type: ClickActionType::DeepLink,
                    ..Default::default()
                }),
        );

    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .and(body_json(json!({
            "message": {
                "token": "device-1",
                "data": {"chat_id": "77"},
                "notification": {"title": "New message", "body": "Hi there"},
                "android": {
                    "ttl": "30s",
                    "notification": {
                        "channel_id": "chat",
                        "click_action": "nova://chat/77",
                        "click_action_type": 1
                    }
                }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let result = client.send(&message, &SendContext::background()).await;
    assert!(result.is_ok(), "send failed: {:?}", result.err());
}

#[tokio::test]
async fn test_error_status_body_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"code":400,"message":"bad token","status":"INVALID_ARGUMENT"}"#,
        ))
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let response = client
        .send(&Message::new("bad"), &SendContext::background())
        .await
        .expect("non-2xx bodies are still decoded");

    assert_eq!(response.code, 400);
    assert_eq!(response.message, "bad token");
    assert_eq!(response.status, "INVALID_ARGUMENT");
    assert_eq!(
        response.gateway_status(),
        Some(GatewayStatus::InvalidArgument)
    );
}

#[tokio::test]
async fn test_malformed_body_is_decoding_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let result = client
        .send(&Message::new("device-1"), &SendContext::background())
        .await;

    assert!(matches!(result, Err(VkpnsError::Decoding(_))));
}

#[tokio::test]
async fn test_expired_deadline_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let ctx = SendContext::background().with_deadline(Instant::now());
    let result = client.send(&Message::new("device-1"), &ctx).await;

    assert!(matches!(result, Err(VkpnsError::DeadlineExceeded)));
}

#[tokio::test]
async fn test_cancelled_context_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(0)
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    token.cancel();

    let client = client_for(&server.uri());
    let ctx = SendContext::background().with_cancellation(token);
    let result = client.send(&Message::new("device-1"), &ctx).await;

    assert!(matches!(result, Err(VkpnsError::Canceled)));
}

#[tokio::test]
async fn test_deadline_elapses_while_gateway_is_slow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_body())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let ctx = SendContext::background().with_timeout(Duration::from_millis(100));

    let started = std::time::Instant::now();
    let result = client.send(&Message::new("device-1"), &ctx).await;

    assert!(matches!(result, Err(VkpnsError::DeadlineExceeded)));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_request_timeout_bounds_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_body())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = VkpnsConfig::new(PROJECT_ID, SERVICE_TOKEN).with_gateway_url(server.uri());
    let transport = TransportConfig::default().with_request_timeout(Duration::from_millis(100));
    let client = VkpnsClient::with_dialer(config, transport, &PlainHttpDialer::default())
        .expect("Failed to create client");

    let result = client
        .send(&Message::new("device-1"), &SendContext::background())
        .await;

    match result {
        Err(VkpnsError::Transport(e)) => assert!(e.is_timeout()),
        other => panic!("expected transport timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Grab a free port, then close the listener so nothing accepts on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{addr}"));
    let result = client
        .send(&Message::new("device-1"), &SendContext::background())
        .await;

    assert!(matches!(result, Err(VkpnsError::Transport(_))));
}

#[tokio::test]
async fn test_client_reused_across_sends() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let ctx = SendContext::background();
    client.send(&Message::new("device-1"), &ctx).await.unwrap();
    client
        .send(&Message::new("device-2").with_data("k", "v"), &ctx)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    for request in &requests {
        assert_eq!(request.url.path(), SEND_PATH);
        assert_eq!(
            request.headers.get("authorization").unwrap(),
            "Bearer service-token-123"
        );
    }

    let first: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let second: Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(first, json!({"message": {"token": "device-1"}}));
    assert_eq!(
        second,
        json!({"message": {"token": "device-2", "data": {"k": "v"}}})
    );
}

#[tokio::test]
async fn test_client_usable_after_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .mount(&server)
        .await;

    let client = client_for(&server.uri());

    let cancelled = CancellationToken::new();
    cancelled.cancel();
    let failed = client
        .send(
            &Message::new("device-1"),
            &SendContext::background().with_cancellation(cancelled),
        )
        .await;
    assert!(matches!(failed, Err(VkpnsError::Canceled)));

    let retried = client
        .send(&Message::new("device-1"), &SendContext::background())
        .await;
    assert!(retried.is_ok());
}

#[tokio::test]
async fn test_concurrent_sends_share_client() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(8)
        .mount(&server)
        .await;

    let gateway: DynPushGateway = Arc::new(client_for(&server.uri()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let gateway = Arc::clone(&gateway);
            tokio::spawn(async move {
                gateway
                    .send(
                        &Message::new(format!("device-{i}")),
                        &SendContext::background(),
                    )
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }
}

#[tokio::test]
async fn test_dry_run_never_touches_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(0)
        .mount(&server)
        .await;

    let gateway: DynPushGateway = Arc::new(client_for(&server.uri()));
    let result = gateway
        .send_dry_run(&Message::new("device-1"), &SendContext::background())
        .await;

    assert!(matches!(result, Err(VkpnsError::NotImplemented)));
}

#[test]
fn test_validation_precedes_transport_setup() {
    let dialer = PlainHttpDialer::default();

    let result = VkpnsClient::with_dialer(
        VkpnsConfig::new(PROJECT_ID, ""),
        TransportConfig::default(),
        &dialer,
    );

    assert!(matches!(
        result,
        Err(VkpnsError::MissingCredential(CredentialField::ServiceToken))
    ));
    assert_eq!(dialer.configured.load(Ordering::SeqCst), 0);

    VkpnsClient::with_dialer(
        VkpnsConfig::new(PROJECT_ID, SERVICE_TOKEN),
        TransportConfig::default(),
        &dialer,
    )
    .expect("Failed to create client");
    assert_eq!(dialer.configured.load(Ordering::SeqCst), 1);
}
