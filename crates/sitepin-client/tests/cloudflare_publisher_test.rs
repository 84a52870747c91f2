//! Contract tests for CloudflarePublisher against the Web3 hostnames API.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | PATCH  | `/zones/{zone_id}/web3/hostnames/{hostname_id}` | `publish_*` |

use std::time::Duration;

use sitepin_client::config::CloudflareConfig;
use sitepin_client::dns::CloudflarePublisher;
use sitepin_client::{ClientError, DnsPublisher};
use sitepin_core::ContentId;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOSTNAME_PATH: &str = "/zones/zone-1/web3/hostnames/host-1";

fn test_publisher(mock_server: &MockServer) -> CloudflarePublisher {
    CloudflarePublisher::new(&CloudflareConfig {
        api_url: mock_server.uri().parse().unwrap(),
        api_key: "cf-token".to_string().into(),
        zone_id: "zone-1".into(),
        hostname_id: "host-1".into(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn cid() -> ContentId {
    ContentId::new("bafy123").unwrap()
}

#[tokio::test]
async fn publish_patches_dnslink_and_succeeds() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(HOSTNAME_PATH))
        .and(header("authorization", "Bearer cf-token"))
        .and(body_json(serde_json::json!({"dnslink": "/ipfs/bafy123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "errors": [],
            "messages": [],
            "result": {
                "id": "host-1",
                "name": "example.com",
                "target": "ipfs",
                "dnslink": "/ipfs/bafy123",
                "status": "active"
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let publisher = test_publisher(&mock_server);
    publisher.publish(&cid()).await.unwrap();
    assert_eq!(publisher.provider_name(), "cloudflare");
}

#[tokio::test]
async fn publish_accepts_bare_success_envelope() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(HOSTNAME_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
        .mount(&mock_server)
        .await;

    test_publisher(&mock_server).publish(&cid()).await.unwrap();
}

#[tokio::test]
async fn publish_rejection_embeds_full_payload() {
    let payload = serde_json::json!({
        "success": false,
        "errors": [{"code": 1003, "message": "Invalid or missing zone id."}],
        "messages": [],
        "result": null
    });
    let mock_server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(HOSTNAME_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = test_publisher(&mock_server).publish(&cid()).await.unwrap_err();
    match &err {
        ClientError::Rejected { provider, body } => {
            assert_eq!(*provider, "cloudflare");
            let returned: serde_json::Value = serde_json::from_str(body).unwrap();
            assert_eq!(returned, payload);
        }
        other => panic!("expected Rejected, got: {other:?}"),
    }
    assert!(err.to_string().contains("Invalid or missing zone id."));
}

#[tokio::test]
async fn publish_error_status_with_envelope_is_rejection() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "success": false,
            "errors": [{"code": 10000, "message": "Authentication error"}]
        })))
        .mount(&mock_server)
        .await;

    let err = test_publisher(&mock_server).publish(&cid()).await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected { .. }), "got {err:?}");
}

#[tokio::test]
async fn publish_error_status_without_envelope_is_api_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&mock_server)
        .await;

    let err = test_publisher(&mock_server).publish(&cid()).await.unwrap_err();
    match err {
        ClientError::Api { status, .. } => assert_eq!(status, 502),
        other => panic!("expected Api, got: {other:?}"),
    }
}

#[tokio::test]
async fn publish_success_status_with_garbage_is_decode_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let err = test_publisher(&mock_server).publish(&cid()).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode { .. }), "got {err:?}");
}
