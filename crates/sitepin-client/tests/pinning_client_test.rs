//! Contract tests for PinningClient against the Pinata `pinFileToIPFS` API.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | POST   | `/pinning/pinFileToIPFS` | `pin_directory_*` |

use std::fs;
use std::time::Duration;

use sitepin_client::config::PinataConfig;
use sitepin_client::{ClientError, PinningClient};
use sitepin_core::collect_assets;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(mock_server: &MockServer) -> PinningClient {
    PinningClient::new(&PinataConfig {
        api_url: mock_server.uri().parse().unwrap(),
        api_key: "test-key".to_string().into(),
        api_secret: "test-secret".to_string().into(),
        pin_name_prefix: "test-site".into(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

/// `<tmp>/dist` with three files, one nested.
fn site_fixture() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("dist");
    fs::create_dir_all(root.join("assets")).unwrap();
    fs::write(root.join("index.html"), "<h1>hello</h1>").unwrap();
    fs::write(root.join("404.html"), "<h1>missing</h1>").unwrap();
    fs::write(root.join("assets/app.js"), "console.log(1)").unwrap();
    (dir, root)
}

#[tokio::test]
async fn pin_directory_returns_exact_cid() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pinning/pinFileToIPFS"))
        .and(header("pinata_api_key", "test-key"))
        .and(header("pinata_secret_api_key", "test-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "IpfsHash": "bafy123",
            "PinSize": 1024,
            "Timestamp": "2026-10-19T12:00:00.000Z"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (_dir, root) = site_fixture();
    let assets = collect_assets(&root).unwrap();

    let cid = test_client(&mock_server).pin_directory(&assets).await.unwrap();
    assert_eq!(cid.as_str(), "bafy123");
}

#[tokio::test]
async fn pin_directory_sends_files_under_folder_and_metadata() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pinning/pinFileToIPFS"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"IpfsHash": "bafy123"})),
        )
        .mount(&mock_server)
        .await;

    let (_dir, root) = site_fixture();
    let assets = collect_assets(&root).unwrap();
    test_client(&mock_server).pin_directory(&assets).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];

    let content_type = request.headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));

    let body = String::from_utf8_lossy(&request.body);
    for name in ["dist/index.html", "dist/404.html", "dist/assets/app.js"] {
        assert!(
            body.contains(&format!("name=\"file\"; filename=\"{name}\"")),
            "missing part for {name}"
        );
    }
    assert!(body.contains("<h1>hello</h1>"));
    assert!(body.contains("name=\"pinataMetadata\""));
    assert!(body.contains("{\"name\":\"test-site"));

    // Credentials are only ever sent as headers.
    assert!(!body.contains("test-secret"));
    assert!(!request.url.as_str().contains("test-secret"));
}

#[tokio::test]
async fn pin_directory_missing_cid_is_distinct_error_without_retry() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pinning/pinFileToIPFS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (_dir, root) = site_fixture();
    let assets = collect_assets(&root).unwrap();

    let err = test_client(&mock_server)
        .pin_directory(&assets)
        .await
        .unwrap_err();
    match err {
        ClientError::MissingCid { body } => assert_eq!(body, "{}"),
        other => panic!("expected MissingCid, got: {other:?}"),
    }
}

#[tokio::test]
async fn pin_directory_empty_cid_is_missing_cid() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"IpfsHash": ""})),
        )
        .mount(&mock_server)
        .await;

    let (_dir, root) = site_fixture();
    let assets = collect_assets(&root).unwrap();

    let err = test_client(&mock_server)
        .pin_directory(&assets)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::MissingCid { .. }), "got {err:?}");
}

#[tokio::test]
async fn pin_directory_handles_api_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pinning/pinFileToIPFS"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (_dir, root) = site_fixture();
    let assets = collect_assets(&root).unwrap();

    let err = test_client(&mock_server)
        .pin_directory(&assets)
        .await
        .unwrap_err();
    match err {
        ClientError::Api { status, body, .. } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid credentials");
        }
        other => panic!("expected Api, got: {other:?}"),
    }
}

#[tokio::test]
async fn pin_directory_unreachable_service_is_http_error() {
    let client = PinningClient::new(&PinataConfig {
        api_url: "http://127.0.0.1:1".parse().unwrap(),
        api_key: "k".to_string().into(),
        api_secret: "s".to_string().into(),
        pin_name_prefix: "x".into(),
        timeout: Duration::from_secs(2),
    })
    .unwrap();

    let (_dir, root) = site_fixture();
    let assets = collect_assets(&root).unwrap();

    let err = client.pin_directory(&assets).await.unwrap_err();
    assert!(matches!(err, ClientError::Http { .. }), "got {err:?}");
}

#[tokio::test]
async fn pin_directory_streams_large_file_with_known_length() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pinning/pinFileToIPFS"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"IpfsHash": "bafy123"})),
        )
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("dist");
    fs::create_dir(&root).unwrap();
    let payload: Vec<u8> = (0..200 * 1024).map(|i| (i % 251) as u8).collect();
    fs::write(root.join("bundle.bin"), &payload).unwrap();
    let assets = collect_assets(&root).unwrap();

    test_client(&mock_server).pin_directory(&assets).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let request = &requests[0];
    let content_length: usize = request
        .headers
        .get("content-length")
        .expect("multipart body length is computed up front")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(content_length, request.body.len());
    assert!(
        request
            .body
            .windows(payload.len())
            .any(|window| window == payload.as_slice()),
        "file bytes must arrive unchanged"
    );
}

#[tokio::test]
async fn pin_directory_file_removed_after_collect_is_io_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (_dir, root) = site_fixture();
    let assets = collect_assets(&root).unwrap();
    fs::remove_file(root.join("404.html")).unwrap();

    let err = test_client(&mock_server)
        .pin_directory(&assets)
        .await
        .unwrap_err();
    match err {
        ClientError::Io { path, .. } => assert!(path.ends_with("404.html")),
        other => panic!("expected Io, got {other:?}"),
    }
}
