//! HTTP-level tests for the registry client against a canned local server

use registrar_client::{
    ApiError, ClientConfig, FinalizeRequest, PrepareTransferRequest, RegistryApi, RegistryClient,
    NETWORK_ERROR_MESSAGE,
};
use registrar_core::{DomainStatus, SignablePayload};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Canned HTTP response
struct Canned {
    status: u16,
    content_type: Option<&'static str>,
    body: String,
}

impl Canned {
    fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: Some("application/json; charset=utf-8"),
            body: body.to_string(),
        }
    }

    fn plain(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: Some("text/html"),
            body: body.to_string(),
        }
    }
}

/// Captured request: request line and body
#[derive(Debug)]
struct Captured {
    request_line: String,
    body: String,
}

/// Serve each canned response to one connection, in order, and hand back
/// what the client sent
async fn serve(responses: Vec<Canned>) -> (String, JoinHandle<Vec<Captured>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut captured = Vec::new();
        for canned in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];

            let header_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
                if n == 0 {
                    break buf.len();
                }
            };

            let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
            let content_length = head
                .lines()
                .find_map(|l| {
                    let lower = l.to_ascii_lowercase();
                    lower
                        .strip_prefix("content-length:")
                        .map(|v| v.trim().parse::<usize>().unwrap())
                })
                .unwrap_or(0);
            while buf.len() < header_end + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }

            captured.push(Captured {
                request_line: head.lines().next().unwrap_or_default().to_string(),
                body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
            });

            let mut response = format!("HTTP/1.1 {} Canned\r\n", canned.status);
            if let Some(ct) = canned.content_type {
                response.push_str(&format!("Content-Type: {}\r\n", ct));
            }
            response.push_str(&format!(
                "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                canned.body.len(),
                canned.body
            ));
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
        captured
    });

    (format!("http://{}/api.php", addr), handle)
}

fn client_for(base_url: &str) -> RegistryClient {
    RegistryClient::new(&ClientConfig {
        base_url: base_url.to_string(),
        timeout_secs: Some(10),
        ..ClientConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_search_routes_by_query_and_decodes_domain() {
    let (url, server) = serve(vec![Canned::json(
        200,
        r#"{"success":true,"data":{"name":"dapp.phpcoin","owner":"Pa1","status":"taken","created":"2023-01-15"}}"#,
    )])
    .await;

    let domain = client_for(&url).search("dapp.phpcoin").await.unwrap();
    assert_eq!(domain.name, "dapp.phpcoin");
    assert_eq!(domain.status, DomainStatus::Taken);

    let captured = server.await.unwrap();
    assert!(captured[0].request_line.starts_with("GET /api.php?q=search&name=dapp.phpcoin "));
}

#[tokio::test]
async fn test_prepare_payload_is_byte_exact() {
    let payload = r#"{"name":"x.tld",  "owner":"A","nonce":17}"#;
    let (url, server) = serve(vec![Canned::json(
        200,
        &format!(r#"{{"success":true,"data":{}}}"#, payload),
    )])
    .await;

    let prepared = client_for(&url)
        .prepare_transfer(&PrepareTransferRequest {
            name: "x.tld".to_string(),
            new_owner: "A".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(prepared.as_str(), payload);

    let captured = server.await.unwrap();
    assert!(captured[0].request_line.starts_with("POST /api.php?q=prepareTransfer "));
    let sent: serde_json::Value = serde_json::from_str(&captured[0].body).unwrap();
    assert_eq!(sent["newOwner"], "A");
}

#[tokio::test]
async fn test_finalize_sends_payload_verbatim() {
    let (url, server) = serve(vec![Canned::json(
        200,
        r#"{"success":true,"data":{"transactionId":"tx1"}}"#,
    )])
    .await;

    let receipt = client_for(&url)
        .finalize_register(&FinalizeRequest {
            serialized_payload: SignablePayload::from_json_text(r#"{"name":"x.tld","owner":"A"}"#)
                .unwrap(),
            signature: "sig1".to_string(),
            public_key: "pub1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(receipt.transaction_id, "tx1");

    let captured = server.await.unwrap();
    let sent: serde_json::Value = serde_json::from_str(&captured[0].body).unwrap();
    assert_eq!(sent["dataToSign"], r#"{"name":"x.tld","owner":"A"}"#);
    assert_eq!(sent["finalSignature"], "sig1");
    assert_eq!(sent["publicKey"], "pub1");
}

#[tokio::test]
async fn test_application_rejection_passes_message_through() {
    let (url, _server) = serve(vec![
        Canned::json(200, r#"{"success":false,"error":"Domain already registered"}"#),
        Canned::json(200, r#"{"success":false}"#),
    ])
    .await;
    let client = client_for(&url);

    let err = client.stats().await.unwrap_err();
    assert_eq!(err, ApiError::Rejected("Domain already registered".to_string()));

    let err = client.stats().await.unwrap_err();
    assert_eq!(err.to_string(), "API returned an error.");
}

#[tokio::test]
async fn test_http_status_errors() {
    let (url, _server) = serve(vec![
        Canned::json(400, r#"{"success":false,"error":"Invalid signature"}"#),
        Canned::plain(502, "<html>Bad Gateway</html>"),
    ])
    .await;
    let client = client_for(&url);

    let err = client.account("Pa1").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Http {
            status: 400,
            message: "Invalid signature".to_string()
        }
    );

    let err = client.account("Pa1").await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed with status: 502");
    assert!(!err.is_offline());
}

#[tokio::test]
async fn test_success_without_json_body() {
    let (url, _server) = serve(vec![
        Canned::plain(200, ""),
        Canned::json(200, r#"{"success":true}"#),
    ])
    .await;
    let client = client_for(&url);

    assert!(client.trending().await.unwrap().is_empty());
    assert_eq!(client.stats().await.unwrap_err(), ApiError::EmptyResponse);
}

#[tokio::test]
async fn test_malformed_json_is_decode_error() {
    let (url, _server) = serve(vec![Canned::json(200, "{not json")]).await;
    let err = client_for(&url).stats().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_registry_is_offline() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(&format!("http://{}/api.php", addr))
        .stats()
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Offline);
    assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
}
