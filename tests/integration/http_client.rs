//! HTTP client tests against a local single-shot stub server

use serde_json::json;
use storefront_sync::api::{ApiRequest, HttpStorefrontClient, StorefrontApi};
use storefront_sync::config::ApiConfig;
use storefront_sync::error::SyncError;
use storefront_sync::types::EntityId;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Accept one connection, answer it with `status_line` and `body`, and return
/// the raw request that was received.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 1024];

        let header_end = loop {
            let n = socket.read(&mut buf).await.unwrap();
            raw.extend_from_slice(&buf[..n]);
            if let Some(pos) = find(&raw, b"\r\n\r\n") {
                break pos + 4;
            }
            if n == 0 {
                break raw.len();
            }
        };

        let head = String::from_utf8_lossy(&raw[..header_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        while raw.len() < header_end + content_length {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&raw).to_string()
    });

    (base_url, handle)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn client(base_url: String) -> HttpStorefrontClient {
    HttpStorefrontClient::new(&ApiConfig {
        base_url,
        ..ApiConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_delete_category_sends_json_body_and_parses_failure() {
    let (base_url, server) = serve_once(
        "409 Conflict",
        r#"{"statusCode":409,"error":"linked","message":"constraint violation"}"#,
    )
    .await;

    let response = client(base_url)
        .send(ApiRequest::DeleteCategory {
            id: EntityId::from("cat-7"),
        })
        .await
        .unwrap();

    assert_eq!(response.status, 409);
    assert!(!response.is_success());
    assert_eq!(response.error_detail(), Some("linked"));
    assert_eq!(response.status_code(), 409);

    let request = server.await.unwrap();
    assert!(request.starts_with("DELETE /api/admin/category HTTP/1.1"));
    let body_start = request.find("\r\n\r\n").unwrap() + 4;
    let body: serde_json::Value = serde_json::from_str(&request[body_start..]).unwrap();
    assert_eq!(body, json!({"id": "cat-7"}));
}

#[tokio::test]
async fn test_search_encodes_query_parameter() {
    let (base_url, server) = serve_once("200 OK", r#"[{"id":1,"productName":"Arm chair"}]"#).await;

    let response = client(base_url)
        .send(ApiRequest::SearchProducts {
            query: "arm chair".to_string(),
        })
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(
        response.body,
        Some(json!([{"id": 1, "productName": "Arm chair"}]))
    );

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/products/search?query=arm+chair HTTP/1.1"));
}

#[tokio::test]
async fn test_cart_delete_with_empty_body() {
    let (base_url, server) = serve_once("200 OK", "").await;

    let response = client(base_url)
        .send(ApiRequest::DeleteCartItem {
            id: EntityId::from("9"),
        })
        .await
        .unwrap();

    assert!(response.is_success());
    assert!(response.body.is_none());
    assert!(server
        .await
        .unwrap()
        .starts_with("DELETE /api/delete/cart-item/9 HTTP/1.1"));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let result = client(base_url)
        .send(ApiRequest::DeleteProduct {
            id: EntityId::from("1"),
        })
        .await;
    assert!(matches!(result, Err(SyncError::Transport(_))));
}
