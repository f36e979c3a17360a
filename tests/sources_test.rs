//! Upstream client behaviour against a local HTTP stub.

use samcrypto::error::AppError;
use samcrypto::sources::CoinGeckoClient;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve a single canned response on a random local port, returning its base URL.
async fn serve_once(status_line: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;

        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: text/plain; charset=utf-8\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_coingecko_error_body_with_multibyte_char() {
    // Log arguments are only evaluated with an active subscriber
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    // 'é' straddles byte 200
    let body = format!("{}é rate limited", "a".repeat(199));
    let base_url = serve_once("429 Too Many Requests", body).await;

    let client = CoinGeckoClient::new(reqwest::Client::new(), base_url);
    let result = client.fetch_price("bitcoin").await;

    match result {
        Err(AppError::ExternalApi(msg)) => assert!(msg.contains("429")),
        other => panic!("expected an upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_coingecko_success_parses_price() {
    let body = r#"{"bitcoin":{"usd":64000.0,"usd_24h_change":2.5}}"#.to_string();
    let base_url = serve_once("200 OK", body).await;

    let client = CoinGeckoClient::new(reqwest::Client::new(), base_url);
    let data = client.fetch_price("bitcoin").await.unwrap();

    assert_eq!(data.price, 64000.0);
    assert_eq!(data.change_24h, Some(2.5));
    assert!(data.volume_24h.is_none());
}
