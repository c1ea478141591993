use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::FetchError;

/// Retrieves the raw payload behind a URL.
#[async_trait]
pub trait DataClient: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// One plain GET per call, bounded by the client-wide timeout.
#[derive(Clone)]
pub struct HttpDataClient {
    client: wreq::Client,
}

impl HttpDataClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = wreq::Client::builder()
            .user_agent("cinema-sync/0.1")
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DataClient for HttpDataClient {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!(url = %url, "fetching");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request { url: url.to_string(), source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|source| FetchError::Body { url: url.to_string(), source })?;

        debug!(url = %url, bytes = body.len(), "fetched");
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;

    /// Answers a single connection with `response` and returns the URL to hit.
    async fn serve_once(response: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let mut read = 0;
            while !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf[read..]).await.unwrap();
                if n == 0 {
                    break;
                }
                read += n;
            }
            socket.write_all(response).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{addr}/quickbook/10103/cinemas")
    }

    #[tokio::test]
    async fn success_returns_body_unchanged() {
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 24\r\nConnection: close\r\n\r\n{\"body\":{\"dates\":[\"x\"]}}",
        )
        .await;
        let client = HttpDataClient::new(Duration::from_secs(5)).unwrap();

        let body = client.fetch(&url).await.unwrap();

        assert_eq!(body, br#"{"body":{"dates":["x"]}}"#);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let url = serve_once(
            b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let client = HttpDataClient::new(Duration::from_secs(5)).unwrap();

        let err = client.fetch(&url).await.unwrap_err();

        assert!(
            matches!(err, FetchError::Status { status: 503, ref url } if url.ends_with("/cinemas")),
            "unexpected error: {err}"
        );
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });
        let client = HttpDataClient::new(Duration::from_millis(200)).unwrap();

        let err = client.fetch(&format!("http://{addr}/dates")).await.unwrap_err();

        assert!(matches!(err, FetchError::Request { .. }), "unexpected error: {err}");
    }
}
