//! Core HTTP operations
//!
//! A single GET-and-decode primitive. Requests are sent once: there is no
//! retry, backoff or rate limiting, and failures go straight to the caller.

use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::errors::{RemoteError, RemoteResult};

/// HTTP operations handler
#[derive(Debug, Clone)]
pub struct HttpHandler {
    client: Client,
}

impl HttpHandler {
    /// Creates a new HttpHandler around an already configured client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetches `url` and decodes the JSON body into `T`
    ///
    /// # Errors
    ///
    /// - `RemoteError::Http` on transport failure
    /// - `RemoteError::Status` on a non-success status code
    /// - `RemoteError::Decode` if the body is not valid JSON for `T`
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> RemoteResult<T> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Request to {} failed with HTTP {}", url, status.as_u16());
            return Err(RemoteError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| RemoteError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    //! One-shot HTTP responder bound to a local port

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one request with the given status line and body
    ///
    /// Returns the base URL (`http://127.0.0.1:PORT`) and a handle that
    /// resolves to the raw request head the client sent.
    pub async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let mut request = Vec::new();
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}", addr), handle)
    }
}
