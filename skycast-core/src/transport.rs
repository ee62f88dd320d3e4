use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Failures reported by a [`Transport`]. The fetch client translates these
/// into the domain taxonomy; nothing above the client sees them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("request failed with status {status}")]
    Status { status: u16, body: String },

    /// The cancellation token fired before the response was committed.
    #[error("request canceled")]
    Canceled,

    /// Connection, timeout, or protocol failure.
    #[error("network error: {0}")]
    Network(String),
}

/// HTTP GET capability handed to the fetch client.
///
/// Keeping this behind a trait lets tests script responses without a server;
/// the CLI injects [`HttpTransport`].
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Issue a GET with query parameters and return the decoded JSON body.
    ///
    /// Implementations must observe `cancel`: once the token fires, the call
    /// resolves to [`TransportError::Canceled`] instead of a result.
    async fn get(
        &self,
        url: &str,
        params: &[(String, String)],
        cancel: &CancellationToken,
    ) -> Result<serde_json::Value, TransportError>;
}

/// Production transport over a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        params: &[(String, String)],
        cancel: &CancellationToken,
    ) -> Result<serde_json::Value, TransportError> {
        let request = self.http.get(url).query(params).send();

        tokio::select! {
            () = cancel.cancelled() => Err(TransportError::Canceled),
            result = request => {
                let response = result.map_err(|e| TransportError::Network(e.to_string()))?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(TransportError::Status {
                        status: status.as_u16(),
                        body: truncate_body(&body),
                    });
                }

                response
                    .json::<serde_json::Value>()
                    .await
                    .map_err(|e| TransportError::Network(e.to_string()))
            }
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut cut = MAX;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
