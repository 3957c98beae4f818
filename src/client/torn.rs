//! Torn API client implementation

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client as HttpClient, Response};
use serde_json::Value;

use super::{Credential, RequestQueue, TornApi, check_envelope, strip_query};
use crate::error::{ApiError, Result};

/// Torn API host
pub const API_BASE_URL: &str = "https://api.torn.com";

/// Per-request timeout when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Torn API client
///
/// Cloning is cheap; clones share the HTTP connection pool and the queue.
#[derive(Clone)]
pub struct TornClient {
    http: HttpClient,
    base_url: String,
    queue: RequestQueue,
}

impl TornClient {
    /// Create a client for the public API host.
    pub fn new(queue: RequestQueue) -> Result<Self> {
        Self::with_host(queue, None, DEFAULT_TIMEOUT)
    }

    /// Create a client against a custom host (used for testing).
    pub fn with_host(queue: RequestQueue, host: Option<&str>, timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .user_agent(concat!("tornboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let base_url = host
            .unwrap_or(API_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            http,
            base_url,
            queue,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn queue(&self) -> &RequestQueue {
        &self.queue
    }
}

#[async_trait]
impl TornApi for TornClient {
    async fn request(&self, path: &str, credential: &Credential) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let http = self.http.clone();
        let key = credential.expose().to_string();
        let label = format!("{} ({})", strip_query(path), credential);

        self.queue
            .enqueue(async move {
                debug!("GET {}", label);
                let response = http
                    .get(&url)
                    .query(&[("key", key.as_str())])
                    .send()
                    .await
                    .map_err(ApiError::from)?;
                decode(response).await
            })
            .await
    }
}

/// Turn a raw HTTP response into a payload or a typed failure.
async fn decode(response: Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let fallback = status.canonical_reason().unwrap_or("Unexpected status");
        let message = match response.text().await {
            Ok(text) if !text.trim().is_empty() => text,
            _ => fallback.to_string(),
        };
        return Err(ApiError::Http {
            status: status.as_u16(),
            message,
        }
        .into());
    }

    let body: Value = response.json().await.map_err(body_error)?;
    check_envelope(body)
}

/// The timeout also covers reading the body, so a stalled body is a timeout
/// rather than a malformed payload.
fn body_error(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::InvalidResponse(format!("Failed to parse response: {}", err.without_url()))
    } else {
        ApiError::from(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_uses_public_host() {
        let client = TornClient::new(RequestQueue::default()).unwrap();
        assert_eq!(client.base_url(), API_BASE_URL);
    }

    #[test]
    fn test_custom_host_drops_trailing_slash() {
        let client = TornClient::with_host(
            RequestQueue::default(),
            Some("http://127.0.0.1:9999/"),
            DEFAULT_TIMEOUT,
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9999");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_network_error() {
        let client = TornClient::with_host(
            RequestQueue::default(),
            Some("http://127.0.0.1:1"),
            Duration::from_secs(2),
        )
        .unwrap();
        let err = client
            .request("/user/?selections=basic", &Credential::new("secret-key"))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_api(),
            Some(ApiError::Network(_)) | Some(ApiError::Timeout)
        ));
        assert!(!err.to_string().contains("secret-key"));
    }
}
