//! Torn API client
//!
//! [`TornApi`] is the seam between the domain fetchers and the transport.
//! [`TornClient`] is the real implementation: it builds the request URL,
//! attaches the caller's key, and sends every call through the shared
//! [`RequestQueue`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, Result};

pub mod credential;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod paths;
pub mod queue;
pub mod torn;

pub use credential::Credential;
#[cfg(test)]
pub use mock::MockTornApi;
pub use queue::{QueueSettings, QueueSnapshot, RequestQueue};
pub use torn::TornClient;

/// Torn API transport
#[async_trait]
pub trait TornApi: Send + Sync {
    /// GET `path` (relative to the API host, query string included) with
    /// `credential` attached.
    ///
    /// Returns the JSON payload unchanged, or fails with `ApiError::Http`
    /// for a non-2xx status and `ApiError::Upstream` when the body carries
    /// the API's error envelope.
    async fn request(&self, path: &str, credential: &Credential) -> Result<Value>;
}

/// Request `path` and deserialize the payload into `T`.
pub async fn fetch<T: DeserializeOwned>(
    api: &dyn TornApi,
    path: &str,
    credential: &Credential,
) -> Result<T> {
    let value = api.request(path, credential).await?;
    serde_json::from_value(value).map_err(|e| {
        ApiError::InvalidResponse(format!("Unexpected payload for {}: {}", strip_query(path), e))
            .into()
    })
}

/// Fail with `ApiError::Upstream` if `body` is an error envelope.
///
/// The envelope looks like `{"error": {"code": 2, "error": "Incorrect key"}}`.
pub fn check_envelope(body: Value) -> Result<Value> {
    let Some(error) = body.get("error") else {
        return Ok(body);
    };

    let code = error
        .get("code")
        .and_then(Value::as_u64)
        .unwrap_or_default() as u16;
    let message = error
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Upstream error code {}", code));

    Err(ApiError::Upstream { code, message }.into())
}

/// The path without its query string, safe for log lines.
pub(crate) fn strip_query(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}
