//! Mock Torn API for testing
//!
//! Serves canned payloads by request path without touching the network.
//! Replies can be scoped to one credential to exercise per-key behavior.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::{Credential, TornApi, check_envelope};
use crate::error::{ApiError, Result};

/// Canned reply for one path
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Payload returned as-is (an error envelope still becomes `Upstream`)
    Json(Value),
    Upstream { code: u16, message: String },
    Http(u16),
    Timeout,
}

impl MockReply {
    fn into_result(self) -> Result<Value> {
        match self {
            MockReply::Json(value) => check_envelope(value),
            MockReply::Upstream { code, message } => {
                Err(ApiError::Upstream { code, message }.into())
            }
            MockReply::Http(status) => Err(ApiError::Http {
                status,
                message: "mock failure".to_string(),
            }
            .into()),
            MockReply::Timeout => Err(ApiError::Timeout.into()),
        }
    }
}

/// A request seen by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedCall {
    pub path: String,
    pub fingerprint: String,
}

/// Mock API client for testing.
///
/// ```ignore
/// let api = MockTornApi::new()
///     .with_json("/user/?selections=profile", json!({"name": "Duke"}));
/// ```
#[derive(Default)]
pub struct MockTornApi {
    /// Replies keyed by path, optionally narrowed to a credential fingerprint
    replies: Arc<Mutex<HashMap<(String, Option<String>), MockReply>>>,
    calls: Arc<Mutex<Vec<CapturedCall>>>,
}

impl MockTornApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(self, path: &str, body: Value) -> Self {
        self.set_reply(path, None, MockReply::Json(body));
        self
    }

    /// Reply only when `credential` makes the call.
    pub fn with_json_for(self, path: &str, credential: &Credential, body: Value) -> Self {
        self.set_reply(path, Some(credential), MockReply::Json(body));
        self
    }

    pub fn with_upstream_error(self, path: &str, code: u16, message: &str) -> Self {
        self.set_reply(
            path,
            None,
            MockReply::Upstream {
                code,
                message: message.to_string(),
            },
        );
        self
    }

    pub fn with_upstream_error_for(
        self,
        path: &str,
        credential: &Credential,
        code: u16,
        message: &str,
    ) -> Self {
        self.set_reply(
            path,
            Some(credential),
            MockReply::Upstream {
                code,
                message: message.to_string(),
            },
        );
        self
    }

    pub fn with_http_error(self, path: &str, status: u16) -> Self {
        self.set_reply(path, None, MockReply::Http(status));
        self
    }

    pub fn with_timeout(self, path: &str) -> Self {
        self.set_reply(path, None, MockReply::Timeout);
        self
    }

    /// Replace a reply after construction, e.g. to make a refresh fail.
    pub fn set_reply(&self, path: &str, credential: Option<&Credential>, reply: MockReply) {
        let key = (path.to_string(), credential.map(Credential::fingerprint));
        self.replies
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(key, reply);
    }

    pub fn calls(&self) -> Vec<CapturedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub fn call_count(&self, path: &str) -> usize {
        self.calls().iter().filter(|c| c.path == path).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl TornApi for MockTornApi {
    async fn request(&self, path: &str, credential: &Credential) -> Result<Value> {
        let fingerprint = credential.fingerprint();
        self.calls
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(CapturedCall {
                path: path.to_string(),
                fingerprint: fingerprint.clone(),
            });

        let reply = {
            let replies = self.replies.lock().unwrap_or_else(|p| p.into_inner());
            replies
                .get(&(path.to_string(), Some(fingerprint)))
                .or_else(|| replies.get(&(path.to_string(), None)))
                .cloned()
        };

        match reply {
            Some(reply) => reply.into_result(),
            None => Err(ApiError::Http {
                status: 404,
                message: format!("no mock reply for {}", path),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_per_credential_reply_wins() {
        let alice = Credential::new("alice-key");
        let bob = Credential::new("bob-key");
        let api = MockTornApi::new()
            .with_json("/user/?selections=basic", json!({"name": "anyone"}))
            .with_json_for("/user/?selections=basic", &alice, json!({"name": "Alice"}));

        let a = api.request("/user/?selections=basic", &alice).await.unwrap();
        let b = api.request("/user/?selections=basic", &bob).await.unwrap();
        assert_eq!(a["name"], "Alice");
        assert_eq!(b["name"], "anyone");
        assert_eq!(api.call_count("/user/?selections=basic"), 2);
    }

    #[tokio::test]
    async fn test_unknown_path_fails() {
        let api = MockTornApi::new();
        let err = api
            .request("/nowhere", &Credential::new("k"))
            .await
            .unwrap_err();
        assert!(matches!(err.as_api(), Some(ApiError::Http { status: 404, .. })));
    }
}
