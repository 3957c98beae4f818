use log::debug;

use super::Dashboard;
use crate::client::Credential;
use crate::error::{ApiError, Error, Result};
use crate::models::{KeyCheck, UNKNOWN, text_or};

impl Dashboard {
    /// Validate `credential` with a `basic` user call.
    ///
    /// Upstream rejections become `invalid` (or `limited` for throttling)
    /// with the upstream message verbatim. Transport failures are returned
    /// as errors since they say nothing about the key. Nothing is cached.
    pub async fn check_api_key(&self, credential: &Credential) -> Result<KeyCheck> {
        if credential.is_empty() {
            return Ok(KeyCheck::invalid("No API key provided"));
        }

        match self.owner(credential, "basic").await {
            Ok(profile) => Ok(KeyCheck::valid(
                text_or(profile.name, UNKNOWN),
                profile.player_id.unwrap_or_default(),
            )),
            Err(Error::Api(e @ ApiError::Upstream { .. })) => {
                debug!("Key {} rejected: {}", credential, e);
                if e.is_rate_limited() {
                    Ok(KeyCheck::limited(e.to_string()))
                } else {
                    Ok(KeyCheck::invalid(e.to_string()))
                }
            }
            Err(e) => Err(e),
        }
    }
}
