//! API key check result

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStatus {
    Valid,
    Invalid,
    Limited,
}

impl std::fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            KeyStatus::Valid => "valid",
            KeyStatus::Invalid => "invalid",
            KeyStatus::Limited => "limited",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of validating a key against the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyCheck {
    pub status: KeyStatus,
    /// Key owner's name; empty unless valid
    pub name: String,
    pub player_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl KeyCheck {
    pub fn valid(name: String, player_id: u64) -> Self {
        Self {
            status: KeyStatus::Valid,
            name,
            player_id,
            error: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::rejected(KeyStatus::Invalid, message)
    }

    pub fn limited(message: impl Into<String>) -> Self {
        Self::rejected(KeyStatus::Limited, message)
    }

    fn rejected(status: KeyStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            name: String::new(),
            player_id: 0,
            error: Some(message.into()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == KeyStatus::Valid
    }
}
