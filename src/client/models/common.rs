//! Shapes shared by several endpoints

use serde::{Deserialize, Serialize};

/// A current/maximum pair (life, energy, nerve, happy)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bar {
    pub current: Option<i64>,
    pub maximum: Option<i64>,
}

/// Player status line, e.g. "Okay" or "In hospital for 12 mins"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Status {
    pub description: Option<String>,
    pub state: Option<String>,
    pub until: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LastAction {
    /// "Online", "Idle" or "Offline"
    pub status: Option<String>,
    pub timestamp: Option<i64>,
    pub relative: Option<String>,
}

impl LastAction {
    pub fn is_online(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("online"))
    }
}
