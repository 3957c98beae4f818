//! Units of crawler work

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;

use crate::client::models::UserProfile;
use crate::client::{Credential, TornApi, fetch, paths};
use crate::error::Result;
use crate::store::{IndexedPlayer, StateStore};

/// What one unit of work did
#[derive(Debug, Clone, PartialEq)]
pub enum UnitOutcome {
    /// The entity was stored; carries a short description
    Indexed(String),
    /// Nothing to store for this id (e.g. the id does not exist)
    Skipped(String),
}

/// Processes one id of the scanned range
#[async_trait]
pub trait UnitWorker: Send + Sync {
    async fn process(&self, id: u64) -> Result<UnitOutcome>;
}

/// Fetches a player profile and upserts it into the index
pub struct PlayerIndexer {
    api: Arc<dyn TornApi>,
    store: Arc<StateStore>,
    credential: Credential,
}

impl PlayerIndexer {
    pub fn new(api: Arc<dyn TornApi>, store: Arc<StateStore>, credential: Credential) -> Self {
        Self {
            api,
            store,
            credential,
        }
    }
}

#[async_trait]
impl UnitWorker for PlayerIndexer {
    async fn process(&self, id: u64) -> Result<UnitOutcome> {
        let path = paths::user(Some(id), "profile");
        let profile: UserProfile = match fetch(self.api.as_ref(), &path, &self.credential).await {
            Ok(profile) => profile,
            Err(e) if e.as_api().is_some_and(|a| a.is_incorrect_id()) => {
                debug!("Player {} does not exist: {}", id, e);
                return Ok(UnitOutcome::Skipped(format!("no player {}", id)));
            }
            Err(e) => return Err(e),
        };

        let player = IndexedPlayer::from_profile(id, profile, Utc::now());
        self.store.upsert_player(&player)?;
        Ok(UnitOutcome::Indexed(format!(
            "{} [{}] level {}",
            player.name, player.id, player.level
        )))
    }
}
