use super::Dashboard;
use crate::client::Credential;
use crate::error::Result;
use crate::models::PlayerRecord;

const PLAYER_SELECTIONS: &str = "profile,battlestats,bars,money";

impl Dashboard {
    /// Profile, bars, battle stats and money of the key owner.
    pub async fn get_player_stats(&self, credential: &Credential) -> Result<PlayerRecord> {
        let profile = self.owner(credential, PLAYER_SELECTIONS).await?;
        Ok(PlayerRecord::from(profile))
    }
}
