use chrono::Utc;

use super::{Dashboard, secondary};
use crate::client::models::{
    FactionBasic, FactionMembersResponse, FactionSummaryResponse, RankedWarsResponse, TerritoryResponse,
    UserProfile,
};
use crate::client::{Credential, paths};
use crate::error::Result;
use crate::models::faction::partition_wars;
use crate::models::{FactionDetailRecord, FactionRecord, MemberRecord, TerritoryRecord};

/// Faction id from the owner's profile, `None` when factionless.
fn member_of(profile: UserProfile) -> Option<u64> {
    profile
        .faction
        .and_then(|f| f.faction_id)
        .filter(|id| *id != 0)
}

impl Dashboard {
    /// The key owner's faction, or [`FactionRecord::none`] when factionless.
    pub async fn get_faction_data(&self, credential: &Credential) -> Result<FactionRecord> {
        let Some(faction_id) = member_of(self.owner(credential, "profile").await?) else {
            return Ok(FactionRecord::none());
        };
        let path = paths::faction(Some(faction_id), "basic");
        let basic: Option<FactionBasic> = self.get_entity(&path, credential).await?;
        Ok(basic.map_or_else(FactionRecord::none, |b| FactionRecord::from_basic(b, faction_id)))
    }

    /// Faction summary with roster, ranked wars and territory.
    ///
    /// The v2 summary decides the outcome. Members, wars and territory are
    /// fetched together and each falls back to empty on failure. Wars are
    /// split into active and completed against the current time.
    pub async fn get_faction_detailed_data(&self, credential: &Credential) -> Result<FactionDetailRecord> {
        let Some(faction_id) = member_of(self.owner(credential, "profile").await?) else {
            return Ok(FactionDetailRecord::none());
        };
        let summary_path = paths::faction_v2(faction_id, "basic");
        let Some(summary) = self
            .get_entity::<FactionSummaryResponse>(&summary_path, credential)
            .await?
        else {
            return Ok(FactionDetailRecord::none());
        };
        let faction = FactionRecord::from_summary(summary.basic.unwrap_or_default(), faction_id);

        let members_path = paths::faction_v2(faction_id, "members");
        let wars_path = paths::faction_v2(faction_id, "rankedwars");
        let territory_path = paths::faction_v2(faction_id, "territory");
        let (members, wars, territory) = futures::join!(
            self.get::<FactionMembersResponse>(&members_path, credential),
            self.get::<RankedWarsResponse>(&wars_path, credential),
            self.get::<TerritoryResponse>(&territory_path, credential),
        );

        let mut members: Vec<MemberRecord> = secondary("Faction members", members)
            .and_then(|r| r.members)
            .unwrap_or_default()
            .into_iter()
            .map(|m| MemberRecord::from_raw(0, m))
            .collect();
        members.sort_by_key(|m| m.id);

        let wars = secondary("Ranked wars", wars)
            .and_then(|r| r.rankedwars)
            .unwrap_or_default();
        let wars = partition_wars(wars, faction.id, Utc::now().timestamp());

        let territories: Vec<TerritoryRecord> = secondary("Faction territory", territory)
            .and_then(|r| r.territory)
            .unwrap_or_default()
            .into_iter()
            .map(TerritoryRecord::from)
            .collect();

        Ok(FactionDetailRecord::assemble(faction, members, wars, territories))
    }
}
