//! User endpoint payloads

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::common::{Bar, LastAction, Status};

/// `/user/` payload for any mix of the `basic`, `profile`, `battlestats`,
/// `bars`, `money` and `bazaar` selections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub player_id: Option<u64>,
    pub name: Option<String>,
    pub level: Option<u32>,
    pub gender: Option<String>,
    pub rank: Option<String>,
    pub age: Option<u32>,
    pub life: Option<Bar>,
    pub status: Option<Status>,
    pub job: Option<Job>,
    pub faction: Option<FactionMembership>,
    pub last_action: Option<LastAction>,

    pub strength: Option<f64>,
    pub defense: Option<f64>,
    pub speed: Option<f64>,
    pub dexterity: Option<f64>,
    pub total: Option<f64>,

    pub energy: Option<Bar>,
    pub nerve: Option<Bar>,
    pub happy: Option<Bar>,

    pub money_onhand: Option<i64>,

    pub bazaar: Option<BazaarPayload>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Job {
    pub position: Option<String>,
    pub company_id: Option<u64>,
    pub company_name: Option<String>,
    pub company_type: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactionMembership {
    pub position: Option<String>,
    pub faction_id: Option<u64>,
    pub days_in_faction: Option<u32>,
    pub faction_name: Option<String>,
    pub faction_tag: Option<String>,
}

/// The `bazaar` selection comes back either as a list or keyed by item id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BazaarPayload {
    List(Vec<BazaarEntry>),
    Keyed(HashMap<String, BazaarEntry>),
}

impl BazaarPayload {
    /// Flatten into entries, taking the item id from the map key when the
    /// entry itself has none.
    pub fn into_entries(self) -> Vec<BazaarEntry> {
        match self {
            BazaarPayload::List(entries) => entries,
            BazaarPayload::Keyed(map) => {
                let mut entries: Vec<BazaarEntry> = map
                    .into_iter()
                    .map(|(key, mut entry)| {
                        if entry.id.is_none() {
                            entry.id = key.parse().ok();
                        }
                        entry
                    })
                    .collect();
                entries.sort_by_key(|e| e.id);
                entries
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BazaarEntry {
    #[serde(rename = "ID", alias = "id")]
    pub id: Option<u64>,
    pub name: Option<String>,
    #[serde(rename = "type", alias = "category")]
    pub item_type: Option<String>,
    pub quantity: Option<u64>,
    pub price: Option<i64>,
    #[serde(alias = "market_value")]
    pub market_price: Option<i64>,
}
