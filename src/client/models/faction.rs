//! Faction endpoint payloads (v1 `basic` and the v2 sections)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::common::{LastAction, Status};

/// v1 `/faction/{id}?selections=basic`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactionBasic {
    #[serde(rename = "ID", alias = "id")]
    pub id: Option<u64>,
    pub name: Option<String>,
    pub tag: Option<String>,
    pub leader: Option<u64>,
    #[serde(rename = "co-leader", alias = "co_leader")]
    pub co_leader: Option<u64>,
    pub respect: Option<i64>,
    pub age: Option<u32>,
    pub capacity: Option<u32>,
    pub best_chain: Option<u32>,
    /// Keyed by player id
    pub members: Option<HashMap<String, FactionMember>>,
}

/// v2 `/v2/faction/{id}/basic`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactionSummaryResponse {
    pub basic: Option<FactionSummary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactionSummary {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub tag: Option<String>,
    pub leader_id: Option<u64>,
    pub co_leader_id: Option<u64>,
    pub respect: Option<i64>,
    pub days_old: Option<u32>,
    pub capacity: Option<u32>,
    /// Member count
    pub members: Option<u32>,
    pub best_chain: Option<u32>,
    pub is_enlisted: Option<bool>,
}

/// v2 `/v2/faction/{id}/members`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactionMembersResponse {
    pub members: Option<Vec<FactionMember>>,
}

/// A faction member, in either the v1 map value or the v2 list form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactionMember {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub level: Option<u32>,
    pub days_in_faction: Option<u32>,
    pub position: Option<String>,
    pub last_action: Option<LastAction>,
    pub status: Option<Status>,
}

/// v2 `/v2/faction/{id}/rankedwars`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankedWarsResponse {
    pub rankedwars: Option<Vec<RankedWar>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankedWar {
    pub id: Option<u64>,
    pub start: Option<i64>,
    /// Absent or 0 while the war is still running
    pub end: Option<i64>,
    pub target: Option<i64>,
    pub winner: Option<u64>,
    pub factions: Option<Vec<WarFaction>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WarFaction {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub score: Option<i64>,
    pub chain: Option<i64>,
}

/// v2 `/v2/faction/{id}/territory`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerritoryResponse {
    pub territory: Option<Vec<Territory>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Territory {
    pub id: Option<String>,
    pub sector: Option<u32>,
    pub size: Option<u32>,
    pub density: Option<u32>,
    pub slots: Option<u32>,
    pub respect: Option<i64>,
    pub acquired_at: Option<i64>,
}
