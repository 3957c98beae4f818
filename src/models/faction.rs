//! Faction records

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{NO_FACTION, NOT_AVAILABLE, UNKNOWN, parse_id, text_or};
use crate::client::models::{FactionBasic, FactionMember, FactionSummary, RankedWar, Territory};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionRecord {
    pub id: u64,
    pub name: String,
    pub tag: String,
    pub leader_id: u64,
    pub co_leader_id: u64,
    pub respect: i64,
    pub age_days: u32,
    pub capacity: u32,
    pub member_count: u32,
    pub best_chain: u32,
}

impl FactionRecord {
    /// Sentinel for a factionless player.
    pub fn none() -> Self {
        Self {
            id: 0,
            name: NO_FACTION.to_string(),
            tag: NOT_AVAILABLE.to_string(),
            leader_id: 0,
            co_leader_id: 0,
            respect: 0,
            age_days: 0,
            capacity: 0,
            member_count: 0,
            best_chain: 0,
        }
    }

    pub fn is_none(&self) -> bool {
        self.id == 0
    }

    /// From the v1 `basic` selection.
    pub fn from_basic(basic: FactionBasic, fallback_id: u64) -> Self {
        let member_count = basic.members.as_ref().map_or(0, |m| m.len() as u32);
        Self {
            id: basic.id.unwrap_or(fallback_id),
            name: text_or(basic.name, UNKNOWN),
            tag: text_or(basic.tag, NOT_AVAILABLE),
            leader_id: basic.leader.unwrap_or_default(),
            co_leader_id: basic.co_leader.unwrap_or_default(),
            respect: basic.respect.unwrap_or_default(),
            age_days: basic.age.unwrap_or_default(),
            capacity: basic.capacity.unwrap_or_default(),
            member_count,
            best_chain: basic.best_chain.unwrap_or_default(),
        }
    }

    /// From the v2 `basic` section.
    pub fn from_summary(summary: FactionSummary, fallback_id: u64) -> Self {
        Self {
            id: summary.id.unwrap_or(fallback_id),
            name: text_or(summary.name, UNKNOWN),
            tag: text_or(summary.tag, NOT_AVAILABLE),
            leader_id: summary.leader_id.unwrap_or_default(),
            co_leader_id: summary.co_leader_id.unwrap_or_default(),
            respect: summary.respect.unwrap_or_default(),
            age_days: summary.days_old.unwrap_or_default(),
            capacity: summary.capacity.unwrap_or_default(),
            member_count: summary.members.unwrap_or_default(),
            best_chain: summary.best_chain.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: u64,
    pub name: String,
    pub level: u32,
    pub position: String,
    pub days_in_faction: u32,
    pub online: bool,
    pub last_action: String,
    pub status: String,
}

impl MemberRecord {
    pub fn from_raw(fallback_id: u64, raw: FactionMember) -> Self {
        let last_action = raw.last_action.unwrap_or_default();
        Self {
            id: raw.id.unwrap_or(fallback_id),
            name: text_or(raw.name, UNKNOWN),
            level: raw.level.unwrap_or_default(),
            position: text_or(raw.position, NOT_AVAILABLE),
            days_in_faction: raw.days_in_faction.unwrap_or_default(),
            online: last_action.is_online(),
            last_action: text_or(last_action.relative, UNKNOWN),
            status: text_or(raw.status.and_then(|s| s.description), UNKNOWN),
        }
    }

    /// v1 roster keyed by player id.
    pub fn roster(raw: HashMap<String, FactionMember>) -> Vec<Self> {
        let mut members: Vec<Self> = raw
            .into_iter()
            .map(|(id, m)| Self::from_raw(parse_id(&id), m))
            .collect();
        members.sort_by_key(|m| m.id);
        members
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarRecord {
    pub id: u64,
    pub start: i64,
    /// 0 while the war has no end
    pub end: i64,
    pub opponent_id: u64,
    pub opponent_name: String,
    pub our_score: i64,
    pub their_score: i64,
    pub winner_id: u64,
}

impl WarRecord {
    fn from_raw(raw: RankedWar, our_id: u64) -> Self {
        let factions = raw.factions.unwrap_or_default();
        let ours = factions.iter().find(|f| f.id == Some(our_id));
        let theirs = factions.iter().find(|f| f.id != Some(our_id));

        Self {
            id: raw.id.unwrap_or_default(),
            start: raw.start.unwrap_or_default(),
            end: raw.end.unwrap_or_default(),
            opponent_id: theirs.and_then(|f| f.id).unwrap_or_default(),
            opponent_name: text_or(theirs.and_then(|f| f.name.clone()), UNKNOWN),
            our_score: ours.and_then(|f| f.score).unwrap_or_default(),
            their_score: theirs.and_then(|f| f.score).unwrap_or_default(),
            winner_id: raw.winner.unwrap_or_default(),
        }
    }
}

/// A war is active when it has no end or ends after `now`.
pub fn is_war_active(end: Option<i64>, now: i64) -> bool {
    match end {
        None | Some(0) => true,
        Some(end) => end > now,
    }
}

/// Split wars into (active, completed) relative to `now` (unix seconds).
pub fn partition_wars(wars: Vec<RankedWar>, our_id: u64, now: i64) -> (Vec<WarRecord>, Vec<WarRecord>) {
    let (active, completed): (Vec<RankedWar>, Vec<RankedWar>) =
        wars.into_iter().partition(|w| is_war_active(w.end, now));
    let convert = |wars: Vec<RankedWar>| {
        wars.into_iter()
            .map(|w| WarRecord::from_raw(w, our_id))
            .collect::<Vec<_>>()
    };
    (convert(active), convert(completed))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerritoryRecord {
    pub id: String,
    pub sector: u32,
    pub size: u32,
    pub density: u32,
    pub slots: u32,
    /// Daily respect
    pub respect: i64,
    pub acquired_at: i64,
}

impl From<Territory> for TerritoryRecord {
    fn from(t: Territory) -> Self {
        Self {
            id: text_or(t.id, NOT_AVAILABLE),
            sector: t.sector.unwrap_or_default(),
            size: t.size.unwrap_or_default(),
            density: t.density.unwrap_or_default(),
            slots: t.slots.unwrap_or_default(),
            respect: t.respect.unwrap_or_default(),
            acquired_at: t.acquired_at.unwrap_or_default(),
        }
    }
}

/// Faction summary plus roster, wars and territory with aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionDetailRecord {
    pub faction: FactionRecord,
    pub members: Vec<MemberRecord>,
    pub online_members: usize,
    pub active_wars: Vec<WarRecord>,
    pub completed_wars: Vec<WarRecord>,
    pub territories: Vec<TerritoryRecord>,
    pub territory_count: usize,
    pub territory_respect: i64,
}

impl FactionDetailRecord {
    pub fn none() -> Self {
        Self::assemble(FactionRecord::none(), Vec::new(), (Vec::new(), Vec::new()), Vec::new())
    }

    pub fn assemble(
        mut faction: FactionRecord,
        members: Vec<MemberRecord>,
        wars: (Vec<WarRecord>, Vec<WarRecord>),
        territories: Vec<TerritoryRecord>,
    ) -> Self {
        if faction.member_count == 0 {
            faction.member_count = members.len() as u32;
        }
        let online_members = members.iter().filter(|m| m.online).count();
        let territory_respect = territories.iter().map(|t| t.respect).sum();
        let (active_wars, completed_wars) = wars;

        Self {
            faction,
            online_members,
            members,
            active_wars,
            completed_wars,
            territory_count: territories.len(),
            territory_respect,
            territories,
        }
    }
}
