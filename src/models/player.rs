//! Player record

use serde::{Deserialize, Serialize};

use super::{NOT_AVAILABLE, UNKNOWN, text_or};
use crate::client::models::{Bar, UserProfile};

/// Current/maximum pair with defaults filled
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BarRecord {
    pub current: i64,
    pub maximum: i64,
}

impl From<Option<Bar>> for BarRecord {
    fn from(bar: Option<Bar>) -> Self {
        let bar = bar.unwrap_or_default();
        Self {
            current: bar.current.unwrap_or_default(),
            maximum: bar.maximum.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleStats {
    pub strength: f64,
    pub defense: f64,
    pub speed: f64,
    pub dexterity: f64,
    /// Upstream total, or the sum of the four stats when absent
    pub total: f64,
}

/// The key owner's dashboard summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: u64,
    pub name: String,
    pub level: u32,
    pub gender: String,
    pub rank: String,
    pub age_days: u32,
    pub status: String,
    pub last_action: String,
    pub life: BarRecord,
    pub energy: BarRecord,
    pub nerve: BarRecord,
    pub happy: BarRecord,
    pub money_on_hand: i64,
    pub battle_stats: BattleStats,
    pub company_id: u64,
    pub company_name: String,
    pub job_position: String,
    pub faction_id: u64,
    pub faction_name: String,
    pub faction_position: String,
}

impl From<UserProfile> for PlayerRecord {
    fn from(p: UserProfile) -> Self {
        let strength = p.strength.unwrap_or_default();
        let defense = p.defense.unwrap_or_default();
        let speed = p.speed.unwrap_or_default();
        let dexterity = p.dexterity.unwrap_or_default();
        let total = p
            .total
            .unwrap_or(strength + defense + speed + dexterity);

        let job = p.job.unwrap_or_default();
        let faction = p.faction.unwrap_or_default();

        Self {
            id: p.player_id.unwrap_or_default(),
            name: text_or(p.name, UNKNOWN),
            level: p.level.unwrap_or_default(),
            gender: text_or(p.gender, UNKNOWN),
            rank: text_or(p.rank, UNKNOWN),
            age_days: p.age.unwrap_or_default(),
            status: text_or(p.status.and_then(|s| s.description), UNKNOWN),
            last_action: text_or(p.last_action.and_then(|a| a.relative), UNKNOWN),
            life: p.life.into(),
            energy: p.energy.into(),
            nerve: p.nerve.into(),
            happy: p.happy.into(),
            money_on_hand: p.money_onhand.unwrap_or_default(),
            battle_stats: BattleStats {
                strength,
                defense,
                speed,
                dexterity,
                total,
            },
            company_id: job.company_id.unwrap_or_default(),
            company_name: text_or(job.company_name, NOT_AVAILABLE),
            job_position: text_or(job.position, NOT_AVAILABLE),
            faction_id: faction.faction_id.unwrap_or_default(),
            faction_name: text_or(faction.faction_name, NOT_AVAILABLE),
            faction_position: text_or(faction.position, NOT_AVAILABLE),
        }
    }
}
