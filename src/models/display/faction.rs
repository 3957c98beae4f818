//! Faction member and war display models

use chrono::DateTime;
use serde::Serialize;
use tabled::Tabled;

use crate::models::{MemberRecord, WarRecord};

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct MemberDisplay {
    #[tabled(rename = "ID")]
    pub id: u64,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "LVL")]
    pub level: u32,

    #[tabled(rename = "POSITION")]
    pub position: String,

    #[tabled(rename = "DAYS")]
    pub days: u32,

    #[tabled(rename = "STATUS")]
    pub status: String,

    #[tabled(rename = "LAST ACTION")]
    pub last_action: String,
}

impl From<&MemberRecord> for MemberDisplay {
    fn from(m: &MemberRecord) -> Self {
        Self {
            id: m.id,
            name: m.name.clone(),
            level: m.level,
            position: m.position.clone(),
            days: m.days_in_faction,
            status: m.status.clone(),
            last_action: m.last_action.clone(),
        }
    }
}

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct WarDisplay {
    #[tabled(rename = "WAR")]
    pub id: u64,

    #[tabled(rename = "OPPONENT")]
    pub opponent: String,

    #[tabled(rename = "SCORE")]
    pub score: String,

    #[tabled(rename = "STARTED")]
    pub started: String,

    #[tabled(rename = "ENDED")]
    pub ended: String,
}

fn format_unix(ts: i64) -> String {
    if ts == 0 {
        return "-".to_string();
    }
    DateTime::from_timestamp(ts, 0)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

impl From<&WarRecord> for WarDisplay {
    fn from(w: &WarRecord) -> Self {
        Self {
            id: w.id,
            opponent: format!("{} [{}]", w.opponent_name, w.opponent_id),
            score: format!("{} - {}", w.our_score, w.their_score),
            started: format_unix(w.start),
            ended: format_unix(w.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_war_has_no_end() {
        let war = WarRecord {
            id: 7,
            start: 1_700_000_000,
            end: 0,
            opponent_id: 8,
            opponent_name: "Them".to_string(),
            our_score: 120,
            their_score: 80,
            winner_id: 0,
        };
        let row = WarDisplay::from(&war);
        assert_eq!(row.ended, "-");
        assert_eq!(row.started, "2023-11-14");
        assert_eq!(row.score, "120 - 80");
    }
}
