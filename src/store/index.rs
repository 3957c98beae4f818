//! Local player index

use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};

use super::{Result, StateStore};
use crate::client::models::UserProfile;
use crate::models::{NOT_AVAILABLE, UNKNOWN, text_or};

/// One row of the player index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedPlayer {
    pub id: u64,
    pub name: String,
    pub level: u32,
    pub status: String,
    pub last_action: String,
    pub company_id: u64,
    pub company_name: String,
    pub faction_id: u64,
    pub faction_name: String,
    pub indexed_at: DateTime<Utc>,
}

impl IndexedPlayer {
    pub fn from_profile(id: u64, profile: UserProfile, indexed_at: DateTime<Utc>) -> Self {
        let job = profile.job.unwrap_or_default();
        let faction = profile.faction.unwrap_or_default();
        Self {
            id: profile.player_id.unwrap_or(id),
            name: text_or(profile.name, UNKNOWN),
            level: profile.level.unwrap_or_default(),
            status: text_or(profile.status.and_then(|s| s.state), UNKNOWN),
            last_action: text_or(profile.last_action.and_then(|a| a.status), UNKNOWN),
            company_id: job.company_id.unwrap_or_default(),
            company_name: text_or(job.company_name, NOT_AVAILABLE),
            faction_id: faction.faction_id.unwrap_or_default(),
            faction_name: text_or(faction.faction_name, NOT_AVAILABLE),
            indexed_at,
        }
    }
}

/// Player index query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSearch {
    /// Case-insensitive name substring
    pub name: Option<String>,
    pub min_level: Option<u32>,
    pub max_level: Option<u32>,
    /// Only players without a job
    pub no_company: bool,
    /// Only factionless players
    pub no_faction: bool,
    pub limit: usize,
}

impl Default for PlayerSearch {
    fn default() -> Self {
        Self {
            name: None,
            min_level: None,
            max_level: None,
            no_company: false,
            no_faction: false,
            limit: 50,
        }
    }
}

impl StateStore {
    /// Insert or replace a player's index row
    pub fn upsert_player(&self, player: &IndexedPlayer) -> Result<()> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO player_index
             (id, name, level, status, last_action, company_id, company_name, faction_id, faction_name, indexed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                player.id as i64,
                player.name,
                player.level,
                player.status,
                player.last_action,
                player.company_id as i64,
                player.company_name,
                player.faction_id as i64,
                player.faction_name,
                player.indexed_at.timestamp()
            ],
        )?;
        Ok(())
    }

    /// Number of distinct players in the index
    pub fn indexed_players(&self) -> Result<usize> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM player_index", [], |r| r.get(0))?;
        Ok(count as usize)
    }

    /// Search the index, highest level first
    pub fn search_players(&self, search: &PlayerSearch) -> Result<Vec<IndexedPlayer>> {
        let pattern = search
            .name
            .as_deref()
            .map(|n| format!("%{}%", n.trim().to_lowercase()));

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, level, status, last_action, company_id, company_name,
                    faction_id, faction_name, indexed_at
             FROM player_index
             WHERE (?1 IS NULL OR LOWER(name) LIKE ?1)
               AND (?2 IS NULL OR level >= ?2)
               AND (?3 IS NULL OR level <= ?3)
               AND (?4 = 0 OR company_id = 0)
               AND (?5 = 0 OR faction_id = 0)
             ORDER BY level DESC, id ASC
             LIMIT ?6",
        )?;

        let rows = stmt.query_map(
            params![
                pattern,
                search.min_level,
                search.max_level,
                search.no_company,
                search.no_faction,
                search.limit as i64
            ],
            |row| {
                Ok(IndexedPlayer {
                    id: row.get::<_, i64>(0)? as u64,
                    name: row.get(1)?,
                    level: row.get(2)?,
                    status: row.get(3)?,
                    last_action: row.get(4)?,
                    company_id: row.get::<_, i64>(5)? as u64,
                    company_name: row.get(6)?,
                    faction_id: row.get::<_, i64>(7)? as u64,
                    faction_name: row.get(8)?,
                    indexed_at: DateTime::from_timestamp(row.get(9)?, 0).unwrap_or_default(),
                })
            },
        )?;

        let mut players = Vec::new();
        for row in rows {
            players.push(row?);
        }
        Ok(players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn player(id: u64, name: &str, level: u32, company_id: u64, faction_id: u64) -> IndexedPlayer {
        IndexedPlayer {
            id,
            name: name.to_string(),
            level,
            status: "Okay".to_string(),
            last_action: "Offline".to_string(),
            company_id,
            company_name: "N/A".to_string(),
            faction_id,
            faction_name: "N/A".to_string(),
            indexed_at: Utc::now(),
        }
    }

    fn seeded() -> StateStore {
        let store = StateStore::open_in_memory().unwrap();
        store.upsert_player(&player(1, "Duke", 100, 77, 9)).unwrap();
        store.upsert_player(&player(2, "Chedburn", 15, 0, 0)).unwrap();
        store.upsert_player(&player(3, "duckling", 15, 0, 9)).unwrap();
        store.upsert_player(&player(4, "Newbie", 1, 0, 0)).unwrap();
        store
    }

    #[test]
    fn test_upsert_replaces() {
        let store = seeded();
        store.upsert_player(&player(1, "Duke", 101, 77, 9)).unwrap();
        assert_eq!(store.indexed_players().unwrap(), 4);
        let top = store.search_players(&PlayerSearch::default()).unwrap();
        assert_eq!(top[0].level, 101);
    }

    #[test]
    fn test_order_is_level_desc_then_id() {
        let store = seeded();
        let ids: Vec<u64> = store
            .search_players(&PlayerSearch::default())
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_name_filter_is_case_insensitive() {
        let store = seeded();
        let found = store
            .search_players(&PlayerSearch {
                name: Some("DU".to_string()),
                ..Default::default()
            })
            .unwrap();
        let ids: Vec<u64> = found.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_unemployed_factionless_in_level_range() {
        let store = seeded();
        let found = store
            .search_players(&PlayerSearch {
                min_level: Some(10),
                max_level: Some(50),
                no_company: true,
                no_faction: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Chedburn");
    }

    #[test]
    fn test_limit() {
        let store = seeded();
        let found = store
            .search_players(&PlayerSearch {
                limit: 2,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_from_sparse_profile() {
        let profile: UserProfile = serde_json::from_value(json!({"name": "Ghost"})).unwrap();
        let row = IndexedPlayer::from_profile(55, profile, Utc::now());
        assert_eq!(row.id, 55);
        assert_eq!(row.level, 0);
        assert_eq!(row.status, "Unknown");
        assert_eq!(row.company_id, 0);
        assert_eq!(row.faction_name, "N/A");
    }
}
